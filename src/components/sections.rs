//! Text-and-media sections: hero, call to action, rich content, headings,
//! single images and embedded video.

use serde::{Deserialize, Serialize};

use super::{ComponentConfig, ComponentKind, TextAlign};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeroConfig {
    pub title: String,
    pub subtitle: String,
    pub background_image: String,
    pub background_color: String,
    pub cta_text: String,
    pub cta_action: String,
    pub cta_url: String,
    pub overlay: bool,
    pub text_align: TextAlign,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            title: "Find Your Dream Property".into(),
            subtitle: "Discover premium properties with exclusive offers".into(),
            background_image: "/images/hero-bg.svg".into(),
            background_color: "#667eea".into(),
            cta_text: "Explore Now".into(),
            cta_action: "scroll-to-form".into(),
            cta_url: String::new(),
            overlay: true,
            text_align: TextAlign::Center,
        }
    }
}

impl ComponentConfig for HeroConfig {
    const KIND: ComponentKind = ComponentKind::Hero;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CtaButton {
    pub text: String,
    pub action: String,
    pub url: String,
}

impl Default for CtaButton {
    fn default() -> Self {
        Self { text: String::new(), action: "link".into(), url: String::new() }
    }
}

/// An empty `secondaryButton.text` means the button is not rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CtaConfig {
    pub title: String,
    pub subtitle: String,
    pub primary_button: CtaButton,
    pub secondary_button: CtaButton,
    pub background_color: String,
    pub text_color: String,
}

impl Default for CtaConfig {
    fn default() -> Self {
        Self {
            title: "Ready to Own Your Dream Home?".into(),
            subtitle: "Book a site visit today and get exclusive launch prices".into(),
            primary_button: CtaButton {
                text: "Contact Us".into(),
                action: "scroll-to-form".into(),
                url: String::new(),
            },
            secondary_button: CtaButton::default(),
            background_color: "#3b82f6".into(),
            text_color: "#ffffff".into(),
        }
    }
}

impl ComponentConfig for CtaConfig {
    const KIND: ComponentKind = ComponentKind::Cta;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentConfig {
    pub content: String,
    pub text_align: TextAlign,
    pub background_color: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            content: "<p>Write your content here.</p>".into(),
            text_align: TextAlign::Left,
            background_color: "#ffffff".into(),
        }
    }
}

impl ComponentConfig for ContentConfig {
    const KIND: ComponentKind = ComponentKind::Content;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleSize {
    Small,
    Medium,
    #[default]
    Large,
    Xl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleFont {
    #[default]
    Default,
    Serif,
    Mono,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockSpacing {
    Compact,
    #[default]
    Normal,
    Relaxed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockWidth {
    Full,
    #[default]
    Container,
    Narrow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TitleDescriptionConfig {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub title_size: TitleSize,
    pub text_align: TextAlign,
    pub title_color: String,
    pub subtitle_color: String,
    pub description_color: String,
    pub background_color: String,
    pub show_subtitle: bool,
    pub show_description: bool,
    pub title_font: TitleFont,
    pub spacing: BlockSpacing,
    pub max_width: BlockWidth,
}

impl Default for TitleDescriptionConfig {
    fn default() -> Self {
        Self {
            title: "Judul Bagian".into(),
            subtitle: "Subtitle yang menjelaskan lebih detail".into(),
            description: "Deskripsi lengkap yang memberikan informasi komprehensif tentang topik yang dibahas.".into(),
            title_size: TitleSize::Large,
            text_align: TextAlign::Center,
            title_color: "#000000".into(),
            subtitle_color: "#666666".into(),
            description_color: "#666666".into(),
            background_color: "#ffffff".into(),
            show_subtitle: true,
            show_description: true,
            title_font: TitleFont::Default,
            spacing: BlockSpacing::Normal,
            max_width: BlockWidth::Container,
        }
    }
}

impl ComponentConfig for TitleDescriptionConfig {
    const KIND: ComponentKind = ComponentKind::TitleDescription;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClickAction {
    #[default]
    None,
    Link,
    Popup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageHeight {
    Auto,
    Small,
    #[default]
    Medium,
    Large,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectFit {
    #[default]
    Cover,
    Contain,
    Fill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextPosition {
    Top,
    Center,
    Bottom,
    #[default]
    Overlay,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomImageConfig {
    pub title: String,
    pub description: String,
    pub desktop_image: String,
    pub mobile_image: String,
    pub alt_text: String,
    pub click_action: ClickAction,
    pub link_url: String,
    pub height: ImageHeight,
    pub object_fit: ObjectFit,
    pub show_overlay: bool,
    pub overlay_text: String,
    pub text_position: TextPosition,
    pub text_align: TextAlign,
}

impl Default for CustomImageConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            desktop_image: String::new(),
            mobile_image: String::new(),
            alt_text: "Custom Image".into(),
            click_action: ClickAction::None,
            link_url: String::new(),
            height: ImageHeight::Medium,
            object_fit: ObjectFit::Cover,
            show_overlay: false,
            overlay_text: String::new(),
            text_position: TextPosition::Overlay,
            text_align: TextAlign::Center,
        }
    }
}

impl ComponentConfig for CustomImageConfig {
    const KIND: ComponentKind = ComponentKind::CustomImage;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoSource {
    #[default]
    Youtube,
    Vimeo,
    Direct,
    Embed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "16:9")]
    Widescreen,
    #[serde(rename = "4:3")]
    Standard,
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "21:9")]
    Ultrawide,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoConfig {
    pub title: String,
    pub subtitle: String,
    #[serde(rename = "type")]
    pub source: VideoSource,
    pub video_id: String,
    pub video_url: String,
    pub embed_code: String,
    pub thumbnail_url: String,
    pub autoplay: bool,
    pub show_controls: bool,
    pub aspect_ratio: AspectRatio,
    pub max_width: String,
    pub description: String,
    pub class_name: String,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            title: "Property Overview".into(),
            subtitle: "Take a virtual tour of our latest development".into(),
            source: VideoSource::Youtube,
            video_id: String::new(),
            video_url: String::new(),
            embed_code: String::new(),
            thumbnail_url: String::new(),
            autoplay: false,
            show_controls: true,
            aspect_ratio: AspectRatio::Widescreen,
            max_width: "100%".into(),
            description: String::new(),
            class_name: String::new(),
        }
    }
}

impl ComponentConfig for VideoConfig {
    const KIND: ComponentKind = ComponentKind::Video;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hero_keeps_explicit_false_overlay() {
        let hero = HeroConfig::normalize(Some(&json!({"overlay": false, "textAlign": "right"})));
        assert!(!hero.overlay);
        assert_eq!(hero.text_align, TextAlign::Right);
        assert_eq!(hero.cta_text, "Explore Now");
    }

    #[test]
    fn cta_fills_partial_button() {
        let cta = CtaConfig::normalize(Some(&json!({"primaryButton": {"text": "Call"}})));
        assert_eq!(cta.primary_button.text, "Call");
        assert_eq!(cta.primary_button.action, "scroll-to-form");
    }

    #[test]
    fn video_aspect_ratio_tags() {
        let video = VideoConfig::normalize(Some(&json!({"aspectRatio": "4:3", "type": "vimeo"})));
        assert_eq!(video.aspect_ratio, AspectRatio::Standard);
        assert_eq!(video.source, VideoSource::Vimeo);
        let fallback = VideoConfig::normalize(Some(&json!({"aspectRatio": "3:2"})));
        assert_eq!(fallback.aspect_ratio, AspectRatio::Widescreen);
    }
}
