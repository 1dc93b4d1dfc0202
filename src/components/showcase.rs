use serde::{Deserialize, Serialize};

use super::{ComponentConfig, ComponentKind, Spacing};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryImage {
    pub id: String,
    pub url: String,
    pub alt: String,
    pub caption: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GalleryLayout {
    #[default]
    Grid,
    Slider,
    Masonry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GalleryConfig {
    pub title: String,
    pub subtitle: String,
    pub layout: GalleryLayout,
    pub columns: u32,
    pub spacing: Spacing,
    pub show_captions: bool,
    pub autoplay: bool,
    pub autoplay_speed: u32,
    pub images: Vec<GalleryImage>,
    pub class_name: String,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            layout: GalleryLayout::Grid,
            columns: 3,
            spacing: Spacing::Medium,
            show_captions: true,
            autoplay: false,
            autoplay_speed: 3000,
            images: Vec::new(),
            class_name: String::new(),
        }
    }
}

impl ComponentConfig for GalleryConfig {
    const KIND: ComponentKind = ComponentKind::Gallery;
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Feature {
    pub icon: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeaturesLayout {
    #[default]
    Grid,
    List,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    pub title: String,
    pub features: Vec<Feature>,
    pub layout: FeaturesLayout,
    pub columns: u32,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        let feature = |icon: &str, title: &str, description: &str| Feature {
            icon: icon.into(),
            title: title.into(),
            description: description.into(),
        };
        Self {
            title: "Why Choose Our Properties".into(),
            features: vec![
                feature("map-pin", "Prime Location", "Strategic locations near business districts and transportation"),
                feature("shield-check", "Legal Guarantee", "Complete legal documentation and certificates"),
                feature("home", "Ready to Live", "Move-in ready properties with modern facilities"),
                feature("trending-up", "Investment Value", "High potential for property value appreciation"),
            ],
            layout: FeaturesLayout::Grid,
            columns: 2,
        }
    }
}

impl ComponentConfig for FeaturesConfig {
    const KIND: ComponentKind = ComponentKind::Features;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Testimonial {
    pub name: String,
    pub position: String,
    pub content: String,
    pub avatar: String,
    pub rating: f64,
}

impl Default for Testimonial {
    fn default() -> Self {
        Self {
            name: String::new(),
            position: String::new(),
            content: String::new(),
            avatar: String::new(),
            rating: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestimonialLayout {
    #[default]
    Carousel,
    Grid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestimonialConfig {
    pub title: String,
    pub testimonials: Vec<Testimonial>,
    pub layout: TestimonialLayout,
    pub auto_play: bool,
}

impl Default for TestimonialConfig {
    fn default() -> Self {
        Self {
            title: "What Our Residents Say".into(),
            testimonials: vec![Testimonial {
                name: "Budi Santoso".into(),
                position: "Homeowner".into(),
                content: "The handover was on time and the neighbourhood is wonderful.".into(),
                avatar: String::new(),
                rating: 5.0,
            }],
            layout: TestimonialLayout::Carousel,
            auto_play: true,
        }
    }
}

impl ComponentConfig for TestimonialConfig {
    const KIND: ComponentKind = ComponentKind::Testimonial;
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingFeature {
    pub id: String,
    pub text: String,
    pub included: bool,
    pub highlight: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    #[default]
    Blue,
    Green,
    Purple,
    Orange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PricingPlan {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub currency: String,
    pub period: String,
    pub badge: String,
    pub badge_color: BadgeColor,
    pub features: Vec<PricingFeature>,
    pub cta_text: String,
    pub cta_url: String,
    pub highlighted: bool,
}

impl Default for PricingPlan {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            description: String::new(),
            price: String::new(),
            currency: "Rp".into(),
            period: String::new(),
            badge: String::new(),
            badge_color: BadgeColor::Blue,
            features: Vec::new(),
            cta_text: "Pilih Paket".into(),
            cta_url: String::new(),
            highlighted: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingLayout {
    #[default]
    Cards,
    Table,
    Toggle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PricingConfig {
    pub title: String,
    pub subtitle: String,
    pub layout: PricingLayout,
    pub columns: u32,
    pub show_comparison: bool,
    pub plans: Vec<PricingPlan>,
    pub class_name: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            layout: PricingLayout::Cards,
            columns: 3,
            show_comparison: false,
            plans: Vec::new(),
            class_name: String::new(),
        }
    }
}

impl ComponentConfig for PricingConfig {
    const KIND: ComponentKind = ComponentKind::Pricing;
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FaqItem {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FaqConfig {
    pub title: String,
    pub subtitle: String,
    pub searchable: bool,
    pub categories: Vec<String>,
    pub items: Vec<FaqItem>,
    pub allow_multiple: bool,
    pub class_name: String,
}

impl Default for FaqConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            searchable: true,
            categories: Vec::new(),
            items: Vec::new(),
            allow_multiple: false,
            class_name: String::new(),
        }
    }
}

impl ComponentConfig for FaqConfig {
    const KIND: ComponentKind = ComponentKind::Faq;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccentColor {
    #[default]
    Blue,
    Green,
    Purple,
    Orange,
    Red,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticItem {
    pub label: String,
    pub value: f64,
    pub suffix: String,
    pub prefix: String,
    pub icon: String,
    pub description: String,
    pub color: AccentColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatisticsLayout {
    #[default]
    Grid,
    Horizontal,
    Cards,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatisticsConfig {
    pub title: String,
    pub subtitle: String,
    pub layout: StatisticsLayout,
    pub columns: u32,
    pub animate: bool,
    pub animation_duration: u32,
    pub items: Vec<StatisticItem>,
    pub background_color: String,
    pub class_name: String,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            layout: StatisticsLayout::Grid,
            columns: 3,
            animate: true,
            animation_duration: 2000,
            items: Vec::new(),
            background_color: String::new(),
            class_name: String::new(),
        }
    }
}

impl ComponentConfig for StatisticsConfig {
    const KIND: ComponentKind = ComponentKind::Statistics;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneStatus {
    Completed,
    Current,
    #[default]
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineItem {
    pub title: String,
    pub description: String,
    pub date: String,
    pub status: MilestoneStatus,
    pub icon: String,
    pub image: String,
    pub progress: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineLayout {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimelineConfig {
    pub title: String,
    pub subtitle: String,
    pub layout: TimelineLayout,
    pub show_progress: bool,
    pub show_images: bool,
    pub show_dates: bool,
    pub items: Vec<TimelineItem>,
    pub class_name: String,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            layout: TimelineLayout::Vertical,
            show_progress: true,
            show_images: false,
            show_dates: true,
            items: Vec::new(),
            class_name: String::new(),
        }
    }
}

impl ComponentConfig for TimelineConfig {
    const KIND: ComponentKind = ComponentKind::Timeline;
}
