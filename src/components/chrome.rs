//! Page footer and copyright bar.

use serde::{Deserialize, Serialize};

use super::{ComponentConfig, ComponentKind, TextAlign};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkItem {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterSection {
    pub title: String,
    pub links: Vec<LinkItem>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
    pub icon: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FooterLayout {
    #[default]
    Columns,
    Stacked,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FooterConfig {
    pub company_name: String,
    pub description: String,
    pub logo: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub sections: Vec<FooterSection>,
    pub social_media: Vec<SocialLink>,
    pub background_color: String,
    pub text_color: String,
    pub show_divider: bool,
    pub layout: FooterLayout,
    pub columns: u32,
}

impl Default for FooterConfig {
    fn default() -> Self {
        let link = |label: &str, url: &str| LinkItem { label: label.into(), url: url.into() };
        let social = |platform: &str| SocialLink {
            platform: platform.into(),
            url: format!("https://{platform}.com/paramountland"),
            icon: platform.into(),
        };
        Self {
            company_name: "Paramount Land".into(),
            description: "Developer properti terpercaya dengan pengalaman puluhan tahun.".into(),
            logo: String::new(),
            address: "Jl. TB Simatupang No. 1, Jakarta Selatan".into(),
            phone: "+62 21-1234-5678".into(),
            email: "info@paramountland.co.id".into(),
            sections: vec![FooterSection {
                title: "Quick Links".into(),
                links: vec![
                    link("Home", "/"),
                    link("Proyek", "/projects"),
                    link("Tentang Kami", "/about"),
                    link("Kontak", "/contact"),
                ],
            }],
            social_media: vec![social("facebook"), social("instagram"), social("youtube")],
            background_color: "#1f2937".into(),
            text_color: "#ffffff".into(),
            show_divider: true,
            layout: FooterLayout::Columns,
            columns: 4,
        }
    }
}

impl ComponentConfig for FooterConfig {
    const KIND: ComponentKind = ComponentKind::Footer;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSize {
    #[default]
    Small,
    Medium,
    Large,
}

/// `year` empty means the current year is rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CopyrightConfig {
    pub company_name: String,
    pub year: String,
    pub additional_text: String,
    pub show_year: bool,
    pub show_all_rights_reserved: bool,
    pub text_align: TextAlign,
    pub text_size: TextSize,
    pub text_color: String,
    pub background_color: String,
    pub show_border: bool,
    pub custom_classes: String,
    pub links: Vec<LinkItem>,
}

impl Default for CopyrightConfig {
    fn default() -> Self {
        Self {
            company_name: "Paramount Land".into(),
            year: String::new(),
            additional_text: String::new(),
            show_year: true,
            show_all_rights_reserved: true,
            text_align: TextAlign::Center,
            text_size: TextSize::Small,
            text_color: "#000000".into(),
            background_color: "#ffffff".into(),
            show_border: true,
            custom_classes: String::new(),
            links: Vec::new(),
        }
    }
}

impl ComponentConfig for CopyrightConfig {
    const KIND: ComponentKind = ComponentKind::Copyright;
}
