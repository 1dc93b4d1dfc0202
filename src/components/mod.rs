//! Landing-page component registry.
//!
//! Every component kind owns a typed config with hard-coded defaults. Stored
//! configs are loose JSON (partial, legacy-shaped or plain wrong), so reads go
//! through [`normalize_config`], which always yields a complete config.

mod chrome;
mod contact;
pub mod overlay;
mod property;
mod sections;
mod showcase;

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

pub use chrome::{CopyrightConfig, FooterConfig, FooterSection, LinkItem, SocialLink};
pub use contact::{Agent, AgentContactConfig, FormConfig, FormField};
pub use property::{
    AccessPoint, Bank, BankPartnershipConfig, FacilitiesConfig, Facility, LocationAccessConfig,
    LocationConfig, LocationInfo, NearbyLocation, ProgressItem, ProgressSliderConfig,
    PromoConfig, PromoContact, UnitSliderConfig, UnitType,
};
pub use sections::{
    ContentConfig, CtaButton, CtaConfig, CustomImageConfig, HeroConfig, TitleDescriptionConfig,
    VideoConfig,
};
pub use showcase::{
    FaqConfig, FaqItem, Feature, FeaturesConfig, GalleryConfig, GalleryImage, PricingConfig,
    PricingFeature, PricingPlan, StatisticItem, StatisticsConfig, Testimonial,
    TestimonialConfig, TimelineConfig, TimelineItem,
};

/// Component tag as stored in the `type` field of a page's content array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentKind {
    Hero,
    Form,
    Features,
    Testimonial,
    Cta,
    Content,
    Gallery,
    Pricing,
    Faq,
    Statistics,
    Video,
    Timeline,
    Location,
    CustomImage,
    Copyright,
    Footer,
    Facilities,
    UnitSlider,
    ProgressSlider,
    BankPartnership,
    AgentContact,
    TitleDescription,
    LocationAccess,
    Promo,
    /// Any tag this build does not know. Its config is passed through as is.
    #[serde(other)]
    Unknown,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 24] = [
        ComponentKind::Hero,
        ComponentKind::Form,
        ComponentKind::Features,
        ComponentKind::Testimonial,
        ComponentKind::Cta,
        ComponentKind::Content,
        ComponentKind::Gallery,
        ComponentKind::Pricing,
        ComponentKind::Faq,
        ComponentKind::Statistics,
        ComponentKind::Video,
        ComponentKind::Timeline,
        ComponentKind::Location,
        ComponentKind::CustomImage,
        ComponentKind::Copyright,
        ComponentKind::Footer,
        ComponentKind::Facilities,
        ComponentKind::UnitSlider,
        ComponentKind::ProgressSlider,
        ComponentKind::BankPartnership,
        ComponentKind::AgentContact,
        ComponentKind::TitleDescription,
        ComponentKind::LocationAccess,
        ComponentKind::Promo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentKind::Hero => "hero",
            ComponentKind::Form => "form",
            ComponentKind::Features => "features",
            ComponentKind::Testimonial => "testimonial",
            ComponentKind::Cta => "cta",
            ComponentKind::Content => "content",
            ComponentKind::Gallery => "gallery",
            ComponentKind::Pricing => "pricing",
            ComponentKind::Faq => "faq",
            ComponentKind::Statistics => "statistics",
            ComponentKind::Video => "video",
            ComponentKind::Timeline => "timeline",
            ComponentKind::Location => "location",
            ComponentKind::CustomImage => "custom-image",
            ComponentKind::Copyright => "copyright",
            ComponentKind::Footer => "footer",
            ComponentKind::Facilities => "facilities",
            ComponentKind::UnitSlider => "unit-slider",
            ComponentKind::ProgressSlider => "progress-slider",
            ComponentKind::BankPartnership => "bank-partnership",
            ComponentKind::AgentContact => "agent-contact",
            ComponentKind::TitleDescription => "title-description",
            ComponentKind::LocationAccess => "location-access",
            ComponentKind::Promo => "promo",
            ComponentKind::Unknown => "unknown",
        }
    }

    pub fn is_known(self) -> bool {
        self != ComponentKind::Unknown
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentKind::ALL.into_iter().find(|k| k.as_str() == s).ok_or(())
    }
}

/// A typed component config with defaults for every field.
pub trait ComponentConfig: Serialize + DeserializeOwned + Default {
    const KIND: ComponentKind;

    /// Rewrite a legacy-shaped raw config into the current shape.
    /// Returns `None` when the input is already current.
    fn migrate(_raw: &Value) -> Option<Value> {
        None
    }

    fn normalize(raw: Option<&Value>) -> Self {
        match raw.and_then(Self::migrate) {
            Some(migrated) => overlay::overlay(Some(&migrated)),
            None => overlay::overlay(raw),
        }
    }
}

// Shared option sets.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Spacing {
    Small,
    #[default]
    Medium,
    Large,
}

fn to_json<T: Serialize>(config: T) -> Value {
    serde_json::to_value(config).unwrap_or_default()
}

macro_rules! registry {
    ($($kind:ident => $config:ty),* $(,)?) => {
        /// Complete config for `kind` built from a stored, possibly partial one.
        pub fn normalize_config(kind: ComponentKind, raw: Option<&Value>) -> Value {
            match kind {
                $(ComponentKind::$kind => to_json(<$config>::normalize(raw)),)*
                ComponentKind::Unknown => raw
                    .filter(|v| v.is_object())
                    .cloned()
                    .unwrap_or_else(|| Value::Object(Map::new())),
            }
        }

        /// The defaults of `kind` as JSON.
        pub fn default_config(kind: ComponentKind) -> Value {
            match kind {
                $(ComponentKind::$kind => to_json(<$config>::default()),)*
                ComponentKind::Unknown => Value::Object(Map::new()),
            }
        }

        #[cfg(test)]
        fn declared_kind(kind: ComponentKind) -> ComponentKind {
            match kind {
                $(ComponentKind::$kind => <$config as ComponentConfig>::KIND,)*
                ComponentKind::Unknown => ComponentKind::Unknown,
            }
        }
    };
}

registry! {
    Hero => HeroConfig,
    Form => FormConfig,
    Features => FeaturesConfig,
    Testimonial => TestimonialConfig,
    Cta => CtaConfig,
    Content => ContentConfig,
    Gallery => GalleryConfig,
    Pricing => PricingConfig,
    Faq => FaqConfig,
    Statistics => StatisticsConfig,
    Video => VideoConfig,
    Timeline => TimelineConfig,
    Location => LocationConfig,
    CustomImage => CustomImageConfig,
    Copyright => CopyrightConfig,
    Footer => FooterConfig,
    Facilities => FacilitiesConfig,
    UnitSlider => UnitSliderConfig,
    ProgressSlider => ProgressSliderConfig,
    BankPartnership => BankPartnershipConfig,
    AgentContact => AgentContactConfig,
    TitleDescription => TitleDescriptionConfig,
    LocationAccess => LocationAccessConfig,
    Promo => PromoConfig,
}

/// Seed templates installed into an empty template catalog.
/// `(name, kind)`; the config of each is the kind's defaults.
pub const SYSTEM_TEMPLATES: &[(&str, ComponentKind)] = &[
    ("Hero Section - Property Focus", ComponentKind::Hero),
    ("Contact Form - Property Inquiry", ComponentKind::Form),
    ("Features Grid - Property Benefits", ComponentKind::Features),
    ("Testimonials - Happy Residents", ComponentKind::Testimonial),
    ("Call To Action", ComponentKind::Cta),
    ("Rich Content Block", ComponentKind::Content),
    ("Image Gallery - Property Showcase", ComponentKind::Gallery),
    ("Pricing Table - Property Plans", ComponentKind::Pricing),
    ("FAQ Section - Property Questions", ComponentKind::Faq),
    ("Statistics Counter - Company Achievements", ComponentKind::Statistics),
    ("Video Section - Property Overview", ComponentKind::Video),
    ("Timeline - Development Progress", ComponentKind::Timeline),
    ("Location Map", ComponentKind::Location),
    ("Custom Image Upload", ComponentKind::CustomImage),
    ("Copyright Notice", ComponentKind::Copyright),
    ("Footer Section", ComponentKind::Footer),
    ("Fasilitas Properti", ComponentKind::Facilities),
    ("Unit Type Slider", ComponentKind::UnitSlider),
    ("Progress Pembangunan", ComponentKind::ProgressSlider),
    ("Kerjasama Bank", ComponentKind::BankPartnership),
    ("Kontak Agent", ComponentKind::AgentContact),
    ("Title & Description", ComponentKind::TitleDescription),
    ("Akses Lokasi", ComponentKind::LocationAccess),
    ("Promo Special", ComponentKind::Promo),
];
