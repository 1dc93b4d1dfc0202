//! Property-specific sections: facilities, unit types, construction progress,
//! partner banks, maps, access routes and promotions.

use serde::{Deserialize, Serialize};

use super::{ComponentConfig, ComponentKind};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Facility {
    pub name: String,
    pub description: String,
    pub icon: String,
    pub image: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacilitiesLayout {
    #[default]
    Grid,
    List,
    Cards,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStyle {
    Flat,
    #[default]
    Shadow,
    Border,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FacilitiesConfig {
    pub title: String,
    pub subtitle: String,
    pub facilities: Vec<Facility>,
    pub layout: FacilitiesLayout,
    pub columns: u32,
    pub show_icons: bool,
    pub show_images: bool,
    pub background_color: String,
    pub card_style: CardStyle,
}

impl Default for FacilitiesConfig {
    fn default() -> Self {
        let facility = |name: &str, description: &str, icon: &str| Facility {
            name: name.into(),
            description: description.into(),
            icon: icon.into(),
            image: String::new(),
        };
        Self {
            title: "Fasilitas Lengkap".into(),
            subtitle: "Nikmati berbagai fasilitas premium untuk kenyamanan hidup Anda".into(),
            facilities: vec![
                facility("Swimming Pool", "Kolam renang dengan pemandangan kota", "pool"),
                facility("Fitness Center", "Gym dengan peralatan modern", "fitness"),
                facility("Security 24/7", "Keamanan terjamin sepanjang waktu", "security"),
                facility("Children Playground", "Area bermain anak yang aman", "playground"),
            ],
            layout: FacilitiesLayout::Grid,
            columns: 2,
            show_icons: true,
            show_images: false,
            background_color: "#ffffff".into(),
            card_style: CardStyle::Shadow,
        }
    }
}

impl ComponentConfig for FacilitiesConfig {
    const KIND: ComponentKind = ComponentKind::Facilities;
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitType {
    pub name: String,
    #[serde(rename = "type")]
    pub unit_type: String,
    pub image: String,
    pub price: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub area: String,
    pub description: String,
    pub features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UnitSliderConfig {
    pub title: String,
    pub subtitle: String,
    pub units: Vec<UnitType>,
    pub auto_play: bool,
    /// Seconds between slides.
    pub auto_play_speed: u32,
    pub show_price_label: bool,
    pub price_label: String,
    pub show_navigation_dots: bool,
    pub show_navigation_arrows: bool,
    pub background_color: String,
}

impl Default for UnitSliderConfig {
    fn default() -> Self {
        Self {
            title: "Pilihan Tipe Unit".into(),
            subtitle: "Temukan unit yang sesuai dengan kebutuhan keluarga Anda".into(),
            units: vec![UnitType {
                name: "2 Bedroom".into(),
                unit_type: "Apartment".into(),
                image: "/images/2br.jpg".into(),
                price: "Rp 850.000.000".into(),
                bedrooms: 2,
                bathrooms: 2,
                area: "55 m²".into(),
                description: "Unit keluarga dengan pemandangan kota".into(),
                features: vec!["Furnished".into(), "City View".into(), "Balcony".into()],
            }],
            auto_play: true,
            auto_play_speed: 3,
            show_price_label: true,
            price_label: "Mulai dari".into(),
            show_navigation_dots: true,
            show_navigation_arrows: true,
            background_color: "#ffffff".into(),
        }
    }
}

impl ComponentConfig for UnitSliderConfig {
    const KIND: ComponentKind = ComponentKind::UnitSlider;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressStatus {
    Completed,
    InProgress,
    #[default]
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressItem {
    pub title: String,
    pub description: String,
    pub date: String,
    pub percentage: u8,
    pub image: String,
    pub status: ProgressStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressSliderConfig {
    pub title: String,
    pub subtitle: String,
    pub progress_items: Vec<ProgressItem>,
    pub auto_play: bool,
    pub auto_play_speed: u32,
    pub show_progress_bar: bool,
    pub show_percentage: bool,
    pub show_navigation_dots: bool,
    pub show_navigation_arrows: bool,
    pub background_color: String,
    pub accent_color: String,
}

impl Default for ProgressSliderConfig {
    fn default() -> Self {
        let stage = |title: &str, description: &str, date: &str, percentage, status| ProgressItem {
            title: title.into(),
            description: description.into(),
            date: date.into(),
            percentage,
            image: String::new(),
            status,
        };
        Self {
            title: "Progress Pembangunan".into(),
            subtitle: "Pantau perkembangan proyek secara real-time".into(),
            progress_items: vec![
                stage("Tahap Persiapan", "Pembebasan lahan dan perizinan", "Q1 2024", 100, ProgressStatus::Completed),
                stage("Konstruksi Fondasi", "Pembangunan struktur bawah gedung", "Q2 2024", 85, ProgressStatus::InProgress),
                stage("Finishing & Serah Terima", "Penyelesaian dan handover unit", "Q4 2024", 0, ProgressStatus::Upcoming),
            ],
            auto_play: true,
            auto_play_speed: 4,
            show_progress_bar: true,
            show_percentage: true,
            show_navigation_dots: true,
            show_navigation_arrows: true,
            background_color: "#ffffff".into(),
            accent_color: "#3b82f6".into(),
        }
    }
}

impl ComponentConfig for ProgressSliderConfig {
    const KIND: ComponentKind = ComponentKind::ProgressSlider;
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Bank {
    pub name: String,
    pub logo: String,
    pub description: String,
    pub website: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BankLayout {
    #[default]
    Grid,
    Carousel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BankPartnershipConfig {
    pub title: String,
    pub subtitle: String,
    pub banks: Vec<Bank>,
    pub background_color: String,
    pub show_description: bool,
    pub layout: BankLayout,
}

impl Default for BankPartnershipConfig {
    fn default() -> Self {
        let bank = |name: &str, logo: &str| Bank {
            name: name.into(),
            logo: logo.into(),
            description: String::new(),
            website: String::new(),
        };
        Self {
            title: "Kerjasama Bank".into(),
            subtitle: "Dapatkan kemudahan KPR dengan bunga kompetitif".into(),
            banks: vec![
                bank("Bank BCA", "/images/bca-logo.png"),
                bank("Bank Mandiri", "/images/mandiri-logo.png"),
                bank("Bank BRI", "/images/bri-logo.png"),
            ],
            background_color: "#f8f9fa".into(),
            show_description: true,
            layout: BankLayout::Grid,
        }
    }
}

impl ComponentConfig for BankPartnershipConfig {
    const KIND: ComponentKind = ComponentKind::BankPartnership;
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationInfo {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub hours: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapType {
    #[default]
    Openstreetmap,
    Google,
    Embed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationConfig {
    pub title: String,
    pub subtitle: String,
    pub show_map: bool,
    pub map_type: MapType,
    pub map_url: String,
    pub embed_code: String,
    pub locations: Vec<LocationInfo>,
    pub show_contact_info: bool,
    pub map_height: u32,
    pub class_name: String,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            title: "Lokasi Kami".into(),
            subtitle: String::new(),
            show_map: true,
            map_type: MapType::Openstreetmap,
            map_url: String::new(),
            embed_code: String::new(),
            locations: Vec::new(),
            show_contact_info: true,
            map_height: 400,
            class_name: String::new(),
        }
    }
}

impl ComponentConfig for LocationConfig {
    const KIND: ComponentKind = ComponentKind::Location;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    #[default]
    Car,
    PublicTransport,
    Walking,
    Airport,
    Train,
    Bus,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessPoint {
    pub name: String,
    #[serde(rename = "type")]
    pub mode: AccessMode,
    pub distance: String,
    pub time: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceCategory {
    #[default]
    Shopping,
    School,
    Hospital,
    Restaurant,
    Office,
    Recreation,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NearbyLocation {
    pub name: String,
    #[serde(rename = "type")]
    pub category: PlaceCategory,
    pub distance: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationAccessConfig {
    pub title: String,
    pub subtitle: String,
    pub address: String,
    pub map_url: String,
    pub show_map: bool,
    pub access_points: Vec<AccessPoint>,
    pub nearby_locations: Vec<NearbyLocation>,
    pub background_color: String,
    pub show_access_points: bool,
    pub show_nearby_locations: bool,
}

impl Default for LocationAccessConfig {
    fn default() -> Self {
        Self {
            title: "Akses Lokasi Strategis".into(),
            subtitle: "Terhubung dengan berbagai fasilitas dan transportasi".into(),
            address: "Jl. Boulevard Raya, Gading Serpong, Tangerang".into(),
            map_url: String::new(),
            show_map: true,
            access_points: vec![AccessPoint {
                name: "Tol Jakarta-Merak".into(),
                mode: AccessMode::Car,
                distance: "2 km".into(),
                time: "5 menit".into(),
                description: String::new(),
                icon: "car".into(),
            }],
            nearby_locations: vec![NearbyLocation {
                name: "Summarecon Mall Serpong".into(),
                category: PlaceCategory::Shopping,
                distance: "1.5 km".into(),
                description: String::new(),
                icon: "shopping".into(),
            }],
            background_color: "#ffffff".into(),
            show_access_points: true,
            show_nearby_locations: true,
        }
    }
}

impl ComponentConfig for LocationAccessConfig {
    const KIND: ComponentKind = ComponentKind::LocationAccess;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PromoType {
    #[default]
    Discount,
    Cashback,
    Bonus,
    EarlyBird,
    LimitedTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromoContact {
    pub phone: String,
    pub email: String,
    pub whatsapp: String,
}

impl Default for PromoContact {
    fn default() -> Self {
        Self {
            phone: "+62 812-3456-7890".into(),
            email: "promo@property.com".into(),
            whatsapp: "+62 812-3456-7890".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PromoConfig {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub promo_type: PromoType,
    pub discount_value: String,
    pub original_price: String,
    pub discounted_price: String,
    pub valid_until: String,
    pub terms: Vec<String>,
    pub cta_text: String,
    pub cta_link: String,
    pub background_color: String,
    pub text_color: String,
    pub accent_color: String,
    pub show_timer: bool,
    pub contact_info: PromoContact,
}

impl Default for PromoConfig {
    fn default() -> Self {
        Self {
            title: "Promo Spesial Hari Ini!".into(),
            subtitle: "Jangan Lewatkan Kesempatan Emas".into(),
            description: "Dapatkan diskon fantastis untuk investasi properti impian Anda. \
                          Promo terbatas, buruan daftar sekarang!"
                .into(),
            promo_type: PromoType::Discount,
            discount_value: "30%".into(),
            original_price: "Rp 500.000.000".into(),
            discounted_price: "Rp 350.000.000".into(),
            valid_until: "2024-12-31".into(),
            terms: vec![
                "Berlaku untuk pembelian unit tertentu".into(),
                "Tidak dapat digabung dengan promo lain".into(),
                "Syarat dan ketentuan berlaku".into(),
            ],
            cta_text: "Klaim Promo Sekarang".into(),
            cta_link: "#contact".into(),
            background_color: "#ff6b35".into(),
            text_color: "#ffffff".into(),
            accent_color: "#ffd700".into(),
            show_timer: true,
            contact_info: PromoContact::default(),
        }
    }
}

impl ComponentConfig for PromoConfig {
    const KIND: ComponentKind = ComponentKind::Promo;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn promo_defaults_carry_discount() {
        let promo = PromoConfig::normalize(None);
        assert_eq!(promo.discount_value, "30%");
        assert_eq!(promo.terms.len(), 3);
    }

    #[test]
    fn promo_keeps_empty_terms_and_disabled_timer() {
        let promo = PromoConfig::normalize(Some(&json!({
            "showTimer": false,
            "terms": [],
            "contactInfo": {"phone": "0812"}
        })));
        assert!(!promo.show_timer);
        assert!(promo.terms.is_empty());
        assert_eq!(promo.contact_info.phone, "0812");
        assert_eq!(promo.contact_info.email, "promo@property.com");
    }

    #[test]
    fn progress_status_uses_kebab_tags() {
        let progress = ProgressSliderConfig::normalize(Some(&json!({
            "progressItems": [{"title": "Struktur", "percentage": 45, "status": "in-progress"}]
        })));
        assert_eq!(progress.progress_items.len(), 1);
        assert_eq!(progress.progress_items[0].status, ProgressStatus::InProgress);
        assert_eq!(progress.accent_color, "#3b82f6");
    }

    #[test]
    fn access_point_mode_is_snake_case() {
        let access = LocationAccessConfig::normalize(Some(&json!({
            "accessPoints": [{"name": "KRL", "type": "public_transport"}]
        })));
        assert_eq!(access.access_points[0].mode, AccessMode::PublicTransport);
    }
}
