use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::components::ComponentKind;

pub type Id = Uuid;

fn empty_object() -> Value {
    Value::Object(Map::new())
}

fn custom_template() -> String {
    "custom".into()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl PageStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PageStatus::Draft => "draft",
            PageStatus::Published => "published",
            PageStatus::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(PageStatus::Draft),
            "published" => Some(PageStatus::Published),
            "archived" => Some(PageStatus::Archived),
            _ => None,
        }
    }
}

/// One entry of a page's ordered content list.
///
/// A `type` this build does not know reads as [`ComponentKind::Unknown`]; the
/// original tag is kept in `raw_type` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(from = "StoredComponent", into = "StoredComponent")]
pub struct LandingPageComponent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    #[schema(value_type = Object)]
    pub config: Value,
    pub order: u32,
    #[serde(skip)]
    pub raw_type: Option<String>,
}

impl LandingPageComponent {
    pub fn new(id: impl Into<String>, kind: ComponentKind, config: Value, order: u32) -> Self {
        Self { id: id.into(), kind, config, order, raw_type: None }
    }

    /// The tag as persisted.
    pub fn type_tag(&self) -> &str {
        match (&self.raw_type, self.kind) {
            (Some(tag), ComponentKind::Unknown) => tag,
            _ => self.kind.as_str(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct StoredComponent {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default = "empty_object")]
    config: Value,
    #[serde(default)]
    order: u32,
}

impl From<StoredComponent> for LandingPageComponent {
    fn from(stored: StoredComponent) -> Self {
        let kind = stored.kind.parse().unwrap_or(ComponentKind::Unknown);
        Self {
            id: stored.id,
            kind,
            config: stored.config,
            order: stored.order,
            raw_type: (!kind.is_known()).then_some(stored.kind),
        }
    }
}

impl From<LandingPageComponent> for StoredComponent {
    fn from(component: LandingPageComponent) -> Self {
        Self {
            kind: component.type_tag().to_string(),
            id: component.id,
            config: component.config,
            order: component.order,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LandingPage {
    pub id: Id,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub content: Vec<LandingPageComponent>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub og_image: Option<String>,
    pub status: PageStatus,
    pub template_type: String,
    pub target_audience: Option<String>,
    pub campaign_source: Option<String>,
    pub tracking_code: Option<String>,
    #[schema(value_type = Object)]
    pub settings: Value,
    pub published_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LandingPage {
    pub fn is_published(&self) -> bool {
        self.status == PageStatus::Published
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewLandingPage {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Vec<LandingPageComponent>,
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub og_image: Option<String>,
    #[serde(default)]
    pub status: PageStatus,
    #[serde(default = "custom_template")]
    pub template_type: String,
    #[serde(default)]
    pub target_audience: Option<String>,
    #[serde(default)]
    pub campaign_source: Option<String>,
    #[serde(default)]
    pub tracking_code: Option<String>,
    #[schema(value_type = Object)]
    #[serde(default = "empty_object")]
    pub settings: Value,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl NewLandingPage {
    pub fn new(title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
            description: None,
            content: Vec::new(),
            meta_title: None,
            meta_description: None,
            og_image: None,
            status: PageStatus::Draft,
            template_type: custom_template(),
            target_audience: None,
            campaign_source: None,
            tracking_code: None,
            settings: empty_object(),
            expires_at: None,
        }
    }
}

/// Partial page update. Absent fields are left as stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateLandingPage {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub content: Option<Vec<LandingPageComponent>>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub og_image: Option<String>,
    pub status: Option<PageStatus>,
    pub template_type: Option<String>,
    pub target_audience: Option<String>,
    pub campaign_source: Option<String>,
    pub tracking_code: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub settings: Option<Value>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl UpdateLandingPage {
    pub fn apply_to(self, page: &mut LandingPage) {
        if let Some(v) = self.title { page.title = v; }
        if let Some(v) = self.slug { page.slug = v; }
        if let Some(v) = self.description { page.description = Some(v); }
        if let Some(v) = self.content { page.content = v; }
        if let Some(v) = self.meta_title { page.meta_title = Some(v); }
        if let Some(v) = self.meta_description { page.meta_description = Some(v); }
        if let Some(v) = self.og_image { page.og_image = Some(v); }
        if let Some(v) = self.status { page.status = v; }
        if let Some(v) = self.template_type { page.template_type = v; }
        if let Some(v) = self.target_audience { page.target_audience = Some(v); }
        if let Some(v) = self.campaign_source { page.campaign_source = Some(v); }
        if let Some(v) = self.tracking_code { page.tracking_code = Some(v); }
        if let Some(v) = self.settings { page.settings = v; }
        if let Some(v) = self.expires_at { page.expires_at = Some(v); }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct PageFilter {
    pub status: Option<PageStatus>,
    pub campaign_source: Option<String>,
    pub created_by: Option<String>,
    /// Case-insensitive match on title, description or slug.
    pub search: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl PageFilter {
    pub fn matches(&self, page: &LandingPage) -> bool {
        if self.status.is_some_and(|s| s != page.status) {
            return false;
        }
        if self.campaign_source.is_some() && self.campaign_source != page.campaign_source {
            return false;
        }
        if self.created_by.is_some() && self.created_by != page.created_by {
            return false;
        }
        if let Some(term) = self.search.as_deref().map(str::to_lowercase) {
            let hit = page.title.to_lowercase().contains(&term)
                || page.slug.to_lowercase().contains(&term)
                || page.description.as_deref().is_some_and(|d| d.to_lowercase().contains(&term));
            if !hit {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PageList {
    pub items: Vec<LandingPage>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClonePage {
    pub title: String,
    pub slug: String,
}

/// One editing step on a page's component list.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ContentEdit {
    /// Appends a copy of a stored template.
    AddTemplate { template_id: Id },
    /// Appends a fresh component; missing config fields take their defaults.
    Add {
        #[serde(rename = "type")]
        kind: ComponentKind,
        #[serde(default)]
        #[schema(value_type = Option<Object>)]
        config: Option<Value>,
    },
    Update {
        component_id: String,
        #[schema(value_type = Object)]
        config: Value,
    },
    Remove { component_id: String },
    /// Moves `from_id` to the slot of `to_id`.
    Reorder { from_id: String, to_id: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EditedPage {
    pub page: LandingPage,
    /// Id of the appended component for the add operations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
}

// Component templates

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComponentTemplate {
    pub id: Id,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    #[schema(value_type = Object)]
    pub config: Value,
    pub preview_image: Option<String>,
    pub is_system: bool,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewComponentTemplate {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    #[schema(value_type = Object)]
    #[serde(default = "empty_object")]
    pub config: Value,
    #[serde(default)]
    pub preview_image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateComponentTemplate {
    pub name: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub config: Option<Value>,
    pub preview_image: Option<String>,
}

// Analytics

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficEvent {
    Visit,
    Conversion,
}

/// Daily counters per (page, source, device).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct AnalyticsRecord {
    pub id: Id,
    pub landing_page_id: Id,
    pub date: NaiveDate,
    pub source: String,
    pub device_type: String,
    pub visit_count: i64,
    pub conversion_count: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TrackEvent {
    pub source: Option<String>,
    pub device_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

// Kanban

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct KanbanBoard {
    pub id: Id,
    pub title: String,
    pub description: Option<String>,
    pub owner: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewKanbanBoard {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct KanbanColumn {
    pub id: Id,
    pub board_id: Id,
    pub title: String,
    pub order: i32,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewKanbanColumn {
    pub board_id: Id,
    pub title: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateKanbanColumn {
    pub title: Option<String>,
    pub color: Option<String>,
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            "urgent" => Some(Priority::Urgent),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct KanbanTask {
    pub id: Id,
    pub board_id: Id,
    pub column_id: Id,
    pub title: String,
    pub description: Option<String>,
    pub order: i32,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub assigned_to: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewKanbanTask {
    pub board_id: Id,
    pub column_id: Id,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MoveTask {
    pub column_id: Id,
    pub order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ColumnView {
    #[serde(flatten)]
    pub column: KanbanColumn,
    pub tasks: Vec<KanbanTask>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BoardView {
    #[serde(flatten)]
    pub board: KanbanBoard,
    pub columns: Vec<ColumnView>,
}

// Contact inquiries

fn general_inquiry() -> String {
    "general".into()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    #[default]
    New,
    Contacted,
    Closed,
}

impl InquiryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            InquiryStatus::New => "new",
            InquiryStatus::Contacted => "contacted",
            InquiryStatus::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(InquiryStatus::New),
            "contacted" => Some(InquiryStatus::Contacted),
            "closed" => Some(InquiryStatus::Closed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ContactInquiry {
    pub id: Id,
    pub project_id: String,
    pub project_name: Option<String>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: Option<String>,
    pub inquiry_type: String,
    pub unit_slug: Option<String>,
    pub status: InquiryStatus,
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewContactInquiry {
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub project_name: Option<String>,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "general_inquiry")]
    pub inquiry_type: String,
    #[serde(default)]
    pub unit_slug: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct InquiryFilter {
    /// `new`, `contacted`, `closed`, or `all`.
    pub status: Option<String>,
    /// 1-based.
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl InquiryFilter {
    pub const DEFAULT_LIMIT: u32 = 10;
    pub const MAX_LIMIT: u32 = 100;

    /// `None` means every status.
    pub fn status(&self) -> Result<Option<InquiryStatus>, String> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") | Some("all") => Ok(None),
            Some(s) => InquiryStatus::parse(s).map(Some).ok_or_else(|| format!("unknown status '{s}'")),
        }
    }

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT).clamp(1, Self::MAX_LIMIT)
    }

    pub fn offset(&self) -> u32 {
        (self.page() - 1).saturating_mul(self.limit())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InquiryList {
    pub items: Vec<ContactInquiry>,
    pub page: u32,
    pub limit: u32,
    pub total: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InquiryStatusUpdate {
    pub status: InquiryStatus,
}

// Website settings and navigation

/// Site-wide chrome shown around every public page. Stored as a single record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct WebsiteSettings {
    pub site_title: String,
    pub site_description: Option<String>,
    pub site_favicon: Option<String>,
    pub logo_light: Option<String>,
    pub logo_dark: Option<String>,
    pub logo_footer: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub whatsapp_number: Option<String>,
    pub email: Option<String>,
    pub facebook_url: Option<String>,
    pub instagram_url: Option<String>,
    pub twitter_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub youtube_url: Option<String>,
    pub tiktok_url: Option<String>,
    pub meta_keywords: Option<String>,
    pub meta_author: Option<String>,
    pub og_image: Option<String>,
    pub copyright_text: Option<String>,
    pub footer_description: Option<String>,
    pub google_analytics_id: Option<String>,
    pub google_tag_manager_id: Option<String>,
    pub facebook_pixel_id: Option<String>,
    pub business_hours: Option<String>,
    pub maintenance_mode: bool,
    pub maintenance_message: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for WebsiteSettings {
    fn default() -> Self {
        Self {
            site_title: "Paramount Land".into(),
            site_description: Some("Premium Property Developer".into()),
            site_favicon: None,
            logo_light: None,
            logo_dark: None,
            logo_footer: None,
            address: None,
            phone_number: None,
            whatsapp_number: None,
            email: None,
            facebook_url: None,
            instagram_url: None,
            twitter_url: None,
            linkedin_url: None,
            youtube_url: None,
            tiktok_url: None,
            meta_keywords: None,
            meta_author: Some("Paramount Land".into()),
            og_image: None,
            copyright_text: Some("© 2024 Paramount Land. All rights reserved.".into()),
            footer_description: None,
            google_analytics_id: None,
            google_tag_manager_id: None,
            facebook_pixel_id: None,
            business_hours: None,
            maintenance_mode: false,
            maintenance_message: None,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct WebsiteMenu {
    pub id: Id,
    pub title: String,
    pub url: Option<String>,
    pub order: i32,
    pub is_active: bool,
    pub parent_id: Option<Id>,
    pub is_mega_menu: bool,
    pub icon_class: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for both creating and replacing a menu entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WebsiteMenuInput {
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub order: i32,
    #[serde(default = "active")]
    pub is_active: bool,
    #[serde(default)]
    pub parent_id: Option<Id>,
    #[serde(default)]
    pub is_mega_menu: bool,
    #[serde(default)]
    pub icon_class: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

fn active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MenuTreeItem {
    #[serde(flatten)]
    pub menu: WebsiteMenu,
    pub children: Vec<MenuTreeItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReorderMenus {
    pub menu_ids: Vec<Id>,
}

/// Everything the public site needs to render its header and footer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PublicSite {
    pub settings: WebsiteSettings,
    pub menus: Vec<MenuTreeItem>,
}

// Uploads

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UploadResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadResult {
    pub fn ok(secure_url: String, public_id: String) -> Self {
        Self { success: true, secure_url: Some(secure_url), public_id: Some(public_id), error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self { success: false, secure_url: None, public_id: None, error: Some(error.into()) }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InlineUpload {
    /// Base64 payload or `data:` URL.
    pub data: String,
    #[serde(default)]
    pub folder: Option<String>,
}
