use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use crate::components::{default_config, ComponentKind, SYSTEM_TEMPLATES};
use crate::models::*;

#[derive(thiserror::Error, Debug)]
pub enum RepoError {
    #[error("not found")] NotFound,
    #[error("conflict")] Conflict,
    #[error("protected")] Protected,
    #[error("internal: {0}")] Internal(String),
}

pub type RepoResult<T> = Result<T, RepoError>;

#[async_trait]
pub trait LandingPageRepo: Send + Sync {
    /// Newest `updated_at` first.
    async fn list_pages(&self, filter: &PageFilter) -> RepoResult<Vec<LandingPage>>;
    async fn count_pages(&self, filter: &PageFilter) -> RepoResult<usize>;
    async fn get_page(&self, id: Id) -> RepoResult<LandingPage>;
    async fn get_page_by_slug(&self, slug: &str) -> RepoResult<LandingPage>;
    /// `Conflict` when the slug is taken.
    async fn create_page(&self, new: NewLandingPage, created_by: Option<String>) -> RepoResult<LandingPage>;
    /// Writes every column of `page` and bumps `updated_at`.
    async fn update_page(&self, page: LandingPage) -> RepoResult<LandingPage>;
    async fn delete_page(&self, id: Id) -> RepoResult<()>;
}

#[async_trait]
pub trait TemplateRepo: Send + Sync {
    /// System templates first, then by name.
    async fn list_templates(&self, kind: Option<ComponentKind>) -> RepoResult<Vec<ComponentTemplate>>;
    async fn get_template(&self, id: Id) -> RepoResult<ComponentTemplate>;
    async fn create_template(
        &self,
        new: NewComponentTemplate,
        created_by: Option<String>,
        is_system: bool,
    ) -> RepoResult<ComponentTemplate>;
    async fn update_template(&self, id: Id, upd: UpdateComponentTemplate) -> RepoResult<ComponentTemplate>;
    /// `Protected` for system templates.
    async fn delete_template(&self, id: Id) -> RepoResult<()>;

    /// Installs the built-in templates into an empty catalog.
    async fn seed_system_templates(&self) -> RepoResult<usize> {
        if !self.list_templates(None).await?.is_empty() {
            return Ok(0);
        }
        for (name, kind) in SYSTEM_TEMPLATES {
            let new = NewComponentTemplate {
                name: (*name).to_string(),
                kind: *kind,
                config: default_config(*kind),
                preview_image: None,
            };
            self.create_template(new, None, true).await?;
        }
        Ok(SYSTEM_TEMPLATES.len())
    }
}

#[async_trait]
pub trait AnalyticsRepo: Send + Sync {
    /// Bumps the counter of the (page, date, source, device) row, creating it if needed.
    async fn record_event(
        &self,
        page_id: Id,
        date: NaiveDate,
        source: &str,
        device_type: &str,
        event: TrafficEvent,
    ) -> RepoResult<AnalyticsRecord>;
    /// Newest date first.
    async fn page_analytics(&self, page_id: Id, range: &DateRange) -> RepoResult<Vec<AnalyticsRecord>>;
}

#[async_trait]
pub trait KanbanRepo: Send + Sync {
    /// Boards owned by `owner` plus shared `system` boards.
    async fn list_boards(&self, owner: &str) -> RepoResult<Vec<KanbanBoard>>;
    async fn get_board(&self, id: Id) -> RepoResult<KanbanBoard>;
    async fn create_board(&self, new: NewKanbanBoard, owner: &str) -> RepoResult<KanbanBoard>;
    async fn list_columns(&self, board_id: Id) -> RepoResult<Vec<KanbanColumn>>;
    async fn create_column(&self, new: NewKanbanColumn) -> RepoResult<KanbanColumn>;
    async fn update_column(&self, id: Id, upd: UpdateKanbanColumn) -> RepoResult<KanbanColumn>;
    /// Also deletes the column's tasks.
    async fn delete_column(&self, id: Id) -> RepoResult<()>;
    async fn list_tasks(&self, board_id: Id) -> RepoResult<Vec<KanbanTask>>;
    async fn create_task(&self, new: NewKanbanTask) -> RepoResult<KanbanTask>;
    async fn move_task(&self, id: Id, column_id: Id, order: i32) -> RepoResult<KanbanTask>;
    async fn delete_task(&self, id: Id) -> RepoResult<()>;
}

#[async_trait]
pub trait InquiryRepo: Send + Sync {
    /// Stores a prepared inquiry as `new`, sourced from the website.
    async fn create_inquiry(&self, new: NewContactInquiry) -> RepoResult<ContactInquiry>;
    /// Newest first; `None` lists every status.
    async fn list_inquiries(
        &self,
        status: Option<InquiryStatus>,
        limit: u32,
        offset: u32,
    ) -> RepoResult<Vec<ContactInquiry>>;
    async fn count_inquiries(&self, status: Option<InquiryStatus>) -> RepoResult<usize>;
    async fn get_inquiry(&self, id: Id) -> RepoResult<ContactInquiry>;
    async fn set_inquiry_status(&self, id: Id, status: InquiryStatus) -> RepoResult<ContactInquiry>;
    async fn delete_inquiry(&self, id: Id) -> RepoResult<()>;
}

#[async_trait]
pub trait SiteRepo: Send + Sync {
    /// Defaults until settings are first saved.
    async fn get_settings(&self) -> RepoResult<WebsiteSettings>;
    async fn save_settings(&self, settings: WebsiteSettings) -> RepoResult<WebsiteSettings>;
    /// Ascending `order`.
    async fn list_menus(&self, active_only: bool) -> RepoResult<Vec<WebsiteMenu>>;
    async fn get_menu(&self, id: Id) -> RepoResult<WebsiteMenu>;
    async fn create_menu(&self, input: WebsiteMenuInput) -> RepoResult<WebsiteMenu>;
    /// Replaces every editable field.
    async fn update_menu(&self, id: Id, input: WebsiteMenuInput) -> RepoResult<WebsiteMenu>;
    /// `Conflict` while other menus hang under this one.
    async fn delete_menu(&self, id: Id) -> RepoResult<()>;
    /// Sets each listed menu's `order` to its index; unknown ids are skipped.
    async fn reorder_menus(&self, ids: &[Id]) -> RepoResult<()>;
}

pub trait Repo: LandingPageRepo + TemplateRepo + AnalyticsRepo + KanbanRepo + InquiryRepo + SiteRepo {}

impl<T> Repo for T where
    T: LandingPageRepo + TemplateRepo + AnalyticsRepo + KanbanRepo + InquiryRepo + SiteRepo
{
}

pub const INQUIRY_SOURCE: &str = "website";

pub const DEFAULT_COLUMN_COLOR: &str = "#6b7280";

fn page_from_new(new: NewLandingPage, created_by: Option<String>) -> LandingPage {
    let now = Utc::now();
    LandingPage {
        id: Id::new_v4(),
        published_at: (new.status == PageStatus::Published).then_some(now),
        title: new.title,
        slug: new.slug,
        description: new.description,
        content: new.content,
        meta_title: new.meta_title,
        meta_description: new.meta_description,
        og_image: new.og_image,
        status: new.status,
        template_type: new.template_type,
        target_audience: new.target_audience,
        campaign_source: new.campaign_source,
        tracking_code: new.tracking_code,
        settings: new.settings,
        expires_at: new.expires_at,
        created_by,
        created_at: now,
        updated_at: now,
    }
}

fn inquiry_from_new(new: NewContactInquiry) -> ContactInquiry {
    let now = Utc::now();
    ContactInquiry {
        id: Id::new_v4(),
        project_id: new.project_id,
        project_name: new.project_name,
        name: new.name,
        email: new.email,
        phone: new.phone,
        message: new.message,
        inquiry_type: new.inquiry_type,
        unit_slug: new.unit_slug,
        status: InquiryStatus::New,
        source: INQUIRY_SOURCE.to_string(),
        created_at: now,
        updated_at: now,
    }
}

#[cfg(feature = "inmem-store")]
pub mod inmem {
    use super::*;
    use crate::kanban::next_order;
    use serde::{Deserialize, Serialize};
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

    const SNAPSHOT_PATH: &str = "data/state.json";

    fn paginate<T>(items: Vec<T>, filter: &PageFilter) -> Vec<T> {
        let offset = filter.offset.unwrap_or(0) as usize;
        let limit = filter.limit.map_or(usize::MAX, |l| l as usize);
        items.into_iter().skip(offset).take(limit).collect()
    }

    #[derive(Default, Serialize, Deserialize)]
    #[serde(default)]
    struct State {
        pages: HashMap<Id, LandingPage>,
        templates: HashMap<Id, ComponentTemplate>,
        analytics: HashMap<Id, AnalyticsRecord>,
        boards: HashMap<Id, KanbanBoard>,
        columns: HashMap<Id, KanbanColumn>,
        tasks: HashMap<Id, KanbanTask>,
        inquiries: HashMap<Id, ContactInquiry>,
        settings: Option<WebsiteSettings>,
        menus: HashMap<Id, WebsiteMenu>,
    }

    /// Lock-guarded in-process store, snapshotted to JSON after every write.
    #[derive(Clone)]
    pub struct InMemRepo {
        state: Arc<RwLock<State>>,
        snapshot_path: Arc<PathBuf>,
    }

    impl InMemRepo {
        fn snapshot_path() -> PathBuf {
            match std::env::var("ESTATE_DATA_DIR") {
                Ok(dir) => PathBuf::from(dir).join("state.json"),
                Err(_) => PathBuf::from(SNAPSHOT_PATH),
            }
        }

        fn load_state_from(path: &Path) -> State {
            match std::fs::read(path) {
                Ok(bytes) => match serde_json::from_slice::<State>(&bytes) {
                    Ok(s) => {
                        log::info!("loaded snapshot '{}'", path.display());
                        s
                    }
                    Err(e) => {
                        log::warn!("failed to parse snapshot '{}': {e}; starting empty", path.display());
                        State::default()
                    }
                },
                Err(e) => {
                    log::info!("no snapshot at '{}' ({e}); starting empty", path.display());
                    State::default()
                }
            }
        }

        pub fn new() -> Self {
            let snapshot_path = Self::snapshot_path();
            let state = Self::load_state_from(&snapshot_path);
            Self {
                state: Arc::new(RwLock::new(state)),
                snapshot_path: Arc::new(snapshot_path),
            }
        }

        fn read(&self) -> RepoResult<RwLockReadGuard<'_, State>> {
            self.state.read().map_err(|_| RepoError::Internal("state lock poisoned".into()))
        }

        fn write(&self) -> RepoResult<RwLockWriteGuard<'_, State>> {
            self.state.write().map_err(|_| RepoError::Internal("state lock poisoned".into()))
        }

        fn persist(&self) {
            let path = self.snapshot_path.as_path();
            let bytes = match self.read().map(|s| serde_json::to_vec_pretty(&*s)) {
                Ok(Ok(bytes)) => bytes,
                Ok(Err(e)) => {
                    log::error!("failed to encode snapshot: {e}");
                    return;
                }
                Err(e) => {
                    log::error!("failed to read state for snapshot: {e}");
                    return;
                }
            };
            if let Some(dir) = path.parent() {
                let _ = std::fs::create_dir_all(dir);
            }
            if let Err(e) = std::fs::write(path, bytes) {
                log::error!("failed to write snapshot '{}': {e}", path.display());
            }
        }
    }

    impl Default for InMemRepo {
        fn default() -> Self { Self::new() }
    }

    #[async_trait]
    impl LandingPageRepo for InMemRepo {
        async fn list_pages(&self, filter: &PageFilter) -> RepoResult<Vec<LandingPage>> {
            let s = self.read()?;
            let mut v: Vec<_> = s.pages.values().filter(|p| filter.matches(p)).cloned().collect();
            v.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
            Ok(paginate(v, filter))
        }
        async fn count_pages(&self, filter: &PageFilter) -> RepoResult<usize> {
            let s = self.read()?;
            Ok(s.pages.values().filter(|p| filter.matches(p)).count())
        }
        async fn get_page(&self, id: Id) -> RepoResult<LandingPage> {
            self.read()?.pages.get(&id).cloned().ok_or(RepoError::NotFound)
        }
        async fn get_page_by_slug(&self, slug: &str) -> RepoResult<LandingPage> {
            let s = self.read()?;
            s.pages.values().find(|p| p.slug == slug).cloned().ok_or(RepoError::NotFound)
        }
        async fn create_page(&self, new: NewLandingPage, created_by: Option<String>) -> RepoResult<LandingPage> {
            let mut s = self.write()?;
            if s.pages.values().any(|p| p.slug == new.slug) {
                return Err(RepoError::Conflict);
            }
            let page = page_from_new(new, created_by);
            s.pages.insert(page.id, page.clone());
            drop(s);
            self.persist();
            Ok(page)
        }
        async fn update_page(&self, mut page: LandingPage) -> RepoResult<LandingPage> {
            let mut s = self.write()?;
            if s.pages.values().any(|p| p.slug == page.slug && p.id != page.id) {
                return Err(RepoError::Conflict);
            }
            let slot = s.pages.get_mut(&page.id).ok_or(RepoError::NotFound)?;
            page.created_at = slot.created_at;
            page.updated_at = Utc::now();
            *slot = page.clone();
            drop(s);
            self.persist();
            Ok(page)
        }
        async fn delete_page(&self, id: Id) -> RepoResult<()> {
            let mut s = self.write()?;
            s.pages.remove(&id).ok_or(RepoError::NotFound)?;
            s.analytics.retain(|_, r| r.landing_page_id != id);
            drop(s);
            self.persist();
            Ok(())
        }
    }

    #[async_trait]
    impl TemplateRepo for InMemRepo {
        async fn list_templates(&self, kind: Option<ComponentKind>) -> RepoResult<Vec<ComponentTemplate>> {
            let s = self.read()?;
            let mut v: Vec<_> = s.templates
                .values()
                .filter(|t| kind.map_or(true, |k| t.kind == k))
                .cloned()
                .collect();
            v.sort_by(|a, b| b.is_system.cmp(&a.is_system).then_with(|| a.name.cmp(&b.name)));
            Ok(v)
        }
        async fn get_template(&self, id: Id) -> RepoResult<ComponentTemplate> {
            self.read()?.templates.get(&id).cloned().ok_or(RepoError::NotFound)
        }
        async fn create_template(
            &self,
            new: NewComponentTemplate,
            created_by: Option<String>,
            is_system: bool,
        ) -> RepoResult<ComponentTemplate> {
            let now = Utc::now();
            let template = ComponentTemplate {
                id: Id::new_v4(),
                name: new.name,
                kind: new.kind,
                config: new.config,
                preview_image: new.preview_image,
                is_system,
                created_by,
                created_at: now,
                updated_at: now,
            };
            self.write()?.templates.insert(template.id, template.clone());
            self.persist();
            Ok(template)
        }
        async fn update_template(&self, id: Id, upd: UpdateComponentTemplate) -> RepoResult<ComponentTemplate> {
            let mut s = self.write()?;
            let template = s.templates.get_mut(&id).ok_or(RepoError::NotFound)?;
            if let Some(name) = upd.name { template.name = name; }
            if let Some(config) = upd.config { template.config = config; }
            if let Some(preview) = upd.preview_image { template.preview_image = Some(preview); }
            template.updated_at = Utc::now();
            let updated = template.clone();
            drop(s);
            self.persist();
            Ok(updated)
        }
        async fn delete_template(&self, id: Id) -> RepoResult<()> {
            let mut s = self.write()?;
            match s.templates.get(&id) {
                None => return Err(RepoError::NotFound),
                Some(t) if t.is_system => return Err(RepoError::Protected),
                Some(_) => {}
            }
            s.templates.remove(&id);
            drop(s);
            self.persist();
            Ok(())
        }
    }

    #[async_trait]
    impl AnalyticsRepo for InMemRepo {
        async fn record_event(
            &self,
            page_id: Id,
            date: NaiveDate,
            source: &str,
            device_type: &str,
            event: TrafficEvent,
        ) -> RepoResult<AnalyticsRecord> {
            let mut s = self.write()?;
            if !s.pages.contains_key(&page_id) {
                return Err(RepoError::NotFound);
            }
            let existing = s.analytics.values().find(|r| {
                r.landing_page_id == page_id && r.date == date && r.source == source && r.device_type == device_type
            }).map(|r| r.id);
            let id = existing.unwrap_or_else(Id::new_v4);
            let record = s.analytics.entry(id).or_insert_with(|| AnalyticsRecord {
                id,
                landing_page_id: page_id,
                date,
                source: source.to_string(),
                device_type: device_type.to_string(),
                visit_count: 0,
                conversion_count: 0,
            });
            match event {
                TrafficEvent::Visit => record.visit_count += 1,
                TrafficEvent::Conversion => record.conversion_count += 1,
            }
            let record = record.clone();
            drop(s);
            self.persist();
            Ok(record)
        }
        async fn page_analytics(&self, page_id: Id, range: &DateRange) -> RepoResult<Vec<AnalyticsRecord>> {
            let s = self.read()?;
            let mut v: Vec<_> = s.analytics
                .values()
                .filter(|r| r.landing_page_id == page_id)
                .filter(|r| range.start.map_or(true, |d| r.date >= d))
                .filter(|r| range.end.map_or(true, |d| r.date <= d))
                .cloned()
                .collect();
            v.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.source.cmp(&b.source)));
            Ok(v)
        }
    }

    #[async_trait]
    impl KanbanRepo for InMemRepo {
        async fn list_boards(&self, owner: &str) -> RepoResult<Vec<KanbanBoard>> {
            let s = self.read()?;
            let mut v: Vec<_> = s.boards
                .values()
                .filter(|b| b.owner == owner || b.owner == "system")
                .cloned()
                .collect();
            v.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(v)
        }
        async fn get_board(&self, id: Id) -> RepoResult<KanbanBoard> {
            self.read()?.boards.get(&id).cloned().ok_or(RepoError::NotFound)
        }
        async fn create_board(&self, new: NewKanbanBoard, owner: &str) -> RepoResult<KanbanBoard> {
            let board = KanbanBoard {
                id: Id::new_v4(),
                title: new.title,
                description: new.description,
                owner: owner.to_string(),
                created_at: Utc::now(),
            };
            self.write()?.boards.insert(board.id, board.clone());
            self.persist();
            Ok(board)
        }
        async fn list_columns(&self, board_id: Id) -> RepoResult<Vec<KanbanColumn>> {
            let s = self.read()?;
            let mut v: Vec<_> = s.columns.values().filter(|c| c.board_id == board_id).cloned().collect();
            v.sort_by_key(|c| c.order);
            Ok(v)
        }
        async fn create_column(&self, new: NewKanbanColumn) -> RepoResult<KanbanColumn> {
            let mut s = self.write()?;
            if !s.boards.contains_key(&new.board_id) {
                return Err(RepoError::NotFound);
            }
            let order = next_order(s.columns.values().filter(|c| c.board_id == new.board_id).map(|c| c.order));
            let now = Utc::now();
            let column = KanbanColumn {
                id: Id::new_v4(),
                board_id: new.board_id,
                title: new.title,
                order,
                color: new.color.unwrap_or_else(|| DEFAULT_COLUMN_COLOR.into()),
                created_at: now,
                updated_at: now,
            };
            s.columns.insert(column.id, column.clone());
            drop(s);
            self.persist();
            Ok(column)
        }
        async fn update_column(&self, id: Id, upd: UpdateKanbanColumn) -> RepoResult<KanbanColumn> {
            let mut s = self.write()?;
            let column = s.columns.get_mut(&id).ok_or(RepoError::NotFound)?;
            if let Some(title) = upd.title { column.title = title; }
            if let Some(color) = upd.color { column.color = color; }
            if let Some(order) = upd.order { column.order = order; }
            column.updated_at = Utc::now();
            let updated = column.clone();
            drop(s);
            self.persist();
            Ok(updated)
        }
        async fn delete_column(&self, id: Id) -> RepoResult<()> {
            let mut s = self.write()?;
            s.columns.remove(&id).ok_or(RepoError::NotFound)?;
            s.tasks.retain(|_, t| t.column_id != id);
            drop(s);
            self.persist();
            Ok(())
        }
        async fn list_tasks(&self, board_id: Id) -> RepoResult<Vec<KanbanTask>> {
            let s = self.read()?;
            let mut v: Vec<_> = s.tasks.values().filter(|t| t.board_id == board_id).cloned().collect();
            v.sort_by_key(|t| t.order);
            Ok(v)
        }
        async fn create_task(&self, new: NewKanbanTask) -> RepoResult<KanbanTask> {
            let mut s = self.write()?;
            match s.columns.get(&new.column_id) {
                Some(c) if c.board_id == new.board_id => {}
                _ => return Err(RepoError::NotFound),
            }
            let order = next_order(s.tasks.values().filter(|t| t.column_id == new.column_id).map(|t| t.order));
            let now = Utc::now();
            let task = KanbanTask {
                id: Id::new_v4(),
                board_id: new.board_id,
                column_id: new.column_id,
                title: new.title,
                description: new.description,
                order,
                priority: new.priority,
                due_date: new.due_date,
                assigned_to: new.assigned_to,
                tags: new.tags,
                created_at: now,
                updated_at: now,
            };
            s.tasks.insert(task.id, task.clone());
            drop(s);
            self.persist();
            Ok(task)
        }
        async fn move_task(&self, id: Id, column_id: Id, order: i32) -> RepoResult<KanbanTask> {
            let mut s = self.write()?;
            let board_id = s.tasks.get(&id).map(|t| t.board_id).ok_or(RepoError::NotFound)?;
            match s.columns.get(&column_id) {
                Some(c) if c.board_id == board_id => {}
                _ => return Err(RepoError::NotFound),
            }
            let task = s.tasks.get_mut(&id).ok_or(RepoError::NotFound)?;
            task.column_id = column_id;
            task.order = order;
            task.updated_at = Utc::now();
            let moved = task.clone();
            drop(s);
            self.persist();
            Ok(moved)
        }
        async fn delete_task(&self, id: Id) -> RepoResult<()> {
            let mut s = self.write()?;
            s.tasks.remove(&id).ok_or(RepoError::NotFound)?;
            drop(s);
            self.persist();
            Ok(())
        }
    }

    #[async_trait]
    impl InquiryRepo for InMemRepo {
        async fn create_inquiry(&self, new: NewContactInquiry) -> RepoResult<ContactInquiry> {
            let inquiry = inquiry_from_new(new);
            self.write()?.inquiries.insert(inquiry.id, inquiry.clone());
            self.persist();
            Ok(inquiry)
        }
        async fn list_inquiries(
            &self,
            status: Option<InquiryStatus>,
            limit: u32,
            offset: u32,
        ) -> RepoResult<Vec<ContactInquiry>> {
            let s = self.read()?;
            let mut v: Vec<_> = s.inquiries
                .values()
                .filter(|i| status.map_or(true, |st| i.status == st))
                .cloned()
                .collect();
            v.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(v.into_iter().skip(offset as usize).take(limit as usize).collect())
        }
        async fn count_inquiries(&self, status: Option<InquiryStatus>) -> RepoResult<usize> {
            let s = self.read()?;
            Ok(s.inquiries.values().filter(|i| status.map_or(true, |st| i.status == st)).count())
        }
        async fn get_inquiry(&self, id: Id) -> RepoResult<ContactInquiry> {
            self.read()?.inquiries.get(&id).cloned().ok_or(RepoError::NotFound)
        }
        async fn set_inquiry_status(&self, id: Id, status: InquiryStatus) -> RepoResult<ContactInquiry> {
            let mut s = self.write()?;
            let inquiry = s.inquiries.get_mut(&id).ok_or(RepoError::NotFound)?;
            inquiry.status = status;
            inquiry.updated_at = Utc::now();
            let updated = inquiry.clone();
            drop(s);
            self.persist();
            Ok(updated)
        }
        async fn delete_inquiry(&self, id: Id) -> RepoResult<()> {
            let mut s = self.write()?;
            s.inquiries.remove(&id).ok_or(RepoError::NotFound)?;
            drop(s);
            self.persist();
            Ok(())
        }
    }

    fn apply_menu_input(menu: &mut WebsiteMenu, input: WebsiteMenuInput) {
        menu.title = input.title;
        menu.url = input.url;
        menu.order = input.order;
        menu.is_active = input.is_active;
        menu.parent_id = input.parent_id;
        menu.is_mega_menu = input.is_mega_menu;
        menu.icon_class = input.icon_class;
        menu.description = input.description;
    }

    #[async_trait]
    impl SiteRepo for InMemRepo {
        async fn get_settings(&self) -> RepoResult<WebsiteSettings> {
            Ok(self.read()?.settings.clone().unwrap_or_default())
        }
        async fn save_settings(&self, mut settings: WebsiteSettings) -> RepoResult<WebsiteSettings> {
            settings.updated_at = Some(Utc::now());
            self.write()?.settings = Some(settings.clone());
            self.persist();
            Ok(settings)
        }
        async fn list_menus(&self, active_only: bool) -> RepoResult<Vec<WebsiteMenu>> {
            let s = self.read()?;
            let mut v: Vec<_> = s.menus.values().filter(|m| !active_only || m.is_active).cloned().collect();
            v.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.created_at.cmp(&b.created_at)));
            Ok(v)
        }
        async fn get_menu(&self, id: Id) -> RepoResult<WebsiteMenu> {
            self.read()?.menus.get(&id).cloned().ok_or(RepoError::NotFound)
        }
        async fn create_menu(&self, input: WebsiteMenuInput) -> RepoResult<WebsiteMenu> {
            let mut s = self.write()?;
            if input.parent_id.is_some_and(|p| !s.menus.contains_key(&p)) {
                return Err(RepoError::NotFound);
            }
            let now = Utc::now();
            let mut menu = WebsiteMenu {
                id: Id::new_v4(),
                title: String::new(),
                url: None,
                order: 0,
                is_active: true,
                parent_id: None,
                is_mega_menu: false,
                icon_class: None,
                description: None,
                created_at: now,
                updated_at: now,
            };
            apply_menu_input(&mut menu, input);
            s.menus.insert(menu.id, menu.clone());
            drop(s);
            self.persist();
            Ok(menu)
        }
        async fn update_menu(&self, id: Id, input: WebsiteMenuInput) -> RepoResult<WebsiteMenu> {
            let mut s = self.write()?;
            if input.parent_id.is_some_and(|p| !s.menus.contains_key(&p)) {
                return Err(RepoError::NotFound);
            }
            let menu = s.menus.get_mut(&id).ok_or(RepoError::NotFound)?;
            apply_menu_input(menu, input);
            menu.updated_at = Utc::now();
            let updated = menu.clone();
            drop(s);
            self.persist();
            Ok(updated)
        }
        async fn delete_menu(&self, id: Id) -> RepoResult<()> {
            let mut s = self.write()?;
            if !s.menus.contains_key(&id) {
                return Err(RepoError::NotFound);
            }
            if s.menus.values().any(|m| m.parent_id == Some(id)) {
                return Err(RepoError::Conflict);
            }
            s.menus.remove(&id);
            drop(s);
            self.persist();
            Ok(())
        }
        async fn reorder_menus(&self, ids: &[Id]) -> RepoResult<()> {
            let mut s = self.write()?;
            let now = Utc::now();
            for (index, id) in ids.iter().enumerate() {
                if let Some(menu) = s.menus.get_mut(id) {
                    menu.order = index as i32;
                    menu.updated_at = now;
                }
            }
            drop(s);
            self.persist();
            Ok(())
        }
    }
}

// Postgres implementation (feature = "postgres-store")
#[cfg(feature = "postgres-store")]
pub mod pg {
    use super::*;
    use crate::document;
    use chrono::DateTime;
    use sqlx::{Pool, Postgres, QueryBuilder};

    pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

    #[derive(Clone)]
    pub struct PgRepo { pool: Pool<Postgres> }

    impl PgRepo {
        pub fn new(pool: Pool<Postgres>) -> Self { Self { pool } }

        pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
            MIGRATOR.run(&self.pool).await
        }
    }

    fn map_err(e: sqlx::Error) -> RepoError {
        match e {
            sqlx::Error::RowNotFound => RepoError::NotFound,
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => RepoError::Conflict,
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23503") => RepoError::NotFound,
            other => {
                log::error!("postgres error: {other}");
                RepoError::Internal(other.to_string())
            }
        }
    }

    const PAGE_COLUMNS: &str = "id, title, slug, description, content, meta_title, meta_description, og_image, \
        status, template_type, target_audience, campaign_source, tracking_code, settings, published_at, \
        expires_at, created_by, created_at, updated_at";

    /// `landing_pages` row; `content` and `settings` are JSON text.
    #[derive(sqlx::FromRow)]
    struct PageRow {
        id: Id,
        title: String,
        slug: String,
        description: Option<String>,
        content: String,
        meta_title: Option<String>,
        meta_description: Option<String>,
        og_image: Option<String>,
        status: String,
        template_type: String,
        target_audience: Option<String>,
        campaign_source: Option<String>,
        tracking_code: Option<String>,
        settings: String,
        published_at: Option<DateTime<Utc>>,
        expires_at: Option<DateTime<Utc>>,
        created_by: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    }

    impl From<PageRow> for LandingPage {
        fn from(r: PageRow) -> Self {
            LandingPage {
                id: r.id,
                title: r.title,
                slug: r.slug,
                description: r.description,
                content: document::decode_content(&r.content),
                meta_title: r.meta_title,
                meta_description: r.meta_description,
                og_image: r.og_image,
                status: PageStatus::parse(&r.status).unwrap_or_default(),
                template_type: r.template_type,
                target_audience: r.target_audience,
                campaign_source: r.campaign_source,
                tracking_code: r.tracking_code,
                settings: document::decode_settings(&r.settings),
                published_at: r.published_at,
                expires_at: r.expires_at,
                created_by: r.created_by,
                created_at: r.created_at,
                updated_at: r.updated_at,
            }
        }
    }

    fn encode_page(page: &LandingPage) -> RepoResult<(String, String)> {
        let content = document::encode_content(&page.content).map_err(|e| RepoError::Internal(e.0))?;
        let settings = document::encode_settings(&page.settings).map_err(|e| RepoError::Internal(e.0))?;
        Ok((content, settings))
    }

    fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &PageFilter) {
        qb.push(" WHERE 1=1");
        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(source) = &filter.campaign_source {
            qb.push(" AND campaign_source = ").push_bind(source.clone());
        }
        if let Some(owner) = &filter.created_by {
            qb.push(" AND created_by = ").push_bind(owner.clone());
        }
        if let Some(term) = &filter.search {
            let pattern = format!("%{term}%");
            qb.push(" AND (title ILIKE ").push_bind(pattern.clone())
                .push(" OR description ILIKE ").push_bind(pattern.clone())
                .push(" OR slug ILIKE ").push_bind(pattern)
                .push(")");
        }
    }

    #[async_trait]
    impl LandingPageRepo for PgRepo {
        async fn list_pages(&self, filter: &PageFilter) -> RepoResult<Vec<LandingPage>> {
            let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {PAGE_COLUMNS} FROM landing_pages"));
            push_filter(&mut qb, filter);
            qb.push(" ORDER BY updated_at DESC");
            if let Some(limit) = filter.limit {
                qb.push(" LIMIT ").push_bind(i64::from(limit));
            }
            if let Some(offset) = filter.offset {
                qb.push(" OFFSET ").push_bind(i64::from(offset));
            }
            let rows = qb.build_query_as::<PageRow>().fetch_all(&self.pool).await.map_err(map_err)?;
            Ok(rows.into_iter().map(LandingPage::from).collect())
        }
        async fn count_pages(&self, filter: &PageFilter) -> RepoResult<usize> {
            let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM landing_pages");
            push_filter(&mut qb, filter);
            let (count,): (i64,) = qb.build_query_as().fetch_one(&self.pool).await.map_err(map_err)?;
            Ok(count as usize)
        }
        async fn get_page(&self, id: Id) -> RepoResult<LandingPage> {
            let row = sqlx::query_as::<_, PageRow>(&format!("SELECT {PAGE_COLUMNS} FROM landing_pages WHERE id = $1"))
                .bind(id)
                .fetch_one(&self.pool).await.map_err(map_err)?;
            Ok(row.into())
        }
        async fn get_page_by_slug(&self, slug: &str) -> RepoResult<LandingPage> {
            let row = sqlx::query_as::<_, PageRow>(&format!("SELECT {PAGE_COLUMNS} FROM landing_pages WHERE slug = $1"))
                .bind(slug)
                .fetch_one(&self.pool).await.map_err(map_err)?;
            Ok(row.into())
        }
        async fn create_page(&self, new: NewLandingPage, created_by: Option<String>) -> RepoResult<LandingPage> {
            let page = page_from_new(new, created_by);
            let (content, settings) = encode_page(&page)?;
            let row = sqlx::query_as::<_, PageRow>(&format!(
                "INSERT INTO landing_pages ({PAGE_COLUMNS}) \
                 VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16,$17,$18,$19) \
                 RETURNING {PAGE_COLUMNS}"
            ))
            .bind(page.id)
            .bind(&page.title)
            .bind(&page.slug)
            .bind(&page.description)
            .bind(content)
            .bind(&page.meta_title)
            .bind(&page.meta_description)
            .bind(&page.og_image)
            .bind(page.status.as_str())
            .bind(&page.template_type)
            .bind(&page.target_audience)
            .bind(&page.campaign_source)
            .bind(&page.tracking_code)
            .bind(settings)
            .bind(page.published_at)
            .bind(page.expires_at)
            .bind(&page.created_by)
            .bind(page.created_at)
            .bind(page.updated_at)
            .fetch_one(&self.pool).await.map_err(map_err)?;
            Ok(row.into())
        }
        async fn update_page(&self, page: LandingPage) -> RepoResult<LandingPage> {
            let (content, settings) = encode_page(&page)?;
            let row = sqlx::query_as::<_, PageRow>(&format!(
                "UPDATE landing_pages SET title=$2, slug=$3, description=$4, content=$5, meta_title=$6, \
                 meta_description=$7, og_image=$8, status=$9, template_type=$10, target_audience=$11, \
                 campaign_source=$12, tracking_code=$13, settings=$14, published_at=$15, expires_at=$16, \
                 updated_at=now() WHERE id=$1 RETURNING {PAGE_COLUMNS}"
            ))
            .bind(page.id)
            .bind(&page.title)
            .bind(&page.slug)
            .bind(&page.description)
            .bind(content)
            .bind(&page.meta_title)
            .bind(&page.meta_description)
            .bind(&page.og_image)
            .bind(page.status.as_str())
            .bind(&page.template_type)
            .bind(&page.target_audience)
            .bind(&page.campaign_source)
            .bind(&page.tracking_code)
            .bind(settings)
            .bind(page.published_at)
            .bind(page.expires_at)
            .fetch_one(&self.pool).await.map_err(map_err)?;
            Ok(row.into())
        }
        async fn delete_page(&self, id: Id) -> RepoResult<()> {
            let res = sqlx::query("DELETE FROM landing_pages WHERE id = $1")
                .bind(id)
                .execute(&self.pool).await.map_err(map_err)?;
            if res.rows_affected() == 0 { return Err(RepoError::NotFound); }
            Ok(())
        }
    }

    const TEMPLATE_COLUMNS: &str = "id, name, type, config, preview_image, is_system, created_by, created_at, updated_at";

    #[derive(sqlx::FromRow)]
    struct TemplateRow {
        id: Id,
        name: String,
        #[sqlx(rename = "type")]
        kind: String,
        config: String,
        preview_image: Option<String>,
        is_system: bool,
        created_by: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    }

    impl From<TemplateRow> for ComponentTemplate {
        fn from(r: TemplateRow) -> Self {
            ComponentTemplate {
                id: r.id,
                name: r.name,
                kind: r.kind.parse().unwrap_or(ComponentKind::Unknown),
                config: document::decode_settings(&r.config),
                preview_image: r.preview_image,
                is_system: r.is_system,
                created_by: r.created_by,
                created_at: r.created_at,
                updated_at: r.updated_at,
            }
        }
    }

    #[async_trait]
    impl TemplateRepo for PgRepo {
        async fn list_templates(&self, kind: Option<ComponentKind>) -> RepoResult<Vec<ComponentTemplate>> {
            let rows = sqlx::query_as::<_, TemplateRow>(&format!(
                "SELECT {TEMPLATE_COLUMNS} FROM component_templates \
                 WHERE ($1::text IS NULL OR type = $1) ORDER BY is_system DESC, name ASC"
            ))
            .bind(kind.map(|k| k.as_str()))
            .fetch_all(&self.pool).await.map_err(map_err)?;
            Ok(rows.into_iter().map(ComponentTemplate::from).collect())
        }
        async fn get_template(&self, id: Id) -> RepoResult<ComponentTemplate> {
            let row = sqlx::query_as::<_, TemplateRow>(&format!("SELECT {TEMPLATE_COLUMNS} FROM component_templates WHERE id = $1"))
                .bind(id)
                .fetch_one(&self.pool).await.map_err(map_err)?;
            Ok(row.into())
        }
        async fn create_template(
            &self,
            new: NewComponentTemplate,
            created_by: Option<String>,
            is_system: bool,
        ) -> RepoResult<ComponentTemplate> {
            let config = document::encode_settings(&new.config).map_err(|e| RepoError::Internal(e.0))?;
            let row = sqlx::query_as::<_, TemplateRow>(&format!(
                "INSERT INTO component_templates (id, name, type, config, preview_image, is_system, created_by) \
                 VALUES ($1,$2,$3,$4,$5,$6,$7) RETURNING {TEMPLATE_COLUMNS}"
            ))
            .bind(Id::new_v4())
            .bind(&new.name)
            .bind(new.kind.as_str())
            .bind(config)
            .bind(&new.preview_image)
            .bind(is_system)
            .bind(&created_by)
            .fetch_one(&self.pool).await.map_err(map_err)?;
            Ok(row.into())
        }
        async fn update_template(&self, id: Id, upd: UpdateComponentTemplate) -> RepoResult<ComponentTemplate> {
            let config = upd.config
                .as_ref()
                .map(document::encode_settings)
                .transpose()
                .map_err(|e| RepoError::Internal(e.0))?;
            let row = sqlx::query_as::<_, TemplateRow>(&format!(
                "UPDATE component_templates SET name = COALESCE($2, name), config = COALESCE($3, config), \
                 preview_image = COALESCE($4, preview_image), updated_at = now() WHERE id = $1 \
                 RETURNING {TEMPLATE_COLUMNS}"
            ))
            .bind(id)
            .bind(upd.name)
            .bind(config)
            .bind(upd.preview_image)
            .fetch_one(&self.pool).await.map_err(map_err)?;
            Ok(row.into())
        }
        async fn delete_template(&self, id: Id) -> RepoResult<()> {
            let template = self.get_template(id).await?;
            if template.is_system { return Err(RepoError::Protected); }
            sqlx::query("DELETE FROM component_templates WHERE id = $1 AND is_system = FALSE")
                .bind(id)
                .execute(&self.pool).await.map_err(map_err)?;
            Ok(())
        }
    }

    #[async_trait]
    impl AnalyticsRepo for PgRepo {
        async fn record_event(
            &self,
            page_id: Id,
            date: NaiveDate,
            source: &str,
            device_type: &str,
            event: TrafficEvent,
        ) -> RepoResult<AnalyticsRecord> {
            let (visits, conversions) = match event {
                TrafficEvent::Visit => (1i64, 0i64),
                TrafficEvent::Conversion => (0, 1),
            };
            sqlx::query_as::<_, AnalyticsRecord>(
                "INSERT INTO landing_page_analytics \
                   (id, landing_page_id, date, source, device_type, visit_count, conversion_count) \
                 VALUES ($1,$2,$3,$4,$5,$6,$7) \
                 ON CONFLICT (landing_page_id, date, source, device_type) DO UPDATE SET \
                   visit_count = landing_page_analytics.visit_count + EXCLUDED.visit_count, \
                   conversion_count = landing_page_analytics.conversion_count + EXCLUDED.conversion_count \
                 RETURNING id, landing_page_id, date, source, device_type, visit_count, conversion_count"
            )
            .bind(Id::new_v4())
            .bind(page_id)
            .bind(date)
            .bind(source)
            .bind(device_type)
            .bind(visits)
            .bind(conversions)
            .fetch_one(&self.pool).await.map_err(map_err)
        }
        async fn page_analytics(&self, page_id: Id, range: &DateRange) -> RepoResult<Vec<AnalyticsRecord>> {
            sqlx::query_as::<_, AnalyticsRecord>(
                "SELECT id, landing_page_id, date, source, device_type, visit_count, conversion_count \
                 FROM landing_page_analytics \
                 WHERE landing_page_id = $1 AND ($2::date IS NULL OR date >= $2) AND ($3::date IS NULL OR date <= $3) \
                 ORDER BY date DESC, source ASC"
            )
            .bind(page_id)
            .bind(range.start)
            .bind(range.end)
            .fetch_all(&self.pool).await.map_err(map_err)
        }
    }

    const COLUMN_COLUMNS: &str = r#"id, board_id, title, "order", color, created_at, updated_at"#;
    const TASK_COLUMNS: &str = r#"id, board_id, column_id, title, description, "order", priority, due_date, assigned_to, tags, created_at, updated_at"#;

    /// `kanban_tasks` row; `tags` is a JSON array as text.
    #[derive(sqlx::FromRow)]
    struct TaskRow {
        id: Id,
        board_id: Id,
        column_id: Id,
        title: String,
        description: Option<String>,
        order: i32,
        priority: String,
        due_date: Option<NaiveDate>,
        assigned_to: Option<String>,
        tags: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    }

    impl From<TaskRow> for KanbanTask {
        fn from(r: TaskRow) -> Self {
            KanbanTask {
                id: r.id,
                board_id: r.board_id,
                column_id: r.column_id,
                title: r.title,
                description: r.description,
                order: r.order,
                priority: Priority::parse(&r.priority).unwrap_or_default(),
                due_date: r.due_date,
                assigned_to: r.assigned_to,
                tags: r.tags
                    .as_deref()
                    .and_then(|t| serde_json::from_str(t).ok())
                    .unwrap_or_default(),
                created_at: r.created_at,
                updated_at: r.updated_at,
            }
        }
    }

    #[async_trait]
    impl KanbanRepo for PgRepo {
        async fn list_boards(&self, owner: &str) -> RepoResult<Vec<KanbanBoard>> {
            sqlx::query_as::<_, KanbanBoard>(
                "SELECT id, title, description, owner, created_at FROM kanban_boards \
                 WHERE owner = $1 OR owner = 'system' ORDER BY created_at DESC"
            )
            .bind(owner)
            .fetch_all(&self.pool).await.map_err(map_err)
        }
        async fn get_board(&self, id: Id) -> RepoResult<KanbanBoard> {
            sqlx::query_as::<_, KanbanBoard>("SELECT id, title, description, owner, created_at FROM kanban_boards WHERE id = $1")
                .bind(id)
                .fetch_one(&self.pool).await.map_err(map_err)
        }
        async fn create_board(&self, new: NewKanbanBoard, owner: &str) -> RepoResult<KanbanBoard> {
            sqlx::query_as::<_, KanbanBoard>(
                "INSERT INTO kanban_boards (id, title, description, owner) VALUES ($1,$2,$3,$4) \
                 RETURNING id, title, description, owner, created_at"
            )
            .bind(Id::new_v4())
            .bind(&new.title)
            .bind(&new.description)
            .bind(owner)
            .fetch_one(&self.pool).await.map_err(map_err)
        }
        async fn list_columns(&self, board_id: Id) -> RepoResult<Vec<KanbanColumn>> {
            sqlx::query_as::<_, KanbanColumn>(&format!(
                r#"SELECT {COLUMN_COLUMNS} FROM kanban_columns WHERE board_id = $1 ORDER BY "order" ASC"#
            ))
            .bind(board_id)
            .fetch_all(&self.pool).await.map_err(map_err)
        }
        async fn create_column(&self, new: NewKanbanColumn) -> RepoResult<KanbanColumn> {
            sqlx::query_as::<_, KanbanColumn>(&format!(
                r#"INSERT INTO kanban_columns (id, board_id, title, "order", color)
                   VALUES ($1, $2, $3, (SELECT COALESCE(MAX("order"), 0) + 1 FROM kanban_columns WHERE board_id = $2), $4)
                   RETURNING {COLUMN_COLUMNS}"#
            ))
            .bind(Id::new_v4())
            .bind(new.board_id)
            .bind(&new.title)
            .bind(new.color.as_deref().unwrap_or(DEFAULT_COLUMN_COLOR))
            .fetch_one(&self.pool).await.map_err(map_err)
        }
        async fn update_column(&self, id: Id, upd: UpdateKanbanColumn) -> RepoResult<KanbanColumn> {
            sqlx::query_as::<_, KanbanColumn>(&format!(
                r#"UPDATE kanban_columns SET title = COALESCE($2, title), color = COALESCE($3, color),
                   "order" = COALESCE($4, "order"), updated_at = now() WHERE id = $1 RETURNING {COLUMN_COLUMNS}"#
            ))
            .bind(id)
            .bind(upd.title)
            .bind(upd.color)
            .bind(upd.order)
            .fetch_one(&self.pool).await.map_err(map_err)
        }
        async fn delete_column(&self, id: Id) -> RepoResult<()> {
            let mut tx = self.pool.begin().await.map_err(map_err)?;
            sqlx::query("DELETE FROM kanban_tasks WHERE column_id = $1")
                .bind(id)
                .execute(&mut *tx).await.map_err(map_err)?;
            let res = sqlx::query("DELETE FROM kanban_columns WHERE id = $1")
                .bind(id)
                .execute(&mut *tx).await.map_err(map_err)?;
            if res.rows_affected() == 0 { return Err(RepoError::NotFound); }
            tx.commit().await.map_err(map_err)?;
            Ok(())
        }
        async fn list_tasks(&self, board_id: Id) -> RepoResult<Vec<KanbanTask>> {
            let rows = sqlx::query_as::<_, TaskRow>(&format!(
                r#"SELECT {TASK_COLUMNS} FROM kanban_tasks WHERE board_id = $1 ORDER BY "order" ASC"#
            ))
            .bind(board_id)
            .fetch_all(&self.pool).await.map_err(map_err)?;
            Ok(rows.into_iter().map(KanbanTask::from).collect())
        }
        async fn create_task(&self, new: NewKanbanTask) -> RepoResult<KanbanTask> {
            let tags = serde_json::to_string(&new.tags).map_err(|e| RepoError::Internal(e.to_string()))?;
            let row = sqlx::query_as::<_, TaskRow>(&format!(
                r#"INSERT INTO kanban_tasks (id, board_id, column_id, title, description, "order", priority, due_date, assigned_to, tags)
                   SELECT $1, c.board_id, c.id, $4, $5,
                          (SELECT COALESCE(MAX("order"), 0) + 1 FROM kanban_tasks WHERE column_id = $3),
                          $6, $7, $8, $9
                   FROM kanban_columns c WHERE c.id = $3 AND c.board_id = $2
                   RETURNING {TASK_COLUMNS}"#
            ))
            .bind(Id::new_v4())
            .bind(new.board_id)
            .bind(new.column_id)
            .bind(&new.title)
            .bind(&new.description)
            .bind(new.priority.as_str())
            .bind(new.due_date)
            .bind(&new.assigned_to)
            .bind(tags)
            .fetch_one(&self.pool).await.map_err(map_err)?;
            Ok(row.into())
        }
        async fn move_task(&self, id: Id, column_id: Id, order: i32) -> RepoResult<KanbanTask> {
            let row = sqlx::query_as::<_, TaskRow>(&format!(
                r#"UPDATE kanban_tasks t SET column_id = $2, "order" = $3, updated_at = now()
                   FROM kanban_columns c
                   WHERE t.id = $1 AND c.id = $2 AND c.board_id = t.board_id
                   RETURNING {}"#,
                TASK_COLUMNS.split(", ").map(|c| format!("t.{c}")).collect::<Vec<_>>().join(", ")
            ))
            .bind(id)
            .bind(column_id)
            .bind(order)
            .fetch_one(&self.pool).await.map_err(map_err)?;
            Ok(row.into())
        }
        async fn delete_task(&self, id: Id) -> RepoResult<()> {
            let res = sqlx::query("DELETE FROM kanban_tasks WHERE id = $1")
                .bind(id)
                .execute(&self.pool).await.map_err(map_err)?;
            if res.rows_affected() == 0 { return Err(RepoError::NotFound); }
            Ok(())
        }
    }

    const INQUIRY_COLUMNS: &str = "id, project_id, project_name, name, email, phone, message, inquiry_type, \
        unit_slug, status, source, created_at, updated_at";

    #[derive(sqlx::FromRow)]
    struct InquiryRow {
        id: Id,
        project_id: String,
        project_name: Option<String>,
        name: String,
        email: String,
        phone: String,
        message: Option<String>,
        inquiry_type: String,
        unit_slug: Option<String>,
        status: String,
        source: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    }

    impl From<InquiryRow> for ContactInquiry {
        fn from(r: InquiryRow) -> Self {
            ContactInquiry {
                id: r.id,
                project_id: r.project_id,
                project_name: r.project_name,
                name: r.name,
                email: r.email,
                phone: r.phone,
                message: r.message,
                inquiry_type: r.inquiry_type,
                unit_slug: r.unit_slug,
                status: InquiryStatus::parse(&r.status).unwrap_or_default(),
                source: r.source,
                created_at: r.created_at,
                updated_at: r.updated_at,
            }
        }
    }

    #[async_trait]
    impl InquiryRepo for PgRepo {
        async fn create_inquiry(&self, new: NewContactInquiry) -> RepoResult<ContactInquiry> {
            let inquiry = inquiry_from_new(new);
            let row = sqlx::query_as::<_, InquiryRow>(&format!(
                "INSERT INTO contact_inquiries ({INQUIRY_COLUMNS}) \
                 VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13) RETURNING {INQUIRY_COLUMNS}"
            ))
            .bind(inquiry.id)
            .bind(&inquiry.project_id)
            .bind(&inquiry.project_name)
            .bind(&inquiry.name)
            .bind(&inquiry.email)
            .bind(&inquiry.phone)
            .bind(&inquiry.message)
            .bind(&inquiry.inquiry_type)
            .bind(&inquiry.unit_slug)
            .bind(inquiry.status.as_str())
            .bind(&inquiry.source)
            .bind(inquiry.created_at)
            .bind(inquiry.updated_at)
            .fetch_one(&self.pool).await.map_err(map_err)?;
            Ok(row.into())
        }
        async fn list_inquiries(
            &self,
            status: Option<InquiryStatus>,
            limit: u32,
            offset: u32,
        ) -> RepoResult<Vec<ContactInquiry>> {
            let rows = sqlx::query_as::<_, InquiryRow>(&format!(
                "SELECT {INQUIRY_COLUMNS} FROM contact_inquiries WHERE ($1::text IS NULL OR status = $1) \
                 ORDER BY created_at DESC LIMIT $2 OFFSET $3"
            ))
            .bind(status.map(InquiryStatus::as_str))
            .bind(i64::from(limit))
            .bind(i64::from(offset))
            .fetch_all(&self.pool).await.map_err(map_err)?;
            Ok(rows.into_iter().map(ContactInquiry::from).collect())
        }
        async fn count_inquiries(&self, status: Option<InquiryStatus>) -> RepoResult<usize> {
            let (count,): (i64,) = sqlx::query_as(
                "SELECT COUNT(*) FROM contact_inquiries WHERE ($1::text IS NULL OR status = $1)"
            )
            .bind(status.map(InquiryStatus::as_str))
            .fetch_one(&self.pool).await.map_err(map_err)?;
            Ok(count as usize)
        }
        async fn get_inquiry(&self, id: Id) -> RepoResult<ContactInquiry> {
            let row = sqlx::query_as::<_, InquiryRow>(&format!(
                "SELECT {INQUIRY_COLUMNS} FROM contact_inquiries WHERE id = $1"
            ))
            .bind(id)
            .fetch_one(&self.pool).await.map_err(map_err)?;
            Ok(row.into())
        }
        async fn set_inquiry_status(&self, id: Id, status: InquiryStatus) -> RepoResult<ContactInquiry> {
            let row = sqlx::query_as::<_, InquiryRow>(&format!(
                "UPDATE contact_inquiries SET status = $2, updated_at = now() WHERE id = $1 \
                 RETURNING {INQUIRY_COLUMNS}"
            ))
            .bind(id)
            .bind(status.as_str())
            .fetch_one(&self.pool).await.map_err(map_err)?;
            Ok(row.into())
        }
        async fn delete_inquiry(&self, id: Id) -> RepoResult<()> {
            let res = sqlx::query("DELETE FROM contact_inquiries WHERE id = $1")
                .bind(id)
                .execute(&self.pool).await.map_err(map_err)?;
            if res.rows_affected() == 0 { return Err(RepoError::NotFound); }
            Ok(())
        }
    }

    const SETTINGS_KEY: &str = "main";
    const MENU_COLUMNS: &str = r#"id, title, url, "order", is_active, parent_id, is_mega_menu, icon_class,
        description, created_at, updated_at"#;

    #[async_trait]
    impl SiteRepo for PgRepo {
        async fn get_settings(&self) -> RepoResult<WebsiteSettings> {
            let row: Option<(String, DateTime<Utc>)> =
                sqlx::query_as("SELECT data, updated_at FROM website_settings WHERE id = $1")
                    .bind(SETTINGS_KEY)
                    .fetch_optional(&self.pool).await.map_err(map_err)?;
            let Some((data, updated_at)) = row else { return Ok(WebsiteSettings::default()) };
            let mut settings: WebsiteSettings = serde_json::from_str(&data).unwrap_or_else(|e| {
                log::warn!("stored website settings unreadable ({e}); using defaults");
                WebsiteSettings::default()
            });
            settings.updated_at = Some(updated_at);
            Ok(settings)
        }
        async fn save_settings(&self, mut settings: WebsiteSettings) -> RepoResult<WebsiteSettings> {
            settings.updated_at = None;
            let data = serde_json::to_string(&settings).map_err(|e| RepoError::Internal(e.to_string()))?;
            let (updated_at,): (DateTime<Utc>,) = sqlx::query_as(
                "INSERT INTO website_settings (id, data, updated_at) VALUES ($1, $2, now()) \
                 ON CONFLICT (id) DO UPDATE SET data = EXCLUDED.data, updated_at = now() \
                 RETURNING updated_at"
            )
            .bind(SETTINGS_KEY)
            .bind(data)
            .fetch_one(&self.pool).await.map_err(map_err)?;
            settings.updated_at = Some(updated_at);
            Ok(settings)
        }
        async fn list_menus(&self, active_only: bool) -> RepoResult<Vec<WebsiteMenu>> {
            sqlx::query_as::<_, WebsiteMenu>(&format!(
                r#"SELECT {MENU_COLUMNS} FROM website_menus WHERE (NOT $1 OR is_active)
                   ORDER BY "order" ASC, created_at ASC"#
            ))
            .bind(active_only)
            .fetch_all(&self.pool).await.map_err(map_err)
        }
        async fn get_menu(&self, id: Id) -> RepoResult<WebsiteMenu> {
            sqlx::query_as::<_, WebsiteMenu>(&format!("SELECT {MENU_COLUMNS} FROM website_menus WHERE id = $1"))
                .bind(id)
                .fetch_one(&self.pool).await.map_err(map_err)
        }
        async fn create_menu(&self, input: WebsiteMenuInput) -> RepoResult<WebsiteMenu> {
            sqlx::query_as::<_, WebsiteMenu>(&format!(
                r#"INSERT INTO website_menus
                     (id, title, url, "order", is_active, parent_id, is_mega_menu, icon_class, description)
                   VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9) RETURNING {MENU_COLUMNS}"#
            ))
            .bind(Id::new_v4())
            .bind(&input.title)
            .bind(&input.url)
            .bind(input.order)
            .bind(input.is_active)
            .bind(input.parent_id)
            .bind(input.is_mega_menu)
            .bind(&input.icon_class)
            .bind(&input.description)
            .fetch_one(&self.pool).await.map_err(map_err)
        }
        async fn update_menu(&self, id: Id, input: WebsiteMenuInput) -> RepoResult<WebsiteMenu> {
            sqlx::query_as::<_, WebsiteMenu>(&format!(
                r#"UPDATE website_menus SET title = $2, url = $3, "order" = $4, is_active = $5,
                     parent_id = $6, is_mega_menu = $7, icon_class = $8, description = $9, updated_at = now()
                   WHERE id = $1 RETURNING {MENU_COLUMNS}"#
            ))
            .bind(id)
            .bind(&input.title)
            .bind(&input.url)
            .bind(input.order)
            .bind(input.is_active)
            .bind(input.parent_id)
            .bind(input.is_mega_menu)
            .bind(&input.icon_class)
            .bind(&input.description)
            .fetch_one(&self.pool).await.map_err(map_err)
        }
        async fn delete_menu(&self, id: Id) -> RepoResult<()> {
            let (children,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM website_menus WHERE parent_id = $1")
                .bind(id)
                .fetch_one(&self.pool).await.map_err(map_err)?;
            if children > 0 { return Err(RepoError::Conflict); }
            let res = sqlx::query("DELETE FROM website_menus WHERE id = $1")
                .bind(id)
                .execute(&self.pool).await.map_err(map_err)?;
            if res.rows_affected() == 0 { return Err(RepoError::NotFound); }
            Ok(())
        }
        async fn reorder_menus(&self, ids: &[Id]) -> RepoResult<()> {
            let mut tx = self.pool.begin().await.map_err(map_err)?;
            for (index, id) in ids.iter().enumerate() {
                sqlx::query(r#"UPDATE website_menus SET "order" = $2, updated_at = now() WHERE id = $1"#)
                    .bind(id)
                    .bind(index as i32)
                    .execute(&mut *tx).await.map_err(map_err)?;
            }
            tx.commit().await.map_err(map_err)?;
            Ok(())
        }
    }
}
