#![cfg(feature = "inmem-store")]

use chrono::NaiveDate;
use estate_cms::components::{ComponentKind, SYSTEM_TEMPLATES};
use estate_cms::models::*;
use estate_cms::repo::{inmem::InMemRepo, RepoError};
// Bring trait method namespaces into scope so calls on InMemRepo resolve.
use estate_cms::repo::{AnalyticsRepo, InquiryRepo, KanbanRepo, LandingPageRepo, SiteRepo, TemplateRepo};
use serde_json::json;
use serial_test::serial;

/// Fresh, empty repository whose snapshot lives in a temp dir for the test's lifetime.
fn repo() -> (InMemRepo, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    std::env::set_var("ESTATE_DATA_DIR", tmp.path());
    (InMemRepo::new(), tmp)
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
}

#[tokio::test]
#[serial]
async fn page_crud_and_slug_conflict() {
    let (r, _tmp) = repo();

    let page = r.create_page(NewLandingPage::new("Tower A", "tower-a"), Some("ed".into())).await.unwrap();
    assert_eq!(page.status, PageStatus::Draft);
    assert!(page.published_at.is_none());
    assert_eq!(page.template_type, "custom");
    assert_eq!(page.settings, json!({}));

    let err = r.create_page(NewLandingPage::new("Dup", "tower-a"), None).await.unwrap_err();
    assert!(matches!(err, RepoError::Conflict));

    let by_slug = r.get_page_by_slug("tower-a").await.unwrap();
    assert_eq!(by_slug.id, page.id);

    let mut changed = page.clone();
    changed.title = "Tower A Phase 2".into();
    let saved = r.update_page(changed).await.unwrap();
    assert_eq!(saved.title, "Tower A Phase 2");
    assert!(saved.updated_at >= page.updated_at);
    assert_eq!(saved.created_at, page.created_at);

    r.delete_page(page.id).await.unwrap();
    assert!(matches!(r.get_page(page.id).await, Err(RepoError::NotFound)));
    assert!(matches!(r.delete_page(page.id).await, Err(RepoError::NotFound)));
}

#[tokio::test]
#[serial]
async fn created_published_pages_get_timestamp() {
    let (r, _tmp) = repo();
    let mut new = NewLandingPage::new("Launch", "launch");
    new.status = PageStatus::Published;
    let page = r.create_page(new, None).await.unwrap();
    assert!(page.published_at.is_some());
}

#[tokio::test]
#[serial]
async fn update_rejects_slug_of_other_page() {
    let (r, _tmp) = repo();
    let a = r.create_page(NewLandingPage::new("A", "a"), None).await.unwrap();
    r.create_page(NewLandingPage::new("B", "b"), None).await.unwrap();
    let mut stolen = a.clone();
    stolen.slug = "b".into();
    assert!(matches!(r.update_page(stolen).await, Err(RepoError::Conflict)));
    assert_eq!(r.get_page_by_slug("b").await.unwrap().title, "B");
}

#[tokio::test]
#[serial]
async fn list_filters_and_paginates() {
    let (r, _tmp) = repo();
    for (i, source) in ["google", "facebook", "google"].iter().enumerate() {
        let mut new = NewLandingPage::new(format!("Cluster {i}"), format!("cluster-{i}"));
        new.campaign_source = Some(source.to_string());
        r.create_page(new, Some("ed".into())).await.unwrap();
    }
    let filter = PageFilter { campaign_source: Some("google".into()), ..Default::default() };
    assert_eq!(r.count_pages(&filter).await.unwrap(), 2);

    let filter = PageFilter { search: Some("CLUSTER 1".into()), ..Default::default() };
    let found = r.list_pages(&filter).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].slug, "cluster-1");

    let filter = PageFilter { limit: Some(2), offset: Some(1), ..Default::default() };
    assert_eq!(r.list_pages(&filter).await.unwrap().len(), 2);
    assert_eq!(r.count_pages(&filter).await.unwrap(), 3);
}

#[tokio::test]
#[serial]
async fn content_survives_snapshot_reload() {
    let tmp = tempfile::tempdir().unwrap();
    std::env::set_var("ESTATE_DATA_DIR", tmp.path());
    let r = InMemRepo::new();
    let mut new = NewLandingPage::new("Tower A", "tower-a");
    new.content = vec![LandingPageComponent::new(
        "promo-1720000000000-abcdefghi",
        ComponentKind::Promo,
        json!({"discountValue": "30%"}),
        0,
    )];
    r.create_page(new, None).await.unwrap();

    let reloaded = InMemRepo::new();
    let page = reloaded.get_page_by_slug("tower-a").await.unwrap();
    assert_eq!(page.content.len(), 1);
    assert_eq!(page.content[0].kind, ComponentKind::Promo);
    assert_eq!(page.content[0].config["discountValue"], "30%");
}

#[tokio::test]
#[serial]
async fn templates_seed_sort_and_protect() {
    let (r, _tmp) = repo();
    assert_eq!(r.seed_system_templates().await.unwrap(), SYSTEM_TEMPLATES.len());
    assert_eq!(r.seed_system_templates().await.unwrap(), 0, "seeding is a no-op on a filled catalog");

    let custom = r
        .create_template(
            NewComponentTemplate {
                name: "A custom hero".into(),
                kind: ComponentKind::Hero,
                config: json!({"title": "Mine"}),
                preview_image: None,
            },
            Some("ed".into()),
            false,
        )
        .await
        .unwrap();

    let heroes = r.list_templates(Some(ComponentKind::Hero)).await.unwrap();
    assert_eq!(heroes.len(), 2);
    assert!(heroes[0].is_system);
    assert_eq!(heroes[1].id, custom.id);

    let promo = r
        .list_templates(Some(ComponentKind::Promo))
        .await
        .unwrap()
        .pop()
        .unwrap();
    assert_eq!(promo.name, "Promo Special");
    assert_eq!(promo.config["discountValue"], "30%");
    assert!(matches!(r.delete_template(promo.id).await, Err(RepoError::Protected)));

    let renamed = r
        .update_template(custom.id, UpdateComponentTemplate { name: Some("Renamed".into()), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(renamed.name, "Renamed");
    assert_eq!(renamed.config["title"], "Mine");
    r.delete_template(custom.id).await.unwrap();
    assert!(matches!(r.get_template(custom.id).await, Err(RepoError::NotFound)));
}

#[tokio::test]
#[serial]
async fn analytics_upserts_per_day_source_device() {
    let (r, _tmp) = repo();
    let page = r.create_page(NewLandingPage::new("A", "a"), None).await.unwrap();

    r.record_event(page.id, day(1), "direct", "desktop", TrafficEvent::Visit).await.unwrap();
    r.record_event(page.id, day(1), "direct", "desktop", TrafficEvent::Visit).await.unwrap();
    let rec = r.record_event(page.id, day(1), "direct", "desktop", TrafficEvent::Conversion).await.unwrap();
    assert_eq!((rec.visit_count, rec.conversion_count), (2, 1));

    r.record_event(page.id, day(1), "google", "mobile", TrafficEvent::Visit).await.unwrap();
    r.record_event(page.id, day(3), "direct", "desktop", TrafficEvent::Visit).await.unwrap();

    let all = r.page_analytics(page.id, &DateRange::default()).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].date, day(3));

    let range = DateRange { start: Some(day(2)), end: None };
    assert_eq!(r.page_analytics(page.id, &range).await.unwrap().len(), 1);

    let missing = uuid::Uuid::new_v4();
    assert!(matches!(
        r.record_event(missing, day(1), "direct", "desktop", TrafficEvent::Visit).await,
        Err(RepoError::NotFound)
    ));
}

#[tokio::test]
#[serial]
async fn kanban_orders_moves_and_cascades() {
    let (r, _tmp) = repo();
    let board = r
        .create_board(NewKanbanBoard { title: "Launch".into(), description: None }, "ed")
        .await
        .unwrap();
    r.create_board(NewKanbanBoard { title: "Shared".into(), description: None }, "system").await.unwrap();
    r.create_board(NewKanbanBoard { title: "Other".into(), description: None }, "someone").await.unwrap();
    assert_eq!(r.list_boards("ed").await.unwrap().len(), 2);

    let todo = r
        .create_column(NewKanbanColumn { board_id: board.id, title: "To Do".into(), color: None })
        .await
        .unwrap();
    let done = r
        .create_column(NewKanbanColumn { board_id: board.id, title: "Done".into(), color: Some("#10b981".into()) })
        .await
        .unwrap();
    assert_eq!((todo.order, done.order), (1, 2));
    assert_eq!(todo.color, "#6b7280");

    let new_task = |title: &str, column_id| NewKanbanTask {
        board_id: board.id,
        column_id,
        title: title.into(),
        description: None,
        priority: Priority::High,
        due_date: None,
        assigned_to: None,
        tags: vec!["copy".into()],
    };
    let t1 = r.create_task(new_task("Write copy", todo.id)).await.unwrap();
    let t2 = r.create_task(new_task("Shoot photos", todo.id)).await.unwrap();
    assert_eq!((t1.order, t2.order), (1, 2));

    let moved = r.move_task(t1.id, done.id, 1).await.unwrap();
    assert_eq!(moved.column_id, done.id);

    let foreign = r
        .create_board(NewKanbanBoard { title: "X".into(), description: None }, "ed")
        .await
        .unwrap();
    let foreign_col = r
        .create_column(NewKanbanColumn { board_id: foreign.id, title: "Col".into(), color: None })
        .await
        .unwrap();
    assert!(matches!(r.move_task(t2.id, foreign_col.id, 1).await, Err(RepoError::NotFound)));

    r.delete_column(todo.id).await.unwrap();
    let tasks = r.list_tasks(board.id).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, t1.id);

    r.delete_task(t1.id).await.unwrap();
    assert!(r.list_tasks(board.id).await.unwrap().is_empty());
}

fn inquiry(name: &str) -> NewContactInquiry {
    NewContactInquiry {
        project_id: "tower-a".into(),
        project_name: Some("Tower A".into()),
        name: name.into(),
        email: format!("{}@example.com", name.to_lowercase()),
        phone: "0812000".into(),
        message: None,
        inquiry_type: "unit".into(),
        unit_slug: Some("type-36".into()),
    }
}

fn menu(title: &str, order: i32, parent_id: Option<Id>) -> WebsiteMenuInput {
    WebsiteMenuInput {
        title: title.into(),
        url: Some(format!("/{}", title.to_lowercase())),
        order,
        is_active: true,
        parent_id,
        is_mega_menu: false,
        icon_class: None,
        description: None,
    }
}

#[tokio::test]
#[serial]
async fn inquiries_listed_newest_first_and_filtered_by_status() {
    let (r, _tmp) = repo();
    let first = r.create_inquiry(inquiry("Ayu")).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = r.create_inquiry(inquiry("Budi")).await.unwrap();
    assert_eq!(first.status, InquiryStatus::New);
    assert_eq!(first.source, "website");

    let all = r.list_inquiries(None, 10, 0).await.unwrap();
    assert_eq!(all.iter().map(|i| i.id).collect::<Vec<_>>(), [second.id, first.id]);
    assert_eq!(r.list_inquiries(None, 1, 1).await.unwrap()[0].id, first.id);

    let contacted = r.set_inquiry_status(first.id, InquiryStatus::Contacted).await.unwrap();
    assert!(contacted.updated_at >= first.updated_at);
    let only = r.list_inquiries(Some(InquiryStatus::Contacted), 10, 0).await.unwrap();
    assert_eq!(only.len(), 1);
    assert_eq!(r.count_inquiries(Some(InquiryStatus::New)).await.unwrap(), 1);
    assert_eq!(r.count_inquiries(None).await.unwrap(), 2);

    r.delete_inquiry(second.id).await.unwrap();
    assert!(matches!(r.get_inquiry(second.id).await, Err(RepoError::NotFound)));
    assert!(matches!(
        r.set_inquiry_status(second.id, InquiryStatus::Closed).await,
        Err(RepoError::NotFound)
    ));
}

#[tokio::test]
#[serial]
async fn settings_default_until_saved_and_survive_restart() {
    let (r, tmp) = repo();
    let defaults = r.get_settings().await.unwrap();
    assert_eq!(defaults.site_title, "Paramount Land");
    assert!(!defaults.maintenance_mode);
    assert!(defaults.updated_at.is_none());

    let mut settings = defaults.clone();
    settings.site_title = "Paramount Estates".into();
    settings.whatsapp_number = Some("62812000".into());
    let saved = r.save_settings(settings).await.unwrap();
    assert!(saved.updated_at.is_some());

    std::env::set_var("ESTATE_DATA_DIR", tmp.path());
    let reopened = InMemRepo::new();
    let loaded = reopened.get_settings().await.unwrap();
    assert_eq!(loaded.site_title, "Paramount Estates");
    assert_eq!(loaded.whatsapp_number.as_deref(), Some("62812000"));
}

#[tokio::test]
#[serial]
async fn menus_ordered_reordered_and_parents_protected() {
    let (r, _tmp) = repo();
    let home = r.create_menu(menu("Home", 2, None)).await.unwrap();
    let projects = r.create_menu(menu("Projects", 1, None)).await.unwrap();
    let tower = r.create_menu(menu("Tower", 0, Some(projects.id))).await.unwrap();
    let mut hidden = menu("Careers", 3, None);
    hidden.is_active = false;
    let careers = r.create_menu(hidden).await.unwrap();

    let titles = |menus: Vec<WebsiteMenu>| menus.into_iter().map(|m| m.title).collect::<Vec<_>>();
    assert_eq!(titles(r.list_menus(false).await.unwrap()), ["Tower", "Projects", "Home", "Careers"]);
    assert_eq!(titles(r.list_menus(true).await.unwrap()), ["Tower", "Projects", "Home"]);

    assert!(matches!(r.create_menu(menu("Lost", 0, Some(uuid::Uuid::new_v4()))).await, Err(RepoError::NotFound)));
    assert!(matches!(r.delete_menu(projects.id).await, Err(RepoError::Conflict)));

    r.reorder_menus(&[careers.id, home.id, uuid::Uuid::new_v4(), projects.id]).await.unwrap();
    assert_eq!(r.get_menu(careers.id).await.unwrap().order, 0);
    assert_eq!(r.get_menu(projects.id).await.unwrap().order, 3);

    let mut moved = menu("Tower", 0, None);
    moved.is_mega_menu = true;
    let updated = r.update_menu(tower.id, moved).await.unwrap();
    assert!(updated.parent_id.is_none());
    assert!(updated.is_mega_menu);
    r.delete_menu(projects.id).await.unwrap();
    assert!(matches!(r.get_menu(projects.id).await, Err(RepoError::NotFound)));
}
