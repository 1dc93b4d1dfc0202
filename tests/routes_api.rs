#![cfg(feature = "inmem-store")]

use actix_web::{test, web, App};
use async_trait::async_trait;
use estate_cms::auth::{create_jwt, Role};
use estate_cms::cache::PageCache;
use estate_cms::repo::inmem::InMemRepo;
use estate_cms::repo::TemplateRepo;
use estate_cms::storage::{ImageStore, ImageStoreError, StoredImage};
use estate_cms::{config, AppState};
use serde_json::{json, Value};
use serial_test::serial;
use std::sync::Arc;

struct NoImages;

#[async_trait]
impl ImageStore for NoImages {
    async fn upload(&self, _folder: &str, _bytes: &[u8]) -> Result<StoredImage, ImageStoreError> {
        Err(ImageStoreError::Other("disabled".into()))
    }
    async fn delete(&self, _public_id: &str) -> Result<(), ImageStoreError> {
        Ok(())
    }
}

// JWT secret present & unique temp data dir per test
fn setup_env() -> tempfile::TempDir {
    std::env::set_var("JWT_SECRET", "test-secret-must-be-32-bytes-long!!");
    let tmp = tempfile::tempdir().unwrap();
    std::env::set_var("ESTATE_DATA_DIR", tmp.path());
    tmp
}

fn admin_token() -> String { create_jwt("admin-1", vec![Role::Admin]).unwrap() }
fn editor_token() -> String { create_jwt("editor-1", vec![Role::Editor]).unwrap() }
fn other_editor_token() -> String { create_jwt("editor-2", vec![Role::Editor]).unwrap() }

fn bearer(token: String) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

async fn state() -> AppState {
    let repo = InMemRepo::new();
    repo.seed_system_templates().await.unwrap();
    AppState::new(Arc::new(repo), Arc::new(NoImages), PageCache::default())
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(App::new().app_data(web::Data::new($state)).configure(config)).await
    };
}

#[actix_web::test]
#[serial]
async fn page_lifecycle_routes() {
    let _tmp = setup_env();
    let app = app!(state().await);

    // unauthenticated listing is refused
    let req = test::TestRequest::get().uri("/api/v1/landing-pages").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 401);

    let req = test::TestRequest::post()
        .uri("/api/v1/landing-pages")
        .insert_header(bearer(editor_token()))
        .set_json(json!({
            "title": "Tower A",
            "slug": "tower-a",
            "content": [{"id": "hero-1", "type": "hero", "config": {"title": "Live above the city"}, "order": 0}]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let page: Value = test::read_body_json(resp).await;
    let id = page["id"].as_str().unwrap().to_string();
    assert_eq!(page["status"], "draft");
    assert_eq!(page["created_by"], "editor-1");
    assert_eq!(page["content"][0]["type"], "hero");

    let req = test::TestRequest::get()
        .uri("/api/v1/landing-pages?status=draft")
        .insert_header(bearer(editor_token()))
        .to_request();
    let list: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(list["total"], 1);

    let req = test::TestRequest::get()
        .uri("/api/v1/landing-pages/slug/tower-a")
        .insert_header(bearer(editor_token()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    // another editor may not modify it
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/landing-pages/{id}"))
        .insert_header(bearer(other_editor_token()))
        .set_json(json!({"title": "Hijacked"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 403);

    // not public yet
    let req = test::TestRequest::get().uri("/api/v1/public/pages/tower-a").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/landing-pages/{id}/publish"))
        .insert_header(bearer(editor_token()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let published: Value = test::read_body_json(resp).await;
    assert!(published["published_at"].is_string());

    let req = test::TestRequest::get().uri("/api/v1/public/pages/tower-a").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    assert!(resp.headers().get("cache-control").unwrap().to_str().unwrap().starts_with("public"));
    let public: Value = test::read_body_json(resp).await;
    let hero = &public["content"][0]["config"];
    assert_eq!(hero["title"], "Live above the city");
    assert!(hero.as_object().unwrap().len() > 1, "public configs are completed with defaults");

    // admin can delete someone else's page
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/landing-pages/{id}"))
        .insert_header(bearer(admin_token()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 204);
    let req = test::TestRequest::get().uri("/api/v1/public/pages/tower-a").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_web::test]
#[serial]
async fn duplicate_slug_returns_suggestions() {
    let _tmp = setup_env();
    let app = app!(state().await);

    let mut ids = Vec::new();
    for slug in ["tower-a", "tower-b"] {
        let req = test::TestRequest::post()
            .uri("/api/v1/landing-pages")
            .insert_header(bearer(editor_token()))
            .set_json(json!({"title": slug, "slug": slug, "template_type": "promo"}))
            .to_request();
        let page: Value = test::read_body_json(test::call_service(&app, req).await).await;
        ids.push(page["id"].as_str().unwrap().to_string());
    }

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/landing-pages/{}", ids[0]))
        .insert_header(bearer(editor_token()))
        .set_json(json!({"slug": "tower-b"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);
    let body: Value = test::read_body_json(resp).await;
    let suggestions = body["suggestions"].as_array().unwrap();
    assert_eq!(suggestions[0], "tower-b-updated");
    assert_eq!(suggestions[3], "tower-b-promo");

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/landing-pages/{}", ids[0]))
        .insert_header(bearer(editor_token()))
        .set_json(json!({"title": ""}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert!(body.get("suggestions").is_none());
}

#[actix_web::test]
#[serial]
async fn clone_and_track_traffic() {
    let _tmp = setup_env();
    let app = app!(state().await);

    let req = test::TestRequest::post()
        .uri("/api/v1/landing-pages")
        .insert_header(bearer(editor_token()))
        .set_json(json!({"title": "Tower A", "slug": "tower-a", "status": "published"}))
        .to_request();
    let page: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let id = page["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/landing-pages/{id}/clone"))
        .insert_header(bearer(other_editor_token()))
        .set_json(json!({"title": "Tower A copy", "slug": "tower-a-copy"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let copy: Value = test::read_body_json(resp).await;
    assert_eq!(copy["status"], "draft");
    assert!(copy["published_at"].is_null());

    for _ in 0..2 {
        let req = test::TestRequest::post().uri("/api/v1/public/pages/tower-a/visit").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 200);
    }
    let req = test::TestRequest::post()
        .uri("/api/v1/public/pages/tower-a/conversion")
        .set_json(json!({"source": "google", "device_type": "mobile"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    // drafts are not tracked
    let req = test::TestRequest::post().uri("/api/v1/public/pages/tower-a-copy/visit").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/landing-pages/{id}/analytics"))
        .insert_header(bearer(editor_token()))
        .to_request();
    let records: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 2);
    let direct = records.iter().find(|r| r["source"] == "direct").unwrap();
    assert_eq!(direct["visit_count"], 2);
    assert_eq!(direct["device_type"], "desktop");
    let google = records.iter().find(|r| r["source"] == "google").unwrap();
    assert_eq!(google["conversion_count"], 1);
}

#[actix_web::test]
#[serial]
async fn component_catalog_routes() {
    let _tmp = setup_env();
    let app = app!(state().await);

    let req = test::TestRequest::get().uri("/api/v1/components?type=promo").to_request();
    let templates: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let templates = templates.as_array().unwrap();
    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0]["is_system"], true);
    let system_id = templates[0]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/components/{system_id}"))
        .insert_header(bearer(admin_token()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 403);

    let req = test::TestRequest::post()
        .uri("/api/v1/components")
        .insert_header(bearer(editor_token()))
        .set_json(json!({"name": "Blue CTA", "type": "cta", "config": {"title": "Book a visit"}}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["config"]["title"], "Book a visit");
    assert!(created["config"].as_object().unwrap().len() > 1);

    let req = test::TestRequest::post()
        .uri("/api/v1/components")
        .insert_header(bearer(editor_token()))
        .set_json(json!({"name": "Weird", "type": "carousel-3d"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);

    let req = test::TestRequest::get().uri("/api/v1/components/defaults/promo").to_request();
    let defaults: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(defaults["discountValue"], "30%");

    let req = test::TestRequest::get().uri("/api/v1/components/defaults/nope").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);

    let req = test::TestRequest::post()
        .uri("/api/v1/components/normalize")
        .set_json(json!({"type": "agent-contact", "config": {"agents": [{"name": "Sarah", "position": "Senior Sales"}]}}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let normalized: Value = test::read_body_json(resp).await;
    assert_eq!(normalized["agent"]["name"], "Sarah");
    assert_eq!(normalized["agent"]["title"], "Senior Sales");
    assert!(normalized.get("agents").is_none());
}

#[actix_web::test]
#[serial]
async fn kanban_board_routes() {
    let _tmp = setup_env();
    let app = app!(state().await);

    let req = test::TestRequest::post()
        .uri("/api/v1/kanban/boards")
        .insert_header(bearer(editor_token()))
        .set_json(json!({"title": "Launch"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let board: Value = test::read_body_json(resp).await;
    let board_id = board["id"].as_str().unwrap().to_string();

    let mut columns = Vec::new();
    for title in ["To Do", "Done"] {
        let req = test::TestRequest::post()
            .uri("/api/v1/kanban/columns")
            .insert_header(bearer(editor_token()))
            .set_json(json!({"board_id": board_id, "title": title}))
            .to_request();
        let column: Value = test::read_body_json(test::call_service(&app, req).await).await;
        columns.push(column["id"].as_str().unwrap().to_string());
    }

    let req = test::TestRequest::post()
        .uri("/api/v1/kanban/tasks")
        .insert_header(bearer(editor_token()))
        .set_json(json!({"board_id": board_id, "column_id": columns[0], "title": "Write copy", "priority": "urgent"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let task: Value = test::read_body_json(resp).await;
    assert_eq!(task["order"], 1);
    let task_id = task["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/v1/kanban/tasks")
        .insert_header(bearer(editor_token()))
        .set_json(json!({"board_id": board_id, "column_id": columns[0], "title": "  "}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/kanban/tasks/{task_id}/move"))
        .insert_header(bearer(editor_token()))
        .set_json(json!({"column_id": columns[1], "order": 1}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/kanban/columns/{}", columns[1]))
        .insert_header(bearer(editor_token()))
        .set_json(json!({"color": "#10b981"}))
        .to_request();
    let column: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(column["color"], "#10b981");

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/kanban/boards/{board_id}"))
        .insert_header(bearer(editor_token()))
        .to_request();
    let view: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(view["title"], "Launch");
    assert_eq!(view["columns"][0]["title"], "To Do");
    assert!(view["columns"][0]["tasks"].as_array().unwrap().is_empty());
    assert_eq!(view["columns"][1]["tasks"][0]["title"], "Write copy");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/kanban/columns/{}", columns[1]))
        .insert_header(bearer(editor_token()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 204);
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/kanban/tasks/{task_id}"))
        .insert_header(bearer(editor_token()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);

    let req = test::TestRequest::get()
        .uri("/api/v1/kanban/boards")
        .insert_header(bearer(other_editor_token()))
        .to_request();
    let boards: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert!(boards.as_array().unwrap().is_empty());
}

#[actix_web::test]
#[serial]
async fn cache_clear_is_admin_only() {
    let _tmp = setup_env();
    let app = app!(state().await);

    let req = test::TestRequest::post()
        .uri("/api/v1/landing-pages")
        .insert_header(bearer(editor_token()))
        .set_json(json!({"title": "Tower A", "slug": "tower-a", "status": "published"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 201);
    let req = test::TestRequest::get().uri("/api/v1/public/pages/tower-a").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/cache/clear")
        .insert_header(bearer(editor_token()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 403);

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/cache/clear")
        .insert_header(bearer(admin_token()))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["cleared"], 1);
}

#[actix_web::test]
#[serial]
async fn content_edit_route_checks_ownership() {
    let _tmp = setup_env();
    let app = app!(state().await);

    let req = test::TestRequest::post()
        .uri("/api/v1/landing-pages")
        .insert_header(bearer(editor_token()))
        .set_json(json!({"title": "Tower A", "slug": "tower-a"}))
        .to_request();
    let page: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let uri = format!("/api/v1/landing-pages/{}/content", page["id"].as_str().unwrap());

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(bearer(other_editor_token()))
        .set_json(json!({"op": "add", "type": "hero"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 403);

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(bearer(editor_token()))
        .set_json(json!({"op": "add", "type": "hero", "config": {"title": "Sky"}}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let edited: Value = test::read_body_json(resp).await;
    let component_id = edited["component_id"].as_str().unwrap().to_string();
    assert_eq!(edited["page"]["content"][0]["config"]["title"], "Sky");

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(bearer(editor_token()))
        .set_json(json!({"op": "remove", "component_id": "missing"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(bearer(editor_token()))
        .set_json(json!({"op": "remove", "component_id": component_id}))
        .to_request();
    let edited: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert!(edited["page"]["content"].as_array().unwrap().is_empty());
    assert!(edited.get("component_id").is_none());
}

#[actix_web::test]
#[serial]
async fn inquiry_routes() {
    let _tmp = setup_env();
    let app = app!(state().await);

    // the public form needs no token
    let req = test::TestRequest::post()
        .uri("/api/v1/public/inquiries")
        .set_json(json!({
            "project_id": "sales-consultation",
            "name": "Ayu",
            "email": "ayu@example.com",
            "phone": "0812000",
            "message": "Call me after 5pm"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let inquiry: Value = test::read_body_json(resp).await;
    assert_eq!(inquiry["project_id"], "general_inquiries");
    assert_eq!(inquiry["status"], "new");
    assert_eq!(inquiry["inquiry_type"], "general");
    let id = inquiry["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/v1/public/inquiries")
        .set_json(json!({"name": "Budi", "email": "not-an-email", "phone": "0812"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);

    let req = test::TestRequest::get().uri("/api/v1/inquiries").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 401);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/inquiries/{id}/status"))
        .insert_header(bearer(editor_token()))
        .set_json(json!({"status": "contacted"}))
        .to_request();
    let updated: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(updated["status"], "contacted");

    let req = test::TestRequest::get()
        .uri("/api/v1/inquiries?status=contacted&page=1&limit=5")
        .insert_header(bearer(editor_token()))
        .to_request();
    let list: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(list["total"], 1);
    assert_eq!(list["total_pages"], 1);
    assert_eq!(list["limit"], 5);
    assert_eq!(list["items"][0]["id"], id.as_str());

    let req = test::TestRequest::get()
        .uri("/api/v1/inquiries?status=spam")
        .insert_header(bearer(editor_token()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/inquiries/{id}"))
        .insert_header(bearer(editor_token()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 403);
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/inquiries/{id}"))
        .insert_header(bearer(admin_token()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 204);
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/inquiries/{id}"))
        .insert_header(bearer(admin_token()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_web::test]
#[serial]
async fn site_settings_and_menu_routes() {
    let _tmp = setup_env();
    let app = app!(state().await);

    let req = test::TestRequest::get().uri("/api/v1/public/site").to_request();
    let site: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(site["settings"]["site_title"], "Paramount Land");
    assert!(site["menus"].as_array().unwrap().is_empty());

    let req = test::TestRequest::put()
        .uri("/api/v1/site/settings")
        .insert_header(bearer(editor_token()))
        .set_json(json!({"site_title": "Paramount Estates"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 403);
    let req = test::TestRequest::put()
        .uri("/api/v1/site/settings")
        .insert_header(bearer(admin_token()))
        .set_json(json!({"site_title": " "}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);
    let req = test::TestRequest::put()
        .uri("/api/v1/site/settings")
        .insert_header(bearer(admin_token()))
        .set_json(json!({"site_title": "Paramount Estates", "maintenance_mode": true}))
        .to_request();
    let saved: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(saved["maintenance_mode"], true);

    let create = |body: Value| {
        test::TestRequest::post()
            .uri("/api/v1/site/menus")
            .insert_header(bearer(admin_token()))
            .set_json(body)
            .to_request()
    };
    let projects: Value =
        test::read_body_json(test::call_service(&app, create(json!({"title": "Projects"}))).await).await;
    let parent = projects["id"].as_str().unwrap().to_string();
    let tower: Value = test::read_body_json(
        test::call_service(&app, create(json!({"title": "Tower A", "parent_id": parent}))).await,
    )
    .await;
    let child = tower["id"].as_str().unwrap().to_string();
    let resp = test::call_service(&app, create(json!({"title": "Lost", "parent_id": uuid::Uuid::new_v4()}))).await;
    assert_eq!(resp.status(), 400);

    // a parent may not move under its own child
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/site/menus/{parent}"))
        .insert_header(bearer(admin_token()))
        .set_json(json!({"title": "Projects", "parent_id": child}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/site/menus/{parent}"))
        .insert_header(bearer(admin_token()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 409);

    let req = test::TestRequest::get().uri("/api/v1/public/site").to_request();
    let site: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(site["settings"]["site_title"], "Paramount Estates");
    assert_eq!(site["menus"][0]["title"], "Projects");
    assert_eq!(site["menus"][0]["children"][0]["title"], "Tower A");

    let req = test::TestRequest::post()
        .uri("/api/v1/site/menus/reorder")
        .insert_header(bearer(admin_token()))
        .set_json(json!({"menu_ids": [child, parent]}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 204);
    let req = test::TestRequest::get()
        .uri("/api/v1/site/menus/flat")
        .insert_header(bearer(editor_token()))
        .to_request();
    let flat: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(flat[0]["title"], "Tower A");
    assert_eq!(flat[1]["order"], 1);
}
