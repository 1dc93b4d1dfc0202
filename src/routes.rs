use std::sync::Arc;

use actix_multipart::Multipart;
use actix_web::{http::header, web, HttpRequest, HttpResponse};
use chrono::Utc;
use futures_util::{StreamExt as _, TryStreamExt as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::auth::Auth;
use crate::cache::PageCache;
use crate::components::{default_config, normalize_config, ComponentKind};
use crate::error::ApiError;
use crate::gateway::PageGateway;
use crate::kanban::{load_board_view, require_title};
use crate::models::*;
use crate::repo::{
    AnalyticsRepo, InquiryRepo, KanbanRepo, LandingPageRepo, Repo, SiteRepo, TemplateRepo,
};
use crate::site::{
    build_menu_tree, check_parent, inquiry_page, load_public_site, prepare_inquiry, validate_menu,
    validate_settings,
};
use crate::storage::{upload_image as store_upload, upload_inline, ImageStore, MAX_UPLOAD_BYTES};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(
                web::resource("/landing-pages")
                    .route(web::get().to(list_pages))
                    .route(web::post().to(create_page)),
            )
            .service(
                web::resource("/landing-pages/slug/{slug}").route(web::get().to(get_page_by_slug)),
            )
            .service(
                web::resource("/landing-pages/{id}")
                    .route(web::get().to(get_page))
                    .route(web::put().to(update_page))
                    .route(web::delete().to(delete_page)),
            )
            .service(
                web::resource("/landing-pages/{id}/publish").route(web::post().to(publish_page)),
            )
            .service(
                web::resource("/landing-pages/{id}/clone").route(web::post().to(clone_page)),
            )
            .service(
                web::resource("/landing-pages/{id}/content").route(web::post().to(edit_content)),
            )
            .service(
                web::resource("/landing-pages/{id}/analytics").route(web::get().to(page_analytics)),
            )
            .service(web::resource("/public/pages/{slug}").route(web::get().to(public_page)))
            .service(
                web::resource("/public/pages/{slug}/visit").route(web::post().to(track_visit)),
            )
            .service(
                web::resource("/public/pages/{slug}/conversion")
                    .route(web::post().to(track_conversion)),
            )
            .service(web::resource("/public/site").route(web::get().to(public_site)))
            .service(web::resource("/public/inquiries").route(web::post().to(submit_inquiry)))
            .service(
                web::resource("/components")
                    .route(web::get().to(list_templates))
                    .route(web::post().to(create_template)),
            )
            .service(
                web::resource("/components/normalize").route(web::post().to(normalize_component)),
            )
            .service(
                web::resource("/components/defaults/{type}")
                    .route(web::get().to(component_defaults)),
            )
            .service(
                web::resource("/components/{id}")
                    .route(web::put().to(update_template))
                    .route(web::delete().to(delete_template)),
            )
            .service(web::resource("/inquiries").route(web::get().to(list_inquiries)))
            .service(
                web::resource("/inquiries/{id}")
                    .route(web::get().to(get_inquiry))
                    .route(web::delete().to(delete_inquiry)),
            )
            .service(
                web::resource("/inquiries/{id}/status")
                    .route(web::patch().to(update_inquiry_status)),
            )
            .service(
                web::resource("/site/settings")
                    .route(web::get().to(get_settings))
                    .route(web::put().to(save_settings)),
            )
            .service(
                web::resource("/site/menus")
                    .route(web::get().to(menu_tree))
                    .route(web::post().to(create_menu)),
            )
            .service(web::resource("/site/menus/flat").route(web::get().to(list_menus)))
            .service(web::resource("/site/menus/reorder").route(web::post().to(reorder_menus)))
            .service(
                web::resource("/site/menus/{id}")
                    .route(web::get().to(get_menu))
                    .route(web::put().to(update_menu))
                    .route(web::delete().to(delete_menu)),
            )
            .service(
                web::resource("/kanban/boards")
                    .route(web::get().to(list_boards))
                    .route(web::post().to(create_board)),
            )
            .service(web::resource("/kanban/boards/{id}").route(web::get().to(get_board)))
            .service(web::resource("/kanban/columns").route(web::post().to(create_column)))
            .service(
                web::resource("/kanban/columns/{id}")
                    .route(web::patch().to(update_column))
                    .route(web::delete().to(delete_column)),
            )
            .service(web::resource("/kanban/tasks").route(web::post().to(create_task)))
            .service(web::resource("/kanban/tasks/{id}/move").route(web::post().to(move_task)))
            .service(web::resource("/kanban/tasks/{id}").route(web::delete().to(delete_task)))
            .service(web::resource("/uploads").route(web::post().to(upload)))
            .service(web::resource("/admin/cache/clear").route(web::post().to(clear_cache))),
    );
}

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn Repo>,
    pub image_store: Arc<dyn ImageStore>,
    pub pages: PageGateway,
}

impl AppState {
    pub fn new(repo: Arc<dyn Repo>, image_store: Arc<dyn ImageStore>, cache: PageCache) -> Self {
        let pages = PageGateway::new(repo.clone(), cache);
        Self { repo, image_store, pages }
    }
}

macro_rules! ensure_admin {
    ($auth:expr) => {
        if !$auth.is_admin() {
            return Err(ApiError::Forbidden);
        }
    };
}

macro_rules! ensure_editor {
    ($auth:expr, $created_by:expr) => {
        if !$auth.can_edit($created_by) {
            return Err(ApiError::Forbidden);
        }
    };
}

// Landing pages

#[utoipa::path(
    get,
    path = "/api/v1/landing-pages",
    params(PageFilter),
    responses((status = 200, description = "Pages, newest first", body = PageList)),
    tag = "pages"
)]
pub async fn list_pages(
    _auth: Auth,
    data: web::Data<AppState>,
    query: web::Query<PageFilter>,
) -> Result<HttpResponse, ApiError> {
    let filter = query.into_inner();
    let items = data.repo.list_pages(&filter).await?;
    let total = data.repo.count_pages(&filter).await?;
    Ok(HttpResponse::Ok().json(PageList { items, total }))
}

#[utoipa::path(
    post,
    path = "/api/v1/landing-pages",
    request_body = NewLandingPage,
    responses(
        (status = 201, description = "Page created", body = LandingPage),
        (status = 400, description = "Empty title or slug"),
        (status = 409, description = "Slug already in use")
    ),
    tag = "pages"
)]
pub async fn create_page(
    auth: Auth,
    data: web::Data<AppState>,
    payload: web::Json<NewLandingPage>,
) -> Result<HttpResponse, ApiError> {
    let page = data.pages.create(payload.into_inner(), Some(auth.0.sub.clone())).await?;
    Ok(HttpResponse::Created().json(page))
}

#[utoipa::path(
    get,
    path = "/api/v1/landing-pages/{id}",
    params(("id" = Id, Path, description = "Page id")),
    responses(
        (status = 200, description = "OK", body = LandingPage),
        (status = 404, description = "Page not found")
    ),
    tag = "pages"
)]
pub async fn get_page(
    _auth: Auth,
    data: web::Data<AppState>,
    path: web::Path<Id>,
) -> Result<HttpResponse, ApiError> {
    let page = data.pages.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(page))
}

#[utoipa::path(
    get,
    path = "/api/v1/landing-pages/slug/{slug}",
    params(("slug" = String, Path, description = "Page slug")),
    responses(
        (status = 200, description = "OK", body = LandingPage),
        (status = 404, description = "Page not found")
    ),
    tag = "pages"
)]
pub async fn get_page_by_slug(
    _auth: Auth,
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let page = data.pages.load(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(page))
}

#[utoipa::path(
    put,
    path = "/api/v1/landing-pages/{id}",
    request_body = UpdateLandingPage,
    params(("id" = Id, Path, description = "Page id")),
    responses(
        (status = 200, description = "Page saved", body = LandingPage),
        (status = 400, description = "Empty title or slug"),
        (status = 403, description = "Not the page owner"),
        (status = 404, description = "Page not found"),
        (status = 409, description = "Slug belongs to another page; body carries suggestions")
    ),
    tag = "pages"
)]
pub async fn update_page(
    auth: Auth,
    data: web::Data<AppState>,
    path: web::Path<Id>,
    payload: web::Json<UpdateLandingPage>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let current = data.pages.get(id).await?;
    ensure_editor!(auth, current.created_by.as_deref());
    let page = data.pages.save(id, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(page))
}

#[utoipa::path(
    delete,
    path = "/api/v1/landing-pages/{id}",
    params(("id" = Id, Path, description = "Page id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found")
    ),
    tag = "pages"
)]
pub async fn delete_page(
    auth: Auth,
    data: web::Data<AppState>,
    path: web::Path<Id>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let current = data.pages.get(id).await?;
    ensure_editor!(auth, current.created_by.as_deref());
    data.pages.delete(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    post,
    path = "/api/v1/landing-pages/{id}/publish",
    params(("id" = Id, Path, description = "Page id")),
    responses(
        (status = 200, description = "OK", body = LandingPage),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found")
    ),
    tag = "pages"
)]
pub async fn publish_page(
    auth: Auth,
    data: web::Data<AppState>,
    path: web::Path<Id>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let current = data.pages.get(id).await?;
    ensure_editor!(auth, current.created_by.as_deref());
    let page = data.pages.publish(id).await?;
    Ok(HttpResponse::Ok().json(page))
}

#[utoipa::path(
    post,
    path = "/api/v1/landing-pages/{id}/clone",
    request_body = ClonePage,
    params(("id" = Id, Path, description = "Source page id")),
    responses(
        (status = 201, description = "Draft copy", body = LandingPage),
        (status = 404, description = "Not found"),
        (status = 409, description = "Conflict")
    ),
    tag = "pages"
)]
pub async fn clone_page(
    auth: Auth,
    data: web::Data<AppState>,
    path: web::Path<Id>,
    payload: web::Json<ClonePage>,
) -> Result<HttpResponse, ApiError> {
    let page = data
        .pages
        .clone_page(path.into_inner(), payload.into_inner(), Some(auth.0.sub.clone()))
        .await?;
    Ok(HttpResponse::Created().json(page))
}

#[utoipa::path(
    post,
    path = "/api/v1/landing-pages/{id}/content",
    request_body = ContentEdit,
    params(("id" = Id, Path, description = "Page id")),
    responses(
        (status = 200, description = "Page saved with the edit applied", body = EditedPage),
        (status = 400, description = "Unknown component, template or type"),
        (status = 403, description = "Not the page owner"),
        (status = 404, description = "Page not found")
    ),
    tag = "pages"
)]
pub async fn edit_content(
    auth: Auth,
    data: web::Data<AppState>,
    path: web::Path<Id>,
    payload: web::Json<ContentEdit>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let current = data.pages.get(id).await?;
    ensure_editor!(auth, current.created_by.as_deref());
    let edited = data.pages.edit_content(id, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(edited))
}

#[utoipa::path(
    get,
    path = "/api/v1/landing-pages/{id}/analytics",
    params(("id" = Id, Path, description = "Page id"), DateRange),
    responses(
        (status = 200, description = "OK", body = [AnalyticsRecord]),
        (status = 404, description = "Not found")
    ),
    tag = "analytics"
)]
pub async fn page_analytics(
    _auth: Auth,
    data: web::Data<AppState>,
    path: web::Path<Id>,
    range: web::Query<DateRange>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    data.pages.get(id).await?;
    let records = data.repo.page_analytics(id, &range).await?;
    Ok(HttpResponse::Ok().json(records))
}

// Public page delivery

#[utoipa::path(
    get,
    path = "/api/v1/public/pages/{slug}",
    params(("slug" = String, Path, description = "Page slug")),
    responses(
        (status = 200, description = "Published page, configs completed", body = LandingPage),
        (status = 404, description = "No published page for this slug")
    ),
    tag = "public"
)]
pub async fn public_page(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let page = data.pages.load_published(&path.into_inner()).await?;
    let max_age = data.pages.cache().ttl().as_secs();
    Ok(HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, format!("public, max-age={max_age}")))
        .json(page))
}

async fn track(
    data: &AppState,
    slug: &str,
    event: Option<TrackEvent>,
    kind: TrafficEvent,
) -> Result<HttpResponse, ApiError> {
    let page = data.pages.load_published(slug).await?;
    let event = event.unwrap_or_default();
    let source = event
        .source
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "direct".into());
    let device = event
        .device_type
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "desktop".into());
    let record = data
        .repo
        .record_event(page.id, Utc::now().date_naive(), &source, &device, kind)
        .await?;
    Ok(HttpResponse::Ok().json(record))
}

#[utoipa::path(
    post,
    path = "/api/v1/public/pages/{slug}/visit",
    request_body = TrackEvent,
    params(("slug" = String, Path, description = "Page slug")),
    responses(
        (status = 200, description = "OK", body = AnalyticsRecord),
        (status = 404, description = "Not found")
    ),
    tag = "public"
)]
pub async fn track_visit(
    data: web::Data<AppState>,
    path: web::Path<String>,
    payload: Option<web::Json<TrackEvent>>,
) -> Result<HttpResponse, ApiError> {
    let event = payload.map(|p| p.into_inner());
    track(&data, &path.into_inner(), event, TrafficEvent::Visit).await
}

#[utoipa::path(
    post,
    path = "/api/v1/public/pages/{slug}/conversion",
    request_body = TrackEvent,
    params(("slug" = String, Path, description = "Page slug")),
    responses(
        (status = 200, description = "OK", body = AnalyticsRecord),
        (status = 404, description = "Not found")
    ),
    tag = "public"
)]
pub async fn track_conversion(
    data: web::Data<AppState>,
    path: web::Path<String>,
    payload: Option<web::Json<TrackEvent>>,
) -> Result<HttpResponse, ApiError> {
    let event = payload.map(|p| p.into_inner());
    track(&data, &path.into_inner(), event, TrafficEvent::Conversion).await
}

#[utoipa::path(
    get,
    path = "/api/v1/public/site",
    responses(
        (status = 200, description = "Site settings and the active menu tree", body = PublicSite)
    ),
    tag = "public"
)]
pub async fn public_site(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let site = load_public_site(data.repo.as_ref()).await?;
    Ok(HttpResponse::Ok().json(site))
}

#[utoipa::path(
    post,
    path = "/api/v1/public/inquiries",
    request_body = NewContactInquiry,
    responses(
        (status = 201, description = "Inquiry stored", body = ContactInquiry),
        (status = 400, description = "Missing name, phone or a valid email")
    ),
    tag = "public"
)]
pub async fn submit_inquiry(
    data: web::Data<AppState>,
    payload: web::Json<NewContactInquiry>,
) -> Result<HttpResponse, ApiError> {
    let new = prepare_inquiry(payload.into_inner()).map_err(ApiError::BadRequest)?;
    let inquiry = data.repo.create_inquiry(new).await?;
    log::info!("inquiry {} received for {}", inquiry.id, inquiry.project_id);
    Ok(HttpResponse::Created().json(inquiry))
}

// Component templates

#[derive(Debug, Deserialize, IntoParams)]
pub struct TemplateQuery {
    #[serde(rename = "type")]
    #[param(value_type = Option<String>)]
    pub kind: Option<ComponentKind>,
}

#[utoipa::path(
    get,
    path = "/api/v1/components",
    params(TemplateQuery),
    responses(
        (status = 200, description = "System templates first", body = [ComponentTemplate])
    ),
    tag = "components"
)]
pub async fn list_templates(
    data: web::Data<AppState>,
    query: web::Query<TemplateQuery>,
) -> Result<HttpResponse, ApiError> {
    let templates = data.repo.list_templates(query.kind).await?;
    Ok(HttpResponse::Ok().json(templates))
}

#[utoipa::path(
    post,
    path = "/api/v1/components",
    request_body = NewComponentTemplate,
    responses(
        (status = 201, description = "Created", body = ComponentTemplate),
        (status = 400, description = "Unknown type or empty name")
    ),
    tag = "components"
)]
pub async fn create_template(
    auth: Auth,
    data: web::Data<AppState>,
    payload: web::Json<NewComponentTemplate>,
) -> Result<HttpResponse, ApiError> {
    let mut new = payload.into_inner();
    if !new.kind.is_known() {
        return Err(ApiError::BadRequest("unknown component type".into()));
    }
    if new.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name is required".into()));
    }
    new.config = normalize_config(new.kind, Some(&new.config));
    let template = data.repo.create_template(new, Some(auth.0.sub.clone()), false).await?;
    Ok(HttpResponse::Created().json(template))
}

#[utoipa::path(
    put,
    path = "/api/v1/components/{id}",
    request_body = UpdateComponentTemplate,
    params(("id" = Id, Path, description = "Template id")),
    responses(
        (status = 200, description = "OK", body = ComponentTemplate),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found")
    ),
    tag = "components"
)]
pub async fn update_template(
    auth: Auth,
    data: web::Data<AppState>,
    path: web::Path<Id>,
    payload: web::Json<UpdateComponentTemplate>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let current = data.repo.get_template(id).await?;
    if current.is_system {
        ensure_admin!(auth);
    } else {
        ensure_editor!(auth, current.created_by.as_deref());
    }
    let mut upd = payload.into_inner();
    upd.config = upd.config.map(|c| normalize_config(current.kind, Some(&c)));
    let template = data.repo.update_template(id, upd).await?;
    Ok(HttpResponse::Ok().json(template))
}

#[utoipa::path(
    delete,
    path = "/api/v1/components/{id}",
    params(("id" = Id, Path, description = "Template id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "System template or not the owner"),
        (status = 404, description = "Not found")
    ),
    tag = "components"
)]
pub async fn delete_template(
    auth: Auth,
    data: web::Data<AppState>,
    path: web::Path<Id>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let current = data.repo.get_template(id).await?;
    if !current.is_system {
        ensure_editor!(auth, current.created_by.as_deref());
    }
    data.repo.delete_template(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    get,
    path = "/api/v1/components/defaults/{type}",
    params(("type" = String, Path, description = "Component type tag, e.g. `unit-slider`")),
    responses(
        (status = 200, description = "Default config"),
        (status = 404, description = "Not found")
    ),
    tag = "components"
)]
pub async fn component_defaults(path: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let kind: ComponentKind = path.parse().map_err(|_| ApiError::NotFound)?;
    Ok(HttpResponse::Ok().json(default_config(kind)))
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct NormalizeRequest {
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    #[schema(value_type = Option<Object>)]
    #[serde(default)]
    pub config: Option<Value>,
}

#[utoipa::path(
    post,
    path = "/api/v1/components/normalize",
    request_body = NormalizeRequest,
    responses((status = 200, description = "Config completed with defaults")),
    tag = "components"
)]
pub async fn normalize_component(
    payload: web::Json<NormalizeRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = payload.into_inner();
    Ok(HttpResponse::Ok().json(normalize_config(req.kind, req.config.as_ref())))
}

// Contact inquiries

#[utoipa::path(
    get,
    path = "/api/v1/inquiries",
    params(InquiryFilter),
    responses(
        (status = 200, description = "Inquiries, newest first", body = InquiryList),
        (status = 400, description = "Unknown status filter")
    ),
    tag = "inquiries"
)]
pub async fn list_inquiries(
    _auth: Auth,
    data: web::Data<AppState>,
    query: web::Query<InquiryFilter>,
) -> Result<HttpResponse, ApiError> {
    let filter = query.into_inner();
    let status = filter.status().map_err(ApiError::BadRequest)?;
    let items = data
        .repo
        .list_inquiries(status, filter.limit(), filter.offset())
        .await?;
    let total = data.repo.count_inquiries(status).await?;
    Ok(HttpResponse::Ok().json(inquiry_page(items, &filter, total)))
}

#[utoipa::path(
    get,
    path = "/api/v1/inquiries/{id}",
    params(("id" = Id, Path, description = "Inquiry id")),
    responses(
        (status = 200, description = "OK", body = ContactInquiry),
        (status = 404, description = "Not found")
    ),
    tag = "inquiries"
)]
pub async fn get_inquiry(
    _auth: Auth,
    data: web::Data<AppState>,
    path: web::Path<Id>,
) -> Result<HttpResponse, ApiError> {
    let inquiry = data.repo.get_inquiry(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(inquiry))
}

#[utoipa::path(
    patch,
    path = "/api/v1/inquiries/{id}/status",
    request_body = InquiryStatusUpdate,
    params(("id" = Id, Path, description = "Inquiry id")),
    responses(
        (status = 200, description = "OK", body = ContactInquiry),
        (status = 404, description = "Not found")
    ),
    tag = "inquiries"
)]
pub async fn update_inquiry_status(
    _auth: Auth,
    data: web::Data<AppState>,
    path: web::Path<Id>,
    payload: web::Json<InquiryStatusUpdate>,
) -> Result<HttpResponse, ApiError> {
    let inquiry = data
        .repo
        .set_inquiry_status(path.into_inner(), payload.status)
        .await?;
    Ok(HttpResponse::Ok().json(inquiry))
}

#[utoipa::path(
    delete,
    path = "/api/v1/inquiries/{id}",
    params(("id" = Id, Path, description = "Inquiry id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Not found")
    ),
    tag = "inquiries"
)]
pub async fn delete_inquiry(
    auth: Auth,
    data: web::Data<AppState>,
    path: web::Path<Id>,
) -> Result<HttpResponse, ApiError> {
    ensure_admin!(auth);
    data.repo.delete_inquiry(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

// Website settings and menus

#[utoipa::path(
    get,
    path = "/api/v1/site/settings",
    responses(
        (status = 200, description = "Current settings, or defaults", body = WebsiteSettings)
    ),
    tag = "site"
)]
pub async fn get_settings(
    _auth: Auth,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let settings = data.repo.get_settings().await?;
    Ok(HttpResponse::Ok().json(settings))
}

#[utoipa::path(
    put,
    path = "/api/v1/site/settings",
    request_body = WebsiteSettings,
    responses(
        (status = 200, description = "Saved", body = WebsiteSettings),
        (status = 400, description = "Empty site title or bad email"),
        (status = 403, description = "Admins only")
    ),
    tag = "site"
)]
pub async fn save_settings(
    auth: Auth,
    data: web::Data<AppState>,
    payload: web::Json<WebsiteSettings>,
) -> Result<HttpResponse, ApiError> {
    ensure_admin!(auth);
    let settings = payload.into_inner();
    validate_settings(&settings).map_err(ApiError::BadRequest)?;
    let saved = data.repo.save_settings(settings).await?;
    log::info!("website settings updated by {}", auth.subject());
    Ok(HttpResponse::Ok().json(saved))
}

#[utoipa::path(
    get,
    path = "/api/v1/site/menus",
    responses((status = 200, description = "Every menu, nested", body = [MenuTreeItem])),
    tag = "site"
)]
pub async fn menu_tree(_auth: Auth, data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let menus = data.repo.list_menus(false).await?;
    Ok(HttpResponse::Ok().json(build_menu_tree(menus)))
}

#[utoipa::path(
    get,
    path = "/api/v1/site/menus/flat",
    responses((status = 200, description = "Every menu by order", body = [WebsiteMenu])),
    tag = "site"
)]
pub async fn list_menus(_auth: Auth, data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let menus = data.repo.list_menus(false).await?;
    Ok(HttpResponse::Ok().json(menus))
}

#[utoipa::path(
    get,
    path = "/api/v1/site/menus/{id}",
    params(("id" = Id, Path, description = "Menu id")),
    responses(
        (status = 200, description = "OK", body = WebsiteMenu),
        (status = 404, description = "Not found")
    ),
    tag = "site"
)]
pub async fn get_menu(
    _auth: Auth,
    data: web::Data<AppState>,
    path: web::Path<Id>,
) -> Result<HttpResponse, ApiError> {
    let menu = data.repo.get_menu(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(menu))
}

#[utoipa::path(
    post,
    path = "/api/v1/site/menus",
    request_body = WebsiteMenuInput,
    responses(
        (status = 201, description = "Created", body = WebsiteMenu),
        (status = 400, description = "Empty title or unknown parent"),
        (status = 403, description = "Admins only")
    ),
    tag = "site"
)]
pub async fn create_menu(
    auth: Auth,
    data: web::Data<AppState>,
    payload: web::Json<WebsiteMenuInput>,
) -> Result<HttpResponse, ApiError> {
    ensure_admin!(auth);
    let input = payload.into_inner();
    validate_menu(&input).map_err(ApiError::BadRequest)?;
    let menus = data.repo.list_menus(false).await?;
    check_parent(&menus, None, input.parent_id).map_err(ApiError::BadRequest)?;
    let menu = data.repo.create_menu(input).await?;
    Ok(HttpResponse::Created().json(menu))
}

#[utoipa::path(
    put,
    path = "/api/v1/site/menus/{id}",
    request_body = WebsiteMenuInput,
    params(("id" = Id, Path, description = "Menu id")),
    responses(
        (status = 200, description = "OK", body = WebsiteMenu),
        (status = 400, description = "Empty title, unknown parent or a parent cycle"),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Not found")
    ),
    tag = "site"
)]
pub async fn update_menu(
    auth: Auth,
    data: web::Data<AppState>,
    path: web::Path<Id>,
    payload: web::Json<WebsiteMenuInput>,
) -> Result<HttpResponse, ApiError> {
    ensure_admin!(auth);
    let id = path.into_inner();
    let input = payload.into_inner();
    validate_menu(&input).map_err(ApiError::BadRequest)?;
    data.repo.get_menu(id).await?;
    let menus = data.repo.list_menus(false).await?;
    check_parent(&menus, Some(id), input.parent_id).map_err(ApiError::BadRequest)?;
    let menu = data.repo.update_menu(id, input).await?;
    Ok(HttpResponse::Ok().json(menu))
}

#[utoipa::path(
    delete,
    path = "/api/v1/site/menus/{id}",
    params(("id" = Id, Path, description = "Menu id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Menu still has children")
    ),
    tag = "site"
)]
pub async fn delete_menu(
    auth: Auth,
    data: web::Data<AppState>,
    path: web::Path<Id>,
) -> Result<HttpResponse, ApiError> {
    ensure_admin!(auth);
    data.repo.delete_menu(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    post,
    path = "/api/v1/site/menus/reorder",
    request_body = ReorderMenus,
    responses(
        (status = 204, description = "Orders rewritten to list positions"),
        (status = 403, description = "Admins only")
    ),
    tag = "site"
)]
pub async fn reorder_menus(
    auth: Auth,
    data: web::Data<AppState>,
    payload: web::Json<ReorderMenus>,
) -> Result<HttpResponse, ApiError> {
    ensure_admin!(auth);
    data.repo.reorder_menus(&payload.menu_ids).await?;
    Ok(HttpResponse::NoContent().finish())
}

// Kanban

#[utoipa::path(
    get,
    path = "/api/v1/kanban/boards",
    responses((status = 200, description = "Own and shared boards", body = [KanbanBoard])),
    tag = "kanban"
)]
pub async fn list_boards(auth: Auth, data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let boards = data.repo.list_boards(auth.subject()).await?;
    Ok(HttpResponse::Ok().json(boards))
}

#[utoipa::path(
    post,
    path = "/api/v1/kanban/boards",
    request_body = NewKanbanBoard,
    responses(
        (status = 201, description = "Created", body = KanbanBoard),
        (status = 400, description = "Invalid input")
    ),
    tag = "kanban"
)]
pub async fn create_board(
    auth: Auth,
    data: web::Data<AppState>,
    payload: web::Json<NewKanbanBoard>,
) -> Result<HttpResponse, ApiError> {
    require_title(&payload.title).map_err(ApiError::BadRequest)?;
    let board = data.repo.create_board(payload.into_inner(), auth.subject()).await?;
    Ok(HttpResponse::Created().json(board))
}

#[utoipa::path(
    get,
    path = "/api/v1/kanban/boards/{id}",
    params(("id" = Id, Path, description = "Board id")),
    responses(
        (status = 200, description = "Board with columns and tasks", body = BoardView),
        (status = 404, description = "Not found")
    ),
    tag = "kanban"
)]
pub async fn get_board(
    _auth: Auth,
    data: web::Data<AppState>,
    path: web::Path<Id>,
) -> Result<HttpResponse, ApiError> {
    let view = load_board_view(data.repo.as_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[utoipa::path(
    post,
    path = "/api/v1/kanban/columns",
    request_body = NewKanbanColumn,
    responses(
        (status = 201, description = "Created", body = KanbanColumn),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Not found")
    ),
    tag = "kanban"
)]
pub async fn create_column(
    _auth: Auth,
    data: web::Data<AppState>,
    payload: web::Json<NewKanbanColumn>,
) -> Result<HttpResponse, ApiError> {
    require_title(&payload.title).map_err(ApiError::BadRequest)?;
    let column = data.repo.create_column(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(column))
}

#[utoipa::path(
    patch,
    path = "/api/v1/kanban/columns/{id}",
    request_body = UpdateKanbanColumn,
    params(("id" = Id, Path, description = "Column id")),
    responses(
        (status = 200, description = "OK", body = KanbanColumn),
        (status = 404, description = "Not found")
    ),
    tag = "kanban"
)]
pub async fn update_column(
    _auth: Auth,
    data: web::Data<AppState>,
    path: web::Path<Id>,
    payload: web::Json<UpdateKanbanColumn>,
) -> Result<HttpResponse, ApiError> {
    if let Some(title) = &payload.title {
        require_title(title).map_err(ApiError::BadRequest)?;
    }
    let column = data.repo.update_column(path.into_inner(), payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(column))
}

#[utoipa::path(
    delete,
    path = "/api/v1/kanban/columns/{id}",
    params(("id" = Id, Path, description = "Column id")),
    responses(
        (status = 204, description = "Column and its tasks deleted"),
        (status = 404, description = "Not found")
    ),
    tag = "kanban"
)]
pub async fn delete_column(
    _auth: Auth,
    data: web::Data<AppState>,
    path: web::Path<Id>,
) -> Result<HttpResponse, ApiError> {
    data.repo.delete_column(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    post,
    path = "/api/v1/kanban/tasks",
    request_body = NewKanbanTask,
    responses(
        (status = 201, description = "Created", body = KanbanTask),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Not found")
    ),
    tag = "kanban"
)]
pub async fn create_task(
    _auth: Auth,
    data: web::Data<AppState>,
    payload: web::Json<NewKanbanTask>,
) -> Result<HttpResponse, ApiError> {
    require_title(&payload.title).map_err(ApiError::BadRequest)?;
    let task = data.repo.create_task(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(task))
}

#[utoipa::path(
    post,
    path = "/api/v1/kanban/tasks/{id}/move",
    request_body = MoveTask,
    params(("id" = Id, Path, description = "Task id")),
    responses(
        (status = 200, description = "OK", body = KanbanTask),
        (status = 404, description = "Not found")
    ),
    tag = "kanban"
)]
pub async fn move_task(
    _auth: Auth,
    data: web::Data<AppState>,
    path: web::Path<Id>,
    payload: web::Json<MoveTask>,
) -> Result<HttpResponse, ApiError> {
    let MoveTask { column_id, order } = payload.into_inner();
    let task = data.repo.move_task(path.into_inner(), column_id, order).await?;
    Ok(HttpResponse::Ok().json(task))
}

#[utoipa::path(
    delete,
    path = "/api/v1/kanban/tasks/{id}",
    params(("id" = Id, Path, description = "Task id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found")
    ),
    tag = "kanban"
)]
pub async fn delete_task(
    _auth: Auth,
    data: web::Data<AppState>,
    path: web::Path<Id>,
) -> Result<HttpResponse, ApiError> {
    data.repo.delete_task(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

// Uploads

fn upload_response(result: UploadResult) -> HttpResponse {
    if result.success {
        HttpResponse::Created().json(result)
    } else {
        HttpResponse::BadRequest().json(result)
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/uploads",
    request_body(
        content = InlineUpload,
        description = "JSON `{data, folder}` or multipart `file` + `folder`"
    ),
    responses(
        (status = 201, description = "Stored", body = UploadResult),
        (status = 400, description = "Rejected; `error` says why", body = UploadResult)
    ),
    tag = "uploads"
)]
pub async fn upload(
    _auth: Auth,
    req: HttpRequest,
    data: web::Data<AppState>,
    mut payload: web::Payload,
) -> Result<HttpResponse, ApiError> {
    let is_multipart = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));
    if is_multipart {
        return upload_multipart(&data, Multipart::new(req.headers(), payload)).await;
    }

    // Base64 inflates by 4/3
    let limit = MAX_UPLOAD_BYTES * 4 / 3 + 1024;
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| {
            log::error!("upload body read error: {e}");
            ApiError::BadRequest("unreadable body".into())
        })?;
        if body.len() + chunk.len() > limit {
            return Ok(upload_response(UploadResult::failed("file too large")));
        }
        body.extend_from_slice(&chunk);
    }
    let inline: InlineUpload = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("invalid upload body: {e}")))?;
    let result =
        upload_inline(data.image_store.as_ref(), &inline.data, inline.folder.as_deref()).await;
    Ok(upload_response(result))
}

async fn upload_multipart(
    data: &AppState,
    mut payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let mut bytes: Option<Vec<u8>> = None;
    let mut folder: Option<String> = None;
    while let Some(mut field) = payload.try_next().await.map_err(|e| {
        log::error!("multipart error: {e}");
        ApiError::BadRequest("malformed multipart body".into())
    })? {
        let name = field.content_disposition().get_name().map(str::to_owned);
        let mut buf = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(|e| {
            log::error!("stream read error: {e}");
            ApiError::BadRequest("malformed multipart body".into())
        })? {
            if buf.len() + chunk.len() > MAX_UPLOAD_BYTES {
                return Ok(upload_response(UploadResult::failed("file too large")));
            }
            buf.extend_from_slice(&chunk);
        }
        match name.as_deref() {
            Some("file") => bytes = Some(buf),
            Some("folder") => folder = String::from_utf8(buf).ok(),
            _ => {}
        }
    }
    let Some(bytes) = bytes else {
        return Ok(upload_response(UploadResult::failed("missing file field")));
    };
    let result = store_upload(data.image_store.as_ref(), &bytes, folder.as_deref()).await;
    Ok(upload_response(result))
}

// Admin

#[derive(Debug, Serialize, ToSchema)]
pub struct CacheCleared {
    pub cleared: usize,
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/cache/clear",
    responses(
        (status = 200, description = "OK", body = CacheCleared),
        (status = 403, description = "Admins only")
    ),
    tag = "admin"
)]
pub async fn clear_cache(auth: Auth, data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    ensure_admin!(auth);
    let cleared = data.pages.cache().clear();
    log::info!("page cache cleared by {} ({cleared} entries)", auth.subject());
    Ok(HttpResponse::Ok().json(CacheCleared { cleared }))
}
