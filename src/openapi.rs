use crate::components::ComponentKind;
use crate::models::{
    AnalyticsRecord, BoardView, ClonePage, ColumnView, ComponentTemplate, ContactInquiry, ContentEdit,
    EditedPage, InlineUpload, InquiryList, InquiryStatus, InquiryStatusUpdate, KanbanBoard, KanbanColumn,
    KanbanTask, LandingPage, LandingPageComponent, MenuTreeItem, MoveTask, NewComponentTemplate,
    NewContactInquiry, NewKanbanBoard, NewKanbanColumn, NewKanbanTask, NewLandingPage, PageList, PageStatus,
    Priority, PublicSite, ReorderMenus, TrackEvent, UpdateComponentTemplate, UpdateKanbanColumn,
    UpdateLandingPage, UploadResult, WebsiteMenu, WebsiteMenuInput, WebsiteSettings,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::list_pages,
        crate::routes::create_page,
        crate::routes::get_page,
        crate::routes::get_page_by_slug,
        crate::routes::update_page,
        crate::routes::delete_page,
        crate::routes::publish_page,
        crate::routes::clone_page,
        crate::routes::edit_content,
        crate::routes::page_analytics,
        crate::routes::public_page,
        crate::routes::track_visit,
        crate::routes::track_conversion,
        crate::routes::public_site,
        crate::routes::submit_inquiry,
        crate::routes::list_templates,
        crate::routes::create_template,
        crate::routes::update_template,
        crate::routes::delete_template,
        crate::routes::component_defaults,
        crate::routes::normalize_component,
        crate::routes::list_inquiries,
        crate::routes::get_inquiry,
        crate::routes::update_inquiry_status,
        crate::routes::delete_inquiry,
        crate::routes::get_settings,
        crate::routes::save_settings,
        crate::routes::menu_tree,
        crate::routes::list_menus,
        crate::routes::get_menu,
        crate::routes::create_menu,
        crate::routes::update_menu,
        crate::routes::delete_menu,
        crate::routes::reorder_menus,
        crate::routes::list_boards,
        crate::routes::create_board,
        crate::routes::get_board,
        crate::routes::create_column,
        crate::routes::update_column,
        crate::routes::delete_column,
        crate::routes::create_task,
        crate::routes::move_task,
        crate::routes::delete_task,
        crate::routes::upload,
        crate::routes::clear_cache,
    ),
    components(schemas(
        ComponentKind, PageStatus, LandingPage, LandingPageComponent, NewLandingPage, UpdateLandingPage,
        PageList, ClonePage, ContentEdit, EditedPage, ComponentTemplate, NewComponentTemplate, UpdateComponentTemplate,
        AnalyticsRecord, TrackEvent, KanbanBoard, NewKanbanBoard, KanbanColumn, NewKanbanColumn,
        UpdateKanbanColumn, Priority, KanbanTask, NewKanbanTask, MoveTask, ColumnView, BoardView,
        UploadResult, InlineUpload, InquiryStatus, ContactInquiry, NewContactInquiry, InquiryList,
        InquiryStatusUpdate, WebsiteSettings, WebsiteMenu, WebsiteMenuInput, MenuTreeItem, ReorderMenus,
        PublicSite, crate::routes::NormalizeRequest, crate::routes::CacheCleared
    )),
    tags(
        (name = "pages", description = "Landing page authoring"),
        (name = "public", description = "Published page delivery and tracking"),
        (name = "analytics", description = "Per-page traffic counters"),
        (name = "components", description = "Component templates and config defaults"),
        (name = "inquiries", description = "Contact inquiries from the public site"),
        (name = "site", description = "Website settings and navigation menus"),
        (name = "kanban", description = "Task board"),
        (name = "uploads", description = "Image uploads"),
        (name = "admin", description = "Operator actions"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_public_page_route() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/public/pages/{slug}"));
        assert!(doc.paths.paths.contains_key("/api/v1/landing-pages/{id}"));
        assert!(doc.paths.paths.contains_key("/api/v1/landing-pages/{id}/content"));
        assert!(doc.paths.paths.contains_key("/api/v1/public/inquiries"));
        assert!(doc.paths.paths.contains_key("/api/v1/site/menus/{id}"));
    }
}
