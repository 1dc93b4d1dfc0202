//! Public website chrome: navigation menus, site settings and contact inquiries.

use std::collections::{HashMap, HashSet};

use crate::models::*;
use crate::repo::{RepoResult, SiteRepo};

/// Bucket for inquiries that do not concern a specific project.
pub const GENERAL_INQUIRIES: &str = "general_inquiries";
const CONSULTATION: &str = "sales-consultation";

/// Nests `menus` under their parents. Entries whose parent is missing from
/// `menus` become roots; every level is sorted by `order`.
pub fn build_menu_tree(menus: Vec<WebsiteMenu>) -> Vec<MenuTreeItem> {
    let ids: HashSet<Id> = menus.iter().map(|m| m.id).collect();
    let mut roots = Vec::new();
    let mut by_parent: HashMap<Id, Vec<WebsiteMenu>> = HashMap::new();
    for menu in menus {
        match menu.parent_id.filter(|p| ids.contains(p)) {
            Some(parent) => by_parent.entry(parent).or_default().push(menu),
            None => roots.push(menu),
        }
    }
    attach(roots, &mut by_parent)
}

fn attach(
    mut level: Vec<WebsiteMenu>,
    by_parent: &mut HashMap<Id, Vec<WebsiteMenu>>,
) -> Vec<MenuTreeItem> {
    level.sort_by_key(|m| m.order);
    level
        .into_iter()
        .map(|menu| {
            let children = by_parent.remove(&menu.id).unwrap_or_default();
            MenuTreeItem { children: attach(children, by_parent), menu }
        })
        .collect()
}

/// Checks that `menu` (None while creating) may hang under `parent`.
pub fn check_parent(
    menus: &[WebsiteMenu],
    menu: Option<Id>,
    parent: Option<Id>,
) -> Result<(), String> {
    let Some(parent) = parent else { return Ok(()) };
    if menu == Some(parent) {
        return Err("menu cannot be its own parent".into());
    }
    let parents: HashMap<Id, Option<Id>> = menus.iter().map(|m| (m.id, m.parent_id)).collect();
    if !parents.contains_key(&parent) {
        return Err("parent menu does not exist".into());
    }
    if let Some(menu) = menu {
        let mut seen = HashSet::from([menu]);
        let mut current = Some(parent);
        while let Some(id) = current {
            if !seen.insert(id) {
                return Err("this would create a circular reference".into());
            }
            current = parents.get(&id).copied().flatten();
        }
    }
    Ok(())
}

pub fn validate_menu(input: &WebsiteMenuInput) -> Result<(), String> {
    if input.title.trim().is_empty() {
        return Err("title is required".into());
    }
    Ok(())
}

fn looks_like_email(s: &str) -> bool {
    s.split_once('@').is_some_and(|(user, host)| !user.is_empty() && host.contains('.'))
}

pub fn validate_settings(settings: &WebsiteSettings) -> Result<(), String> {
    if settings.site_title.trim().is_empty() {
        return Err("site title is required".into());
    }
    if settings.email.as_deref().is_some_and(|e| !e.is_empty() && !looks_like_email(e)) {
        return Err("invalid email address".into());
    }
    Ok(())
}

/// Trims and checks a submitted inquiry and routes it to a project bucket.
pub fn prepare_inquiry(mut new: NewContactInquiry) -> Result<NewContactInquiry, String> {
    new.name = new.name.trim().to_string();
    new.email = new.email.trim().to_string();
    new.phone = new.phone.trim().to_string();
    if new.name.is_empty() {
        return Err("name is required".into());
    }
    if !looks_like_email(&new.email) {
        return Err("a valid email is required".into());
    }
    if new.phone.is_empty() {
        return Err("phone is required".into());
    }
    let project = new.project_id.trim();
    new.project_id = if project.is_empty() || project == CONSULTATION {
        GENERAL_INQUIRIES.to_string()
    } else {
        project.to_string()
    };
    if new.inquiry_type.trim().is_empty() {
        new.inquiry_type = "general".into();
    }
    new.message = new.message.filter(|m| !m.trim().is_empty());
    new.unit_slug = new.unit_slug.filter(|s| !s.trim().is_empty());
    Ok(new)
}

pub fn inquiry_page(
    items: Vec<ContactInquiry>,
    filter: &InquiryFilter,
    total: usize,
) -> InquiryList {
    let limit = filter.limit();
    InquiryList {
        items,
        page: filter.page(),
        limit,
        total,
        total_pages: total.div_ceil(limit as usize),
    }
}

/// Settings plus the tree of active menus.
pub async fn load_public_site<R: SiteRepo + ?Sized>(repo: &R) -> RepoResult<PublicSite> {
    let settings = repo.get_settings().await?;
    let menus = build_menu_tree(repo.list_menus(true).await?);
    Ok(PublicSite { settings, menus })
}
