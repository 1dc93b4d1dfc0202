//! Save and load of page documents on top of the store.
//!
//! Every write goes through the same checks: slug ownership, non-empty
//! title and slug, inline image stripping and a strict encode/decode check of
//! `content` and `settings`. Writes drop the affected slugs from the
//! [`PageCache`].

use std::sync::Arc;

use chrono::{Datelike, Utc};

use crate::builder::{strip_oversized_images, PageEditor};
use crate::cache::PageCache;
use crate::components::normalize_config;
use crate::document;
use crate::models::*;
use crate::repo::{LandingPageRepo, Repo, RepoError, TemplateRepo};

#[derive(thiserror::Error, Debug)]
pub enum GatewayError {
    #[error("page not found")]
    NotFound,
    #[error("slug '{slug}' is already in use")]
    DuplicateSlug { slug: String, suggestions: Vec<String> },
    #[error("{0}")]
    Validation(String),
    #[error("page could not be serialized: {0}")]
    Serialization(String),
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for GatewayError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound => GatewayError::NotFound,
            other => GatewayError::Repo(other),
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Alternatives offered when `slug` is taken.
pub fn slug_suggestions(slug: &str, template_type: &str) -> Vec<String> {
    vec![
        format!("{slug}-updated"),
        format!("{slug}-{}", Utc::now().year()),
        format!("{slug}-v2"),
        format!("{slug}-{template_type}"),
    ]
}

fn duplicate(slug: &str, template_type: &str) -> GatewayError {
    GatewayError::DuplicateSlug {
        slug: slug.to_string(),
        suggestions: slug_suggestions(slug, template_type),
    }
}

/// Copy of `page` with every component config completed with its defaults.
pub fn normalized(mut page: LandingPage) -> LandingPage {
    for component in &mut page.content {
        component.config = normalize_config(component.kind, Some(&component.config));
    }
    page
}

fn validate(title: &str, slug: &str) -> GatewayResult<()> {
    if title.trim().is_empty() {
        return Err(GatewayError::Validation("title must not be empty".into()));
    }
    if slug.trim().is_empty() {
        return Err(GatewayError::Validation("slug must not be empty".into()));
    }
    Ok(())
}

fn prepare_content(
    content: &[LandingPageComponent],
    settings: &serde_json::Value,
) -> GatewayResult<Vec<LandingPageComponent>> {
    let cleaned = strip_oversized_images(content);
    document::check_round_trip(&cleaned, settings).map_err(|e| GatewayError::Serialization(e.0))?;
    Ok(cleaned)
}

#[derive(Clone)]
pub struct PageGateway {
    repo: Arc<dyn Repo>,
    cache: PageCache,
}

impl PageGateway {
    pub fn new(repo: Arc<dyn Repo>, cache: PageCache) -> Self {
        Self { repo, cache }
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    pub async fn get(&self, id: Id) -> GatewayResult<LandingPage> {
        Ok(self.repo.get_page(id).await?)
    }

    pub async fn load(&self, slug: &str) -> GatewayResult<LandingPage> {
        Ok(self.repo.get_page_by_slug(slug).await?)
    }

    pub async fn create(&self, mut new: NewLandingPage, created_by: Option<String>) -> GatewayResult<LandingPage> {
        validate(&new.title, &new.slug)?;
        new.content = prepare_content(&new.content, &new.settings)?;
        let (slug, template_type) = (new.slug.clone(), new.template_type.clone());
        match self.repo.create_page(new, created_by).await {
            Ok(page) => {
                log::info!("created page {} ({})", page.id, page.slug);
                Ok(page)
            }
            Err(RepoError::Conflict) => Err(duplicate(&slug, &template_type)),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn save(&self, id: Id, patch: UpdateLandingPage) -> GatewayResult<LandingPage> {
        let current = self.repo.get_page(id).await?;

        if let Some(slug) = patch.slug.as_deref().filter(|s| *s != current.slug) {
            match self.repo.get_page_by_slug(slug).await {
                Ok(other) if other.id != id => {
                    let template_type = patch.template_type.as_deref().unwrap_or(&current.template_type);
                    return Err(duplicate(slug, template_type));
                }
                Ok(_) | Err(RepoError::NotFound) => {}
                Err(e) => return Err(e.into()),
            }
        }

        let mut page = current.clone();
        patch.apply_to(&mut page);
        validate(&page.title, &page.slug)?;
        page.content = prepare_content(&page.content, &page.settings)?;
        if page.is_published() && page.published_at.is_none() {
            page.published_at = Some(Utc::now());
        }

        let (slug, template_type) = (page.slug.clone(), page.template_type.clone());
        let saved = match self.repo.update_page(page).await {
            Ok(saved) => saved,
            Err(RepoError::Conflict) => return Err(duplicate(&slug, &template_type)),
            Err(e) => return Err(e.into()),
        };
        self.cache.invalidate(&current.slug);
        self.cache.invalidate(&saved.slug);
        Ok(saved)
    }

    pub async fn publish(&self, id: Id) -> GatewayResult<LandingPage> {
        let patch = UpdateLandingPage { status: Some(PageStatus::Published), ..Default::default() };
        self.save(id, patch).await
    }

    /// Copies page `id` under a new title and slug as an unpublished draft.
    pub async fn clone_page(&self, id: Id, target: ClonePage, created_by: Option<String>) -> GatewayResult<LandingPage> {
        let source = self.repo.get_page(id).await?;
        let new = NewLandingPage {
            title: target.title,
            slug: target.slug,
            description: source.description,
            content: source.content,
            meta_title: source.meta_title,
            meta_description: source.meta_description,
            og_image: source.og_image,
            status: PageStatus::Draft,
            template_type: source.template_type,
            target_audience: source.target_audience,
            campaign_source: source.campaign_source,
            tracking_code: source.tracking_code,
            settings: source.settings,
            expires_at: source.expires_at,
        };
        self.create(new, created_by).await
    }

    /// Applies one editor step to the components of page `id`, then saves
    /// through [`save`](Self::save).
    pub async fn edit_content(&self, id: Id, edit: ContentEdit) -> GatewayResult<EditedPage> {
        let current = self.repo.get_page(id).await?;
        let mut editor = PageEditor::new(current.content);
        let missing =
            |component: &str| GatewayError::Validation(format!("no component '{component}' on this page"));
        let component_id = match edit {
            ContentEdit::AddTemplate { template_id } => {
                let template = match self.repo.get_template(template_id).await {
                    Ok(template) => template,
                    Err(RepoError::NotFound) => {
                        let msg = format!("template {template_id} does not exist");
                        return Err(GatewayError::Validation(msg));
                    }
                    Err(e) => return Err(e.into()),
                };
                Some(editor.add_component(&template))
            }
            ContentEdit::Add { kind, config } => {
                if !kind.is_known() {
                    return Err(GatewayError::Validation("unknown component type".into()));
                }
                Some(editor.add_config(kind, normalize_config(kind, config.as_ref())))
            }
            ContentEdit::Update { component_id, config } => {
                if !editor.update_component(&component_id, &config) {
                    return Err(missing(&component_id));
                }
                None
            }
            ContentEdit::Remove { component_id } => {
                if !editor.remove_component(&component_id) {
                    return Err(missing(&component_id));
                }
                None
            }
            ContentEdit::Reorder { from_id, to_id } => {
                if let Some(unknown) = [&from_id, &to_id].into_iter().find(|c| editor.get(c).is_none()) {
                    return Err(missing(unknown));
                }
                editor.reorder(&from_id, &to_id);
                None
            }
        };
        let patch = UpdateLandingPage { content: Some(editor.into_components()), ..Default::default() };
        let page = self.save(id, patch).await?;
        Ok(EditedPage { page, component_id })
    }

    pub async fn delete(&self, id: Id) -> GatewayResult<()> {
        let page = self.repo.get_page(id).await?;
        self.repo.delete_page(id).await?;
        self.cache.invalidate(&page.slug);
        Ok(())
    }

    /// Published page for `slug` with normalized component configs, served from cache when fresh.
    pub async fn load_published(&self, slug: &str) -> GatewayResult<LandingPage> {
        if let Some(page) = self.cache.get(slug) {
            return Ok(page);
        }
        let seen = self.cache.generation();
        let page = self.repo.get_page_by_slug(slug).await?;
        if !page.is_published() {
            return Err(GatewayError::NotFound);
        }
        let page = normalized(page);
        if !self.cache.insert_if_current(page.clone(), seen) {
            log::debug!("page '{slug}' changed while loading; not cached");
        }
        Ok(page)
    }

    /// Warms the cache; returns how many slugs were loaded.
    pub async fn preload(&self, slugs: &[String]) -> usize {
        let mut loaded = 0;
        for slug in slugs {
            match self.load_published(slug).await {
                Ok(_) => loaded += 1,
                Err(e) => log::warn!("preload of '{slug}' skipped: {e}"),
            }
        }
        loaded
    }
}
