//! Home page route handler.
//!
//! Returning visitors go straight back to the store they last browsed;
//! everyone else gets a store finder.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::Query,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::models::session as visitor;
use crate::routes::PageContext;

/// Store finder query.
#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    /// Slug typed into the store finder.
    #[serde(default)]
    pub store: Option<String>,
}

/// Store finder template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page: PageContext,
    pub error: String,
}

/// Path of a store's catalog page.
#[must_use]
pub fn store_path(slug: &str) -> String {
    format!("/shop/{}", urlencoding::encode(slug))
}

/// Normalise a slug typed by a visitor.
fn clean_slug(raw: &str) -> Option<String> {
    let slug = raw.trim().trim_matches('/').to_ascii_lowercase();
    let valid = !slug.is_empty()
        && slug.len() <= 64
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'));
    valid.then_some(slug)
}

/// Display the home page.
#[instrument(skip(session, page))]
pub async fn home(session: Session, page: PageContext, Query(query): Query<HomeQuery>) -> Response {
    if let Some(raw) = query.store.as_deref() {
        return match clean_slug(raw) {
            Some(slug) => Redirect::to(&store_path(&slug)).into_response(),
            None => HomeTemplate {
                page,
                error: "Store links only contain letters, numbers and dashes".to_string(),
            }
            .into_response(),
        };
    }

    if let Some(slug) = visitor::last_visited_store(&session).await {
        tracing::debug!(slug = %slug, "Returning visitor, redirecting to last store");
        return Redirect::to(&store_path(&slug)).into_response();
    }

    HomeTemplate {
        page,
        error: String::new(),
    }
    .into_response()
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the commerce API.
pub async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_slug() {
        assert_eq!(clean_slug(" Ama-Data/ ").as_deref(), Some("ama-data"));
        assert_eq!(clean_slug("kofi_bundles").as_deref(), Some("kofi_bundles"));
        assert!(clean_slug("").is_none());
        assert!(clean_slug("../admin").is_none());
        assert!(clean_slug("a b").is_none());
    }

    #[test]
    fn test_store_path_encodes() {
        assert_eq!(store_path("ama-data"), "/shop/ama-data");
        assert_eq!(store_path("a b"), "/shop/a%20b");
    }
}
