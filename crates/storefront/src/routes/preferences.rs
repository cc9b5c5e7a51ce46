//! Visitor preference route handlers.

use axum::{Form, response::Redirect};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::models::session::{self as visitor, Theme};

/// Theme toggle form.
#[derive(Debug, Default, Deserialize)]
pub struct ThemeForm {
    /// Explicit theme; toggles the current one when absent or unknown.
    pub theme: Option<String>,
    /// Page to go back to.
    pub return_to: Option<String>,
}

/// Only same-site paths are followed; anything else goes home.
fn safe_return_path(return_to: Option<&str>) -> &str {
    match return_to {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}

/// Switch between the light and dark themes.
#[instrument(skip(session, form))]
pub async fn toggle_theme(session: Session, Form(form): Form<ThemeForm>) -> Result<Redirect> {
    let theme = match form.theme.as_deref().and_then(Theme::parse) {
        Some(theme) => theme,
        None => visitor::theme(&session).await.toggled(),
    };
    visitor::set_theme(&session, theme).await?;
    tracing::debug!(theme = %theme, "Theme changed");

    Ok(Redirect::to(safe_return_path(form.return_to.as_deref())))
}
