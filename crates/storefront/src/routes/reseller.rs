//! Reseller (sub-agent) join route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use databundle_core::JoinInfo;
use databundle_core::signup::{FieldErrors, SignupForm};
use tower_sessions::Session;
use tracing::instrument;

use crate::commerce::CommerceError;
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::models::session as visitor;
use crate::routes::PageContext;
use crate::routes::store::StoreView;
use crate::state::AppState;

/// Reseller programme display data.
#[derive(Debug, Clone, Default)]
pub struct JoinView {
    pub store_name: String,
    pub description: String,
    pub benefits: Vec<String>,
    pub registration_fee: String,
}

impl JoinView {
    fn new(info: &JoinInfo, store: &StoreView) -> Self {
        Self {
            store_name: if info.store_name.is_empty() {
                store.name.clone()
            } else {
                info.store_name.clone()
            },
            description: info.description.clone().unwrap_or_default(),
            benefits: info.benefits.clone(),
            registration_fee: info
                .registration_fee
                .filter(|fee| *fee > 0.0)
                .map(|fee| format!("GH₵{fee:.2}"))
                .unwrap_or_default(),
        }
    }
}

/// Values echoed back into the form. Passwords are never echoed.
#[derive(Debug, Clone, Default)]
pub struct FormValues {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub business_name: String,
}

impl From<&SignupForm> for FormValues {
    fn from(form: &SignupForm) -> Self {
        Self {
            full_name: form.full_name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form.phone.trim().to_string(),
            business_name: form.business_name.trim().to_string(),
        }
    }
}

/// Per-field error messages for the template.
#[derive(Debug, Clone, Default)]
pub struct ErrorView {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

impl From<FieldErrors> for ErrorView {
    fn from(errors: FieldErrors) -> Self {
        Self {
            full_name: errors.full_name.unwrap_or_default(),
            email: errors.email.unwrap_or_default(),
            phone: errors.phone.unwrap_or_default(),
            password: errors.password.unwrap_or_default(),
            confirm_password: errors.confirm_password.unwrap_or_default(),
        }
    }
}

/// Join page template.
#[derive(Template, WebTemplate)]
#[template(path = "join.html")]
pub struct JoinTemplate {
    pub page: PageContext,
    pub store: StoreView,
    pub join: JoinView,
    pub values: FormValues,
    pub errors: ErrorView,
    /// Message from the API when it rejected the application.
    pub form_error: String,
    /// Whether this visitor already applied to this store.
    pub already_applied: bool,
}

/// Application accepted template.
#[derive(Template, WebTemplate)]
#[template(path = "join_success.html")]
pub struct JoinSuccessTemplate {
    pub page: PageContext,
    pub store: StoreView,
    pub full_name: String,
    pub email: String,
    pub message: String,
}

async fn join_view(state: &AppState, slug: &str, store: &StoreView) -> JoinView {
    match state.commerce().join_info(slug).await {
        Ok(info) => JoinView::new(&info, store),
        Err(e) => {
            tracing::warn!(error = %e, "Join info unavailable");
            JoinView::new(&JoinInfo::default(), store)
        }
    }
}

/// Show the reseller programme and application form.
#[instrument(skip(state, session, page), fields(slug = %slug))]
pub async fn join_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    session: Session,
    page: PageContext,
) -> Result<JoinTemplate> {
    let store = StoreView::from(&state.commerce().get_store(&slug).await?);
    let join = join_view(&state, &slug, &store).await;
    let already_applied = visitor::reseller_account(&session)
        .await
        .is_some_and(|account| account.store_slug == store.slug);

    Ok(JoinTemplate {
        page,
        store,
        join,
        values: FormValues::default(),
        errors: ErrorView::default(),
        form_error: String::new(),
        already_applied,
    })
}

/// Validate and submit a reseller application.
#[instrument(skip(state, session, page, form), fields(slug = %slug))]
pub async fn apply(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    session: Session,
    page: PageContext,
    Form(form): Form<SignupForm>,
) -> Result<Response> {
    let store = StoreView::from(&state.commerce().get_store(&slug).await?);
    let values = FormValues::from(&form);

    let application = match form.validate() {
        Ok(application) => application,
        Err(errors) => {
            tracing::debug!(count = errors.len(), "Signup validation failed");
            let join = join_view(&state, &slug, &store).await;
            let template = JoinTemplate {
                page,
                store,
                join,
                values,
                errors: ErrorView::from(FieldErrors::from(errors.as_slice())),
                form_error: String::new(),
                already_applied: false,
            };
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response());
        }
    };

    match state.commerce().apply_reseller(&slug, &application).await {
        Ok(message) => {
            let account = application.account(&store.slug, Utc::now());
            visitor::set_reseller_account(&session, &account).await?;
            add_breadcrumb(
                "reseller",
                "Reseller application submitted",
                Some(&[("slug", slug.as_str())]),
            );
            tracing::info!(phone = %account.phone.masked(), "Reseller application accepted");

            Ok(JoinSuccessTemplate {
                page,
                store,
                full_name: account.full_name,
                email: account.email.to_string(),
                message: message.unwrap_or_else(|| {
                    "Your application has been received. The store owner will be in touch."
                        .to_string()
                }),
            }
            .into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Reseller application failed");
            let status = if matches!(e, CommerceError::Api(_)) {
                StatusCode::UNPROCESSABLE_ENTITY
            } else {
                StatusCode::BAD_GATEWAY
            };
            let join = join_view(&state, &slug, &store).await;
            let template = JoinTemplate {
                page,
                store,
                join,
                values,
                errors: ErrorView::default(),
                form_error: e.user_message(),
                already_applied: false,
            };
            Ok((status, template).into_response())
        }
    }
}
