//! Order search and mobile-money tracking route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use databundle_core::{Order, OrderLookup};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::models::session as visitor;
use crate::routes::PageContext;
use crate::routes::store::StoreView;
use crate::state::AppState;

/// Shown when the search box is blank or unusable.
const LOOKUP_ERROR: &str = "Enter a phone number or payment reference";

/// Search box query.
#[derive(Debug, Default, Deserialize)]
pub struct LookupParams {
    pub q: Option<String>,
}

/// Order row display data.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub reference: String,
    pub bundle: String,
    pub amount: String,
    pub status_label: String,
    pub status_tone: String,
    pub created: String,
    pub phone: String,
    /// Not yet delivered, refunded or failed.
    pub in_progress: bool,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            reference: order.reference.to_string(),
            bundle: order.bundle_label(),
            amount: order.price().display(),
            status_label: order.status.label().to_string(),
            status_tone: order.status.tone().to_string(),
            created: order.created_label(),
            phone: order.phone_number.clone(),
            in_progress: !order.status.is_final(),
        }
    }
}

/// Result of reading the search box.
enum Lookup {
    /// No search submitted yet.
    Empty,
    Invalid,
    Ready(OrderLookup),
}

impl Lookup {
    fn from_params(params: &LookupParams) -> Self {
        match params.q.as_deref() {
            None => Self::Empty,
            Some(q) => OrderLookup::parse(q).map_or(Self::Invalid, Self::Ready),
        }
    }
}

/// Search results shared by both pages.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    pub query: String,
    pub error: String,
    pub searched: bool,
    pub orders: Vec<OrderView>,
    /// Reference of the visitor's last verified payment, offered before a
    /// search is made.
    pub last_reference: String,
}

impl SearchResults {
    async fn empty(session: &Session) -> Self {
        Self {
            last_reference: visitor::last_transaction_id(session)
                .await
                .unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Whether any listed order is still on its way.
    #[must_use]
    pub fn any_in_progress(&self) -> bool {
        self.orders.iter().any(|order| order.in_progress)
    }

    fn invalid(query: &str) -> Self {
        Self {
            query: query.to_string(),
            error: LOOKUP_ERROR.to_string(),
            ..Self::default()
        }
    }

    fn found(query: &str, orders: &[Order]) -> Self {
        Self {
            query: query.trim().to_string(),
            error: String::new(),
            searched: true,
            orders: orders.iter().map(OrderView::from).collect(),
            last_reference: String::new(),
        }
    }
}

/// Store order search template.
#[derive(Template, WebTemplate)]
#[template(path = "orders.html")]
pub struct OrdersTemplate {
    pub page: PageContext,
    pub store: StoreView,
    pub results: SearchResults,
}

/// Mobile-money tracking template.
#[derive(Template, WebTemplate)]
#[template(path = "track.html")]
pub struct TrackTemplate {
    pub page: PageContext,
    pub results: SearchResults,
    /// Store to return to, when the visitor came from one.
    pub store_slug: String,
}

/// Search a store's orders by phone number or payment reference.
#[instrument(skip(state, session, page, params), fields(slug = %slug))]
pub async fn search(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<LookupParams>,
    session: Session,
    page: PageContext,
) -> Result<OrdersTemplate> {
    let store = StoreView::from(&state.commerce().get_store(&slug).await?);
    let query = params.q.as_deref().unwrap_or_default();

    let results = match Lookup::from_params(&params) {
        Lookup::Empty => SearchResults::empty(&session).await,
        Lookup::Invalid => SearchResults::invalid(query),
        Lookup::Ready(lookup) => {
            let orders = state.commerce().search_orders(&slug, &lookup).await?;
            tracing::info!(count = orders.len(), "Order search");
            SearchResults::found(query, &orders)
        }
    };

    Ok(OrdersTemplate {
        page,
        store,
        results,
    })
}

/// Store query parameter on the tracking page.
#[derive(Debug, Default, Deserialize)]
pub struct TrackParams {
    pub q: Option<String>,
    pub store: Option<String>,
}

/// Track a mobile-money purchase across all stores.
#[instrument(skip(state, session, page, params))]
pub async fn track(
    State(state): State<AppState>,
    Query(params): Query<TrackParams>,
    session: Session,
    page: PageContext,
) -> Result<TrackTemplate> {
    let lookup_params = LookupParams {
        q: params.q.clone(),
    };
    let query = params.q.as_deref().unwrap_or_default();

    let results = match Lookup::from_params(&lookup_params) {
        Lookup::Empty => SearchResults::empty(&session).await,
        Lookup::Invalid => SearchResults::invalid(query),
        Lookup::Ready(lookup) => {
            let orders = state.commerce().track_momo(&lookup).await?;
            tracing::info!(count = orders.len(), "Mobile-money tracking");
            SearchResults::found(query, &orders)
        }
    };

    Ok(TrackTemplate {
        page,
        results,
        store_slug: params.store.unwrap_or_default(),
    })
}
