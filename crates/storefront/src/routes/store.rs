//! Store catalog route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use databundle_core::catalog::{CatalogQuery, CatalogSort, network_counts};
use databundle_core::checkout::{CardState, CheckoutCard};
use databundle_core::{NetworkFilter, Product, Store};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::models::session as visitor;
use crate::routes::PageContext;
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Store display data for templates.
#[derive(Debug, Clone)]
pub struct StoreView {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub logo: String,
    pub is_verified: bool,
    pub primary_color: String,
    pub secondary_color: String,
    pub whatsapp_url: String,
    pub phone: String,
    pub email: String,
    pub refund_policy: String,
    pub terms: String,
    pub total_orders: u64,
    pub rating: String,
}

impl From<&Store> for StoreView {
    fn from(store: &Store) -> Self {
        let colors = store.customization.sanitized();
        Self {
            name: store.name.clone(),
            slug: store.slug.clone(),
            description: store.description.clone().unwrap_or_default(),
            logo: store
                .logo
                .clone()
                .filter(|l| l.starts_with("https://"))
                .unwrap_or_default(),
            is_verified: store.is_verified,
            primary_color: colors.primary_color,
            secondary_color: colors.secondary_color,
            whatsapp_url: store.whatsapp_url().unwrap_or_default(),
            phone: store.contact_info.phone.clone().unwrap_or_default(),
            email: store.contact_info.email.clone().unwrap_or_default(),
            refund_policy: store.policies.refund.clone().unwrap_or_default(),
            terms: store.policies.terms.clone().unwrap_or_default(),
            total_orders: store.metrics.total_orders,
            rating: store
                .metrics
                .rating
                .map(|r| format!("{r:.1}"))
                .unwrap_or_default(),
        }
    }
}

impl StoreView {
    /// Minimal view for pages that render when the store lookup failed.
    #[must_use]
    pub fn placeholder(slug: &str) -> Self {
        let store = Store {
            name: slug.to_string(),
            slug: slug.to_string(),
            description: None,
            logo: None,
            contact_info: databundle_core::ContactInfo::default(),
            is_verified: false,
            customization: databundle_core::StoreCustomization::default(),
            policies: databundle_core::StorePolicies::default(),
            metrics: databundle_core::StoreMetrics::default(),
        };
        Self::from(&store)
    }
}

/// Product display data for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: String,
    pub title: String,
    pub network_code: String,
    pub network_name: String,
    pub capacity: String,
    pub price: String,
    pub original_price: String,
    pub on_sale: bool,
    pub in_stock: bool,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title(),
            network_code: product.network.code().to_string(),
            network_name: product.network.display_name().to_string(),
            capacity: product.capacity_label(),
            price: product.price().display(),
            original_price: if product.on_sale() {
                databundle_core::Price::cedis(product.selling_price).display()
            } else {
                String::new()
            },
            on_sale: product.on_sale(),
            in_stock: product.in_stock,
        }
    }
}

/// Purchase card display data.
///
/// `state` is one of `closed`, `expanded` or `confirming`; the other card
/// states never render (processing ends in a redirect or back in expanded).
#[derive(Debug, Clone)]
pub struct CardView {
    pub slug: String,
    pub product: ProductView,
    pub state: String,
    pub error: String,
    pub name: String,
    pub phone: String,
}

impl CardView {
    /// Render a card, carrying the visitor's input back into the form.
    #[must_use]
    pub fn new(slug: &str, card: &CheckoutCard, name: &str, phone: &str) -> Self {
        let (name, phone) = match card.state() {
            CardState::Confirming(request) | CardState::Processing(request) => (
                request.customer_name.clone(),
                request.phone.as_str().to_string(),
            ),
            _ => (name.trim().to_string(), phone.trim().to_string()),
        };
        let state = match card.state() {
            CardState::Closed | CardState::Redirected { .. } => "closed",
            CardState::Expanded { .. } | CardState::Processing(_) => "expanded",
            CardState::Confirming(_) => "confirming",
        };

        Self {
            slug: slug.to_string(),
            product: ProductView::from(card.product()),
            state: state.to_string(),
            error: card.error().map(ToString::to_string).unwrap_or_default(),
            name,
            phone,
        }
    }

    /// Path prefix of this card's routes.
    #[must_use]
    pub fn base_path(&self) -> String {
        format!(
            "/shop/{}/products/{}",
            urlencoding::encode(&self.slug),
            urlencoding::encode(&self.product.id)
        )
    }

    /// A closed card.
    #[must_use]
    pub fn closed(slug: &str, product: &Product) -> Self {
        Self::new(slug, &CheckoutCard::new(product.clone()), "", "")
    }
}

/// Network filter tab.
#[derive(Debug, Clone)]
pub struct NetworkTab {
    pub param: String,
    pub label: String,
    pub count: usize,
    pub active: bool,
}

/// Sort menu option.
#[derive(Debug, Clone)]
pub struct SortOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

// =============================================================================
// Handlers
// =============================================================================

/// Catalog query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogParams {
    pub network: Option<String>,
    pub q: Option<String>,
    pub sort: Option<String>,
}

/// Store catalog template.
#[derive(Template, WebTemplate)]
#[template(path = "store/show.html")]
pub struct StoreTemplate {
    pub page: PageContext,
    pub store: StoreView,
    pub cards: Vec<CardView>,
    pub tabs: Vec<NetworkTab>,
    pub sorts: Vec<SortOption>,
    pub network: String,
    pub search: String,
    pub sort: String,
    pub total: usize,
}

fn network_tabs(products: &[Product], selected: NetworkFilter) -> Vec<NetworkTab> {
    let mut tabs = vec![NetworkTab {
        param: NetworkFilter::All.as_param().to_string(),
        label: "All".to_string(),
        count: products.len(),
        active: selected == NetworkFilter::All,
    }];
    tabs.extend(network_counts(products).into_iter().map(|(network, count)| {
        NetworkTab {
            param: network.code().to_string(),
            label: network.display_name().to_string(),
            count,
            active: selected == NetworkFilter::Only(network),
        }
    }));
    tabs
}

fn sort_options(selected: CatalogSort) -> Vec<SortOption> {
    CatalogSort::ALL
        .iter()
        .map(|&sort| SortOption {
            value: sort.as_str().to_string(),
            label: sort.label().to_string(),
            selected: sort == selected,
        })
        .collect()
}

/// Display a store's catalog.
#[instrument(skip(state, session, page), fields(slug = %slug))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<CatalogParams>,
    session: Session,
    page: PageContext,
) -> Result<StoreTemplate> {
    let store = state.commerce().get_store(&slug).await?;
    let products = state.commerce().get_products(&slug).await?;

    visitor::set_last_visited_store(&session, &store.slug).await?;

    let query = CatalogQuery::from_params(
        params.network.as_deref(),
        params.q.as_deref(),
        params.sort.as_deref(),
    );
    let cards = query
        .apply(&products)
        .into_iter()
        .map(|product| CardView::closed(&store.slug, product))
        .collect();

    Ok(StoreTemplate {
        page,
        store: StoreView::from(&store),
        cards,
        tabs: network_tabs(&products, query.network),
        sorts: sort_options(query.sort),
        network: query.network.as_param().to_string(),
        search: query.search.clone(),
        sort: query.sort.as_str().to_string(),
        total: products.len(),
    })
}
