//! REST API handlers for the menu and the shopping cart
//!
//! Visitors are told apart by the `cardapio_session` cookie, issued on the
//! first request that carries none.

use super::helpers::{format_item_summary, quantity_input};
use super::models::*;
use super::session::CartSession;
use super::state::SharedState;
use super::store::{CartStore, KeyValueCartStore, QueryCartStore};
use crate::catalog::{Catalog, MenuItem, SectionKey, SIZE_LABELS};
use crate::error::AppError;
use axum::{
    extract::{rejection::JsonRejection, Path, RawQuery, State},
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

/// Cookie carrying the visitor's session id
pub const SESSION_COOKIE: &str = "cardapio_session";

/// Creates routes for menu and cart operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/cardapio", get(list_catalog))
        .route("/cardapio/:section", get(show_section))
        .route("/selecao", post(update_selection))
        .route("/selecao/incrementar", post(increment_selection))
        .route("/selecao/decrementar", post(decrement_selection))
        .route("/carrinho", get(show_cart).post(add_to_cart))
        .route("/carrinho/:index", delete(remove_from_cart))
        .route("/checkout", post(checkout))
        .route("/pedidos", get(receive_handoff))
}

// =============================================================================
// Sessions
// =============================================================================

struct Session {
    id: String,
    is_new: bool,
}

impl Session {
    /// Reads the session cookie, or starts a new session.
    fn resolve(headers: &HeaderMap) -> Self {
        let existing = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
            .map(|(_, value)| value.to_string());

        match existing {
            Some(id) => Self { id, is_new: false },
            None => {
                let id = Uuid::new_v4().simple().to_string();
                info!(session = %id, "Starting new session");
                Self { id, is_new: true }
            }
        }
    }

    /// JSON response, setting the cookie when the session was just created.
    fn respond(&self, body: impl Serialize) -> Response {
        let mut response = Json(body).into_response();

        if self.is_new {
            let cookie = format!("{}={}; Path=/; HttpOnly", SESSION_COOKIE, self.id);
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                response.headers_mut().insert(header::SET_COOKIE, value);
            }
        }

        response
    }
}

fn lookup(catalog: &Catalog, section: SectionKey, id: u32) -> Result<&MenuItem, AppError> {
    catalog
        .item(section, id)
        .ok_or(AppError::UnknownItem { section, id })
}

fn section_view(
    session: &CartSession<KeyValueCartStore>,
    catalog: &Catalog,
    section: SectionKey,
) -> SectionView {
    let itens = catalog
        .items(section)
        .iter()
        .map(|item| MenuEntry {
            item: item.clone(),
            preco_exibido: session.display_price(section, item),
            selecao: session.selections().selection_for(section, item),
            tamanhos: if section.is_size_priced() && item.size_prices.is_some() {
                SIZE_LABELS.iter().map(|s| s.to_string()).collect()
            } else {
                Vec::new()
            },
            escolhas: if section.is_flavored() {
                item.flavor_choices().to_vec()
            } else {
                Vec::new()
            },
        })
        .collect();

    SectionView {
        secao: section,
        titulo: section.title(),
        itens,
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Endpoint: GET /cardapio
/// Every section in menu order, with prices for the current selections.
async fn list_catalog(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let session = Session::resolve(&headers);
    let catalog = &state.catalog;

    let sections: Vec<SectionView> = state.with_session(&session.id, |cart| {
        SectionKey::ALL
            .into_iter()
            .map(|section| section_view(cart, catalog, section))
            .collect()
    });

    session.respond(sections)
}

/// Endpoint: GET /cardapio/:section
async fn show_section(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(section): Path<String>,
) -> Result<Response, AppError> {
    let section: SectionKey = section.parse()?;
    let session = Session::resolve(&headers);
    let catalog = &state.catalog;

    let view = state.with_session(&session.id, |cart| section_view(cart, catalog, section));
    Ok(session.respond(view))
}

// =============================================================================
// Selection
// =============================================================================

/// Endpoint: POST /selecao
/// Replaces the selection of one item; the quantity is normalized.
async fn update_selection(
    State(state): State<SharedState>,
    headers: HeaderMap,
    payload: Result<Json<SelectionInput>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(input) = payload.map_err(|e| AppError::MalformedPayload(e.body_text()))?;
    lookup(&state.catalog, input.section, input.item_id)?;
    let session = Session::resolve(&headers);

    let selection = state.with_session(&session.id, |cart| {
        cart.update_selection(
            input.section,
            input.item_id,
            quantity_input(&input.quantity),
            input.size,
            input.flavor,
        )
        .clone()
    });

    Ok(session.respond(selection))
}

/// Endpoint: POST /selecao/incrementar
async fn increment_selection(
    State(state): State<SharedState>,
    headers: HeaderMap,
    payload: Result<Json<ItemRef>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(input) = payload.map_err(|e| AppError::MalformedPayload(e.body_text()))?;
    let item = lookup(&state.catalog, input.section, input.item_id)?;
    let session = Session::resolve(&headers);

    let selection = state.with_session(&session.id, |cart| {
        cart.increment(input.section, item).clone()
    });
    Ok(session.respond(selection))
}

/// Endpoint: POST /selecao/decrementar
async fn decrement_selection(
    State(state): State<SharedState>,
    headers: HeaderMap,
    payload: Result<Json<ItemRef>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(input) = payload.map_err(|e| AppError::MalformedPayload(e.body_text()))?;
    let item = lookup(&state.catalog, input.section, input.item_id)?;
    let session = Session::resolve(&headers);

    let selection = state.with_session(&session.id, |cart| {
        cart.decrement(input.section, item).clone()
    });
    Ok(session.respond(selection))
}

// =============================================================================
// Cart
// =============================================================================

/// Endpoint: GET /carrinho
async fn show_cart(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let session = Session::resolve(&headers);
    let view = state.with_session(&session.id, |cart| cart.view());
    session.respond(view)
}

/// Endpoint: POST /carrinho
/// Commits the item's current selection to the cart.
async fn add_to_cart(
    State(state): State<SharedState>,
    headers: HeaderMap,
    payload: Result<Json<ItemRef>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(input) = payload.map_err(|e| AppError::MalformedPayload(e.body_text()))?;
    let item = lookup(&state.catalog, input.section, input.item_id)?;
    let session = Session::resolve(&headers);

    let view = state.with_session(&session.id, |cart| {
        cart.add_to_cart(item, input.section);
        cart.view()
    });
    Ok(session.respond(view))
}

/// Endpoint: DELETE /carrinho/:index
/// Removes a line by position. Anything that is not a valid position is ignored.
async fn remove_from_cart(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(index): Path<String>,
) -> Response {
    let session = Session::resolve(&headers);

    let view = state.with_session(&session.id, |cart| {
        match index.parse::<usize>() {
            Ok(index) => {
                cart.remove_from_cart(index);
            }
            Err(_) => debug!("Ignoring removal of line {index:?}"),
        }
        cart.view()
    });
    session.respond(view)
}

/// Endpoint: POST /checkout
/// Builds the hand-off link to the checkout page. The cart is left as is.
async fn checkout(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let session = Session::resolve(&headers);

    let (itens, total) = state.with_session(&session.id, |cart| {
        (cart.cart().to_vec(), cart.total())
    });

    let mut handoff = QueryCartStore::default();
    handoff.save(&itens);
    let href = handoff.link(&state.checkout_path);

    info!(
        session = %session.id,
        total,
        "Checkout hand-off: {}",
        format_item_summary(&itens)
    );

    session.respond(CheckoutView { href, itens, total })
}

/// Endpoint: GET /pedidos?carrinho=...
/// Receiving side of the hand-off: decodes the cart from the query string.
async fn receive_handoff(RawQuery(query): RawQuery) -> impl IntoResponse {
    let store = QueryCartStore::from_query(query.as_deref().unwrap_or_default());
    Json(CartSession::open(store).view())
}
