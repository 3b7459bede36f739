use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::orders::{
        CancelItemsRequest, CreateOrderRequest, ItemsCancelled, OrderWithItems, SearchOutcome,
        SearchRequest,
    },
    error::AppResult,
    response::{ApiResponse, Meta},
    services::order_service,
    state::AppState,
};

pub const SEARCH_PATH: &str = "/api/orders/search";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order))
        .route("/search", get(search_form).post(search_orders))
        .route("/cancel-items", post(cancel_items))
        .route("/cancel-order/{id}", get(cancel_order).post(cancel_order))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order placed from the cart", body = ApiResponse<OrderWithItems>),
        (status = 400, description = "Cart is empty"),
        (status = 422, description = "Form field errors"),
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<OrderWithItems>>)> {
    let created = order_service::create_order(&state, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Order created", created, Some(Meta::empty()))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/orders/search",
    responses(
        (status = 200, description = "Empty search form", body = ApiResponse<SearchOutcome>)
    ),
    tag = "Orders"
)]
pub async fn search_form() -> Json<ApiResponse<SearchOutcome>> {
    Json(ApiResponse::success("Search", SearchOutcome::Form, None))
}

/// Selected items win over an order id, mirroring the search screen where
/// the item checkboxes are only shown after a successful lookup.
#[utoipa::path(
    post,
    path = "/api/orders/search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Lookup, cancellation or empty form", body = ApiResponse<SearchOutcome>),
        (status = 403, description = "Cancellation window exceeded"),
        (status = 404, description = "Order or item not found"),
    ),
    tag = "Orders"
)]
pub async fn search_orders(
    State(state): State<AppState>,
    Json(payload): Json<SearchRequest>,
) -> AppResult<Json<ApiResponse<SearchOutcome>>> {
    let (message, outcome) = if !payload.items.is_empty() {
        let cancelled = order_service::cancel_items(&state, payload.items).await?;
        ("Items cancelled", SearchOutcome::ItemsCancelled(cancelled))
    } else if let Some(order_id) = payload.id_order {
        match order_service::search_order(&state, order_id).await? {
            outcome @ SearchOutcome::WindowExceeded { .. } => ("Cancellation window exceeded", outcome),
            outcome => ("Order", outcome),
        }
    } else {
        ("Search", SearchOutcome::Form)
    };

    Ok(Json(ApiResponse::success(message, outcome, Some(Meta::empty()))))
}

#[utoipa::path(
    post,
    path = "/api/orders/cancel-items",
    request_body = CancelItemsRequest,
    responses(
        (status = 200, description = "Items cancelled, order reconciled", body = ApiResponse<ItemsCancelled>),
        (status = 400, description = "Empty selection or items from different orders"),
        (status = 403, description = "Cancellation window exceeded"),
        (status = 404, description = "Order or item not found"),
    ),
    tag = "Orders"
)]
pub async fn cancel_items(
    State(state): State<AppState>,
    Json(payload): Json<CancelItemsRequest>,
) -> AppResult<Json<ApiResponse<ItemsCancelled>>> {
    let cancelled = order_service::cancel_items(&state, payload.items).await?;
    Ok(Json(ApiResponse::success(
        "Items cancelled",
        cancelled,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    method(get, post),
    path = "/api/orders/cancel-order/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 303, description = "Order cancelled, redirect to the search form"),
        (status = 403, description = "Cancellation window exceeded"),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn cancel_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Redirect> {
    order_service::cancel_order(&state, id).await?;
    Ok(Redirect::to(SEARCH_PATH))
}
