//! Order lifecycle: creation from a cart, lookup, item and full cancellation.
//!
//! Every mutation runs in one transaction. The customer notification is sent
//! before the commit, so a transport failure leaves the data untouched.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, TimeDelta, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    config::{CancellationPricing, OrderSettings},
    dto::orders::{
        CreateOrderRequest, ItemsCancelled, OrderCancelled, OrderSearchResult, OrderWithItems,
        SearchOutcome,
    },
    entity::{
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{ActiveModel as OrderActive, Entity as Orders, Model as OrderModel},
    },
    error::{AppError, AppResult},
    mail::Mailer,
    models::{ItemRef, Order, OrderItem, line_total, sum_totals},
    services::{
        cart_service::{cart_total, clear_cart, load_cart},
        notification_service::{NotificationKind, NotificationLine, Recipient, compose_and_send},
        product_service::catalog_entries,
    },
    state::AppState,
};

/// What is left of an order once some of its lines were removed.
#[derive(Debug)]
pub enum Reconciliation {
    /// No lines remained; the order itself was deleted.
    Voided,
    /// Lines that survived, priced for the update notice.
    Updated(Vec<OrderItem>),
}

/// True while `now` is strictly less than `window` after `created_at`.
pub fn within_window(created_at: DateTime<Utc>, now: DateTime<Utc>, window: TimeDelta) -> bool {
    now.signed_duration_since(created_at) < window
}

pub async fn create_order(state: &AppState, payload: CreateOrderRequest) -> AppResult<OrderWithItems> {
    payload.validate().map_err(AppError::Validation)?;

    let txn = state.orm.begin().await?;

    let cart = load_cart(&txn, payload.cart_id).await?;
    if cart.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }

    let now = Utc::now();
    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        first_name: Set(payload.first_name.trim().to_string()),
        email: Set(payload.email.trim().to_string()),
        created_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;

    let mut items = Vec::with_capacity(cart.len());
    for entry in &cart {
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(entry.product_id),
            quantity: Set(entry.quantity),
            price: Set(entry.price),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        items.push(OrderItem {
            id: item.id,
            order_id: item.order_id,
            product_id: item.product_id,
            product_name: entry.product_name.clone(),
            price: item.price,
            quantity: item.quantity,
            total_price: line_total(item.price, item.quantity)?,
        });
    }

    clear_cart(&txn, payload.cart_id).await?;

    let total_price = cart_total(&cart)?;
    let lines: Vec<NotificationLine> = cart
        .iter()
        .map(|entry| NotificationLine {
            quantity: entry.quantity,
            product_name: entry.product_name.clone(),
            total_price: entry.total_price,
        })
        .collect();
    compose_and_send(
        state.mailer.as_ref(),
        &state.settings.mail_from,
        NotificationKind::Placed,
        recipient(&order),
        &lines,
        Some(total_price),
    )
    .await?;

    txn.commit().await?;

    tracing::info!(order_id = %order.id, items = items.len(), total_price, "order created");
    audit::record(
        &state.orm,
        "order_create",
        "orders",
        serde_json::json!({ "order_id": order.id, "items": items.len() }),
    )
    .await;

    Ok(OrderWithItems {
        order: order_from_entity(order),
        items,
        total_price,
    })
}

/// Look an order up for the cancellation screen.
///
/// Orders past the window are still found, but their lines are withheld.
pub async fn search_order(state: &AppState, order_id: Uuid) -> AppResult<SearchOutcome> {
    let order = find_order(&state.orm, order_id).await?;

    if !within_window(created_at(&order), Utc::now(), state.settings.cancellation_window) {
        let message = AppError::WindowExceeded {
            hours: state.settings.window_hours(),
        }
        .to_string();
        return Ok(SearchOutcome::WindowExceeded { order_id, message });
    }

    let rows = load_order_items(&state.orm, order_id).await?;
    let items = price_items(&state.orm, rows, CancellationPricing::Frozen).await?;
    let total_price = sum_totals(items.iter().map(|item| item.total_price))?;

    Ok(SearchOutcome::Order(OrderSearchResult {
        order_id,
        items,
        total_price,
    }))
}

pub async fn is_within_cancellation_window(state: &AppState, order_id: Uuid) -> AppResult<bool> {
    let order = find_order(&state.orm, order_id).await?;
    Ok(within_window(
        created_at(&order),
        Utc::now(),
        state.settings.cancellation_window,
    ))
}

/// Cancel selected lines of one order, then reconcile what is left.
pub async fn cancel_items(state: &AppState, refs: Vec<ItemRef>) -> AppResult<ItemsCancelled> {
    let refs = dedup_refs(refs);
    let order_id = match refs.first() {
        Some(first) => first.order_id,
        None => return Err(AppError::BadRequest("no items selected".into())),
    };
    if refs.iter().any(|r| r.order_id != order_id) {
        return Err(AppError::BadRequest(
            "all items must belong to the same order".into(),
        ));
    }

    let txn = state.orm.begin().await?;

    let order = find_order(&txn, order_id).await?;
    ensure_cancellable(&state.settings, &order)?;

    let item_ids: Vec<Uuid> = refs.iter().map(|r| r.item_id).collect();
    let item_filter = Condition::all()
        .add(OrderItemCol::OrderId.eq(order_id))
        .add(OrderItemCol::Id.is_in(item_ids.iter().copied()));

    let mut found: HashMap<Uuid, OrderItemModel> = OrderItems::find()
        .filter(item_filter.clone())
        .all(&txn)
        .await?
        .into_iter()
        .map(|item| (item.id, item))
        .collect();
    let mut selected = Vec::with_capacity(item_ids.len());
    for id in &item_ids {
        match found.remove(id) {
            Some(item) => selected.push(item),
            None => return Err(AppError::NotFound),
        }
    }

    let cancelled = price_items(&txn, selected, state.settings.pricing).await?;
    send_listing(state, NotificationKind::ItemsCancelled, &order, &cancelled).await?;

    OrderItems::delete_many().filter(item_filter).exec(&txn).await?;

    let reconciliation =
        reconcile_order_after_item_removal(&txn, state.mailer.as_ref(), &state.settings, &order)
            .await?;

    txn.commit().await?;

    let (remaining, order_voided) = match reconciliation {
        Reconciliation::Voided => (Vec::new(), true),
        Reconciliation::Updated(items) => (items, false),
    };
    tracing::info!(
        order_id = %order_id,
        cancelled = cancelled.len(),
        remaining = remaining.len(),
        order_voided,
        "order items cancelled"
    );
    audit::record(
        &state.orm,
        "order_items_cancel",
        "order_items",
        serde_json::json!({ "order_id": order_id, "items": item_ids, "order_voided": order_voided }),
    )
    .await;

    Ok(ItemsCancelled {
        order_id,
        cancelled,
        remaining,
        order_voided,
    })
}

/// Delete the order if no lines are left; otherwise tell the customer what
/// remains. Runs on the caller's connection so it joins its transaction.
pub async fn reconcile_order_after_item_removal<C>(
    conn: &C,
    mailer: &dyn Mailer,
    settings: &OrderSettings,
    order: &OrderModel,
) -> AppResult<Reconciliation>
where
    C: ConnectionTrait,
{
    let rows = load_order_items(conn, order.id).await?;

    if rows.is_empty() {
        Orders::delete_by_id(order.id).exec(conn).await?;
        tracing::info!(order_id = %order.id, "order voided after last item was removed");
        return Ok(Reconciliation::Voided);
    }

    let remaining = price_items(conn, rows, settings.pricing).await?;
    let lines: Vec<NotificationLine> = remaining.iter().map(NotificationLine::from).collect();
    compose_and_send(
        mailer,
        &settings.mail_from,
        NotificationKind::OrderUpdated,
        recipient(order),
        &lines,
        None,
    )
    .await?;

    Ok(Reconciliation::Updated(remaining))
}

/// Cancel every line and delete the order.
pub async fn cancel_order(state: &AppState, order_id: Uuid) -> AppResult<OrderCancelled> {
    let txn = state.orm.begin().await?;

    let order = find_order(&txn, order_id).await?;
    ensure_cancellable(&state.settings, &order)?;

    let rows = load_order_items(&txn, order_id).await?;
    let cancelled = price_items(&txn, rows, state.settings.pricing).await?;
    send_listing(state, NotificationKind::OrderCancelled, &order, &cancelled).await?;

    OrderItems::delete_many()
        .filter(OrderItemCol::OrderId.eq(order_id))
        .exec(&txn)
        .await?;
    Orders::delete_by_id(order_id).exec(&txn).await?;

    txn.commit().await?;

    tracing::info!(order_id = %order_id, items = cancelled.len(), "order cancelled");
    audit::record(
        &state.orm,
        "order_cancel",
        "orders",
        serde_json::json!({ "order_id": order_id, "items": cancelled.len() }),
    )
    .await;

    Ok(OrderCancelled {
        order_id,
        cancelled,
    })
}

async fn send_listing(
    state: &AppState,
    kind: NotificationKind,
    order: &OrderModel,
    items: &[OrderItem],
) -> AppResult<()> {
    let lines: Vec<NotificationLine> = items.iter().map(NotificationLine::from).collect();
    compose_and_send(
        state.mailer.as_ref(),
        &state.settings.mail_from,
        kind,
        recipient(order),
        &lines,
        None,
    )
    .await
}

fn ensure_cancellable(settings: &OrderSettings, order: &OrderModel) -> AppResult<()> {
    if within_window(created_at(order), Utc::now(), settings.cancellation_window) {
        Ok(())
    } else {
        tracing::info!(order_id = %order.id, "cancellation refused, window exceeded");
        Err(AppError::WindowExceeded {
            hours: settings.window_hours(),
        })
    }
}

async fn find_order<C>(conn: &C, order_id: Uuid) -> AppResult<OrderModel>
where
    C: ConnectionTrait,
{
    Orders::find_by_id(order_id)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)
}

async fn load_order_items<C>(conn: &C, order_id: Uuid) -> AppResult<Vec<OrderItemModel>>
where
    C: ConnectionTrait,
{
    let rows = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order_id))
        .order_by_asc(OrderItemCol::CreatedAt)
        .order_by_asc(OrderItemCol::Id)
        .all(conn)
        .await?;
    Ok(rows)
}

/// Attach product names and compute totals with the requested unit price.
async fn price_items<C>(
    conn: &C,
    rows: Vec<OrderItemModel>,
    pricing: CancellationPricing,
) -> AppResult<Vec<OrderItem>>
where
    C: ConnectionTrait,
{
    let product_ids: Vec<Uuid> = rows.iter().map(|row| row.product_id).collect();
    let catalog = catalog_entries(conn, &product_ids).await?;

    rows.into_iter()
        .map(|row| -> AppResult<_> {
            let product = catalog.get(&row.product_id).ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!(
                    "order item {} references missing product {}",
                    row.id,
                    row.product_id
                ))
            })?;
            let price = match pricing {
                CancellationPricing::Current => product.price,
                CancellationPricing::Frozen => row.price,
            };
            Ok(OrderItem {
                id: row.id,
                order_id: row.order_id,
                product_id: row.product_id,
                product_name: product.name.clone(),
                price,
                quantity: row.quantity,
                total_price: line_total(price, row.quantity)?,
            })
        })
        .collect()
}

fn dedup_refs(refs: Vec<ItemRef>) -> Vec<ItemRef> {
    let mut seen = HashSet::with_capacity(refs.len());
    refs.into_iter().filter(|r| seen.insert(*r)).collect()
}

fn recipient(order: &OrderModel) -> Recipient<'_> {
    Recipient {
        order_id: order.id,
        first_name: &order.first_name,
        email: &order.email,
    }
}

fn created_at(order: &OrderModel) -> DateTime<Utc> {
    order.created_at.with_timezone(&Utc)
}

fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        first_name: model.first_name,
        email: model.email,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
