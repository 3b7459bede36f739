use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::cart::{AddToCartRequest, CartView},
    entity::{
        cart_items::{ActiveModel as CartActive, Column as CartCol, Entity as CartItems},
        products::Entity as Products,
    },
    error::{AppError, AppResult},
    models::{CartEntry, line_total, sum_totals},
    services::product_service::catalog_entries,
    state::AppState,
};

pub async fn list_cart(state: &AppState, cart_id: Uuid) -> AppResult<CartView> {
    let items = load_cart(&state.orm, cart_id).await?;
    let total_price = cart_total(&items)?;
    Ok(CartView {
        cart_id,
        items,
        total_price,
    })
}

pub async fn add_to_cart(
    state: &AppState,
    cart_id: Uuid,
    payload: AddToCartRequest,
) -> AppResult<CartEntry> {
    if payload.quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }

    let product = Products::find_by_id(payload.product_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::BadRequest("product not found".to_string()))?;

    let existing = CartItems::find()
        .filter(
            Condition::all()
                .add(CartCol::CartId.eq(cart_id))
                .add(CartCol::ProductId.eq(product.id)),
        )
        .one(&state.orm)
        .await?;

    let entry = match existing {
        Some(item) => {
            let quantity = if payload.override_quantity {
                payload.quantity
            } else {
                item.quantity
                    .checked_add(payload.quantity)
                    .ok_or_else(|| AppError::BadRequest("quantity is out of range".to_string()))?
            };
            // the stored line must stay priceable
            line_total(item.price, quantity)?;
            let mut active: CartActive = item.into();
            active.quantity = Set(quantity);
            active.update(&state.orm).await?
        }
        None => {
            line_total(product.price, payload.quantity)?;
            CartActive {
                id: Set(Uuid::new_v4()),
                cart_id: Set(cart_id),
                product_id: Set(product.id),
                price: Set(product.price),
                quantity: Set(payload.quantity),
                created_at: Set(Utc::now().into()),
            }
            .insert(&state.orm)
            .await?
        }
    };

    audit::record(
        &state.orm,
        "cart_update",
        "cart_items",
        serde_json::json!({ "cart_id": cart_id, "product_id": product.id, "quantity": entry.quantity }),
    )
    .await;

    Ok(CartEntry {
        id: entry.id,
        cart_id: entry.cart_id,
        product_id: entry.product_id,
        product_name: product.name,
        price: entry.price,
        quantity: entry.quantity,
        total_price: line_total(entry.price, entry.quantity)?,
    })
}

pub async fn remove_from_cart(state: &AppState, cart_id: Uuid, product_id: Uuid) -> AppResult<()> {
    let result = CartItems::delete_many()
        .filter(
            Condition::all()
                .add(CartCol::CartId.eq(cart_id))
                .add(CartCol::ProductId.eq(product_id)),
        )
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.orm,
        "cart_remove",
        "cart_items",
        serde_json::json!({ "cart_id": cart_id, "product_id": product_id }),
    )
    .await;

    Ok(())
}

/// Entries of a cart in the order they were added.
pub async fn load_cart<C>(conn: &C, cart_id: Uuid) -> AppResult<Vec<CartEntry>>
where
    C: ConnectionTrait,
{
    let rows = CartItems::find()
        .filter(CartCol::CartId.eq(cart_id))
        .order_by_asc(CartCol::CreatedAt)
        .order_by_asc(CartCol::Id)
        .all(conn)
        .await?;

    let product_ids: Vec<Uuid> = rows.iter().map(|row| row.product_id).collect();
    let catalog = catalog_entries(conn, &product_ids).await?;

    rows.into_iter()
        .map(|row| -> AppResult<_> {
            let product = catalog.get(&row.product_id).ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!(
                    "cart {} references missing product {}",
                    row.cart_id,
                    row.product_id
                ))
            })?;
            Ok(CartEntry {
                id: row.id,
                cart_id: row.cart_id,
                product_id: row.product_id,
                product_name: product.name.clone(),
                price: row.price,
                quantity: row.quantity,
                total_price: line_total(row.price, row.quantity)?,
            })
        })
        .collect()
}

pub async fn clear_cart<C>(conn: &C, cart_id: Uuid) -> AppResult<u64>
where
    C: ConnectionTrait,
{
    let result = CartItems::delete_many()
        .filter(CartCol::CartId.eq(cart_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub fn cart_total(entries: &[CartEntry]) -> AppResult<i64> {
    sum_totals(entries.iter().map(|entry| entry.total_price))
}
