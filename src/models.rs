use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Line total in minor units. Never stored; derived whenever a line is shown.
pub fn line_total(price: i64, quantity: i32) -> AppResult<i64> {
    price
        .checked_mul(i64::from(quantity))
        .ok_or_else(|| AppError::BadRequest("line total is out of range".into()))
}

/// Sum of line totals, rejecting amounts that do not fit in minor units.
pub fn sum_totals<I>(totals: I) -> AppResult<i64>
where
    I: IntoIterator<Item = i64>,
{
    totals.into_iter().try_fold(0i64, |acc, total| {
        acc.checked_add(total)
            .ok_or_else(|| AppError::BadRequest("order total is out of range".into()))
    })
}

/// Render minor units as `units.cents`, e.g. `2500` as `25.00`.
pub fn format_amount(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartEntry {
    pub id: Uuid,
    pub cart_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub price: i64,
    pub quantity: i32,
    pub total_price: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub first_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// An order line as reported to the caller. `price` is whichever unit price
/// the reporting operation uses; `total_price` is always `price × quantity`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub price: i64,
    pub quantity: i32,
    pub total_price: i64,
}

/// Reference to one line of one order, as submitted by a cancellation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct ItemRef {
    pub order_id: Uuid,
    pub item_id: Uuid,
}
