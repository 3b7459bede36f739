use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::FieldError,
    models::{ItemRef, Order, OrderItem},
};

const FIRST_NAME_MAX: usize = 50;

/// Customer form submitted at checkout.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub cart_id: Uuid,
    pub first_name: String,
    pub email: String,
}

impl CreateOrderRequest {
    /// Field-level checks. Returns every failing field, not just the first.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        let first_name = self.first_name.trim();
        if first_name.is_empty() {
            errors.push(FieldError::new("first_name", "This field is required."));
        } else if first_name.chars().count() > FIRST_NAME_MAX {
            errors.push(FieldError::new(
                "first_name",
                format!("Ensure this value has at most {FIRST_NAME_MAX} characters."),
            ));
        }

        if !is_plausible_email(self.email.trim()) {
            errors.push(FieldError::new("email", "Enter a valid email address."));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

/// Body of the search endpoint. `items` takes precedence over `id_order`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SearchRequest {
    pub id_order: Option<Uuid>,
    #[serde(default)]
    pub items: Vec<ItemRef>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CancelItemsRequest {
    pub items: Vec<ItemRef>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub total_price: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderSearchResult {
    pub order_id: Uuid,
    pub items: Vec<OrderItem>,
    pub total_price: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemsCancelled {
    pub order_id: Uuid,
    pub cancelled: Vec<OrderItem>,
    /// Lines left on the order; empty when the order was voided.
    pub remaining: Vec<OrderItem>,
    pub order_voided: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderCancelled {
    pub order_id: Uuid,
    pub cancelled: Vec<OrderItem>,
}

/// What the search entry point shows next.
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// Nothing submitted: show the empty search form.
    Form,
    Order(OrderSearchResult),
    WindowExceeded { order_id: Uuid, message: String },
    ItemsCancelled(ItemsCancelled),
}
