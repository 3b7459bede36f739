//! Customer notifications for order placement and cancellation.

use uuid::Uuid;

use crate::{
    error::AppResult,
    mail::{Mailer, OutgoingMail},
    models::{OrderItem, format_amount},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Placed,
    ItemsCancelled,
    OrderUpdated,
    OrderCancelled,
}

impl NotificationKind {
    fn action(self) -> &'static str {
        match self {
            NotificationKind::Placed => "placed an order",
            NotificationKind::ItemsCancelled => "cancelled products from your order",
            NotificationKind::OrderUpdated => "updated your order",
            NotificationKind::OrderCancelled => "cancelled your order",
        }
    }

    fn section(self) -> &'static str {
        match self {
            NotificationKind::Placed | NotificationKind::OrderUpdated => "order",
            NotificationKind::ItemsCancelled | NotificationKind::OrderCancelled => "cancelation",
        }
    }
}

/// The customer fields a notification needs.
#[derive(Debug, Clone, Copy)]
pub struct Recipient<'a> {
    pub order_id: Uuid,
    pub first_name: &'a str,
    pub email: &'a str,
}

/// A listed line: quantity, product name and the line total to print.
#[derive(Debug, Clone)]
pub struct NotificationLine {
    pub quantity: i32,
    pub product_name: String,
    pub total_price: i64,
}

impl From<&OrderItem> for NotificationLine {
    fn from(item: &OrderItem) -> Self {
        Self {
            quantity: item.quantity,
            product_name: item.product_name.clone(),
            total_price: item.total_price,
        }
    }
}

/// Build the message. `total` is printed as a trailing line and is only
/// honoured for [`NotificationKind::Placed`].
pub fn compose(
    kind: NotificationKind,
    from: &str,
    recipient: Recipient<'_>,
    lines: &[NotificationLine],
    total: Option<i64>,
) -> OutgoingMail {
    let mut body = format!(
        "Dear {},\n\nYou have successfully {}. Your order id is {}.\n\n\n",
        recipient.first_name,
        kind.action(),
        recipient.order_id
    );
    body.push_str(&format!("Your {}: \n\n", kind.section()));
    for line in lines {
        body.push_str(&format!(
            "{}x {}  ${}\n",
            line.quantity,
            line.product_name,
            format_amount(line.total_price)
        ));
    }
    if let (NotificationKind::Placed, Some(total)) = (kind, total) {
        body.push_str(&format!("\n\n\nTotal: ${}", format_amount(total)));
    }

    OutgoingMail {
        subject: format!("Order nr. {}", recipient.order_id),
        body,
        from: from.to_string(),
        to: vec![recipient.email.to_string()],
    }
}

pub async fn compose_and_send(
    mailer: &dyn Mailer,
    from: &str,
    kind: NotificationKind,
    recipient: Recipient<'_>,
    lines: &[NotificationLine],
    total: Option<i64>,
) -> AppResult<()> {
    let mail = compose(kind, from, recipient, lines, total);
    mailer.send(&mail).await?;
    tracing::info!(
        order_id = %recipient.order_id,
        kind = ?kind,
        lines = lines.len(),
        "notification sent"
    );
    Ok(())
}
