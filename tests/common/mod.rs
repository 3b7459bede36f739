#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use shop_orders::{
    config::OrderSettings,
    db::{create_orm_conn, run_migrations},
    dto::{cart::AddToCartRequest, orders::CreateOrderRequest, orders::OrderWithItems, products::CreateProductRequest},
    entity::{
        orders::{ActiveModel as OrderActive, Entity as Orders},
        products::{ActiveModel as ProductActive, Entity as Products},
    },
    mail::{MailError, Mailer, OutgoingMail},
    models::Product,
    services::{cart_service, order_service, product_service},
    state::AppState,
};
use uuid::Uuid;

/// Keeps every message it is asked to send; can be switched to fail.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
    fail: AtomicBool,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }

    pub fn fail_next_sends(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(MailError::Unavailable("smtp connection refused".into()));
        }
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

pub struct TestApp {
    pub state: AppState,
    pub mailer: Arc<RecordingMailer>,
}

pub async fn spawn_app() -> anyhow::Result<TestApp> {
    spawn_app_with(OrderSettings::default()).await
}

pub async fn spawn_app_with(settings: OrderSettings) -> anyhow::Result<TestApp> {
    let orm = create_orm_conn("sqlite::memory:").await?;
    run_migrations(&orm).await?;

    let mailer = Arc::new(RecordingMailer::default());
    let state = AppState::new(orm, mailer.clone(), settings);
    Ok(TestApp { state, mailer })
}

impl TestApp {
    pub async fn product(&self, name: &str, price: i64) -> anyhow::Result<Product> {
        let product = product_service::create_product(
            &self.state,
            CreateProductRequest {
                name: name.to_string(),
                description: None,
                price,
            },
        )
        .await?;
        Ok(product)
    }

    pub async fn add_to_cart(&self, cart_id: Uuid, product_id: Uuid, quantity: i32) -> anyhow::Result<()> {
        cart_service::add_to_cart(
            &self.state,
            cart_id,
            AddToCartRequest {
                product_id,
                quantity,
                override_quantity: false,
            },
        )
        .await?;
        Ok(())
    }

    /// Place an order for the given `(product, quantity)` lines and forget
    /// the "placed" mail.
    pub async fn place_order(&self, lines: &[(&Product, i32)]) -> anyhow::Result<OrderWithItems> {
        let cart_id = Uuid::new_v4();
        for (product, quantity) in lines {
            self.add_to_cart(cart_id, product.id, *quantity).await?;
        }
        let created = order_service::create_order(&self.state, order_form(cart_id)).await?;
        self.mailer.clear();
        Ok(created)
    }

    pub async fn order_exists(&self, order_id: Uuid) -> anyhow::Result<bool> {
        Ok(Orders::find_by_id(order_id).one(&self.state.orm).await?.is_some())
    }

    /// Move an order's creation time into the past.
    pub async fn age_order(&self, order_id: Uuid, age: TimeDelta) -> anyhow::Result<()> {
        let order = Orders::find_by_id(order_id)
            .one(&self.state.orm)
            .await?
            .expect("order to age");
        let mut active: OrderActive = order.into();
        active.created_at = Set((Utc::now() - age).into());
        active.update(&self.state.orm).await?;
        Ok(())
    }

    pub async fn reprice(&self, product_id: Uuid, price: i64) -> anyhow::Result<()> {
        let product = Products::find_by_id(product_id)
            .one(&self.state.orm)
            .await?
            .expect("product to reprice");
        let mut active: ProductActive = product.into();
        active.price = Set(price);
        active.update(&self.state.orm).await?;
        Ok(())
    }
}

pub fn order_form(cart_id: Uuid) -> CreateOrderRequest {
    CreateOrderRequest {
        cart_id,
        first_name: "Ana".into(),
        email: "ana@example.com".into(),
    }
}
