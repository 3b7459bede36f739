use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{config::OrderSettings, mail::Mailer};

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub mailer: Arc<dyn Mailer>,
    pub settings: Arc<OrderSettings>,
}

impl AppState {
    pub fn new(orm: DatabaseConnection, mailer: Arc<dyn Mailer>, settings: OrderSettings) -> Self {
        Self {
            orm,
            mailer,
            settings: Arc::new(settings),
        }
    }
}
