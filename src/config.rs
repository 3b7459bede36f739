use std::env;

use anyhow::{Context, bail};
use chrono::TimeDelta;

/// Which unit price a cancellation or reconciliation notice reports.
///
/// Item listings shown at creation and search time always use the price
/// frozen on the order item; this only affects cancellation and update mails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancellationPricing {
    /// Current catalog price of the product.
    Current,
    /// Price stored on the order item when the order was placed.
    Frozen,
}

impl std::str::FromStr for CancellationPricing {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "current" => Ok(Self::Current),
            "frozen" => Ok(Self::Frozen),
            other => bail!("unknown cancellation pricing '{other}', expected 'current' or 'frozen'"),
        }
    }
}

/// Settings the order engine needs at request time.
#[derive(Debug, Clone)]
pub struct OrderSettings {
    pub mail_from: String,
    pub cancellation_window: TimeDelta,
    pub pricing: CancellationPricing,
}

impl OrderSettings {
    pub fn window_hours(&self) -> i64 {
        self.cancellation_window.num_hours()
    }
}

impl Default for OrderSettings {
    fn default() -> Self {
        Self {
            mail_from: "orders@example.com".to_string(),
            cancellation_window: TimeDelta::hours(24),
            pricing: CancellationPricing::Current,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub orders: OrderSettings,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);

        let defaults = OrderSettings::default();
        let mail_from = env::var("MAIL_FROM").unwrap_or(defaults.mail_from);
        let window_hours = match env::var("CANCELLATION_WINDOW_HOURS") {
            Ok(raw) => raw
                .parse::<i64>()
                .with_context(|| format!("invalid CANCELLATION_WINDOW_HOURS '{raw}'"))?,
            Err(_) => 24,
        };
        if window_hours <= 0 {
            bail!("CANCELLATION_WINDOW_HOURS must be positive, got {window_hours}");
        }
        let pricing = match env::var("CANCELLATION_PRICING") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.pricing,
        };

        Ok(Self {
            port,
            database_url,
            host,
            orders: OrderSettings {
                mail_from,
                cancellation_window: TimeDelta::hours(window_hours),
                pricing,
            },
        })
    }
}
