mod common;

use chrono::{TimeDelta, TimeZone, Utc};
use common::{spawn_app, spawn_app_with};
use shop_orders::{config::OrderSettings, error::AppError, services::order_service};
use uuid::Uuid;

#[test]
fn window_boundaries_use_sub_day_precision() {
    let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
    let window = TimeDelta::hours(24);

    let just_inside = now - (TimeDelta::hours(23) + TimeDelta::minutes(59));
    let just_outside = now - (TimeDelta::hours(24) + TimeDelta::minutes(1));
    let days_old = now - TimeDelta::days(3);

    assert!(order_service::within_window(just_inside, now, window));
    assert!(!order_service::within_window(just_outside, now, window));
    assert!(!order_service::within_window(days_old, now, window));
    assert!(order_service::within_window(now, now, window));
}

#[tokio::test]
async fn window_check_follows_order_age() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let tea = app.product("Green tea", 1000).await?;
    let created = app.place_order(&[(&tea, 1)]).await?;
    let order_id = created.order.id;

    assert!(order_service::is_within_cancellation_window(&app.state, order_id).await?);

    app.age_order(order_id, TimeDelta::hours(23) + TimeDelta::minutes(59)).await?;
    assert!(order_service::is_within_cancellation_window(&app.state, order_id).await?);

    app.age_order(order_id, TimeDelta::hours(24) + TimeDelta::minutes(1)).await?;
    assert!(!order_service::is_within_cancellation_window(&app.state, order_id).await?);
    Ok(())
}

#[tokio::test]
async fn window_check_for_unknown_order_is_not_found() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let result = order_service::is_within_cancellation_window(&app.state, Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::NotFound)));
    Ok(())
}

#[tokio::test]
async fn configured_window_is_honoured() -> anyhow::Result<()> {
    let app = spawn_app_with(OrderSettings {
        cancellation_window: TimeDelta::hours(2),
        ..OrderSettings::default()
    })
    .await?;
    let tea = app.product("Green tea", 1000).await?;
    let created = app.place_order(&[(&tea, 1)]).await?;
    app.age_order(created.order.id, TimeDelta::hours(3)).await?;

    let result = order_service::cancel_order(&app.state, created.order.id).await;
    match result {
        Err(err @ AppError::WindowExceeded { hours: 2 }) => assert_eq!(
            err.to_string(),
            "This order can not be cancelled due to the time that has passed (2 hours)"
        ),
        other => panic!("expected window exceeded, got {other:?}"),
    }
    Ok(())
}
