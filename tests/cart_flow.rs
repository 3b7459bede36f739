mod common;

use common::spawn_app;
use shop_orders::{
    dto::cart::AddToCartRequest,
    error::AppError,
    services::cart_service,
};
use uuid::Uuid;

#[tokio::test]
async fn adding_twice_increments_and_override_replaces() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let tea = app.product("Green tea", 1000).await?;
    let cart_id = Uuid::new_v4();

    app.add_to_cart(cart_id, tea.id, 1).await?;
    app.add_to_cart(cart_id, tea.id, 2).await?;
    let cart = cart_service::list_cart(&app.state, cart_id).await?;
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 3);
    assert_eq!(cart.items[0].product_name, "Green tea");
    assert_eq!(cart.total_price, 3000);

    let entry = cart_service::add_to_cart(
        &app.state,
        cart_id,
        AddToCartRequest {
            product_id: tea.id,
            quantity: 5,
            override_quantity: true,
        },
    )
    .await?;
    assert_eq!(entry.quantity, 5);
    assert_eq!(entry.total_price, 5000);
    Ok(())
}

#[tokio::test]
async fn carts_are_isolated() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let tea = app.product("Green tea", 1000).await?;
    let (mine, theirs) = (Uuid::new_v4(), Uuid::new_v4());

    app.add_to_cart(mine, tea.id, 1).await?;

    assert_eq!(cart_service::list_cart(&app.state, mine).await?.items.len(), 1);
    assert!(cart_service::list_cart(&app.state, theirs).await?.items.is_empty());
    Ok(())
}

#[tokio::test]
async fn invalid_additions_are_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let tea = app.product("Green tea", 1000).await?;
    let cart_id = Uuid::new_v4();

    let zero = cart_service::add_to_cart(
        &app.state,
        cart_id,
        AddToCartRequest {
            product_id: tea.id,
            quantity: 0,
            override_quantity: false,
        },
    )
    .await;
    assert!(matches!(zero, Err(AppError::BadRequest(_))));

    let unknown = cart_service::add_to_cart(
        &app.state,
        cart_id,
        AddToCartRequest {
            product_id: Uuid::new_v4(),
            quantity: 1,
            override_quantity: false,
        },
    )
    .await;
    assert!(matches!(unknown, Err(AppError::BadRequest(_))));
    Ok(())
}

#[tokio::test]
async fn removing_entries() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let tea = app.product("Green tea", 1000).await?;
    let cart_id = Uuid::new_v4();
    app.add_to_cart(cart_id, tea.id, 1).await?;

    cart_service::remove_from_cart(&app.state, cart_id, tea.id).await?;
    assert!(cart_service::list_cart(&app.state, cart_id).await?.items.is_empty());

    let again = cart_service::remove_from_cart(&app.state, cart_id, tea.id).await;
    assert!(matches!(again, Err(AppError::NotFound)));
    Ok(())
}

#[tokio::test]
async fn line_totals_that_overflow_are_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let gold = app.product("Gold bar", i64::MAX / 2 + 1).await?;
    let cart_id = Uuid::new_v4();

    let too_many = app.add_to_cart(cart_id, gold.id, 2).await;
    assert!(too_many.is_err());
    assert!(cart_service::list_cart(&app.state, cart_id).await?.items.is_empty());

    app.add_to_cart(cart_id, gold.id, 1).await?;
    let increment = cart_service::add_to_cart(
        &app.state,
        cart_id,
        AddToCartRequest {
            product_id: gold.id,
            quantity: 1,
            override_quantity: false,
        },
    )
    .await;
    assert!(matches!(increment, Err(AppError::BadRequest(_))));

    let cart = cart_service::list_cart(&app.state, cart_id).await?;
    assert_eq!(cart.items[0].quantity, 1);
    assert_eq!(cart.total_price, i64::MAX / 2 + 1);
    Ok(())
}
