mod common;

use common::spawn_app;
use shop_orders::{
    dto::products::CreateProductRequest,
    error::AppError,
    routes::params::ProductQuery,
    services::product_service,
};
use uuid::Uuid;

#[tokio::test]
async fn list_filters_and_paginates() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    app.product("Green tea", 1000).await?;
    app.product("Black tea", 500).await?;
    app.product("Tea cup", 1250).await?;

    let (all, meta) = product_service::list_products(&app.state, ProductQuery::default()).await?;
    assert_eq!(all.items.len(), 3);
    assert_eq!(meta.total, Some(3));

    let (teas, _) = product_service::list_products(
        &app.state,
        ProductQuery {
            q: Some("Green".into()),
            ..ProductQuery::default()
        },
    )
    .await?;
    let names: Vec<&str> = teas.items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Green tea"]);

    let (page, meta) = product_service::list_products(
        &app.state,
        ProductQuery {
            page: Some(2),
            per_page: Some(2),
            q: None,
        },
    )
    .await?;
    assert_eq!(page.items.len(), 1);
    assert_eq!(meta.page, Some(2));
    Ok(())
}

#[tokio::test]
async fn get_and_create_validation() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let tea = app.product("Green tea", 1000).await?;

    let found = product_service::get_product(&app.state, tea.id).await?;
    assert_eq!(found.price, 1000);

    let missing = product_service::get_product(&app.state, Uuid::new_v4()).await;
    assert!(matches!(missing, Err(AppError::NotFound)));

    let negative = product_service::create_product(
        &app.state,
        CreateProductRequest {
            name: "Bad".into(),
            description: None,
            price: -1,
        },
    )
    .await;
    assert!(matches!(negative, Err(AppError::BadRequest(_))));
    Ok(())
}

#[tokio::test]
async fn duplicate_name_is_a_client_error() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    app.product("Tea", 100).await?;

    let again = product_service::create_product(
        &app.state,
        CreateProductRequest {
            name: " Tea ".into(),
            description: None,
            price: 200,
        },
    )
    .await;
    assert!(matches!(again, Err(AppError::BadRequest(msg)) if msg == "product name already exists"));

    let (all, _) = product_service::list_products(&app.state, ProductQuery::default()).await?;
    assert_eq!(all.items.len(), 1);
    assert_eq!(all.items[0].price, 100);
    Ok(())
}
