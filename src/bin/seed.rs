use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use shop_orders::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::products::{ActiveModel as ProductActive, Column as ProductCol, Entity as Products},
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let created = seed_products(&orm).await?;

    println!("Seed completed. {created} new products");
    Ok(())
}

async fn seed_products(orm: &DatabaseConnection) -> anyhow::Result<usize> {
    let products = [
        ("Green tea", "Loose leaf, 100 g", 1000),
        ("Black tea", "Assam blend, 100 g", 500),
        ("Red tea", "Rooibos, 80 g", 750),
        ("Tea cup", "Porcelain, 250 ml", 1250),
    ];

    let mut created = 0;
    for (name, desc, price) in products {
        let exists = Products::find()
            .filter(ProductCol::Name.eq(name))
            .one(orm)
            .await?
            .is_some();
        if exists {
            continue;
        }

        ProductActive {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            description: Set(Some(desc.to_string())),
            price: Set(price),
            created_at: Set(Utc::now().into()),
        }
        .insert(orm)
        .await?;
        created += 1;
        println!("Seeded product {name}");
    }

    Ok(created)
}
