use eco_marketplace_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    models::{Category, ListingStatus},
    services::auth_service::hash_password,
};
use uuid::Uuid;

struct DemoListing {
    title: &'static str,
    description: &'static str,
    category: Category,
    quantity: &'static str,
    unit: &'static str,
    price: Option<f64>,
    status: ListingStatus,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config).await?;
    run_migrations(&pool).await?;

    let mill_id = ensure_account(
        &pool,
        "contact@northmill.example",
        "demo1234",
        "North Mill Textiles",
        "Lyon",
    )
    .await?;
    let works_id = ensure_account(
        &pool,
        "hello@oakworks.example",
        "demo1234",
        "Oak Works Joinery",
        "Nantes",
    )
    .await?;

    seed_listings(
        &pool,
        mill_id,
        Some("Lyon"),
        &[
            DemoListing {
                title: "Cotton offcuts",
                description: "Clean cotton jersey offcuts, mixed colours, bagged.",
                category: Category::Textile,
                quantity: "120",
                unit: "kg",
                price: Some(0.8),
                status: ListingStatus::Available,
            },
            DemoListing {
                title: "Cardboard tubes",
                description: "Fabric roll cores, 1.6 m long, reusable for shipping.",
                category: Category::Paper,
                quantity: "300",
                unit: "pieces",
                price: None,
                status: ListingStatus::Available,
            },
        ],
    )
    .await?;

    seed_listings(
        &pool,
        works_id,
        Some("Nantes"),
        &[
            DemoListing {
                title: "Oak sawdust",
                description: "Dry oak sawdust, suitable for animal bedding or briquettes.",
                category: Category::Wood,
                quantity: "2",
                unit: "m3",
                price: Some(15.0),
                status: ListingStatus::Available,
            },
            DemoListing {
                title: "Pallet wood",
                description: "Dismantled pallets, nails removed, mixed softwood.",
                category: Category::Wood,
                quantity: "40",
                unit: "pallets",
                price: Some(2.5),
                status: ListingStatus::Reserved,
            },
        ],
    )
    .await?;

    println!("Seed completed. Accounts: {mill_id}, {works_id}");
    Ok(())
}

async fn ensure_account(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    company_name: &str,
    location: &str,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password.to_string())
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO accounts (id, email, password_hash, company_name, location)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET company_name = EXCLUDED.company_name
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(company_name)
    .bind(location)
    .fetch_one(pool)
    .await?;

    println!("Ensured account {email} ({company_name})");
    Ok(id)
}

/// Inserts each listing unless the owner already has one with the same title.
async fn seed_listings(
    pool: &sqlx::PgPool,
    owner_id: Uuid,
    location: Option<&str>,
    listings: &[DemoListing],
) -> anyhow::Result<()> {
    for listing in listings {
        let result = sqlx::query(
            r#"
            INSERT INTO listings
                (id, owner_id, title, description, category, quantity, unit, location, price, status)
            SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $10
            WHERE NOT EXISTS (SELECT 1 FROM listings WHERE owner_id = $2 AND title = $3)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(listing.title)
        .bind(listing.description)
        .bind(listing.category.as_str())
        .bind(listing.quantity)
        .bind(listing.unit)
        .bind(location)
        .bind(listing.price)
        .bind(listing.status.as_str())
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            println!("Seeded listing {}", listing.title);
        }
    }
    Ok(())
}
