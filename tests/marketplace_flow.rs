use eco_marketplace_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    dto::{
        auth::{LoginRequest, RegisterRequest},
        users::UpdateProfileRequest,
        wastes::{CreateListingRequest, UpdateListingRequest},
    },
    error::AppError,
    middleware::auth::AuthUser,
    models::{Category, ListingStatus},
    routes::params::ListingQuery,
    services::{
        auth_service::{self, identity_of},
        dashboard_service, favorite_service, listing_service, user_service,
    },
    state::AppState,
};

// Integration flow: two companies register, one lists materials, the other
// browses, favorites and is kept away from the first one's listings.
#[tokio::test]
async fn listing_favorite_and_dashboard_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    // Accounts
    let seller = register(&state, "seller@flow.example", "North Mill").await?;
    let duplicate = auth_service::register_user(
        &state,
        register_request("seller@flow.example", "Someone Else"),
    )
    .await;
    assert!(
        matches!(duplicate, Err(AppError::Conflict(ref msg)) if msg == "Email already registered")
    );
    let buyer = register(&state, "buyer@flow.example", "Oak Works").await?;

    let wrong = auth_service::login_user(
        &state,
        LoginRequest {
            email: Some("seller@flow.example".into()),
            password: Some("not-the-password".into()),
        },
    )
    .await;
    assert!(matches!(wrong, Err(AppError::InvalidCredentials)));

    let login = auth_service::login_user(
        &state,
        LoginRequest {
            email: Some("seller@flow.example".into()),
            password: Some("secret123".into()),
        },
    )
    .await?;
    assert_eq!(state.keys.verify(&login.token)?, seller);

    // Listings: 25 plastic batches plus one glass lot that gets sold.
    for n in 1..=25 {
        listing_service::create_listing(&state, &seller, batch(&format!("Flowtag batch {n}"))).await?;
    }
    let mut glass = batch("Flowtag cullet");
    glass.category = Some("glass".into());
    let glass = listing_service::create_listing(&state, &seller, glass).await?.waste;
    assert_eq!(glass.status, ListingStatus::Available);

    let sold = listing_service::update_listing(
        &state,
        &seller,
        glass.id,
        UpdateListingRequest {
            status: Some("sold".into()),
            ..Default::default()
        },
    )
    .await?
    .waste;
    assert_eq!(sold.status, ListingStatus::Sold);
    assert_eq!(sold.title, "Flowtag cullet");

    // Search and pagination
    let first = listing_service::list_listings(&state, search("flowtag", None, None)).await?;
    assert_eq!(first.pagination.total, 25);
    assert_eq!(first.pagination.limit, 12);
    assert_eq!(first.pagination.total_pages, 3);
    assert_eq!(first.wastes.len(), 12);
    assert!(first.wastes.iter().all(|w| w.company_name == "North Mill"));

    let last = listing_service::list_listings(&state, search("flowtag", None, Some(3))).await?;
    assert_eq!(last.wastes.len(), 1);

    let sold_only =
        listing_service::list_listings(&state, search("flowtag", Some("sold"), None)).await?;
    assert_eq!(sold_only.pagination.total, 1);
    assert_eq!(sold_only.wastes[0].listing.id, glass.id);

    let mine = listing_service::my_listings(&state, &seller).await?;
    assert_eq!(mine.len(), 26);

    // Ownership
    let target = first.wastes[0].listing.id;
    let forbidden = listing_service::update_listing(
        &state,
        &buyer,
        target,
        UpdateListingRequest {
            title: Some("Hijacked".into()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(forbidden, Err(AppError::Forbidden(_))));
    let forbidden = listing_service::delete_listing(&state, &buyer, target).await;
    assert!(matches!(forbidden, Err(AppError::Forbidden(_))));

    // Favorites
    favorite_service::add_favorite(&state, &buyer, target).await?;
    let again = favorite_service::add_favorite(&state, &buyer, target).await;
    assert!(matches!(again, Err(AppError::Conflict(_))));
    assert!(favorite_service::check_favorite(&state, &buyer, target).await?.is_favorite);
    let favorites = favorite_service::list_favorites(&state, &buyer).await?;
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].listing.id, target);

    // Dashboard
    let stats = dashboard_service::dashboard_stats(&state, &seller).await?;
    assert_eq!(stats.my_listings.total, 26);
    assert_eq!(stats.my_listings.available, 25);
    assert_eq!(stats.my_listings.sold, 1);
    assert_eq!(stats.marketplace.total_accounts, 1);
    let category_sum: i64 = stats.categories.iter().map(|c| c.count).sum();
    assert_eq!(category_sum, stats.marketplace.available_listings);
    assert_eq!(stats.categories[0].category, Category::Plastic);

    let buyer_stats = dashboard_service::dashboard_stats(&state, &buyer).await?;
    assert_eq!(buyer_stats.favorites.total, 1);
    assert_eq!(buyer_stats.my_listings.total, 0);

    // Deleting a favorited listing removes the favorite with it.
    listing_service::delete_listing(&state, &seller, target).await?;
    assert!(favorite_service::list_favorites(&state, &buyer).await?.is_empty());
    assert!(matches!(
        listing_service::get_listing(&state, target).await,
        Err(AppError::NotFound(_))
    ));
    favorite_service::remove_favorite(&state, &buyer, target).await?;

    // Profile replacement clears omitted optional fields.
    let updated = user_service::update_profile(
        &state,
        &buyer,
        UpdateProfileRequest {
            company_name: Some("Oak Works Joinery".into()),
            phone: Some("+33 1 23 45 67 89".into()),
            ..Default::default()
        },
    )
    .await?
    .user;
    assert_eq!(updated.company_name, "Oak Works Joinery");
    assert_eq!(updated.location, None);
    let public = user_service::public_profile(&state, buyer.id).await?;
    assert_eq!(public.company_name, "Oak Works Joinery");

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let config = AppConfig::from_lookup(|key| match key {
        "DATABASE_URL" => Some(database_url.to_string()),
        "JWT_SECRET" => Some("flow-test-secret".to_string()),
        _ => None,
    })?;
    let pool = create_pool(&config).await?;
    run_migrations(&pool).await?;
    sqlx::query("TRUNCATE favorites, listings, accounts")
        .execute(&pool)
        .await?;
    Ok(AppState::new(pool, &config))
}

fn register_request(email: &str, company_name: &str) -> RegisterRequest {
    RegisterRequest {
        email: Some(email.into()),
        password: Some("secret123".into()),
        company_name: Some(company_name.into()),
        location: Some("Lyon".into()),
        ..Default::default()
    }
}

async fn register(state: &AppState, email: &str, company_name: &str) -> anyhow::Result<AuthUser> {
    let resp = auth_service::register_user(state, register_request(email, company_name)).await?;
    assert!(!resp.token.is_empty());
    Ok(identity_of(&resp.user))
}

fn batch(title: &str) -> CreateListingRequest {
    CreateListingRequest {
        title: Some(title.into()),
        description: Some("Clean offcuts from injection moulding".into()),
        category: Some("plastic".into()),
        quantity: Some("500".into()),
        unit: Some("kg".into()),
        location: Some("Lyon".into()),
        price: Some(0.25),
        image_url: None,
    }
}

fn search(term: &str, status: Option<&str>, page: Option<i64>) -> ListingQuery {
    ListingQuery {
        search: Some(term.into()),
        status: status.map(str::to_string),
        page,
        ..Default::default()
    }
}
