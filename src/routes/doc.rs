use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{AuthResponse, LoginRequest, RegisterRequest},
        dashboard::{CategoryCount, DashboardStats, FavoriteStats, MarketplaceStats, OwnListingStats},
        favorites::{FavoriteAdded, FavoriteCheck},
        users::{ProfileUpdated, UpdateProfileRequest},
        wastes::{CreateListingRequest, ListingPage, ListingSaved, UpdateListingRequest},
    },
    models::{
        Account, Category, Favorite, FavoriteListing, Listing, ListingDetail, ListingStatus,
        ListingSummary, PublicProfile,
    },
    response::{ErrorBody, MessageResponse, PageMeta},
    routes::{auth, dashboard, favorites, health, params, users, wastes},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        health::api_info,
        auth::register,
        auth::login,
        users::get_profile,
        users::update_profile,
        users::public_profile,
        wastes::list_wastes,
        wastes::get_waste,
        wastes::my_wastes,
        wastes::create_waste,
        wastes::update_waste,
        wastes::delete_waste,
        favorites::list_favorites,
        favorites::add_favorite,
        favorites::remove_favorite,
        favorites::check_favorite,
        dashboard::stats
    ),
    components(
        schemas(
            Account,
            PublicProfile,
            Category,
            ListingStatus,
            Listing,
            ListingSummary,
            ListingDetail,
            Favorite,
            FavoriteListing,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            UpdateProfileRequest,
            ProfileUpdated,
            CreateListingRequest,
            UpdateListingRequest,
            ListingPage,
            ListingSaved,
            FavoriteAdded,
            FavoriteCheck,
            OwnListingStats,
            FavoriteStats,
            MarketplaceStats,
            CategoryCount,
            DashboardStats,
            params::ListingQuery,
            health::HealthData,
            health::ApiInfo,
            PageMeta,
            ErrorBody,
            MessageResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and service banner"),
        (name = "Auth", description = "Registration and login"),
        (name = "Users", description = "Company profiles"),
        (name = "Wastes", description = "Material listings"),
        (name = "Favorites", description = "Saved listings"),
        (name = "Dashboard", description = "Account and marketplace counters"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
