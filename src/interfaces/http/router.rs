//! API router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{
    AnalyticsService, BookingService, IdentityService, RestaurantService, ReviewService,
};
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::{ApiResponse, EmptyData, PaginatedResponse};
use crate::interfaces::http::middleware::{auth_middleware, optional_auth_middleware, AuthState};
use crate::interfaces::http::modules::request_id::request_id_middleware;

use super::modules::{admin, auth, bookings, health, metrics, restaurants, reviews, users};

/// Application services shared by every handler
#[derive(Clone)]
pub struct AppServices {
    pub identity: Arc<IdentityService>,
    pub restaurants: Arc<RestaurantService>,
    pub reviews: Arc<ReviewService>,
    pub bookings: Arc<BookingService>,
    pub analytics: Arc<AnalyticsService>,
}

impl AppServices {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig) -> Self {
        Self {
            identity: Arc::new(IdentityService::new(repos.clone(), jwt_config)),
            restaurants: Arc::new(RestaurantService::new(repos.clone())),
            reviews: Arc::new(ReviewService::new(repos.clone())),
            bookings: Arc::new(BookingService::new(repos.clone())),
            analytics: Arc::new(AnalyticsService::new(repos)),
        }
    }
}

/// Router state. Each handler module extracts its own slice via `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub services: AppServices,
    pub auth: AuthState,
    pub db: DatabaseConnection,
    pub metrics: PrometheusHandle,
    pub started_at: Arc<Instant>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(s: &AppState) -> Self {
        s.auth.clone()
    }
}

impl FromRef<AppState> for auth::AuthHandlerState {
    fn from_ref(s: &AppState) -> Self {
        auth::AuthHandlerState {
            identity: Arc::clone(&s.services.identity),
        }
    }
}

impl FromRef<AppState> for restaurants::RestaurantState {
    fn from_ref(s: &AppState) -> Self {
        restaurants::RestaurantState {
            restaurants: Arc::clone(&s.services.restaurants),
            reviews: Arc::clone(&s.services.reviews),
            bookings: Arc::clone(&s.services.bookings),
        }
    }
}

impl FromRef<AppState> for reviews::ReviewState {
    fn from_ref(s: &AppState) -> Self {
        reviews::ReviewState {
            reviews: Arc::clone(&s.services.reviews),
        }
    }
}

impl FromRef<AppState> for bookings::BookingState {
    fn from_ref(s: &AppState) -> Self {
        bookings::BookingState {
            bookings: Arc::clone(&s.services.bookings),
        }
    }
}

impl FromRef<AppState> for admin::AdminState {
    fn from_ref(s: &AppState) -> Self {
        admin::AdminState {
            restaurants: Arc::clone(&s.services.restaurants),
            analytics: Arc::clone(&s.services.analytics),
        }
    }
}

impl FromRef<AppState> for health::HealthState {
    fn from_ref(s: &AppState) -> Self {
        health::HealthState {
            db: s.db.clone(),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

impl FromRef<AppState> for metrics::MetricsState {
    fn from_ref(s: &AppState) -> Self {
        metrics::MetricsState {
            handle: s.metrics.clone(),
        }
    }
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        // Auth
        auth::register,
        auth::register_business,
        auth::register_admin,
        auth::login,
        auth::login_business,
        auth::login_admin,
        auth::get_current_user,
        auth::change_password,
        auth::session_status,
        users::update_profile,
        // Restaurants
        restaurants::search_restaurants,
        restaurants::get_restaurant,
        restaurants::list_restaurant_reviews,
        restaurants::create_restaurant,
        restaurants::update_restaurant,
        restaurants::delete_restaurant,
        restaurants::my_restaurants,
        restaurants::list_restaurant_bookings,
        // Reviews
        reviews::create_review,
        reviews::delete_review,
        // Bookings
        bookings::availability,
        bookings::create_booking,
        bookings::update_booking,
        bookings::cancel_booking,
        bookings::my_bookings,
        // Admin
        admin::pending_restaurants,
        admin::decide_restaurant,
        admin::analytics_summary,
        admin::analytics_trends,
    ),
    components(
        schemas(
            ApiResponse<String>,
            EmptyData,
            PaginatedResponse<restaurants::RestaurantDto>,
            health::HealthResponse,
            health::ComponentHealth,
            auth::LoginRequest,
            auth::RegisterRequest,
            auth::ChangePasswordRequest,
            auth::AuthResponse,
            auth::UserDto,
            auth::SessionStatus,
            users::UpdateProfileRequest,
            restaurants::RestaurantDto,
            restaurants::RestaurantDetailDto,
            restaurants::OwnerSummary,
            restaurants::CreateRestaurantRequest,
            restaurants::UpdateRestaurantRequest,
            reviews::ReviewDto,
            reviews::CreateReviewRequest,
            reviews::ReviewCreatedResponse,
            reviews::ReviewDeletedResponse,
            bookings::SlotDto,
            bookings::BookingDto,
            bookings::MyBookingDto,
            bookings::CreateBookingRequest,
            bookings::UpdateBookingRequest,
            admin::PendingRestaurantDto,
            admin::StatusDecisionRequest,
            admin::DecisionResponse,
            admin::AnalyticsDto,
            admin::RecentUserDto,
            admin::RestaurantCountsDto,
            admin::BookingCountsDto,
            admin::DailyTrendDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Authentication", description = "Registration, login portals, JWT session"),
        (name = "Users", description = "Profile of the signed-in user"),
        (name = "Restaurants", description = "Search, detail and owner management of listings"),
        (name = "Reviews", description = "Reviews and the derived restaurant rating"),
        (name = "Bookings", description = "Table availability and bookings"),
        (name = "Admin", description = "Approval queue and platform analytics"),
    ),
    info(
        title = "Dinebook API",
        version = "1.0.0",
        description = "Restaurant discovery and table booking",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

pub fn create_api_router(
    services: AppServices,
    db: DatabaseConnection,
    metrics_handle: PrometheusHandle,
) -> Router {
    let auth_state = AuthState {
        jwt_config: services.identity.jwt_config().clone(),
    };
    let require_auth = middleware::from_fn_with_state(auth_state.clone(), auth_middleware);

    let state = AppState {
        services,
        auth: auth_state.clone(),
        db,
        metrics: metrics_handle,
        started_at: Arc::new(Instant::now()),
    };

    // ── Auth ────────────────────────────────────────────────────
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/register-business", post(auth::register_business))
        .route("/login", post(auth::login))
        .route("/login-business", post(auth::login_business))
        .route("/login-admin", post(auth::login_admin))
        .merge(
            Router::new()
                .route("/register-admin", post(auth::register_admin))
                .route("/me", get(auth::get_current_user))
                .route("/change-password", put(auth::change_password))
                .route_layer(require_auth.clone()),
        );

    let user_routes = Router::new()
        .route("/me", put(users::update_profile))
        .route_layer(require_auth.clone());

    // ── Restaurants ─────────────────────────────────────────────
    let restaurant_routes = Router::new()
        .route("/", get(restaurants::search_restaurants))
        .route("/{id}/reviews", get(restaurants::list_restaurant_reviews))
        .merge(
            Router::new()
                .route("/{id}", get(restaurants::get_restaurant))
                .route_layer(middleware::from_fn_with_state(
                    auth_state,
                    optional_auth_middleware,
                )),
        )
        .merge(
            Router::new()
                .route("/", post(restaurants::create_restaurant))
                .route("/mine", get(restaurants::my_restaurants))
                .route(
                    "/{id}",
                    put(restaurants::update_restaurant).delete(restaurants::delete_restaurant),
                )
                .route("/{id}/bookings", get(restaurants::list_restaurant_bookings))
                .route_layer(require_auth.clone()),
        );

    let review_routes = Router::new()
        .route("/", post(reviews::create_review))
        .route("/{id}", delete(reviews::delete_review))
        .route_layer(require_auth.clone());

    // ── Bookings ────────────────────────────────────────────────
    let booking_routes = Router::new()
        .route("/", get(bookings::availability))
        .merge(
            Router::new()
                .route("/", post(bookings::create_booking))
                .route("/my", get(bookings::my_bookings))
                .route(
                    "/{id}",
                    patch(bookings::update_booking).delete(bookings::cancel_booking),
                )
                .route_layer(require_auth.clone()),
        );

    // ── Admin ───────────────────────────────────────────────────
    let admin_routes = Router::new()
        .route("/restaurants/pending", get(admin::pending_restaurants))
        .route("/restaurants/{id}/status", put(admin::decide_restaurant))
        .route("/analytics", get(admin::analytics_summary))
        .route("/trends", get(admin::analytics_trends))
        .route_layer(require_auth);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger)
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::prometheus_metrics))
        .route("/api/status", get(auth::session_status))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/restaurants", restaurant_routes)
        .nest("/api/reviews", review_routes)
        .nest("/api/bookings", booking_routes)
        .nest("/api/admin", admin_routes)
        // route_layer so MatchedPath is available to the metrics labels
        .route_layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
