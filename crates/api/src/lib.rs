pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::{
    Router,
    http::HeaderValue,
    routing::{delete, get, post, put},
};
use state::AppState;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.settings.app.cors_origins);

    let auth_routes = Router::new()
        .route("/signup", post(routes::auth::signup))
        .route("/signin", post(routes::auth::signin))
        .route("/signout", get(routes::auth::signout))
        .route("/validate-invite", post(routes::auth::validate_invite))
        .route("/register-invited", post(routes::auth::register_invited));

    let user_routes = Router::new()
        .route("/", get(routes::user::list))
        .route("/invite", post(routes::user::invite))
        .route("/update/{user_id}", post(routes::user::update))
        .route("/delete/{user_id}", delete(routes::user::delete))
        .route("/listings/{user_id}", get(routes::user::listings))
        .route("/{user_id}", get(routes::user::get));

    let listing_routes = Router::new()
        .route("/", get(routes::listing::search))
        .route("/create", post(routes::listing::create))
        .route("/update/{listing_id}", post(routes::listing::update))
        .route("/delete/{listing_id}", delete(routes::listing::delete))
        .route("/user/{listing_id}", get(routes::listing::owner_contact))
        .route("/{listing_id}", get(routes::listing::get));

    let category_routes = Router::new()
        .route("/", get(routes::category::list))
        .route("/create", post(routes::category::create))
        .route("/update/{category_id}", put(routes::category::update))
        .route("/delete/{category_id}", delete(routes::category::delete))
        .route("/{category_id}", get(routes::category::get));

    let city_routes = Router::new()
        .route("/", get(routes::city::list))
        .route("/create", post(routes::city::create))
        .route("/update/{city_id}", put(routes::city::update))
        .route("/delete/{city_id}", delete(routes::city::delete))
        .route("/{city_id}", get(routes::city::get));

    let message_routes = Router::new()
        .route("/send-public", post(routes::message::send_public))
        .route("/sell-property", post(routes::message::sell_property));

    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/user", user_routes)
        .nest("/listing", listing_routes)
        .nest("/categories", category_routes)
        .nest("/cities", city_routes)
        .nest("/messages", message_routes);

    let health = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api)
        .merge(health)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Any origin when none are configured; otherwise only the listed ones.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(allowed))
    }
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
