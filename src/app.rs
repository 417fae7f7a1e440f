use axum::{
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::handlers::{protected, public, root};
use crate::middleware::require_user;
use crate::state::AppState;

/// Build the full HTTP application
pub fn app(state: AppState) -> Router {
    let protected_routes = Router::new()
        .merge(user_routes())
        .merge(subject_routes())
        .merge(note_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user));

    let mut router = Router::new()
        // Public
        .route("/", get(root::home))
        .route("/health", get(root::health))
        .merge(public_routes())
        // Bearer token required
        .merge(protected_routes);

    let frontend_dir = &state.config.server.frontend_dir;
    if frontend_dir.is_dir() {
        tracing::info!("Serving frontend assets from {}", frontend_dir.display());
        router = router.nest_service("/app", ServeDir::new(frontend_dir));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config)),
        )
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(public::users::register))
        .route("/users/login", post(public::users::login))
        .route("/chatbot/generate", post(public::chatbot::generate))
}

fn user_routes() -> Router<AppState> {
    use protected::users;

    Router::new()
        .route("/users/is_auth", get(users::is_auth))
        .route(
            "/users/profile",
            put(users::update_profile).delete(users::delete_profile),
        )
}

fn subject_routes() -> Router<AppState> {
    use protected::subjects;

    Router::new()
        .route("/subjects/create", post(subjects::create))
        .route("/subjects/get", get(subjects::list))
        .route("/subjects/get_subject/:id", get(subjects::get))
        .route("/subjects/update/:id", put(subjects::update))
        .route("/subjects/delete/:id", delete(subjects::delete))
}

fn note_routes() -> Router<AppState> {
    use protected::notes;

    Router::new()
        .route("/notes/create", post(notes::create))
        .route("/notes/get", get(notes::list))
        .route("/notes/get_note/:id", get(notes::get))
        .route("/notes/update/:id", put(notes::update))
        .route("/notes/delete/:id", delete(notes::delete))
}

/// Explicit origin allow-list with credentials; methods and headers mirror
/// the preflight request.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}
