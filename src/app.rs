use std::sync::Arc;

use axum::http::Method;
use axum::routing::{delete, get, post, put};
use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::errors::AppError;
use crate::jwt::JwtConfig;
use crate::routes::{auth, employees, health, leave_requests, profile, supervisors};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub jwt: Arc<JwtConfig>,
}

impl AppState {
    pub fn new(pool: SqlitePool, jwt: JwtConfig) -> Self {
        Self {
            pool,
            jwt: Arc::new(jwt),
        }
    }
}

pub async fn create_app(pool: SqlitePool) -> Result<Router, AppError> {
    let jwt_config = JwtConfig::from_env()?;
    let state = AppState::new(pool, jwt_config);

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_origin(Any)
        .allow_headers(Any);

    let auth_routes = Router::new().route("/login", post(auth::login));

    // Supervisor signup is the public entry point; everything else is
    // behind authentication.
    let supervisor_routes = Router::new().route("/signup", post(supervisors::signup));

    let employee_routes = Router::new()
        .route("/", get(employees::list))
        .route("/signup", post(employees::signup));

    let leave_request_routes = Router::new()
        .route("/", get(leave_requests::list))
        .route("/", post(leave_requests::create))
        .route("/:id/status", put(leave_requests::update_status))
        .route("/:id", delete(leave_requests::delete));

    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/supervisors", supervisor_routes)
        .nest("/employees", employee_routes)
        .nest("/leave-requests", leave_request_routes)
        .route("/profile", get(profile::me))
        .route("/health", get(health::health));

    let router = Router::new()
        .nest("/api", api)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(router)
}
