use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::models;
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "leavedesk API",
        description = "Leave-management backend: supervisors onboard employees, \
employees file leave requests, supervisors approve or reject them against a \
per-employee leave-day balance."
    ),
    paths(
        routes::auth::login,
        routes::supervisors::signup,
        routes::employees::signup,
        routes::employees::list,
        routes::leave_requests::create,
        routes::leave_requests::list,
        routes::leave_requests::update_status,
        routes::leave_requests::delete,
        routes::profile::me,
        routes::health::health,
    ),
    components(
        schemas(
            models::account::Account,
            models::account::Role,
            models::account::SupervisorSignupRequest,
            models::account::LoginRequest,
            models::account::AuthResponse,
            models::employee::Employee,
            models::employee::EmployeeSignupRequest,
            models::leave_request::LeaveRequest,
            models::leave_request::LeaveStatus,
            models::leave_request::LeaveDecision,
            models::leave_request::LeaveCreateRequest,
            models::leave_request::StatusUpdateRequest,
            routes::profile::ProfileResponse,
            routes::health::HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Authentication"),
        (name = "Supervisors", description = "Supervisor onboarding"),
        (name = "Employees", description = "Employee onboarding and listing"),
        (name = "Leave requests", description = "Leave-request lifecycle"),
        (name = "Profile", description = "Caller's role-specific record"),
        (name = "Health", description = "Liveness")
    )
)]
pub struct ApiDoc;

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
                        .build(),
                ),
            );
        }
    }
}

pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

pub fn swagger_routes() -> Router {
    Router::new().merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi()))
}
