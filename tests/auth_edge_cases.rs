use anyhow::Result;
use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tempfile::tempdir;
use tower::util::ServiceExt;

use leavedesk::create_app;

async fn setup(db_name: &str, dir: &tempfile::TempDir) -> Result<Router> {
    let db_path = dir.path().join(db_name);
    use sqlx::sqlite::SqliteConnectOptions;
    let opts = SqliteConnectOptions::new()
        .filename(db_path.as_path())
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePool::connect_with(opts).await?;

    let migrator = sqlx::migrate::Migrator::new(
        std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations"),
    )
    .await?;
    migrator.run(&pool).await?;

    std::env::set_var("JWT_SECRET", "test-secret");
    Ok(create_app(pool).await?)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))?,
        None => builder.body(Body::empty())?,
    };

    let resp = app.clone().oneshot(request).await?;
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), 10_485_760).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, value))
}

fn signup_body(email: &str, national_id: &str) -> Value {
    json!({
        "email": email,
        "first_name": "Sup",
        "last_name": "Visor",
        "national_id": national_id,
        "password": "password123"
    })
}

#[tokio::test]
async fn signup_and_login_edge_cases() -> Result<()> {
    let dir = tempdir()?;
    let app = setup("auth.db", &dir).await?;

    // 1. Short password
    let (status, _) = send(
        &app,
        "POST",
        "/api/supervisors/signup",
        None,
        Some(json!({
            "email": "short@example.com",
            "first_name": "Short",
            "last_name": "Pass",
            "national_id": "1234567890",
            "password": "short"
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 2. Malformed national id
    let (status, _) = send(
        &app,
        "POST",
        "/api/supervisors/signup",
        None,
        Some(json!({
            "email": "nid@example.com",
            "first_name": "Bad",
            "last_name": "Nid",
            "national_id": "12345",
            "password": "password123"
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 3. Valid signup
    let (status, _) = send(
        &app,
        "POST",
        "/api/supervisors/signup",
        None,
        Some(signup_body("valid@example.com", "1111111111")),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);

    // 4. Duplicate email
    let (status, body) = send(
        &app,
        "POST",
        "/api/supervisors/signup",
        None,
        Some(signup_body("valid@example.com", "2222222222")),
    )
    .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], json!("uniqueness_violation"));

    // 5. Duplicate national id, different email
    let (status, body) = send(
        &app,
        "POST",
        "/api/supervisors/signup",
        None,
        Some(signup_body("other@example.com", "1111111111")),
    )
    .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], json!("uniqueness_violation"));

    // 6. Email uniqueness holds across roles: the supervisor's email cannot
    // be reused for an employee.
    let (_, login) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "valid@example.com", "password": "password123"})),
    )
    .await?;
    let sup_token = login["token"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "POST",
        "/api/employees/signup",
        Some(&sup_token),
        Some(signup_body("valid@example.com", "3333333333")),
    )
    .await?;
    assert_eq!(status, StatusCode::CONFLICT);

    // 7. Login with the wrong password
    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "valid@example.com", "password": "wrongpassword"})),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // 8. Login with an unknown email
    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "nobody@example.com", "password": "password123"})),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // 9. Protected routes without a token
    for uri in ["/api/employees", "/api/leave-requests", "/api/profile"] {
        let (status, body) = send(&app, "GET", uri, None, None).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri} did not reject");
        assert_eq!(body["error"], json!("unauthenticated"));
    }

    // 10. Garbage token
    let (status, _) = send(&app, "GET", "/api/profile", Some("not-a-jwt"), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn employees_cannot_onboard_employees() -> Result<()> {
    let dir = tempdir()?;
    let app = setup("onboard.db", &dir).await?;

    let (status, _) = send(
        &app,
        "POST",
        "/api/supervisors/signup",
        None,
        Some(signup_body("sup@example.com", "1111111111")),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);

    let (_, login) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "sup@example.com", "password": "password123"})),
    )
    .await?;
    let sup_token = login["token"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "POST",
        "/api/employees/signup",
        Some(&sup_token),
        Some(signup_body("emp@example.com", "2222222222")),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);

    let (_, login) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "emp@example.com", "password": "password123"})),
    )
    .await?;
    let emp_token = login["token"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        "/api/employees/signup",
        Some(&emp_token),
        Some(signup_body("emp2@example.com", "3333333333")),
    )
    .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], json!("permission_denied"));

    Ok(())
}

#[tokio::test]
async fn unauthenticated_signup_of_employees_is_rejected() -> Result<()> {
    let dir = tempdir()?;
    let app = setup("anon.db", &dir).await?;

    let (status, body) = send(
        &app,
        "POST",
        "/api/employees/signup",
        None,
        Some(signup_body("emp@example.com", "2222222222")),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], json!("unauthenticated"));

    Ok(())
}
