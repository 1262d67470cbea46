use anyhow::{Context, Result};
use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tempfile::tempdir;
use tower::util::ServiceExt; // for `oneshot`

use leavedesk::create_app;

async fn setup(db_name: &str, dir: &tempfile::TempDir) -> Result<(Router, SqlitePool)> {
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
    let app = create_app(pool.clone()).await?;
    Ok((app, pool))
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

    let resp: Response = app.clone().oneshot(request).await?;
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), 10_485_760).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, value))
}

#[tokio::test]
async fn full_leave_request_flow() -> Result<()> {
    let dir = tempdir().context("failed to create tempdir")?;
    let (app, pool) = setup("integration.db", &dir).await?;

    // -- supervisor signs up and logs in
    let (status, supervisor) = send(
        &app,
        "POST",
        "/api/supervisors/signup",
        None,
        Some(json!({
            "email": "sup@example.com",
            "first_name": "Sahar",
            "last_name": "Kaviani",
            "national_id": "1111111111",
            "password": "password123"
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED, "supervisor signup: {supervisor}");
    let supervisor_id = supervisor["id"].as_str().context("supervisor id")?.to_string();

    let (status, login) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "sup@example.com", "password": "password123"})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK, "supervisor login: {login}");
    let sup_token = login["token"].as_str().context("token")?.to_string();

    // -- supervisor onboards an employee; becomes the assigned supervisor
    let (status, employee) = send(
        &app,
        "POST",
        "/api/employees/signup",
        Some(&sup_token),
        Some(json!({
            "email": "emp@example.com",
            "first_name": "Omid",
            "last_name": "Rahimi",
            "national_id": "2222222222",
            "password": "password123"
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED, "employee signup: {employee}");
    assert_eq!(employee["supervisor_id"], json!(supervisor_id));
    assert_eq!(employee["leave_balance"], json!(30));

    let (status, login) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "emp@example.com", "password": "password123"})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    let emp_token = login["token"].as_str().context("token")?.to_string();

    // Trim the balance so the arithmetic below is easy to follow.
    sqlx::query("UPDATE employees SET leave_balance = 5")
        .execute(&pool)
        .await?;

    // -- employee files a request
    let (status, request) = send(
        &app,
        "POST",
        "/api/leave-requests",
        Some(&emp_token),
        Some(json!({
            "start_date": "2026-09-01",
            "end_date": "2026-09-03",
            "reason": "family visit"
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED, "leave create: {request}");
    assert_eq!(request["status"], json!("pending"));
    let request_id = request["id"].as_str().context("request id")?.to_string();

    // -- supervisor sees it in their scope and approves
    let (status, listed) = send(&app, "GET", "/api/leave-requests", Some(&sup_token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/leave-requests/{request_id}/status"),
        Some(&sup_token),
        Some(json!({"status": "approved"})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK, "approve: {updated}");
    assert_eq!(updated["status"], json!("approved"));

    // -- balance went 5 -> 4, visible in the employee profile
    let (status, profile) = send(&app, "GET", "/api/profile", Some(&emp_token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["leave_balance"], json!(4));

    // -- overlapping request is rejected outright
    let (status, overlap) = send(
        &app,
        "POST",
        "/api/leave-requests",
        Some(&emp_token),
        Some(json!({"start_date": "2026-09-02", "end_date": "2026-09-04"})),
    )
    .await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "overlap: {overlap}");
    assert_eq!(overlap["error"], json!("overlapping_request"));

    // -- a disjoint request goes through and gets rejected by the supervisor
    let (status, second) = send(
        &app,
        "POST",
        "/api/leave-requests",
        Some(&emp_token),
        Some(json!({"start_date": "2026-09-05", "end_date": "2026-09-07"})),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    let second_id = second["id"].as_str().context("second id")?.to_string();

    let (status, rejected) = send(
        &app,
        "PUT",
        &format!("/api/leave-requests/{second_id}/status"),
        Some(&sup_token),
        Some(json!({"status": "rejected"})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rejected["status"], json!("rejected"));

    // -- rejection spends nothing
    let (_, profile) = send(&app, "GET", "/api/profile", Some(&emp_token), None).await?;
    assert_eq!(profile["leave_balance"], json!(4));

    // -- supervisor profile is the account record
    let (status, sup_profile) = send(&app, "GET", "/api/profile", Some(&sup_token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sup_profile["role"], json!("supervisor"));
    assert!(sup_profile.get("leave_balance").is_none());

    Ok(())
}

#[tokio::test]
async fn employee_listing_is_scoped_to_the_supervisor() -> Result<()> {
    let dir = tempdir()?;
    let (app, _pool) = setup("employees.db", &dir).await?;

    for (email, national_id) in [("a@example.com", "1010101010"), ("b@example.com", "2020202020")] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/supervisors/signup",
            None,
            Some(json!({
                "email": email,
                "first_name": "Sup",
                "last_name": "Visor",
                "national_id": national_id,
                "password": "password123"
            })),
        )
        .await?;
        assert_eq!(status, StatusCode::CREATED);
    }

    let mut tokens = Vec::new();
    for email in ["a@example.com", "b@example.com"] {
        let (_, login) = send(
            &app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": email, "password": "password123"})),
        )
        .await?;
        tokens.push(login["token"].as_str().unwrap().to_string());
    }

    // Supervisor A onboards two employees, B onboards one.
    for (token, email, national_id) in [
        (&tokens[0], "e1@example.com", "3030303030"),
        (&tokens[0], "e2@example.com", "4040404040"),
        (&tokens[1], "e3@example.com", "5050505050"),
    ] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/employees/signup",
            Some(token),
            Some(json!({
                "email": email,
                "first_name": "Em",
                "last_name": "Ployee",
                "national_id": national_id,
                "password": "password123"
            })),
        )
        .await?;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, list_a) = send(&app, "GET", "/api/employees", Some(&tokens[0]), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list_a.as_array().map(Vec::len), Some(2));

    let (_, list_b) = send(&app, "GET", "/api/employees", Some(&tokens[1]), None).await?;
    assert_eq!(list_b.as_array().map(Vec::len), Some(1));
    assert_eq!(list_b[0]["email"], json!("e3@example.com"));

    // Employees see an empty employee list, not an error.
    let (_, login) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "e1@example.com", "password": "password123"})),
    )
    .await?;
    let emp_token = login["token"].as_str().unwrap();
    let (status, list_emp) = send(&app, "GET", "/api/employees", Some(emp_token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list_emp.as_array().map(Vec::len), Some(0));

    Ok(())
}
