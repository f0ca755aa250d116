mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::{TestApp, PASSWORD};

fn registration(email: &str, password: &str, confirm: &str) -> serde_json::Value {
    json!({
        "email": email,
        "first_name": "Ada",
        "password": password,
        "confirm_password": confirm,
    })
}

#[tokio::test]
async fn registration_creates_three_floors_and_a_session() -> Result<()> {
    let app = TestApp::new().await?;

    let res = app.post("/register", None, registration("ada@example.com", PASSWORD, PASSWORD)).await?;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.data()["message"], "Account created!");
    assert_eq!(res.data()["user"]["email"], "ada@example.com");
    assert!(res.data()["user"].get("password_hash").is_none());

    let token = res.session_cookie().unwrap_or_default();
    assert!(!token.is_empty());
    assert_eq!(res.data()["token"], token.as_str());

    assert_eq!(app.count("users").await?, 1);
    assert_eq!(app.count("floors").await?, 3);
    assert_eq!(app.count("sessions").await?, 1);

    let home = app.get("/home", Some(&token)).await?;
    assert_eq!(home.status, StatusCode::OK);
    let labels: Vec<_> = home.data()["floors"]
        .as_array()
        .map(|floors| floors.iter().filter_map(|f| f["floor_number"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(labels, ["Floor 1", "Floor 2", "Floor 3"]);
    Ok(())
}

#[tokio::test]
async fn registration_rules_apply_in_order() -> Result<()> {
    let app = TestApp::new().await?;

    let cases = [
        // Short email wins even though passwords also mismatch
        (registration("a@b", "short", "other"), "Email must be greater than 3 characters."),
        (registration("ada@example.com", "longenough", "different"), "Passwords don't match."),
        (registration("ada@example.com", "short", "short"), "Password must be at least 7 characters."),
    ];

    for (body, message) in cases {
        let res = app.post("/register", None, body).await?;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.body["error"], message);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert!(res.session_cookie().is_none());
    }

    assert_eq!(app.count("users").await?, 0);
    assert_eq!(app.count("floors").await?, 0);
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_rejected_without_writes() -> Result<()> {
    let app = TestApp::new().await?;
    app.register("ada@example.com").await?;

    let res = app.post("/register", None, registration("ada@example.com", PASSWORD, PASSWORD)).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "Email already exists.");
    assert_eq!(app.count("users").await?, 1);
    assert_eq!(app.count("floors").await?, 3);
    Ok(())
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() -> Result<()> {
    let app = TestApp::new().await?;

    let res = app.post("/register", None, json!({ "email": "ada@example.com" })).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["code"], "BAD_REQUEST");
    Ok(())
}

#[tokio::test]
async fn login_distinguishes_unknown_email_from_wrong_password() -> Result<()> {
    let app = TestApp::new().await?;
    app.register("ada@example.com").await?;

    let res = app
        .post("/login", None, json!({ "email": "nobody@example.com", "password": PASSWORD }))
        .await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["error"], "Email does not exist.");

    let res = app
        .post("/login", None, json!({ "email": "ada@example.com", "password": "wrong-password" }))
        .await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["error"], "Incorrect password, try again.");

    let res = app
        .post("/login", None, json!({ "email": "ada@example.com", "password": PASSWORD }))
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.session_cookie().is_some_and(|t| !t.is_empty()));
    Ok(())
}

#[tokio::test]
async fn protected_routes_redirect_anonymous_callers() -> Result<()> {
    let app = TestApp::new().await?;

    for path in [
        "/home",
        "/devices",
        "/help_info",
        "/start",
        "/floor-1-rooms-devices",
        "/floor-2-rooms-devices/1",
        "/createpage3",
        "/floor-3-rooms-devices/1/delete",
    ] {
        let res = app.get(path, None).await?;
        assert_eq!(res.status, StatusCode::SEE_OTHER, "{}", path);
        assert_eq!(res.location(), Some("/login"), "{}", path);
    }

    let res = app.get("/home", Some("not-a-token")).await?;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.session_cookie().as_deref(), Some(""));
    Ok(())
}

#[tokio::test]
async fn public_pages_need_no_session() -> Result<()> {
    let app = TestApp::new().await?;

    for path in ["/", "/health", "/login", "/register"] {
        let res = app.get(path, None).await?;
        assert_eq!(res.status, StatusCode::OK, "{}", path);
        assert_eq!(res.body["success"], true, "{}", path);
    }
    Ok(())
}

#[tokio::test]
async fn logout_revokes_the_session() -> Result<()> {
    let app = TestApp::new().await?;
    let token = app.register("ada@example.com").await?;

    assert_eq!(app.get("/home", Some(&token)).await?.status, StatusCode::OK);

    let res = app.get("/logout", Some(&token)).await?;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), Some("/login"));
    assert_eq!(res.session_cookie().as_deref(), Some(""));
    assert_eq!(app.count("sessions").await?, 0);

    let res = app.get("/home", Some(&token)).await?;
    assert_eq!(res.status, StatusCode::SEE_OTHER);

    // Logging out again, or anonymously, still just redirects
    assert_eq!(app.get("/logout", Some(&token)).await?.status, StatusCode::SEE_OTHER);
    assert_eq!(app.get("/logout", None).await?.status, StatusCode::SEE_OTHER);
    Ok(())
}

#[tokio::test]
async fn sessions_are_independent() -> Result<()> {
    let app = TestApp::new().await?;
    let first = app.register("ada@example.com").await?;

    let res = app
        .post("/login", None, json!({ "email": "ada@example.com", "password": PASSWORD }))
        .await?;
    let second = res.session_cookie().unwrap_or_default();

    app.get("/logout", Some(&first)).await?;

    assert_eq!(app.get("/home", Some(&first)).await?.status, StatusCode::SEE_OTHER);
    assert_eq!(app.get("/home", Some(&second)).await?.status, StatusCode::OK);
    Ok(())
}
