//! End-to-end flows over the HTTP surface with an in-memory database.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use booking_server::auth::JwtConfig;
use booking_server::core::{Config, ServerState};
use booking_server::db::repository::{self, user::NewUser};
use booking_server::utils::password::hash_password;
use booking_server::api;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use shared::models::Role;
use tower::ServiceExt;

const ADMIN_EMAIL: &str = "root@test.local";
const ADMIN_PASSWORD: &str = "root-password-123";

fn test_config() -> Config {
    Config {
        work_dir: "/tmp/booking-test".into(),
        http_port: 0,
        database_path: None,
        business_timezone: chrono_tz::Asia::Ulaanbaatar,
        jwt: JwtConfig {
            secret: "integration-test-secret-0123456789abcdef".into(),
            expiration_minutes: 60,
            issuer: "booking-server".into(),
            audience: "booking-clients".into(),
        },
        environment: "test".into(),
        bootstrap_admin_email: ADMIN_EMAIL.into(),
        bootstrap_admin_password: Some(ADMIN_PASSWORD.into()),
    }
}

async fn test_app() -> (Router, ServerState) {
    let state = ServerState::in_memory(test_config()).await.unwrap();
    (api::router(state.clone()), state)
}

/// Token for the bootstrapped super admin, minted directly (no login round-trip)
async fn admin_token(state: &ServerState) -> String {
    let admin = repository::user::find_by_email(&state.db.pool, ADMIN_EMAIL)
        .await
        .unwrap()
        .unwrap();
    state.jwt_service.generate_token(&admin).unwrap()
}

/// Create a customer account and return (user_id, token)
async fn customer_token(state: &ServerState, email: &str) -> (i64, String) {
    let hash = hash_password("customer-password").unwrap();
    let user = repository::user::create(&state.db.pool, NewUser {
        name: "Bolor",
        email: Some(email),
        phone: None,
        password_hash: Some(&hash),
        role: Role::Customer,
        shop_id: None,
    })
    .await
    .unwrap();
    let token = state.jwt_service.generate_token(&user).unwrap();
    (user.id, token)
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&v).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn create_shop(app: &Router, token: &str, body: Value) -> Value {
    let (status, shop) = send(app, request("POST", "/api/shops", Some(token), Some(body))).await;
    assert_eq!(status, StatusCode::OK);
    shop
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _state) = test_app().await;
    let (status, body) = send(&app, request("GET", "/api/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], true);
}

#[tokio::test]
async fn login_rejects_bad_credentials_and_issues_tokens() {
    let (app, _state) = test_app().await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": ADMIN_EMAIL, "password": "wrong"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    // unified message, no email enumeration
    assert_eq!(body["message"], "Invalid email or password");

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();
    assert_eq!(body["user"]["role"], "super_admin");

    let (status, profile) = send(&app, request("GET", "/api/profile", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["email"], ADMIN_EMAIL);
}

#[tokio::test]
async fn shop_management_requires_the_right_role() {
    let (app, state) = test_app().await;
    let admin = admin_token(&state).await;
    let (_, customer) = customer_token(&state, "c1@test.local").await;

    let payload = json!({"name": "Cut & Go"});

    let (status, _) = send(&app, request("POST", "/api/shops", None, Some(payload.clone()))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        request("POST", "/api/shops", Some(&customer), Some(payload.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let shop = create_shop(&app, &admin, payload).await;
    // defaults applied
    assert_eq!(shop["opening_time"], "09:00");
    assert_eq!(shop["closing_time"], "18:00");
    assert_eq!(shop["slot_duration"], 30);
    assert_eq!(shop["max_capacity"], 1);

    // schedule invariants enforced
    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/shops",
            Some(&admin),
            Some(json!({"name": "Broken", "opening_time": "18:00", "closing_time": "09:00"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn full_booking_scenario() {
    // 09:00-10:00, 30 min slots, capacity 1
    let (app, state) = test_app().await;
    let admin = admin_token(&state).await;
    let shop = create_shop(
        &app,
        &admin,
        json!({
            "name": "Tiny Barber",
            "opening_time": "09:00",
            "closing_time": "10:00",
            "slot_duration": 30,
            "max_capacity": 1
        }),
    )
    .await;
    let shop_id = shop["id"].as_i64().unwrap();

    // Exactly two offerable slots, closing time excluded
    let uri = format!("/api/timeslots?shop_id={shop_id}&date=2025-06-02");
    let (status, view) = send(&app, request("GET", &uri, None, None)).await;
    assert_eq!(status, StatusCode::OK);
    let times: Vec<&str> = view["slots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["time"].as_str().unwrap())
        .collect();
    assert_eq!(times, ["09:00", "09:30"]);
    assert!(view["slots"].as_array().unwrap().iter().all(|s| s["available"] == true));

    // Guest books 09:00
    let booking = json!({
        "shop_id": shop_id,
        "customer_name": "Bat",
        "reservation_date": "2025-06-02",
        "reservation_time": "09:00"
    });
    let (status, first) = send(
        &app,
        request("POST", "/api/reservations", None, Some(booking.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["status"], "pending");
    let first_id = first["id"].as_i64().unwrap();

    // Same slot again: capacity exceeded
    let (status, body) = send(
        &app,
        request("POST", "/api/reservations", None, Some(booking.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "E0004");

    // The view reflects the taken slot
    let (_, view) = send(&app, request("GET", &uri, None, None)).await;
    assert_eq!(view["slots"][0]["available"], false);
    assert_eq!(view["slots"][0]["current_count"], 1);
    assert_eq!(view["slots"][1]["available"], true);

    // Outside business hours: closing boundary rejected
    let mut late = booking.clone();
    late["reservation_time"] = json!("10:00");
    let (status, _) = send(&app, request("POST", "/api/reservations", None, Some(late))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 09:30 still bookable
    let mut second = booking.clone();
    second["reservation_time"] = json!("09:30");
    let (status, _) = send(&app, request("POST", "/api/reservations", None, Some(second))).await;
    assert_eq!(status, StatusCode::OK);

    // Admin cancels the first booking; the slot frees up
    let (status, cancelled) = send(
        &app,
        request(
            "PUT",
            &format!("/api/reservations/{first_id}"),
            Some(&admin),
            Some(json!({"status": "cancelled"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");

    let (status, rebooked) = send(
        &app,
        request("POST", "/api/reservations", None, Some(booking)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rebooked["reservation_time"], "09:00");
}

#[tokio::test]
async fn malformed_status_enum_is_rejected_at_the_boundary() {
    let (app, state) = test_app().await;
    let admin = admin_token(&state).await;
    let shop = create_shop(&app, &admin, json!({"name": "Enum Shop"})).await;

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/reservations",
            None,
            Some(json!({
                "shop_id": shop["id"],
                "customer_name": "Bat",
                "reservation_date": "2025-06-02",
                "reservation_time": "09:00",
                "status": "approved"
            })),
        ),
    )
    .await;
    assert!(status.is_client_error(), "unexpected status {status}");
}

#[tokio::test]
async fn customer_may_cancel_but_not_confirm_their_reservation() {
    let (app, state) = test_app().await;
    let admin = admin_token(&state).await;
    let (customer_id, customer) = customer_token(&state, "c2@test.local").await;
    let shop = create_shop(&app, &admin, json!({"name": "Role Shop", "max_capacity": 3})).await;

    let (status, reservation) = send(
        &app,
        request(
            "POST",
            "/api/reservations",
            Some(&customer),
            Some(json!({
                "shop_id": shop["id"],
                "customer_name": "Bolor",
                "reservation_date": "2025-06-02",
                "reservation_time": "11:00"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reservation["user_id"].as_i64(), Some(customer_id));
    let id = reservation["id"].as_i64().unwrap();

    let uri = format!("/api/reservations/{id}");
    let (status, _) = send(
        &app,
        request("PUT", &uri, Some(&customer), Some(json!({"status": "confirmed"}))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        request("PUT", &uri, Some(&customer), Some(json!({"status": "cancelled"}))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "cancelled");

    // terminal: even the admin cannot revive it
    let (status, body) = send(
        &app,
        request("PUT", &uri, Some(&admin), Some(json!({"status": "confirmed"}))),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "E0005");
}

#[tokio::test]
async fn reservation_listing_is_role_scoped() {
    let (app, state) = test_app().await;
    let admin = admin_token(&state).await;
    let (_, customer) = customer_token(&state, "c3@test.local").await;
    let shop = create_shop(&app, &admin, json!({"name": "List Shop"})).await;
    let shop_id = shop["id"].as_i64().unwrap();

    let uri = format!("/api/reservations?shop_id={shop_id}");
    let (status, _) = send(&app, request("GET", &uri, None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, request("GET", &uri, Some(&customer), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, request("GET", &uri, Some(&admin), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    // unfiltered listing is super_admin only
    let (status, _) = send(&app, request("GET", "/api/reservations", Some(&customer), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, request("GET", "/api/reservations", Some(&admin), None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn shop_admin_accounts_get_a_one_time_password() {
    let (app, state) = test_app().await;
    let admin = admin_token(&state).await;
    let shop = create_shop(&app, &admin, json!({"name": "Staffed Shop"})).await;

    let (status, created) = send(
        &app,
        request(
            "POST",
            "/api/users",
            Some(&admin),
            Some(json!({
                "name": "Manager",
                "email": "manager@test.local",
                "role": "shop_admin",
                "shop_id": shop["id"]
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let password = created["password"].as_str().unwrap().to_string();
    assert_eq!(password.len(), 12);
    assert_eq!(created["user"]["role"], "shop_admin");

    // the generated password actually works
    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "manager@test.local", "password": password})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let manager = body["token"].as_str().unwrap().to_string();

    // the manager administers their own shop but not user management
    let shop_id = shop["id"].as_i64().unwrap();
    let (status, _) = send(
        &app,
        request(
            "PUT",
            &format!("/api/shops/{shop_id}"),
            Some(&manager),
            Some(json!({"slot_duration": 20})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, request("GET", "/api/users", Some(&manager), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn hard_delete_is_super_admin_only() {
    let (app, state) = test_app().await;
    let admin = admin_token(&state).await;
    let (_, customer) = customer_token(&state, "c4@test.local").await;
    let shop = create_shop(&app, &admin, json!({"name": "Delete Shop"})).await;

    let (status, reservation) = send(
        &app,
        request(
            "POST",
            "/api/reservations",
            None,
            Some(json!({
                "shop_id": shop["id"],
                "customer_name": "Bat",
                "reservation_date": "2025-06-02",
                "reservation_time": "09:00"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let uri = format!("/api/reservations/{}", reservation["id"]);

    let (status, _) = send(&app, request("DELETE", &uri, Some(&customer), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, request("DELETE", &uri, Some(&admin), None)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, request("GET", &uri, Some(&admin), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn expired_tokens_do_not_downgrade_to_guest() {
    let (app, state) = test_app().await;
    let (_, customer) = customer_token(&state, "c5@test.local").await;

    // Tampered token on an optional-auth route is an error, not a guest request
    let tampered = format!("{customer}xx");
    let admin = admin_token(&state).await;
    let shop = create_shop(&app, &admin, json!({"name": "Token Shop"})).await;

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/reservations",
            Some(&tampered),
            Some(json!({
                "shop_id": shop["id"],
                "customer_name": "Bat",
                "reservation_date": "2025-06-02",
                "reservation_time": "09:00"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
