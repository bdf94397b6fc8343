// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode as HttpStatusCode, header::AUTHORIZATION},
};
use serde_json::json;
use tower::ServiceExt;

const ADMIN_PASSWORD: &str = "Valzer-Viennese-1";

/// Helper to create test app state with in-memory persistence.
fn create_test_app_state() -> AppState {
    let persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        session_duration: time::Duration::hours(1),
    }
}

/// Sends one request and returns the status and the decoded JSON body.
async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (HttpStatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request: Request<Body> = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response: Response = app.clone().oneshot(request).await.unwrap();
    let status: HttpStatusCode = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

/// Bootstraps the first admin and logs in, returning the session token.
async fn bootstrap_and_login(app: &Router) -> String {
    let (status, _) = send(
        app,
        "POST",
        "/auth/bootstrap",
        None,
        Some(json!({
            "login_name": "segreteria",
            "display_name": "Segreteria",
            "password": ADMIN_PASSWORD,
            "password_confirmation": ADMIN_PASSWORD,
        })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    login_as(app, "segreteria", ADMIN_PASSWORD).await
}

async fn login_as(app: &Router, login_name: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "login_name": login_name, "password": password })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    body["session_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let app: Router = build_router(create_test_app_state());

    let (status, body) = send(&app, "GET", "/members", None, None).await;

    assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], true);
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let app: Router = build_router(create_test_app_state());

    let (status, _) = send(&app, "GET", "/auth/whoami", Some("session_0_0"), None).await;

    assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_whoami_and_logout() {
    let app: Router = build_router(create_test_app_state());
    let token: String = bootstrap_and_login(&app).await;

    let (status, body) = send(&app, "GET", "/auth/whoami", Some(&token), None).await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["login_name"], "SEGRETERIA");
    assert_eq!(body["capabilities"]["can_manage_operators"], true);

    let (status, _) = send(&app, "POST", "/auth/logout", Some(&token), None).await;
    assert_eq!(status, HttpStatusCode::OK);

    let (status, _) = send(&app, "GET", "/auth/whoami", Some(&token), None).await;
    assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_second_bootstrap_is_refused() {
    let app: Router = build_router(create_test_app_state());
    bootstrap_and_login(&app).await;

    let (status, _) = send(
        &app,
        "POST",
        "/auth/bootstrap",
        None,
        Some(json!({
            "login_name": "altro",
            "display_name": "Altro",
            "password": ADMIN_PASSWORD,
            "password_confirmation": ADMIN_PASSWORD,
        })),
    )
    .await;

    assert_eq!(status, HttpStatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_create_and_list_rooms() {
    let app: Router = build_router(create_test_app_state());
    let token: String = bootstrap_and_login(&app).await;

    for (name, capacity) in [("Sala Grande", 40), ("Sala Piccola", 12)] {
        let (status, _) = send(
            &app,
            "POST",
            "/rooms",
            Some(&token),
            Some(json!({ "name": name, "capacity": capacity })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
    }

    let (status, body) = send(
        &app,
        "GET",
        "/rooms?sort=capacity&direction=desc&filter.name=sala",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["rows"][0]["name"], "Sala Grande");
    assert_eq!(body["rows"][1]["name"], "Sala Piccola");
}

#[tokio::test]
async fn test_invalid_sort_direction_is_bad_request() {
    let app: Router = build_router(create_test_app_state());
    let token: String = bootstrap_and_login(&app).await;

    let (status, body) = send(
        &app,
        "GET",
        "/rooms?sort=name&direction=sideways",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, HttpStatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "direction");
}

#[tokio::test]
async fn test_unknown_section_is_not_found() {
    let app: Router = build_router(create_test_app_state());
    let token: String = bootstrap_and_login(&app).await;

    let (status, _) = send(&app, "GET", "/studios", Some(&token), None).await;

    assert_eq!(status, HttpStatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_referenced_room_delete_is_conflict_with_dependents() {
    let app: Router = build_router(create_test_app_state());
    let token: String = bootstrap_and_login(&app).await;

    send(
        &app,
        "POST",
        "/rooms",
        Some(&token),
        Some(json!({ "name": "Sala A", "capacity": 20 })),
    )
    .await;
    let (status, _) = send(
        &app,
        "POST",
        "/courses",
        Some(&token),
        Some(json!({
            "name": "Tango",
            "category": null,
            "base_price": 70.0,
            "additional_price": 50.0,
            "weekly_hours": 1.0,
            "lessons": [{ "weekday": "Martedì", "room": "Sala A", "time_range": "21:00-22:00" }],
        })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);

    let (status, body) = send(&app, "DELETE", "/rooms/1", Some(&token), None).await;

    assert_eq!(status, HttpStatusCode::CONFLICT);
    assert_eq!(body["field"], "references");
    assert_eq!(body["dependents"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_viewer_write_is_forbidden() {
    let app: Router = build_router(create_test_app_state());
    let token: String = bootstrap_and_login(&app).await;

    let (status, _) = send(
        &app,
        "POST",
        "/operators",
        Some(&token),
        Some(json!({
            "login_name": "ospite",
            "display_name": "Ospite",
            "password": "Cha-Cha-Cha-42",
            "password_confirmation": "Cha-Cha-Cha-42",
            "role": "Viewer",
        })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    let viewer_token: String = login_as(&app, "ospite", "Cha-Cha-Cha-42").await;

    let (status, _) = send(
        &app,
        "POST",
        "/rooms",
        Some(&viewer_token),
        Some(json!({ "name": "Sala B", "capacity": 10 })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", "/rooms", Some(&viewer_token), None).await;
    assert_eq!(status, HttpStatusCode::OK);
}

#[tokio::test]
async fn test_quote_endpoint_prices_selection() {
    let app: Router = build_router(create_test_app_state());
    let token: String = bootstrap_and_login(&app).await;

    send(
        &app,
        "POST",
        "/courses",
        Some(&token),
        Some(json!({
            "name": "Salsa",
            "category": null,
            "base_price": 58.0,
            "additional_price": 40.0,
            "weekly_hours": 1.5,
            "lessons": [],
        })),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        "/quote",
        Some(&token),
        Some(json!({ "base_course": "Salsa" })),
    )
    .await;

    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["breakdown"]["final_course_amount_rounded"], 60.0);
    assert_eq!(body["breakdown"]["monthly_fee"], 60.0);
}

#[tokio::test]
async fn test_quote_accepts_blank_and_typed_discounts() {
    let app: Router = build_router(create_test_app_state());
    let token: String = bootstrap_and_login(&app).await;

    for (name, base_price, additional_price) in [("Salsa", 60.0, 40.0), ("Bachata", 55.0, 35.0)] {
        send(
            &app,
            "POST",
            "/courses",
            Some(&token),
            Some(json!({
                "name": name,
                "category": null,
                "base_price": base_price,
                "additional_price": additional_price,
                "weekly_hours": 1.0,
                "lessons": [],
            })),
        )
        .await;
    }

    for (discount, expected) in [(json!(""), 35.0), (json!("20"), 28.0)] {
        let (status, body) = send(
            &app,
            "POST",
            "/quote",
            Some(&token),
            Some(json!({
                "base_course": "Salsa",
                "additional_courses": ["Bachata"],
                "discounts": { "Bachata": discount },
            })),
        )
        .await;

        assert_eq!(status, HttpStatusCode::OK);
        let discounted: f64 = body["breakdown"]["subtotal_additional_discounted"]
            .as_f64()
            .unwrap();
        assert!((discounted - expected).abs() < 1e-9);
    }
}

#[tokio::test]
async fn test_export_returns_csv_attachment() {
    let app: Router = build_router(create_test_app_state());
    let token: String = bootstrap_and_login(&app).await;

    let response: Response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/export/categories")
                .header(AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), HttpStatusCode::OK);
    assert_eq!(
        response.headers()[CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text: String = String::from_utf8(bytes.to_vec()).unwrap();
    assert_eq!(text.lines().collect::<Vec<&str>>(), vec!["Categoria;Colore"]);
}

#[tokio::test]
async fn test_payments_only_exist_for_members() {
    let app: Router = build_router(create_test_app_state());
    let token: String = bootstrap_and_login(&app).await;

    let (status, _) = send(&app, "GET", "/rooms/1/payments", Some(&token), None).await;
    assert_eq!(status, HttpStatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/members/1/payments", Some(&token), None).await;
    assert_eq!(status, HttpStatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_log_lists_logins() {
    let app: Router = build_router(create_test_app_state());
    let token: String = bootstrap_and_login(&app).await;

    let (status, body) = send(&app, "GET", "/log", Some(&token), None).await;

    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["section"], "log");
    assert_eq!(body["rows"][0]["operation"], "Accesso");
}
