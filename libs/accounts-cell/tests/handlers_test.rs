use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use accounts_cell::user_routes;
use shared_models::accounts::Role;
use shared_utils::test_utils::{fixtures, ApiTestUtils, JwtTestUtils, TestConfig, TestUser};

#[tokio::test]
async fn test_requests_without_token_are_rejected() {
    let config = TestConfig::default();
    let app = user_routes(config.to_state());

    let response = app
        .oneshot(ApiTestUtils::request(axum::http::Method::GET, "/users", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = ApiTestUtils::read_json(response).await;
    assert_eq!(body["error"], "Missing authorization header");
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let config = TestConfig::default();
    let app = user_routes(config.to_state());
    let token = JwtTestUtils::create_expired_token(&TestUser::admin(1), &config.jwt_secret);

    let response = app.oneshot(ApiTestUtils::get("/users", &token)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_and_list_users() {
    let config = TestConfig::default();
    let state = config.to_state();
    let token = JwtTestUtils::create_test_token(&TestUser::admin(1), &config.jwt_secret, None);

    let response = user_routes(state.clone())
        .oneshot(ApiTestUtils::post(
            "/users",
            &token,
            json!({
                "username": "driver.dan",
                "first_name": "Dan",
                "last_name": "Wheeler",
                "role": "driver",
                "phone": "555-0199"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let created = ApiTestUtils::read_json(response).await;
    assert_eq!(created["username"], "driver.dan");
    assert_eq!(created["role"], "driver");
    assert_eq!(created["active"], true);

    let response = user_routes(state)
        .oneshot(ApiTestUtils::get("/users?role=driver", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page = ApiTestUtils::read_json(response).await;
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["username"], "driver.dan");
}

#[tokio::test]
async fn test_duplicate_username_is_a_validation_error() {
    let config = TestConfig::default();
    let state = config.to_state();
    let token = JwtTestUtils::create_test_token(&TestUser::admin(1), &config.jwt_secret, None);

    {
        let mut tx = state.db.begin().await;
        tx.insert(fixtures::user("dispatch.dee", Role::Dispatcher)).unwrap();
        tx.commit().await.unwrap();
    }

    let response = user_routes(state)
        .oneshot(ApiTestUtils::post(
            "/users",
            &token,
            json!({"username": "dispatch.dee", "role": "dispatcher", "phone": "555-0102"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = ApiTestUtils::read_json(response).await;
    assert_eq!(body["error"], "User with this username already exists");
}

#[tokio::test]
async fn test_missing_required_field_is_a_validation_error() {
    let config = TestConfig::default();
    let token = JwtTestUtils::create_test_token(&TestUser::admin(1), &config.jwt_secret, None);

    let response = user_routes(config.to_state())
        .oneshot(ApiTestUtils::post("/users", &token, json!({"username": "nobody"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = ApiTestUtils::read_json(response).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_role_change_is_rejected() {
    let config = TestConfig::default();
    let state = config.to_state();
    let token = JwtTestUtils::create_test_token(&TestUser::admin(1), &config.jwt_secret, None);

    let driver = {
        let mut tx = state.db.begin().await;
        let driver = tx.insert(fixtures::user("dan", Role::Driver)).unwrap();
        tx.commit().await.unwrap();
        driver
    };

    let response = user_routes(state.clone())
        .oneshot(ApiTestUtils::patch(
            &format!("/users/{}", driver.id),
            &token,
            json!({"role": "paramedic", "phone": "555-0000"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    // nothing from the rejected update was applied
    let stored = state.db.read().await.users.get(driver.id).cloned().unwrap();
    assert_eq!(stored.phone, "555-0100");
}

#[tokio::test]
async fn test_profile_returns_callers_record() {
    let config = TestConfig::default();
    let state = config.to_state();

    let dispatcher = {
        let mut tx = state.db.begin().await;
        let dispatcher = tx.insert(fixtures::user("dee", Role::Dispatcher)).unwrap();
        tx.commit().await.unwrap();
        dispatcher
    };
    let token = JwtTestUtils::create_test_token(
        &TestUser::new(dispatcher.id, "dee", Role::Dispatcher),
        &config.jwt_secret,
        None,
    );

    let response = user_routes(state).oneshot(ApiTestUtils::get("/profile", &token)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = ApiTestUtils::read_json(response).await;
    assert_eq!(body["id"], dispatcher.id);
    assert_eq!(body["username"], "dee");
}

#[tokio::test]
async fn test_profile_for_unknown_subject_is_not_found() {
    let config = TestConfig::default();
    let token = JwtTestUtils::create_test_token(&TestUser::admin(99), &config.jwt_secret, None);

    let response = user_routes(config.to_state())
        .oneshot(ApiTestUtils::get("/profile", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_user_clears_ambulance_assignment() {
    let config = TestConfig::default();
    let state = config.to_state();
    let token = JwtTestUtils::create_test_token(&TestUser::admin(1), &config.jwt_secret, None);

    let (driver, ambulance) = {
        let mut tx = state.db.begin().await;
        let driver = tx.insert(fixtures::user("dan", Role::Driver)).unwrap();
        let mut unit = fixtures::ambulance("AMB-001");
        unit.assigned_driver = Some(driver.id);
        let unit = tx.insert(unit).unwrap();
        tx.commit().await.unwrap();
        (driver, unit)
    };

    let response = user_routes(state.clone())
        .oneshot(ApiTestUtils::delete(&format!("/users/{}", driver.id), &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let tables = state.db.read().await;
    assert!(tables.users.get(driver.id).is_none());
    assert_eq!(tables.ambulances.get(ambulance.id).unwrap().assigned_driver, None);
}
