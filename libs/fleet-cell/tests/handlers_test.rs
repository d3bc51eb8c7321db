use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use fleet_cell::ambulance_routes;
use shared_database::AppState;
use shared_models::accounts::Role;
use shared_models::fleet::{Ambulance, AmbulanceStatus};
use shared_utils::test_utils::{fixtures, ApiTestUtils, JwtTestUtils, TestConfig, TestUser};

fn token(config: &TestConfig) -> String {
    JwtTestUtils::create_test_token(&TestUser::dispatcher(1), &config.jwt_secret, None)
}

async fn seed_ambulance(state: &Arc<AppState>, vehicle_number: &str, status: AmbulanceStatus) -> Ambulance {
    let mut tx = state.db.begin().await;
    let mut ambulance = fixtures::ambulance(vehicle_number);
    ambulance.status = status;
    let ambulance = tx.insert(ambulance).unwrap();
    tx.commit().await.unwrap();
    ambulance
}

fn new_ambulance_body(vehicle_number: &str) -> serde_json::Value {
    json!({
        "vehicle_number": vehicle_number,
        "license_number": format!("PLATE-{}", vehicle_number),
        "model": "Ford Transit",
        "year": 2021,
        "last_maintenance": "2024-01-10",
        "next_maintenance": "2024-07-10",
        "insurance_expiry": "2025-01-01",
        "equipment": ["stretcher"]
    })
}

#[tokio::test]
async fn test_create_ambulance_defaults_to_available() {
    let config = TestConfig::default();
    let state = config.to_state();

    let response = ambulance_routes(state)
        .oneshot(ApiTestUtils::post("/ambulances", &token(&config), new_ambulance_body("AMB-010")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = ApiTestUtils::read_json(response).await;
    assert_eq!(body["vehicle_number"], "AMB-010");
    assert_eq!(body["status"], "available");
    assert_eq!(body["assigned_driver_name"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_duplicate_vehicle_number_is_rejected() {
    let config = TestConfig::default();
    let state = config.to_state();
    seed_ambulance(&state, "AMB-001", AmbulanceStatus::Available).await;

    let response = ambulance_routes(state.clone())
        .oneshot(ApiTestUtils::post("/ambulances", &token(&config), new_ambulance_body("AMB-001")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = ApiTestUtils::read_json(response).await;
    assert_eq!(body["error"], "Ambulance with this vehicle_number already exists");
    assert_eq!(state.db.read().await.ambulances.len(), 1);
}

#[tokio::test]
async fn test_assigned_driver_must_have_driver_role() {
    let config = TestConfig::default();
    let state = config.to_state();

    let paramedic = {
        let mut tx = state.db.begin().await;
        let paramedic = tx.insert(fixtures::user("pat", Role::Paramedic)).unwrap();
        tx.commit().await.unwrap();
        paramedic
    };

    let mut body = new_ambulance_body("AMB-020");
    body["assigned_driver"] = json!(paramedic.id);

    let response = ambulance_routes(state)
        .oneshot(ApiTestUtils::post("/ambulances", &token(&config), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_detail_view_resolves_crew_names() {
    let config = TestConfig::default();
    let state = config.to_state();

    let ambulance = {
        let mut tx = state.db.begin().await;
        let driver = tx.insert(fixtures::user("dan", Role::Driver)).unwrap();
        let mut ambulance = fixtures::ambulance("AMB-002");
        ambulance.assigned_driver = Some(driver.id);
        let ambulance = tx.insert(ambulance).unwrap();
        tx.commit().await.unwrap();
        ambulance
    };

    let response = ambulance_routes(state)
        .oneshot(ApiTestUtils::get(&format!("/ambulances/{}", ambulance.id), &token(&config)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = ApiTestUtils::read_json(response).await;
    assert_eq!(body["assigned_driver_name"], "dan Tester");
    assert_eq!(body["assigned_paramedic_name"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_list_is_ordered_by_vehicle_number_and_filterable() {
    let config = TestConfig::default();
    let state = config.to_state();
    seed_ambulance(&state, "AMB-003", AmbulanceStatus::Available).await;
    seed_ambulance(&state, "AMB-001", AmbulanceStatus::Maintenance).await;
    seed_ambulance(&state, "AMB-002", AmbulanceStatus::Available).await;

    let response = ambulance_routes(state.clone())
        .oneshot(ApiTestUtils::get("/ambulances", &token(&config)))
        .await
        .unwrap();
    let body = ApiTestUtils::read_json(response).await;
    let numbers: Vec<&str> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["vehicle_number"].as_str().unwrap())
        .collect();
    assert_eq!(numbers, vec!["AMB-001", "AMB-002", "AMB-003"]);

    let response = ambulance_routes(state.clone())
        .oneshot(ApiTestUtils::get("/ambulances?status=maintenance", &token(&config)))
        .await
        .unwrap();
    let body = ApiTestUtils::read_json(response).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["vehicle_number"], "AMB-001");

    let response = ambulance_routes(state)
        .oneshot(ApiTestUtils::get("/ambulances/available", &token(&config)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = ApiTestUtils::read_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_update_location() {
    let config = TestConfig::default();
    let state = config.to_state();
    let ambulance = seed_ambulance(&state, "AMB-004", AmbulanceStatus::Available).await;

    let response = ambulance_routes(state.clone())
        .oneshot(ApiTestUtils::patch(
            &format!("/ambulances/{}/location", ambulance.id),
            &token(&config),
            json!({"latitude": 51.5072, "longitude": -0.1276}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let stored = state.db.read().await.ambulances.get(ambulance.id).cloned().unwrap();
    assert_eq!(stored.latitude, Some(51.5072));
    assert_eq!(stored.longitude, Some(-0.1276));
}

#[tokio::test]
async fn test_location_requires_both_coordinates() {
    let config = TestConfig::default();
    let state = config.to_state();
    let ambulance = seed_ambulance(&state, "AMB-005", AmbulanceStatus::Available).await;

    let response = ambulance_routes(state)
        .oneshot(ApiTestUtils::patch(
            &format!("/ambulances/{}/location", ambulance.id),
            &token(&config),
            json!({"latitude": 51.5}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_partial_update_can_clear_crew() {
    let config = TestConfig::default();
    let state = config.to_state();

    let ambulance = {
        let mut tx = state.db.begin().await;
        let driver = tx.insert(fixtures::user("dan", Role::Driver)).unwrap();
        let mut ambulance = fixtures::ambulance("AMB-006");
        ambulance.assigned_driver = Some(driver.id);
        let ambulance = tx.insert(ambulance).unwrap();
        tx.commit().await.unwrap();
        ambulance
    };

    let response = ambulance_routes(state.clone())
        .oneshot(ApiTestUtils::patch(
            &format!("/ambulances/{}", ambulance.id),
            &token(&config),
            json!({"assigned_driver": null, "status": "maintenance"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let stored = state.db.read().await.ambulances.get(ambulance.id).cloned().unwrap();
    assert_eq!(stored.assigned_driver, None);
    assert_eq!(stored.status, AmbulanceStatus::Maintenance);
    assert_eq!(stored.model, ambulance.model);
}

#[tokio::test]
async fn test_unknown_ambulance_is_not_found() {
    let config = TestConfig::default();

    let response = ambulance_routes(config.to_state())
        .oneshot(ApiTestUtils::get("/ambulances/42", &token(&config)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = ApiTestUtils::read_json(response).await;
    assert_eq!(body["error"], "Ambulance not found");
}

#[tokio::test]
async fn test_delete_ambulance_cascades_to_maintenance() {
    let config = TestConfig::default();
    let state = config.to_state();
    let ambulance = seed_ambulance(&state, "AMB-007", AmbulanceStatus::Available).await;

    {
        let mut tx = state.db.begin().await;
        tx.insert(fixtures::maintenance(
            ambulance.id,
            fixtures::date(2024, 5, 1),
            shared_models::reports::MaintenanceStatus::Scheduled,
        ))
        .unwrap();
        tx.commit().await.unwrap();
    }

    let response = ambulance_routes(state.clone())
        .oneshot(ApiTestUtils::delete(&format!("/ambulances/{}", ambulance.id), &token(&config)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let tables = state.db.read().await;
    assert!(tables.ambulances.is_empty());
    assert!(tables.maintenance_records.is_empty());
}
