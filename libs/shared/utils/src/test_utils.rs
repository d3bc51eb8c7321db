use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
};
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;

use shared_config::{AppConfig, StatusValidation};
use shared_database::{AppState, Database};
use shared_models::accounts::{Role, User};
use shared_models::dispatch::{
    CallPriority, CallStatus, EmergencyCall, RequestSource, RequesterType, Trip, TripStatus,
};
use shared_models::fleet::{Ambulance, AmbulanceStatus};
use shared_models::patients::{Gender, Patient};
use shared_models::reports::{
    DriverInspection, InspectionStatus, MaintenanceRecord, MaintenanceStatus, MaintenanceType,
    ParamedicInspection, Shift,
};

pub struct TestConfig {
    pub jwt_secret: String,
    pub call_status_validation: StatusValidation,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            call_status_validation: StatusValidation::Lenient,
        }
    }
}

impl TestConfig {
    pub fn strict() -> Self {
        Self {
            call_status_validation: StatusValidation::Strict,
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            jwt_secret: self.jwt_secret.clone(),
            host: "127.0.0.1".to_string(),
            port: 0,
            data_file: None,
            call_status_validation: self.call_status_validation,
        }
    }

    /// Fresh in-memory state for a router under test.
    pub fn to_state(&self) -> Arc<AppState> {
        Arc::new(AppState::new(self.to_app_config(), Database::in_memory()))
    }
}

pub struct TestUser {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

impl TestUser {
    pub fn new(id: i64, username: &str, role: Role) -> Self {
        Self {
            id,
            username: username.to_string(),
            role,
        }
    }

    pub fn admin(id: i64) -> Self {
        Self::new(id, "admin", Role::Admin)
    }

    pub fn dispatcher(id: i64) -> Self {
        Self::new(id, "dispatcher", Role::Dispatcher)
    }

    pub fn driver(id: i64) -> Self {
        Self::new(id, "driver", Role::Driver)
    }

    pub fn paramedic(id: i64) -> Self {
        Self::new(id, "paramedic", Role::Paramedic)
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "sub": user.id.to_string(),
            "username": user.username,
            "role": user.role.as_str(),
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        Self::sign(&header, &payload, secret)
    }

    /// Token carrying nothing but the subject, as some providers issue them.
    pub fn create_subject_only_token(user_id: i64, secret: &str) -> String {
        Self::sign(&json!({ "alg": "HS256" }), &json!({ "sub": user_id.to_string() }), secret)
    }

    /// Signs arbitrary header and claims with HS256.
    pub fn sign(header: &Value, payload: &Value, secret: &str) -> String {
        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

/// Request builders and response readers for router tests.
pub struct ApiTestUtils;

impl ApiTestUtils {
    pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("valid request"),
            None => builder.body(Body::empty()).expect("valid request"),
        }
    }

    pub fn get(uri: &str, token: &str) -> Request<Body> {
        Self::request(Method::GET, uri, Some(token), None)
    }

    pub fn post(uri: &str, token: &str, body: Value) -> Request<Body> {
        Self::request(Method::POST, uri, Some(token), Some(body))
    }

    pub fn patch(uri: &str, token: &str, body: Value) -> Request<Body> {
        Self::request(Method::PATCH, uri, Some(token), Some(body))
    }

    pub fn delete(uri: &str, token: &str) -> Request<Body> {
        Self::request(Method::DELETE, uri, Some(token), None)
    }

    pub async fn read_json(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        if body.is_empty() {
            return Value::Null;
        }
        serde_json::from_slice(&body).expect("JSON body")
    }
}

/// Ready-made records; ids are assigned by the store on insert.
pub mod fixtures {
    use super::*;

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    pub fn user(username: &str, role: Role) -> User {
        User {
            id: 0,
            username: username.to_string(),
            email: Some(format!("{}@dispatch.test", username)),
            first_name: username.to_string(),
            last_name: "Tester".to_string(),
            role,
            phone: "555-0100".to_string(),
            active: true,
            created_at: Utc::now(),
        }
    }

    pub fn ambulance(vehicle_number: &str) -> Ambulance {
        Ambulance {
            id: 0,
            vehicle_number: vehicle_number.to_string(),
            license_number: format!("LIC-{}", vehicle_number),
            model: "Mercedes Sprinter".to_string(),
            year: 2022,
            status: AmbulanceStatus::Available,
            latitude: Some(40.7128),
            longitude: Some(-74.006),
            assigned_driver: None,
            assigned_paramedic: None,
            last_maintenance: date(2024, 1, 15),
            next_maintenance: date(2099, 1, 15),
            insurance_expiry: date(2099, 12, 31),
            equipment: vec!["defibrillator".to_string(), "oxygen".to_string()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn patient(name: &str) -> Patient {
        Patient {
            id: 0,
            name: name.to_string(),
            age: 54,
            gender: Gender::Male,
            phone: "555-0110".to_string(),
            medical_condition: "Chest pain".to_string(),
            allergies: vec!["penicillin".to_string()],
            medications: vec![],
            emergency_contact_name: "Dana".to_string(),
            emergency_contact_phone: "555-0111".to_string(),
            emergency_contact_relation: "Spouse".to_string(),
            pickup_latitude: 40.71,
            pickup_longitude: -74.0,
            pickup_address: "12 Main St".to_string(),
            destination_latitude: 40.73,
            destination_longitude: -73.99,
            destination_address: "1 Hospital Plaza".to_string(),
            hospital_name: "City General".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn call(status: CallStatus) -> EmergencyCall {
        EmergencyCall {
            id: 0,
            caller_name: "Sam Caller".to_string(),
            caller_phone: "555-0120".to_string(),
            latitude: 40.71,
            longitude: -74.0,
            address: "12 Main St".to_string(),
            priority: CallPriority::High,
            status,
            description: "Unconscious adult".to_string(),
            assigned_ambulance: None,
            dispatcher: None,
            patient: None,
            request_source: RequestSource::PhoneCall,
            requester_type: RequesterType::Individual,
            requester_details: json!({}),
            created_at: Utc::now(),
            response_time: None,
        }
    }

    pub fn trip(call: i64, ambulance: i64, patient: i64, start_time: DateTime<Utc>) -> Trip {
        Trip {
            id: 0,
            call,
            ambulance,
            patient,
            start_time,
            end_time: None,
            distance: 8.4,
            cost: 320.0,
            status: TripStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn driver_inspection(driver: i64, ambulance: i64, on: NaiveDate, shift: Shift) -> DriverInspection {
        DriverInspection {
            id: 0,
            driver,
            ambulance,
            date: on,
            shift,
            vehicle_inspection: vec![json!({"item": "tyres", "status": "ok"})],
            mileage: 45_000,
            fuel_level: 75,
            overall_status: InspectionStatus::Ready,
            additional_notes: String::new(),
            submitted_at: Utc::now(),
        }
    }

    pub fn paramedic_inspection(paramedic: i64, ambulance: i64, on: NaiveDate, shift: Shift) -> ParamedicInspection {
        ParamedicInspection {
            id: 0,
            paramedic,
            ambulance,
            date: on,
            shift,
            medical_equipment: vec![json!({"item": "defibrillator", "status": "ok"})],
            overall_status: InspectionStatus::Ready,
            additional_notes: String::new(),
            submitted_at: Utc::now(),
        }
    }

    pub fn maintenance(ambulance: i64, scheduled_date: NaiveDate, status: MaintenanceStatus) -> MaintenanceRecord {
        MaintenanceRecord {
            id: 0,
            ambulance,
            maintenance_type: MaintenanceType::Routine,
            status,
            scheduled_date,
            completed_date: None,
            description: "Scheduled service".to_string(),
            cost: None,
            vendor: "Fleet Services".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}
