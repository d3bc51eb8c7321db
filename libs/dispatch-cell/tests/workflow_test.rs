use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use futures::future::join_all;

use dispatch_cell::{AssignAmbulanceRequest, DispatchWorkflow, UpdateStatusRequest};
use shared_database::AppState;
use shared_models::dispatch::{CallStatus, EmergencyCall, Trip, TripStatus};
use shared_models::error::AppError;
use shared_models::fleet::{Ambulance, AmbulanceStatus};
use shared_utils::test_utils::{fixtures, TestConfig};

struct Scenario {
    state: Arc<AppState>,
    call: EmergencyCall,
    ambulance: Ambulance,
}

async fn scenario(config: TestConfig, ambulance_status: AmbulanceStatus) -> Scenario {
    let state = config.to_state();
    let mut tx = state.db.begin().await;
    let call = tx.insert(fixtures::call(CallStatus::Pending)).unwrap();
    let mut ambulance = fixtures::ambulance("AMB-001");
    ambulance.status = ambulance_status;
    let ambulance = tx.insert(ambulance).unwrap();
    tx.commit().await.unwrap();

    Scenario { state, call, ambulance }
}

fn assign(ambulance_id: i64) -> AssignAmbulanceRequest {
    AssignAmbulanceRequest {
        ambulance_id: Some(ambulance_id),
    }
}

fn status(value: &str) -> UpdateStatusRequest {
    UpdateStatusRequest {
        status: Some(value.to_string()),
    }
}

async fn stored_call(state: &AppState, id: i64) -> EmergencyCall {
    state.db.read().await.emergency_calls.get(id).cloned().unwrap()
}

async fn stored_ambulance(state: &AppState, id: i64) -> Ambulance {
    state.db.read().await.ambulances.get(id).cloned().unwrap()
}

#[tokio::test]
async fn test_assign_marks_call_and_ambulance_assigned() {
    let s = scenario(TestConfig::default(), AmbulanceStatus::Available).await;
    let workflow = DispatchWorkflow::new(&s.state);

    let detail = workflow.assign_ambulance(s.call.id, assign(s.ambulance.id)).await.unwrap();

    assert_eq!(detail.call.status, CallStatus::Assigned);
    assert_eq!(detail.call.assigned_ambulance, Some(s.ambulance.id));
    assert_eq!(
        detail.assigned_ambulance_details.map(|a| a.ambulance.status),
        Some(AmbulanceStatus::Assigned)
    );

    let call = stored_call(&s.state, s.call.id).await;
    let ambulance = stored_ambulance(&s.state, s.ambulance.id).await;
    assert_eq!(call.status, CallStatus::Assigned);
    assert_eq!(call.assigned_ambulance, Some(s.ambulance.id));
    assert_eq!(ambulance.status, AmbulanceStatus::Assigned);
}

#[tokio::test]
async fn test_assigning_a_busy_ambulance_changes_nothing() {
    let s = scenario(TestConfig::default(), AmbulanceStatus::Maintenance).await;
    let workflow = DispatchWorkflow::new(&s.state);

    let result = workflow.assign_ambulance(s.call.id, assign(s.ambulance.id)).await;

    assert_matches!(result, Err(AppError::StateConflict(msg)) if msg == "Ambulance is not available");
    assert_eq!(stored_call(&s.state, s.call.id).await, s.call);
    assert_eq!(stored_ambulance(&s.state, s.ambulance.id).await, s.ambulance);
}

#[tokio::test]
async fn test_second_assignment_of_same_ambulance_conflicts() {
    let s = scenario(TestConfig::default(), AmbulanceStatus::Available).await;
    let workflow = DispatchWorkflow::new(&s.state);
    let second_call = {
        let mut tx = s.state.db.begin().await;
        let call = tx.insert(fixtures::call(CallStatus::Pending)).unwrap();
        tx.commit().await.unwrap();
        call
    };

    workflow.assign_ambulance(s.call.id, assign(s.ambulance.id)).await.unwrap();
    let result = workflow.assign_ambulance(second_call.id, assign(s.ambulance.id)).await;

    assert_matches!(result, Err(AppError::StateConflict(_)));
    assert_eq!(stored_call(&s.state, second_call.id).await.status, CallStatus::Pending);
}

#[tokio::test]
async fn test_assign_error_cases() {
    let s = scenario(TestConfig::default(), AmbulanceStatus::Available).await;
    let workflow = DispatchWorkflow::new(&s.state);

    let missing_id = workflow
        .assign_ambulance(s.call.id, AssignAmbulanceRequest::default())
        .await;
    assert_matches!(missing_id, Err(AppError::ValidationError(msg)) if msg == "ambulance_id is required");

    let unknown_call = workflow.assign_ambulance(999, assign(s.ambulance.id)).await;
    assert_matches!(unknown_call, Err(AppError::NotFound(msg)) if msg == "Emergency call not found");

    let unknown_ambulance = workflow.assign_ambulance(s.call.id, assign(999)).await;
    assert_matches!(unknown_ambulance, Err(AppError::NotFound(msg)) if msg == "Ambulance not found");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_assignments_have_exactly_one_winner() {
    let s = scenario(TestConfig::default(), AmbulanceStatus::Available).await;
    let calls = {
        let mut tx = s.state.db.begin().await;
        let mut ids = vec![s.call.id];
        for _ in 0..7 {
            ids.push(tx.insert(fixtures::call(CallStatus::Pending)).unwrap().id);
        }
        tx.commit().await.unwrap();
        ids
    };

    let attempts = calls.iter().map(|&call_id| {
        let state = s.state.clone();
        let ambulance_id = s.ambulance.id;
        tokio::spawn(async move {
            DispatchWorkflow::new(&state)
                .assign_ambulance(call_id, assign(ambulance_id))
                .await
        })
    });
    let results: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let winners = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(AppError::StateConflict(_))))
        .count();
    assert_eq!(winners, 1);
    assert_eq!(conflicts, calls.len() - 1);

    let tables = s.state.db.read().await;
    let assigned: Vec<_> = tables
        .emergency_calls
        .iter()
        .filter(|c| c.assigned_ambulance == Some(s.ambulance.id))
        .collect();
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0].status, CallStatus::Assigned);
}

#[tokio::test]
async fn test_status_updates_mirror_onto_ambulance() {
    let s = scenario(TestConfig::default(), AmbulanceStatus::Available).await;
    let workflow = DispatchWorkflow::new(&s.state);
    workflow.assign_ambulance(s.call.id, assign(s.ambulance.id)).await.unwrap();

    let expectations = [
        ("en_route", AmbulanceStatus::EnRoute),
        ("at_scene", AmbulanceStatus::AtScene),
        ("transporting", AmbulanceStatus::Transporting),
        ("completed", AmbulanceStatus::Available),
    ];
    for (call_status, ambulance_status) in expectations {
        let detail = workflow.update_call_status(s.call.id, status(call_status)).await.unwrap();

        assert_eq!(detail.call.status.as_str(), call_status);
        assert_eq!(stored_ambulance(&s.state, s.ambulance.id).await.status, ambulance_status);
    }
}

#[tokio::test]
async fn test_unmirrored_status_leaves_ambulance_unchanged() {
    let s = scenario(TestConfig::default(), AmbulanceStatus::Available).await;
    let workflow = DispatchWorkflow::new(&s.state);
    workflow.assign_ambulance(s.call.id, assign(s.ambulance.id)).await.unwrap();

    for call_status in ["cancelled", "pending", "on_hold"] {
        workflow.update_call_status(s.call.id, status(call_status)).await.unwrap();

        assert_eq!(stored_call(&s.state, s.call.id).await.status.as_str(), call_status);
        assert_eq!(stored_ambulance(&s.state, s.ambulance.id).await.status, AmbulanceStatus::Assigned);
    }
}

#[tokio::test]
async fn test_status_update_without_ambulance_only_touches_call() {
    let s = scenario(TestConfig::default(), AmbulanceStatus::Available).await;
    let workflow = DispatchWorkflow::new(&s.state);

    workflow.update_call_status(s.call.id, status("completed")).await.unwrap();

    assert_eq!(stored_call(&s.state, s.call.id).await.status, CallStatus::Completed);
    assert_eq!(stored_ambulance(&s.state, s.ambulance.id).await.status, AmbulanceStatus::Available);
}

#[tokio::test]
async fn test_status_is_required() {
    let s = scenario(TestConfig::default(), AmbulanceStatus::Available).await;
    let workflow = DispatchWorkflow::new(&s.state);

    let missing = workflow
        .update_call_status(s.call.id, UpdateStatusRequest::default())
        .await;
    assert_matches!(missing, Err(AppError::ValidationError(msg)) if msg == "status is required");

    let empty = workflow.update_call_status(s.call.id, status("")).await;
    assert_matches!(empty, Err(AppError::ValidationError(_)));

    let unknown_call = workflow.update_call_status(404, status("en_route")).await;
    assert_matches!(unknown_call, Err(AppError::NotFound(_)));
}

#[tokio::test]
async fn test_strict_mode_rejects_unknown_status() {
    let s = scenario(TestConfig::strict(), AmbulanceStatus::Available).await;
    let workflow = DispatchWorkflow::new(&s.state);

    let result = workflow.update_call_status(s.call.id, status("on_hold")).await;

    assert_matches!(result, Err(AppError::ValidationError(_)));
    assert_eq!(stored_call(&s.state, s.call.id).await.status, CallStatus::Pending);
}

async fn seed_trip(s: &Scenario, start_time: chrono::DateTime<Utc>) -> Trip {
    let mut tx = s.state.db.begin().await;
    let patient = tx.insert(fixtures::patient("John Carter")).unwrap();
    let trip = tx
        .insert(fixtures::trip(s.call.id, s.ambulance.id, patient.id, start_time))
        .unwrap();
    let call = tx.emergency_calls.get_mut(s.call.id).unwrap();
    call.status = CallStatus::Transporting;
    let ambulance = tx.ambulances.get_mut(s.ambulance.id).unwrap();
    ambulance.status = AmbulanceStatus::Transporting;
    tx.commit().await.unwrap();
    trip
}

#[tokio::test]
async fn test_complete_trip_releases_ambulance_and_closes_call() {
    let s = scenario(TestConfig::default(), AmbulanceStatus::Available).await;
    let started = Utc::now() - Duration::minutes(42);
    let trip = seed_trip(&s, started).await;
    let workflow = DispatchWorkflow::new(&s.state);

    let detail = workflow.complete_trip(trip.id).await.unwrap();

    assert_eq!(detail.trip.status, TripStatus::Completed);
    let end_time = detail.trip.end_time.unwrap();
    assert!(end_time >= started);
    assert_eq!(stored_ambulance(&s.state, s.ambulance.id).await.status, AmbulanceStatus::Available);
    assert_eq!(stored_call(&s.state, s.call.id).await.status, CallStatus::Completed);
    assert_eq!(
        detail.call_details.map(|c| c.call.status),
        Some(CallStatus::Completed)
    );
}

#[tokio::test]
async fn test_complete_trip_never_ends_before_it_started() {
    let s = scenario(TestConfig::default(), AmbulanceStatus::Available).await;
    let started = Utc::now() + Duration::hours(1);
    let trip = seed_trip(&s, started).await;

    let detail = DispatchWorkflow::new(&s.state).complete_trip(trip.id).await.unwrap();

    assert_eq!(detail.trip.end_time, Some(started));
}

#[tokio::test]
async fn test_trip_is_completed_once() {
    let s = scenario(TestConfig::default(), AmbulanceStatus::Available).await;
    let trip = seed_trip(&s, Utc::now()).await;
    let workflow = DispatchWorkflow::new(&s.state);

    let first = workflow.complete_trip(trip.id).await.unwrap();
    let second = workflow.complete_trip(trip.id).await;

    assert_matches!(second, Err(AppError::StateConflict(msg)) if msg == "Trip is already completed");
    let stored = s.state.db.read().await.trips.get(trip.id).cloned().unwrap();
    assert_eq!(stored.end_time, first.trip.end_time);
}

#[tokio::test]
async fn test_complete_unknown_trip() {
    let s = scenario(TestConfig::default(), AmbulanceStatus::Available).await;

    let result = DispatchWorkflow::new(&s.state).complete_trip(77).await;

    assert_matches!(result, Err(AppError::NotFound(msg)) if msg == "Trip not found");
}

#[tokio::test]
async fn test_pending_calls_and_active_trips_match_exactly() {
    let s = scenario(TestConfig::default(), AmbulanceStatus::Available).await;
    let (pending, trip) = {
        let mut tx = s.state.db.begin().await;
        let pending = tx.insert(fixtures::call(CallStatus::Pending)).unwrap();
        tx.insert(fixtures::call(CallStatus::Cancelled)).unwrap();
        let done = tx.insert(fixtures::call(CallStatus::Completed)).unwrap();
        let patient = tx.insert(fixtures::patient("Ann")).unwrap();
        let active = tx
            .insert(fixtures::trip(s.call.id, s.ambulance.id, patient.id, Utc::now()))
            .unwrap();
        let mut finished = fixtures::trip(done.id, s.ambulance.id, patient.id, Utc::now());
        finished.status = TripStatus::Completed;
        finished.end_time = Some(Utc::now());
        tx.insert(finished).unwrap();
        tx.commit().await.unwrap();
        (pending, active)
    };
    let workflow = DispatchWorkflow::new(&s.state);

    let mut pending_ids: Vec<i64> = workflow
        .pending_calls()
        .await
        .unwrap()
        .iter()
        .map(|c| c.call.id)
        .collect();
    pending_ids.sort();
    assert_eq!(pending_ids, vec![s.call.id, pending.id]);

    let active: Vec<i64> = workflow
        .active_trips()
        .await
        .unwrap()
        .iter()
        .map(|t| t.trip.id)
        .collect();
    assert_eq!(active, vec![trip.id]);
}
