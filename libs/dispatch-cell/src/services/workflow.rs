use chrono::Utc;
use tracing::{debug, info, warn};

use shared_config::StatusValidation;
use shared_database::{AppState, Database};
use shared_models::dispatch::{CallStatus, EmergencyCall, Trip, TripStatus};
use shared_models::error::AppError;
use shared_models::fleet::{Ambulance, AmbulanceStatus};

use crate::models::{AssignAmbulanceRequest, CallDetail, DispatchError, TripDetail, UpdateStatusRequest};
use crate::services::mirroring::mirrored_status;

/// The status-changing operations of a dispatch: assigning an ambulance to
/// a call, progressing the call, and closing the trip. Each operation reads
/// and writes inside a single unit of work.
pub struct DispatchWorkflow {
    db: Database,
    validation: StatusValidation,
}

impl DispatchWorkflow {
    pub fn new(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
            validation: state.config.call_status_validation,
        }
    }

    pub async fn assign_ambulance(
        &self,
        call_id: i64,
        request: AssignAmbulanceRequest,
    ) -> Result<CallDetail, AppError> {
        debug!("Assigning ambulance {:?} to call {}", request.ambulance_id, call_id);

        let mut tx = self.db.begin().await;
        let mut call = tx.get::<EmergencyCall>(call_id)?.clone();
        let ambulance_id = request.ambulance_id.ok_or(DispatchError::AmbulanceIdRequired)?;
        let mut ambulance = tx.get::<Ambulance>(ambulance_id)?.clone();

        if !ambulance.is_available() {
            warn!(
                "Rejected assignment of ambulance {} to call {}: status is {}",
                ambulance.vehicle_number, call_id, ambulance.status
            );
            return Err(DispatchError::AmbulanceUnavailable.into());
        }

        call.assigned_ambulance = Some(ambulance.id);
        call.status = CallStatus::Assigned;
        ambulance.status = AmbulanceStatus::Assigned;
        ambulance.updated_at = Utc::now();

        tx.update(ambulance)?;
        let call = tx.update(call)?;
        let detail = CallDetail::build(&tx, call);
        tx.commit().await?;

        info!("Ambulance {} assigned to call {}", ambulance_id, call_id);
        Ok(detail)
    }

    pub async fn update_call_status(
        &self,
        call_id: i64,
        request: UpdateStatusRequest,
    ) -> Result<CallDetail, AppError> {
        debug!("Updating status of call {} to {:?}", call_id, request.status);

        let mut tx = self.db.begin().await;
        let mut call = tx.get::<EmergencyCall>(call_id)?.clone();
        let status = request
            .status
            .filter(|status| !status.trim().is_empty())
            .ok_or(DispatchError::StatusRequired)?;
        let status = accept_status(self.validation, CallStatus::from(status))?;

        if let Some(ambulance_id) = call.assigned_ambulance {
            if let Some(mirrored) = mirrored_status(&status) {
                let ambulance = tx.ambulances.require_mut(ambulance_id)?;
                debug!(
                    "Mirroring call status {} onto ambulance {}: {} -> {}",
                    status, ambulance.vehicle_number, ambulance.status, mirrored
                );
                ambulance.status = mirrored;
                ambulance.updated_at = Utc::now();
            }
        }
        call.status = status;

        let call = tx.update(call)?;
        let detail = CallDetail::build(&tx, call);
        tx.commit().await?;

        info!("Call {} is now {}", call_id, detail.call.status);
        Ok(detail)
    }

    pub async fn complete_trip(&self, trip_id: i64) -> Result<TripDetail, AppError> {
        debug!("Completing trip: {}", trip_id);

        let mut tx = self.db.begin().await;
        let mut trip = tx.get::<Trip>(trip_id)?.clone();

        if trip.status == TripStatus::Completed {
            warn!("Trip {} was already completed at {:?}", trip_id, trip.end_time);
            return Err(DispatchError::TripAlreadyCompleted.into());
        }

        let now = Utc::now();
        trip.end_time = Some(now.max(trip.start_time));
        trip.status = TripStatus::Completed;
        trip.updated_at = now;

        if let Some(ambulance) = tx.ambulances.get_mut(trip.ambulance) {
            ambulance.status = AmbulanceStatus::Available;
            ambulance.updated_at = now;
        }
        if let Some(call) = tx.emergency_calls.get_mut(trip.call) {
            call.status = CallStatus::Completed;
        }

        let trip = tx.update(trip)?;
        let detail = TripDetail::build(&tx, trip);
        tx.commit().await?;

        info!("Trip {} completed; ambulance {} released", trip_id, detail.trip.ambulance);
        Ok(detail)
    }

    /// Calls still waiting for an ambulance, newest first.
    pub async fn pending_calls(&self) -> Result<Vec<CallDetail>, AppError> {
        debug!("Listing pending calls");

        let tables = self.db.read().await;
        let mut calls: Vec<EmergencyCall> = tables
            .emergency_calls
            .iter()
            .filter(|c| c.status == CallStatus::Pending)
            .cloned()
            .collect();
        calls.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(calls.into_iter().map(|c| CallDetail::build(&tables, c)).collect())
    }

    /// Trips under way, newest first.
    pub async fn active_trips(&self) -> Result<Vec<TripDetail>, AppError> {
        debug!("Listing active trips");

        let tables = self.db.read().await;
        let mut trips: Vec<Trip> = tables
            .trips
            .iter()
            .filter(|t| t.status == TripStatus::Active)
            .cloned()
            .collect();
        trips.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(trips.into_iter().map(|t| TripDetail::build(&tables, t)).collect())
    }
}

/// Lenient mode stores any status; strict mode only the known ones.
pub(crate) fn accept_status(validation: StatusValidation, status: CallStatus) -> Result<CallStatus, DispatchError> {
    if validation == StatusValidation::Strict && !status.is_known() {
        return Err(DispatchError::UnknownStatus(status.to_string()));
    }
    Ok(status)
}
