use chrono::Utc;
use tracing::{debug, info};

use shared_database::{AppState, Database};
use shared_models::accounts::Role;
use shared_models::auth::Identity;
use shared_models::dispatch::{CallStatus, EmergencyCall};
use shared_models::error::AppError;
use shared_models::filters::within_dates;
use shared_models::pagination::Page;

use crate::models::{CallDetail, CallQuery, CreateCallRequest, DispatchError, UpdateCallRequest};

pub struct CallService {
    db: Database,
}

impl CallService {
    pub fn new(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
        }
    }

    /// Newest calls first.
    pub async fn list_calls(&self, query: CallQuery) -> Result<Page<CallDetail>, AppError> {
        debug!("Listing emergency calls with query: {:?}", query);

        let tables = self.db.read().await;
        let mut calls: Vec<EmergencyCall> = tables
            .emergency_calls
            .iter()
            .filter(|c| query.status.as_ref().map_or(true, |status| &c.status == status))
            .filter(|c| query.priority.map_or(true, |priority| c.priority == priority))
            .filter(|c| query.assigned_ambulance.map_or(true, |id| c.assigned_ambulance == Some(id)))
            .filter(|c| query.dispatcher.map_or(true, |id| c.dispatcher == Some(id)))
            .filter(|c| query.patient.map_or(true, |id| c.patient == Some(id)))
            .filter(|c| within_dates(c.created_at.date_naive(), query.date_from, query.date_to))
            .cloned()
            .collect();
        calls.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let details = calls
            .into_iter()
            .map(|c| CallDetail::build(&tables, c))
            .collect();

        Ok(Page::paginate(details, query.limit, query.offset))
    }

    pub async fn get_call(&self, call_id: i64) -> Result<CallDetail, AppError> {
        debug!("Fetching emergency call: {}", call_id);

        let tables = self.db.read().await;
        let call = tables.get::<EmergencyCall>(call_id)?.clone();

        Ok(CallDetail::build(&tables, call))
    }

    /// Records a new call. When the caller is a dispatcher known to the
    /// store, they become the call's dispatcher.
    pub async fn create_call(&self, request: CreateCallRequest, identity: &Identity) -> Result<CallDetail, AppError> {
        debug!("Creating emergency call from {} for user {}", request.caller_name, identity.user_id);

        if request.caller_phone.trim().is_empty() {
            return Err(DispatchError::Blank("caller_phone").into());
        }

        let mut tx = self.db.begin().await;

        let dispatcher = if identity.has_role(Role::Dispatcher) {
            tx.users
                .get(identity.user_id)
                .filter(|user| user.has_role(Role::Dispatcher))
                .map(|user| user.id)
        } else {
            None
        };
        if identity.has_role(Role::Dispatcher) && dispatcher.is_none() {
            debug!("Dispatcher {} has no user record; call left unattributed", identity.user_id);
        }

        let call = EmergencyCall {
            id: 0,
            caller_name: request.caller_name,
            caller_phone: request.caller_phone,
            latitude: request.latitude,
            longitude: request.longitude,
            address: request.address,
            priority: request.priority,
            status: CallStatus::Pending,
            description: request.description,
            assigned_ambulance: None,
            dispatcher,
            patient: request.patient,
            request_source: request.request_source,
            requester_type: request.requester_type,
            requester_details: request.requester_details,
            created_at: Utc::now(),
            response_time: None,
        };

        let call = tx.insert(call)?;
        let detail = CallDetail::build(&tx, call);
        tx.commit().await?;

        info!(
            "Emergency call {} logged with priority {:?}",
            detail.call.id, detail.call.priority
        );
        Ok(detail)
    }

    /// Plain field edits; status changes made here do not touch the
    /// assigned ambulance and must name a known status.
    pub async fn update_call(&self, call_id: i64, request: UpdateCallRequest) -> Result<CallDetail, AppError> {
        debug!("Updating emergency call: {}", call_id);

        let mut tx = self.db.begin().await;
        let mut call = tx.get::<EmergencyCall>(call_id)?.clone();

        if let Some(name) = request.caller_name {
            call.caller_name = name;
        }
        if let Some(phone) = request.caller_phone {
            if phone.trim().is_empty() {
                return Err(DispatchError::Blank("caller_phone").into());
            }
            call.caller_phone = phone;
        }
        if let Some(latitude) = request.latitude {
            call.latitude = latitude;
        }
        if let Some(longitude) = request.longitude {
            call.longitude = longitude;
        }
        if let Some(address) = request.address {
            call.address = address;
        }
        if let Some(priority) = request.priority {
            call.priority = priority;
        }
        if let Some(status) = request.status {
            if !status.is_known() {
                return Err(DispatchError::UnknownStatus(status.to_string()).into());
            }
            call.status = status;
        }
        if let Some(description) = request.description {
            call.description = description;
        }
        if let Some(ambulance) = request.assigned_ambulance {
            call.assigned_ambulance = ambulance;
        }
        if let Some(dispatcher) = request.dispatcher {
            call.dispatcher = dispatcher;
        }
        if let Some(patient) = request.patient {
            call.patient = patient;
        }
        if let Some(source) = request.request_source {
            call.request_source = source;
        }
        if let Some(requester_type) = request.requester_type {
            call.requester_type = requester_type;
        }
        if let Some(details) = request.requester_details {
            call.requester_details = details;
        }
        if let Some(response_time) = request.response_time {
            call.response_time = response_time;
        }

        let call = tx.update(call)?;
        let detail = CallDetail::build(&tx, call);
        tx.commit().await?;

        Ok(detail)
    }

    pub async fn delete_call(&self, call_id: i64) -> Result<(), AppError> {
        debug!("Deleting emergency call: {}", call_id);

        let mut tx = self.db.begin().await;
        tx.delete::<EmergencyCall>(call_id)?;
        tx.commit().await?;

        info!("Emergency call {} deleted", call_id);
        Ok(())
    }
}
