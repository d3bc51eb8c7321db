use chrono::Utc;
use tracing::{debug, info};

use shared_database::{AppState, Database};
use shared_models::dispatch::{Trip, TripStatus};
use shared_models::error::AppError;
use shared_models::filters::within_dates;
use shared_models::pagination::Page;

use crate::models::{CreateTripRequest, TripDetail, TripQuery, UpdateTripRequest};

pub struct TripService {
    db: Database,
}

impl TripService {
    pub fn new(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
        }
    }

    pub async fn list_trips(&self, query: TripQuery) -> Result<Page<TripDetail>, AppError> {
        debug!("Listing trips with query: {:?}", query);

        let tables = self.db.read().await;
        let mut trips: Vec<Trip> = tables
            .trips
            .iter()
            .filter(|t| query.status.map_or(true, |status| t.status == status))
            .filter(|t| query.ambulance.map_or(true, |id| t.ambulance == id))
            .filter(|t| query.patient.map_or(true, |id| t.patient == id))
            .filter(|t| query.call.map_or(true, |id| t.call == id))
            .filter(|t| within_dates(t.start_time.date_naive(), query.date_from, query.date_to))
            .cloned()
            .collect();
        trips.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let details = trips
            .into_iter()
            .map(|t| TripDetail::build(&tables, t))
            .collect();

        Ok(Page::paginate(details, query.limit, query.offset))
    }

    pub async fn get_trip(&self, trip_id: i64) -> Result<TripDetail, AppError> {
        debug!("Fetching trip: {}", trip_id);

        let tables = self.db.read().await;
        let trip = tables.get::<Trip>(trip_id)?.clone();

        Ok(TripDetail::build(&tables, trip))
    }

    pub async fn create_trip(&self, request: CreateTripRequest) -> Result<TripDetail, AppError> {
        debug!("Creating trip for call {}", request.call);

        let now = Utc::now();
        let trip = Trip {
            id: 0,
            call: request.call,
            ambulance: request.ambulance,
            patient: request.patient,
            start_time: request.start_time,
            end_time: None,
            distance: request.distance,
            cost: request.cost,
            status: TripStatus::Active,
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.db.begin().await;
        let trip = tx.insert(trip)?;
        let detail = TripDetail::build(&tx, trip);
        tx.commit().await?;

        info!("Trip {} started for call {}", detail.trip.id, detail.trip.call);
        Ok(detail)
    }

    pub async fn update_trip(&self, trip_id: i64, request: UpdateTripRequest) -> Result<TripDetail, AppError> {
        debug!("Updating trip: {}", trip_id);

        let mut tx = self.db.begin().await;
        let mut trip = tx.get::<Trip>(trip_id)?.clone();

        if let Some(call) = request.call {
            trip.call = call;
        }
        if let Some(ambulance) = request.ambulance {
            trip.ambulance = ambulance;
        }
        if let Some(patient) = request.patient {
            trip.patient = patient;
        }
        if let Some(start_time) = request.start_time {
            trip.start_time = start_time;
        }
        if let Some(distance) = request.distance {
            trip.distance = distance;
        }
        if let Some(cost) = request.cost {
            trip.cost = cost;
        }
        trip.updated_at = Utc::now();

        let trip = tx.update(trip)?;
        let detail = TripDetail::build(&tx, trip);
        tx.commit().await?;

        Ok(detail)
    }

    pub async fn delete_trip(&self, trip_id: i64) -> Result<(), AppError> {
        debug!("Deleting trip: {}", trip_id);

        let mut tx = self.db.begin().await;
        tx.delete::<Trip>(trip_id)?;
        tx.commit().await?;

        info!("Trip {} deleted", trip_id);
        Ok(())
    }
}
