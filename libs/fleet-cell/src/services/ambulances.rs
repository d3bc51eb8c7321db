use chrono::Utc;
use tracing::{debug, info};

use shared_database::{AppState, Database};
use shared_models::error::AppError;
use shared_models::fleet::{Ambulance, AmbulanceStatus};
use shared_models::pagination::Page;

use crate::models::{
    check_coordinates, require_text, AmbulanceDetail, AmbulanceQuery, CreateAmbulanceRequest,
    LocationUpdate, UpdateAmbulanceRequest,
};

pub struct AmbulanceService {
    db: Database,
}

impl AmbulanceService {
    pub fn new(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
        }
    }

    pub async fn list_ambulances(&self, query: AmbulanceQuery) -> Result<Page<AmbulanceDetail>, AppError> {
        debug!("Listing ambulances with query: {:?}", query);

        let tables = self.db.read().await;
        let mut ambulances: Vec<Ambulance> = tables
            .ambulances
            .iter()
            .filter(|a| query.status.map_or(true, |status| a.status == status))
            .cloned()
            .collect();
        ambulances.sort_by(|a, b| a.vehicle_number.cmp(&b.vehicle_number));

        let details = ambulances
            .into_iter()
            .map(|a| AmbulanceDetail::build(&tables, a))
            .collect();

        Ok(Page::paginate(details, query.limit, query.offset))
    }

    pub async fn available_ambulances(&self) -> Result<Vec<AmbulanceDetail>, AppError> {
        debug!("Listing available ambulances");

        let page = self
            .list_ambulances(AmbulanceQuery {
                status: Some(AmbulanceStatus::Available),
                ..Default::default()
            })
            .await?;

        Ok(page.results)
    }

    pub async fn get_ambulance(&self, ambulance_id: i64) -> Result<AmbulanceDetail, AppError> {
        debug!("Fetching ambulance: {}", ambulance_id);

        let tables = self.db.read().await;
        let ambulance = tables.get::<Ambulance>(ambulance_id)?.clone();

        Ok(AmbulanceDetail::build(&tables, ambulance))
    }

    pub async fn create_ambulance(&self, request: CreateAmbulanceRequest) -> Result<AmbulanceDetail, AppError> {
        debug!("Creating ambulance: {}", request.vehicle_number);

        require_text("vehicle_number", &request.vehicle_number)?;
        require_text("license_number", &request.license_number)?;
        check_coordinates(request.latitude, request.longitude)?;

        let now = Utc::now();
        let ambulance = Ambulance {
            id: 0,
            vehicle_number: request.vehicle_number.trim().to_string(),
            license_number: request.license_number.trim().to_string(),
            model: request.model,
            year: request.year,
            status: request.status.unwrap_or_default(),
            latitude: request.latitude,
            longitude: request.longitude,
            assigned_driver: request.assigned_driver,
            assigned_paramedic: request.assigned_paramedic,
            last_maintenance: request.last_maintenance,
            next_maintenance: request.next_maintenance,
            insurance_expiry: request.insurance_expiry,
            equipment: request.equipment,
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.db.begin().await;
        let ambulance = tx.insert(ambulance)?;
        let detail = AmbulanceDetail::build(&tx, ambulance);
        tx.commit().await?;

        info!("Ambulance {} registered as {}", detail.ambulance.id, detail.ambulance.vehicle_number);
        Ok(detail)
    }

    pub async fn update_ambulance(
        &self,
        ambulance_id: i64,
        request: UpdateAmbulanceRequest,
    ) -> Result<AmbulanceDetail, AppError> {
        debug!("Updating ambulance: {}", ambulance_id);

        let mut tx = self.db.begin().await;
        let mut ambulance = tx.get::<Ambulance>(ambulance_id)?.clone();

        if let Some(vehicle_number) = request.vehicle_number {
            require_text("vehicle_number", &vehicle_number)?;
            ambulance.vehicle_number = vehicle_number.trim().to_string();
        }
        if let Some(license_number) = request.license_number {
            require_text("license_number", &license_number)?;
            ambulance.license_number = license_number.trim().to_string();
        }
        if let Some(model) = request.model {
            ambulance.model = model;
        }
        if let Some(year) = request.year {
            ambulance.year = year;
        }
        if let Some(status) = request.status {
            ambulance.status = status;
        }
        if let Some(latitude) = request.latitude {
            ambulance.latitude = latitude;
        }
        if let Some(longitude) = request.longitude {
            ambulance.longitude = longitude;
        }
        if let Some(driver) = request.assigned_driver {
            ambulance.assigned_driver = driver;
        }
        if let Some(paramedic) = request.assigned_paramedic {
            ambulance.assigned_paramedic = paramedic;
        }
        if let Some(date) = request.last_maintenance {
            ambulance.last_maintenance = date;
        }
        if let Some(date) = request.next_maintenance {
            ambulance.next_maintenance = date;
        }
        if let Some(date) = request.insurance_expiry {
            ambulance.insurance_expiry = date;
        }
        if let Some(equipment) = request.equipment {
            ambulance.equipment = equipment;
        }
        check_coordinates(ambulance.latitude, ambulance.longitude)?;
        ambulance.updated_at = Utc::now();

        let ambulance = tx.update(ambulance)?;
        let detail = AmbulanceDetail::build(&tx, ambulance);
        tx.commit().await?;

        Ok(detail)
    }

    pub async fn update_location(
        &self,
        ambulance_id: i64,
        location: LocationUpdate,
    ) -> Result<AmbulanceDetail, AppError> {
        debug!("Updating location of ambulance {}: {:?}", ambulance_id, location);

        check_coordinates(Some(location.latitude), Some(location.longitude))?;

        let mut tx = self.db.begin().await;
        let ambulance = tx.ambulances.require_mut(ambulance_id)?;
        ambulance.latitude = Some(location.latitude);
        ambulance.longitude = Some(location.longitude);
        ambulance.updated_at = Utc::now();
        let ambulance = ambulance.clone();

        let detail = AmbulanceDetail::build(&tx, ambulance);
        tx.commit().await?;

        Ok(detail)
    }

    pub async fn delete_ambulance(&self, ambulance_id: i64) -> Result<(), AppError> {
        debug!("Deleting ambulance: {}", ambulance_id);

        let mut tx = self.db.begin().await;
        let ambulance = tx.delete::<Ambulance>(ambulance_id)?;
        tx.commit().await?;

        info!("Ambulance {} ({}) removed from the fleet", ambulance.id, ambulance.vehicle_number);
        Ok(())
    }
}
