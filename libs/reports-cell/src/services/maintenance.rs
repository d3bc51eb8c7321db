use chrono::Utc;
use tracing::{debug, info};

use shared_database::{AppState, Database};
use shared_models::error::AppError;
use shared_models::filters::within_dates;
use shared_models::pagination::Page;
use shared_models::reports::MaintenanceRecord;

use crate::models::{
    CreateMaintenanceRequest, MaintenanceDetail, MaintenanceQuery, ReportsError, UpdateMaintenanceRequest,
};

pub struct MaintenanceService {
    db: Database,
}

impl MaintenanceService {
    pub fn new(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
        }
    }

    /// Latest scheduled date first.
    pub async fn list_records(&self, query: MaintenanceQuery) -> Result<Page<MaintenanceDetail>, AppError> {
        debug!("Listing maintenance records with query: {:?}", query);

        let tables = self.db.read().await;
        let mut records: Vec<MaintenanceRecord> = tables
            .maintenance_records
            .iter()
            .filter(|r| query.ambulance_id.map_or(true, |id| r.ambulance == id))
            .filter(|r| query.maintenance_type.map_or(true, |kind| r.maintenance_type == kind))
            .filter(|r| query.status.map_or(true, |status| r.status == status))
            .filter(|r| within_dates(r.scheduled_date, query.date_from, query.date_to))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.scheduled_date.cmp(&a.scheduled_date).then(b.id.cmp(&a.id)));

        let details = records
            .into_iter()
            .map(|r| MaintenanceDetail::build(&tables, r))
            .collect();

        Ok(Page::paginate(details, query.limit, query.offset))
    }

    pub async fn get_record(&self, record_id: i64) -> Result<MaintenanceDetail, AppError> {
        debug!("Fetching maintenance record: {}", record_id);

        let tables = self.db.read().await;
        let record = tables.get::<MaintenanceRecord>(record_id)?.clone();

        Ok(MaintenanceDetail::build(&tables, record))
    }

    pub async fn create_record(&self, request: CreateMaintenanceRequest) -> Result<MaintenanceDetail, AppError> {
        debug!(
            "Scheduling {:?} maintenance for ambulance {} on {}",
            request.maintenance_type, request.ambulance, request.scheduled_date
        );

        check_cost(request.cost)?;

        let now = Utc::now();
        let record = MaintenanceRecord {
            id: 0,
            ambulance: request.ambulance,
            maintenance_type: request.maintenance_type,
            status: request.status.unwrap_or_default(),
            scheduled_date: request.scheduled_date,
            completed_date: request.completed_date,
            description: request.description,
            cost: request.cost,
            vendor: request.vendor,
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.db.begin().await;
        let record = tx.insert(record)?;
        let detail = MaintenanceDetail::build(&tx, record);
        tx.commit().await?;

        info!("Maintenance record {} created", detail.record.id);
        Ok(detail)
    }

    pub async fn update_record(
        &self,
        record_id: i64,
        request: UpdateMaintenanceRequest,
    ) -> Result<MaintenanceDetail, AppError> {
        debug!("Updating maintenance record: {}", record_id);

        let mut tx = self.db.begin().await;
        let mut record = tx.get::<MaintenanceRecord>(record_id)?.clone();

        if let Some(ambulance) = request.ambulance {
            record.ambulance = ambulance;
        }
        if let Some(kind) = request.maintenance_type {
            record.maintenance_type = kind;
        }
        if let Some(status) = request.status {
            record.status = status;
        }
        if let Some(date) = request.scheduled_date {
            record.scheduled_date = date;
        }
        if let Some(date) = request.completed_date {
            record.completed_date = date;
        }
        if let Some(description) = request.description {
            record.description = description;
        }
        if let Some(cost) = request.cost {
            record.cost = cost;
        }
        if let Some(vendor) = request.vendor {
            record.vendor = vendor;
        }
        check_cost(record.cost)?;
        record.updated_at = Utc::now();

        let record = tx.update(record)?;
        let detail = MaintenanceDetail::build(&tx, record);
        tx.commit().await?;

        Ok(detail)
    }

    pub async fn delete_record(&self, record_id: i64) -> Result<(), AppError> {
        debug!("Deleting maintenance record: {}", record_id);

        let mut tx = self.db.begin().await;
        tx.delete::<MaintenanceRecord>(record_id)?;
        tx.commit().await?;

        info!("Maintenance record {} deleted", record_id);
        Ok(())
    }
}

fn check_cost(cost: Option<f64>) -> Result<(), ReportsError> {
    match cost {
        Some(cost) if cost < 0.0 => Err(ReportsError::NegativeCost),
        _ => Ok(()),
    }
}
