use chrono::Utc;
use tracing::{debug, info};

use shared_database::{AppState, Database, Tables};
use shared_models::accounts::Role;
use shared_models::auth::Identity;
use shared_models::error::AppError;
use shared_models::filters::within_dates;
use shared_models::pagination::Page;
use shared_models::reports::{DriverInspection, ParamedicInspection};

use crate::models::{
    CreateDriverInspectionRequest, CreateParamedicInspectionRequest, DriverInspectionDetail,
    InspectionQuery, InspectionRow, ParamedicInspectionDetail, ReportsError,
    UpdateDriverInspectionRequest, UpdateParamedicInspectionRequest,
};

pub struct InspectionService {
    db: Database,
}

impl InspectionService {
    pub fn new(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
        }
    }

    // ==============================================================================
    // DRIVER INSPECTIONS
    // ==============================================================================

    /// Drivers only ever see their own inspections.
    pub async fn list_driver_inspections(
        &self,
        query: InspectionQuery,
        identity: &Identity,
    ) -> Result<Page<DriverInspectionDetail>, AppError> {
        debug!("Listing driver inspections for user {} with query: {:?}", identity.user_id, query);

        let tables = self.db.read().await;
        let staff = own_rows_only(&tables, identity, Role::Driver);
        let rows = select(tables.driver_inspections.iter(), &query, staff);
        let details = rows
            .into_iter()
            .map(|row| DriverInspectionDetail::build(&tables, row))
            .collect();

        Ok(Page::paginate(details, query.limit, query.offset))
    }

    pub async fn get_driver_inspection(&self, inspection_id: i64) -> Result<DriverInspectionDetail, AppError> {
        debug!("Fetching driver inspection: {}", inspection_id);

        let tables = self.db.read().await;
        let inspection = tables.get::<DriverInspection>(inspection_id)?.clone();

        Ok(DriverInspectionDetail::build(&tables, inspection))
    }

    pub async fn create_driver_inspection(
        &self,
        request: CreateDriverInspectionRequest,
    ) -> Result<DriverInspectionDetail, AppError> {
        debug!(
            "Recording {:?} inspection of ambulance {} by driver {}",
            request.shift, request.ambulance, request.driver
        );

        check_readings(request.mileage, request.fuel_level)?;

        let inspection = DriverInspection {
            id: 0,
            driver: request.driver,
            ambulance: request.ambulance,
            date: request.date,
            shift: request.shift,
            vehicle_inspection: request.vehicle_inspection,
            mileage: request.mileage,
            fuel_level: request.fuel_level,
            overall_status: request.overall_status,
            additional_notes: request.additional_notes,
            submitted_at: Utc::now(),
        };

        let mut tx = self.db.begin().await;
        let inspection = tx.insert(inspection)?;
        let detail = DriverInspectionDetail::build(&tx, inspection);
        tx.commit().await?;

        info!(
            "Driver inspection {} submitted with status {:?}",
            detail.inspection.id, detail.inspection.overall_status
        );
        Ok(detail)
    }

    pub async fn update_driver_inspection(
        &self,
        inspection_id: i64,
        request: UpdateDriverInspectionRequest,
    ) -> Result<DriverInspectionDetail, AppError> {
        debug!("Updating driver inspection: {}", inspection_id);

        let mut tx = self.db.begin().await;
        let mut inspection = tx.get::<DriverInspection>(inspection_id)?.clone();

        if let Some(driver) = request.driver {
            inspection.driver = driver;
        }
        if let Some(ambulance) = request.ambulance {
            inspection.ambulance = ambulance;
        }
        if let Some(date) = request.date {
            inspection.date = date;
        }
        if let Some(shift) = request.shift {
            inspection.shift = shift;
        }
        if let Some(checklist) = request.vehicle_inspection {
            inspection.vehicle_inspection = checklist;
        }
        if let Some(mileage) = request.mileage {
            inspection.mileage = mileage;
        }
        if let Some(fuel_level) = request.fuel_level {
            inspection.fuel_level = fuel_level;
        }
        if let Some(status) = request.overall_status {
            inspection.overall_status = status;
        }
        if let Some(notes) = request.additional_notes {
            inspection.additional_notes = notes;
        }
        check_readings(inspection.mileage, inspection.fuel_level)?;

        let inspection = tx.update(inspection)?;
        let detail = DriverInspectionDetail::build(&tx, inspection);
        tx.commit().await?;

        Ok(detail)
    }

    pub async fn delete_driver_inspection(&self, inspection_id: i64) -> Result<(), AppError> {
        debug!("Deleting driver inspection: {}", inspection_id);

        let mut tx = self.db.begin().await;
        tx.delete::<DriverInspection>(inspection_id)?;
        tx.commit().await?;

        info!("Driver inspection {} deleted", inspection_id);
        Ok(())
    }

    // ==============================================================================
    // PARAMEDIC INSPECTIONS
    // ==============================================================================

    /// Paramedics only ever see their own inspections.
    pub async fn list_paramedic_inspections(
        &self,
        query: InspectionQuery,
        identity: &Identity,
    ) -> Result<Page<ParamedicInspectionDetail>, AppError> {
        debug!("Listing paramedic inspections for user {} with query: {:?}", identity.user_id, query);

        let tables = self.db.read().await;
        let staff = own_rows_only(&tables, identity, Role::Paramedic);
        let rows = select(tables.paramedic_inspections.iter(), &query, staff);
        let details = rows
            .into_iter()
            .map(|row| ParamedicInspectionDetail::build(&tables, row))
            .collect();

        Ok(Page::paginate(details, query.limit, query.offset))
    }

    pub async fn get_paramedic_inspection(&self, inspection_id: i64) -> Result<ParamedicInspectionDetail, AppError> {
        debug!("Fetching paramedic inspection: {}", inspection_id);

        let tables = self.db.read().await;
        let inspection = tables.get::<ParamedicInspection>(inspection_id)?.clone();

        Ok(ParamedicInspectionDetail::build(&tables, inspection))
    }

    pub async fn create_paramedic_inspection(
        &self,
        request: CreateParamedicInspectionRequest,
    ) -> Result<ParamedicInspectionDetail, AppError> {
        debug!(
            "Recording {:?} inspection of ambulance {} by paramedic {}",
            request.shift, request.ambulance, request.paramedic
        );

        let inspection = ParamedicInspection {
            id: 0,
            paramedic: request.paramedic,
            ambulance: request.ambulance,
            date: request.date,
            shift: request.shift,
            medical_equipment: request.medical_equipment,
            overall_status: request.overall_status,
            additional_notes: request.additional_notes,
            submitted_at: Utc::now(),
        };

        let mut tx = self.db.begin().await;
        let inspection = tx.insert(inspection)?;
        let detail = ParamedicInspectionDetail::build(&tx, inspection);
        tx.commit().await?;

        info!(
            "Paramedic inspection {} submitted with status {:?}",
            detail.inspection.id, detail.inspection.overall_status
        );
        Ok(detail)
    }

    pub async fn update_paramedic_inspection(
        &self,
        inspection_id: i64,
        request: UpdateParamedicInspectionRequest,
    ) -> Result<ParamedicInspectionDetail, AppError> {
        debug!("Updating paramedic inspection: {}", inspection_id);

        let mut tx = self.db.begin().await;
        let mut inspection = tx.get::<ParamedicInspection>(inspection_id)?.clone();

        if let Some(paramedic) = request.paramedic {
            inspection.paramedic = paramedic;
        }
        if let Some(ambulance) = request.ambulance {
            inspection.ambulance = ambulance;
        }
        if let Some(date) = request.date {
            inspection.date = date;
        }
        if let Some(shift) = request.shift {
            inspection.shift = shift;
        }
        if let Some(checklist) = request.medical_equipment {
            inspection.medical_equipment = checklist;
        }
        if let Some(status) = request.overall_status {
            inspection.overall_status = status;
        }
        if let Some(notes) = request.additional_notes {
            inspection.additional_notes = notes;
        }

        let inspection = tx.update(inspection)?;
        let detail = ParamedicInspectionDetail::build(&tx, inspection);
        tx.commit().await?;

        Ok(detail)
    }

    pub async fn delete_paramedic_inspection(&self, inspection_id: i64) -> Result<(), AppError> {
        debug!("Deleting paramedic inspection: {}", inspection_id);

        let mut tx = self.db.begin().await;
        tx.delete::<ParamedicInspection>(inspection_id)?;
        tx.commit().await?;

        info!("Paramedic inspection {} deleted", inspection_id);
        Ok(())
    }
}

/// The caller's id when they hold `crew`. The stored user row decides; the
/// token's role claim only counts for callers without one.
fn own_rows_only(tables: &Tables, identity: &Identity, crew: Role) -> Option<i64> {
    let role = tables
        .users
        .get(identity.user_id)
        .map(|user| user.role)
        .or(identity.role);

    (role == Some(crew)).then_some(identity.user_id)
}

/// Applies the list filters and orders newest submission first. `staff`
/// narrows the result to one crew member's inspections.
fn select<'a, T, I>(rows: I, query: &InspectionQuery, staff: Option<i64>) -> Vec<T>
where
    T: InspectionRow + Clone + 'a,
    I: Iterator<Item = &'a T>,
{
    let mut selected: Vec<T> = rows
        .filter(|row| staff.map_or(true, |id| row.staff() == id))
        .filter(|row| query.ambulance_id.map_or(true, |id| row.ambulance() == id))
        .filter(|row| query.status.map_or(true, |status| row.overall_status() == status))
        .filter(|row| within_dates(row.date(), query.date_from, query.date_to))
        .cloned()
        .collect();
    selected.sort_by(|a, b| b.submitted_at().cmp(&a.submitted_at()));
    selected
}

fn check_readings(mileage: i32, fuel_level: i32) -> Result<(), ReportsError> {
    if mileage < 0 {
        return Err(ReportsError::NegativeMileage);
    }
    if !(0..=100).contains(&fuel_level) {
        return Err(ReportsError::FuelLevelOutOfRange);
    }
    Ok(())
}
