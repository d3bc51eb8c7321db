use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, Utc};
use tracing::debug;

use shared_database::{AppState, Database, Tables};
use shared_models::error::AppError;
use shared_models::fleet::Ambulance;
use shared_models::reports::MaintenanceStatus;

use crate::models::{
    AmbulanceDue, AmbulanceUtilization, InspectionCounts, InspectionRow, InspectionSummary,
    MaintenanceSummary, OverdueMaintenanceReport, OverdueRecord, StatusCount, TypeCount,
};

const WEEK_DAYS: i64 = 7;
const MONTH_DAYS: i64 = 30;

/// Runs the aggregations against the committed tables, with "today" taken
/// as the current UTC date.
pub struct ReportService {
    db: Database,
}

impl ReportService {
    pub fn new(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
        }
    }

    pub async fn inspection_summary(&self) -> Result<InspectionSummary, AppError> {
        debug!("Building inspection summary");
        let tables = self.db.read().await;
        Ok(inspection_summary(&tables, today()))
    }

    pub async fn maintenance_summary(&self) -> Result<MaintenanceSummary, AppError> {
        debug!("Building maintenance summary");
        let tables = self.db.read().await;
        Ok(maintenance_summary(&tables, today()))
    }

    pub async fn ambulance_utilization(&self) -> Result<Vec<AmbulanceUtilization>, AppError> {
        debug!("Building ambulance utilization report");
        let tables = self.db.read().await;
        Ok(ambulance_utilization(&tables, today()))
    }

    pub async fn overdue_maintenance(&self) -> Result<OverdueMaintenanceReport, AppError> {
        debug!("Building overdue maintenance alerts");
        let tables = self.db.read().await;
        Ok(overdue_maintenance(&tables, today()))
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn days_before(today: NaiveDate, days: i64) -> NaiveDate {
    today - Duration::days(days)
}

fn count_inspections<T: InspectionRow>(rows: &[&T], today: NaiveDate) -> InspectionCounts {
    let week_start = days_before(today, WEEK_DAYS);
    let month_start = days_before(today, MONTH_DAYS);
    let on_or_after = move |start: NaiveDate| rows.iter().filter(move |row| row.date() >= start);

    let mut breakdown = BTreeMap::new();
    for row in on_or_after(week_start) {
        *breakdown.entry(row.overall_status()).or_insert(0) += 1;
    }

    InspectionCounts {
        today: rows.iter().filter(|row| row.date() == today).count(),
        week: on_or_after(week_start).count(),
        month: on_or_after(month_start).count(),
        status_breakdown: breakdown
            .into_iter()
            .map(|(overall_status, count)| StatusCount { overall_status, count })
            .collect(),
    }
}

/// Inspection counts for today, the last 7 and the last 30 days, with the
/// weekly outcome breakdown, for drivers and paramedics separately.
pub fn inspection_summary(tables: &Tables, today: NaiveDate) -> InspectionSummary {
    InspectionSummary {
        driver_inspections: count_inspections(&tables.driver_inspections.iter().collect::<Vec<_>>(), today),
        paramedic_inspections: count_inspections(
            &tables.paramedic_inspections.iter().collect::<Vec<_>>(),
            today,
        ),
    }
}

pub fn maintenance_summary(tables: &Tables, today: NaiveDate) -> MaintenanceSummary {
    let month_start = days_before(today, MONTH_DAYS);
    let records = || tables.maintenance_records.iter();

    let completed_this_month: Vec<_> = records()
        .filter(|r| r.status == MaintenanceStatus::Completed)
        .filter(|r| r.completed_date.is_some_and(|date| date >= month_start))
        .collect();

    let mut breakdown = BTreeMap::new();
    for record in records().filter(|r| r.scheduled_date >= month_start) {
        *breakdown.entry(record.maintenance_type).or_insert(0) += 1;
    }

    MaintenanceSummary {
        pending_maintenance: records()
            .filter(|r| r.status == MaintenanceStatus::Scheduled)
            .count(),
        completed_this_month: completed_this_month.len(),
        monthly_cost: completed_this_month.iter().filter_map(|r| r.cost).sum(),
        overdue_maintenance: records().filter(|r| r.is_overdue(today)).count(),
        type_breakdown: breakdown
            .into_iter()
            .map(|(maintenance_type, count)| TypeCount { maintenance_type, count })
            .collect(),
    }
}

/// Trip volume, distance and revenue over the last 30 days for every
/// ambulance, ordered by vehicle number.
pub fn ambulance_utilization(tables: &Tables, today: NaiveDate) -> Vec<AmbulanceUtilization> {
    let month_start = days_before(today, MONTH_DAYS);

    let mut ambulances: Vec<&Ambulance> = tables.ambulances.iter().collect();
    ambulances.sort_by(|a, b| a.vehicle_number.cmp(&b.vehicle_number));

    ambulances
        .into_iter()
        .map(|ambulance| {
            let trips: Vec<_> = tables
                .trips
                .iter()
                .filter(|t| t.ambulance == ambulance.id)
                .filter(|t| t.start_time.date_naive() >= month_start)
                .collect();

            AmbulanceUtilization {
                ambulance_id: ambulance.id,
                vehicle_number: ambulance.vehicle_number.clone(),
                model: ambulance.model.clone(),
                status: ambulance.status,
                trips_count: trips.len(),
                total_distance: trips.iter().map(|t| t.distance).sum(),
                total_revenue: trips.iter().map(|t| t.cost).sum(),
            }
        })
        .collect()
}

/// Scheduled maintenance whose date has passed, and ambulances whose
/// `next_maintenance` date is today or earlier.
pub fn overdue_maintenance(tables: &Tables, today: NaiveDate) -> OverdueMaintenanceReport {
    let overdue_maintenance_records = tables
        .maintenance_records
        .iter()
        .filter(|r| r.is_overdue(today))
        .map(|r| OverdueRecord {
            maintenance_id: r.id,
            ambulance_id: r.ambulance,
            vehicle_number: tables
                .ambulances
                .get(r.ambulance)
                .map(|a| a.vehicle_number.clone())
                .unwrap_or_default(),
            maintenance_type: r.maintenance_type,
            scheduled_date: r.scheduled_date,
            days_overdue: (today - r.scheduled_date).num_days(),
            description: r.description.clone(),
        })
        .collect();

    let ambulances_due_for_maintenance = tables
        .ambulances
        .iter()
        .filter(|a| a.is_maintenance_due(today))
        .map(|a| AmbulanceDue {
            ambulance_id: a.id,
            vehicle_number: a.vehicle_number.clone(),
            next_maintenance: a.next_maintenance,
            days_overdue: (today - a.next_maintenance).num_days(),
        })
        .collect();

    OverdueMaintenanceReport {
        overdue_maintenance_records,
        ambulances_due_for_maintenance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shared_models::accounts::Role;
    use shared_models::dispatch::CallStatus;
    use shared_models::reports::{InspectionStatus, MaintenanceType, Shift};
    use shared_utils::test_utils::fixtures;

    fn today() -> NaiveDate {
        fixtures::date(2024, 6, 30)
    }

    fn crew(tables: &mut Tables) -> (i64, i64, i64) {
        let driver = tables.insert(fixtures::user("dan", Role::Driver)).unwrap().id;
        let paramedic = tables.insert(fixtures::user("pat", Role::Paramedic)).unwrap().id;
        let ambulance = tables.insert(fixtures::ambulance("AMB-001")).unwrap().id;
        (driver, paramedic, ambulance)
    }

    #[test]
    fn inspection_windows_and_breakdown() {
        let mut tables = Tables::default();
        let (driver, paramedic, ambulance) = crew(&mut tables);

        let dates = [
            (fixtures::date(2024, 6, 30), InspectionStatus::Ready),
            (fixtures::date(2024, 6, 25), InspectionStatus::NeedsAttention),
            (fixtures::date(2024, 6, 23), InspectionStatus::Ready),
            (fixtures::date(2024, 6, 10), InspectionStatus::OutOfService),
            (fixtures::date(2024, 5, 1), InspectionStatus::Ready),
        ];
        for (date, status) in dates {
            let mut inspection = fixtures::driver_inspection(driver, ambulance, date, Shift::Morning);
            inspection.overall_status = status;
            tables.insert(inspection).unwrap();
        }
        tables
            .insert(fixtures::paramedic_inspection(paramedic, ambulance, today(), Shift::Night))
            .unwrap();

        let summary = inspection_summary(&tables, today());

        let driver_counts = &summary.driver_inspections;
        assert_eq!(driver_counts.today, 1);
        assert_eq!(driver_counts.week, 3);
        assert_eq!(driver_counts.month, 4);
        assert_eq!(
            driver_counts.status_breakdown,
            vec![
                StatusCount { overall_status: InspectionStatus::Ready, count: 2 },
                StatusCount { overall_status: InspectionStatus::NeedsAttention, count: 1 },
            ]
        );
        assert_eq!(summary.paramedic_inspections.today, 1);
        assert_eq!(summary.paramedic_inspections.month, 1);
    }

    #[test]
    fn maintenance_summary_counts_and_costs() {
        let mut tables = Tables::default();
        let (_, _, ambulance) = crew(&mut tables);

        let mut done = fixtures::maintenance(ambulance, fixtures::date(2024, 6, 10), MaintenanceStatus::Completed);
        done.completed_date = Some(fixtures::date(2024, 6, 12));
        done.cost = Some(250.0);
        done.maintenance_type = MaintenanceType::Repair;
        tables.insert(done).unwrap();

        let mut done_no_cost = fixtures::maintenance(ambulance, fixtures::date(2024, 6, 20), MaintenanceStatus::Completed);
        done_no_cost.completed_date = Some(fixtures::date(2024, 6, 21));
        tables.insert(done_no_cost).unwrap();

        let mut done_long_ago = fixtures::maintenance(ambulance, fixtures::date(2024, 3, 1), MaintenanceStatus::Completed);
        done_long_ago.completed_date = Some(fixtures::date(2024, 3, 2));
        done_long_ago.cost = Some(999.0);
        tables.insert(done_long_ago).unwrap();

        tables
            .insert(fixtures::maintenance(ambulance, fixtures::date(2024, 6, 1), MaintenanceStatus::Scheduled))
            .unwrap();
        tables
            .insert(fixtures::maintenance(ambulance, fixtures::date(2024, 7, 15), MaintenanceStatus::Scheduled))
            .unwrap();

        let summary = maintenance_summary(&tables, today());

        assert_eq!(summary.pending_maintenance, 2);
        assert_eq!(summary.completed_this_month, 2);
        assert_eq!(summary.monthly_cost, 250.0);
        assert_eq!(summary.overdue_maintenance, 1);
        assert_eq!(
            summary.type_breakdown,
            vec![
                TypeCount { maintenance_type: MaintenanceType::Routine, count: 3 },
                TypeCount { maintenance_type: MaintenanceType::Repair, count: 1 },
            ]
        );
    }

    #[test]
    fn utilization_covers_every_ambulance_in_vehicle_order() {
        let mut tables = Tables::default();
        let busy = tables.insert(fixtures::ambulance("AMB-002")).unwrap().id;
        let idle = tables.insert(fixtures::ambulance("AMB-001")).unwrap().id;
        let patient = tables.insert(fixtures::patient("Ann")).unwrap().id;

        let recent = Utc.with_ymd_and_hms(2024, 6, 20, 9, 0, 0).unwrap();
        let old = Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap();
        for start in [recent, recent, old] {
            let call = tables.insert(fixtures::call(CallStatus::Completed)).unwrap().id;
            tables.insert(fixtures::trip(call, busy, patient, start)).unwrap();
        }

        let report = ambulance_utilization(&tables, today());

        assert_eq!(report.len(), 2);
        assert_eq!(report[0].ambulance_id, idle);
        assert_eq!(report[0].trips_count, 0);
        assert_eq!(report[0].total_distance, 0.0);
        assert_eq!(report[1].ambulance_id, busy);
        assert_eq!(report[1].trips_count, 2);
        assert!((report[1].total_distance - 16.8).abs() < 1e-9);
        assert!((report[1].total_revenue - 640.0).abs() < 1e-9);
    }

    #[test]
    fn overdue_records_and_due_ambulances() {
        let mut tables = Tables::default();
        let mut due = fixtures::ambulance("AMB-001");
        due.next_maintenance = fixtures::date(2024, 6, 25);
        let due = tables.insert(due).unwrap();
        let mut due_today = fixtures::ambulance("AMB-002");
        due_today.next_maintenance = today();
        tables.insert(due_today).unwrap();
        tables.insert(fixtures::ambulance("AMB-003")).unwrap();

        let late = tables
            .insert(fixtures::maintenance(due.id, fixtures::date(2024, 6, 20), MaintenanceStatus::Scheduled))
            .unwrap();
        tables
            .insert(fixtures::maintenance(due.id, today(), MaintenanceStatus::Scheduled))
            .unwrap();
        tables
            .insert(fixtures::maintenance(due.id, fixtures::date(2024, 6, 1), MaintenanceStatus::InProgress))
            .unwrap();

        let report = overdue_maintenance(&tables, today());

        assert_eq!(report.overdue_maintenance_records.len(), 1);
        let record = &report.overdue_maintenance_records[0];
        assert_eq!(record.maintenance_id, late.id);
        assert_eq!(record.vehicle_number, "AMB-001");
        assert_eq!(record.days_overdue, 10);

        let due_days: Vec<(String, i64)> = report
            .ambulances_due_for_maintenance
            .iter()
            .map(|a| (a.vehicle_number.clone(), a.days_overdue))
            .collect();
        assert_eq!(due_days, vec![("AMB-001".to_string(), 5), ("AMB-002".to_string(), 0)]);
    }
}
