use serde::{Deserialize, Serialize};

use shared_models::accounts::User;
use shared_models::dispatch::{EmergencyCall, Trip};
use shared_models::fleet::Ambulance;
use shared_models::patients::Patient;
use shared_models::reports::{DriverInspection, MaintenanceRecord, ParamedicInspection};

use crate::error::StoreError;
use crate::references::StaffRef;
use crate::table::{Record, Table};

/// Every table of the dispatch schema. A `Tables` value is either the
/// committed state or the staged copy inside a unit of work.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tables {
    pub users: Table<User>,
    pub ambulances: Table<Ambulance>,
    pub patients: Table<Patient>,
    pub emergency_calls: Table<EmergencyCall>,
    pub trips: Table<Trip>,
    pub driver_inspections: Table<DriverInspection>,
    pub paramedic_inspections: Table<ParamedicInspection>,
    pub maintenance_records: Table<MaintenanceRecord>,
}

/// Binds a record type to its table and to the constraints checked on write.
pub trait Schema: Record + Sized {
    fn table(tables: &Tables) -> &Table<Self>;
    fn table_mut(tables: &mut Tables) -> &mut Table<Self>;

    /// Uniqueness and reference checks for a row about to be written.
    fn check(&self, tables: &Tables) -> Result<(), StoreError>;

    /// Fix up dependent rows after the row with `id` was removed.
    fn on_delete(_tables: &mut Tables, _id: i64) {}
}

impl Tables {
    pub fn get<T: Schema>(&self, id: i64) -> Result<&T, StoreError> {
        T::table(self).require(id)
    }

    pub fn insert<T: Schema>(&mut self, row: T) -> Result<T, StoreError> {
        row.check(self)?;
        Ok(T::table_mut(self).insert(row))
    }

    pub fn update<T: Schema>(&mut self, row: T) -> Result<T, StoreError> {
        T::table(self).require(row.id())?;
        row.check(self)?;
        T::table_mut(self).replace(row.clone())?;
        Ok(row)
    }

    pub fn delete<T: Schema>(&mut self, id: i64) -> Result<T, StoreError> {
        let row = T::table_mut(self).remove(id)?;
        T::on_delete(self, id);
        Ok(row)
    }
}

fn require_reference<T: Record>(table: &Table<T>, field: &'static str, id: i64) -> Result<(), StoreError> {
    if table.contains(id) {
        Ok(())
    } else {
        Err(StoreError::MissingReference { field, id })
    }
}

impl Record for User {
    const LABEL: &'static str = "User";

    fn id(&self) -> i64 {
        self.id
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }
}

impl Schema for User {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.users
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.users
    }

    fn check(&self, tables: &Tables) -> Result<(), StoreError> {
        if tables.users.iter().any(|u| u.id != self.id && u.username == self.username) {
            return Err(StoreError::UniqueViolation { label: Self::LABEL, field: "username" });
        }
        Ok(())
    }

    fn on_delete(tables: &mut Tables, id: i64) {
        for ambulance in tables.ambulances.iter_mut() {
            if ambulance.assigned_driver == Some(id) {
                ambulance.assigned_driver = None;
            }
            if ambulance.assigned_paramedic == Some(id) {
                ambulance.assigned_paramedic = None;
            }
        }
        for call in tables.emergency_calls.iter_mut() {
            if call.dispatcher == Some(id) {
                call.dispatcher = None;
            }
        }
        tables.driver_inspections.remove_where(|i| i.driver == id);
        tables.paramedic_inspections.remove_where(|i| i.paramedic == id);
    }
}

impl Record for Ambulance {
    const LABEL: &'static str = "Ambulance";

    fn id(&self) -> i64 {
        self.id
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }
}

impl Schema for Ambulance {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.ambulances
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.ambulances
    }

    fn check(&self, tables: &Tables) -> Result<(), StoreError> {
        for other in tables.ambulances.iter().filter(|a| a.id != self.id) {
            if other.vehicle_number == self.vehicle_number {
                return Err(StoreError::UniqueViolation { label: Self::LABEL, field: "vehicle_number" });
            }
            if other.license_number == self.license_number {
                return Err(StoreError::UniqueViolation { label: Self::LABEL, field: "license_number" });
            }
        }
        if let Some(driver) = self.assigned_driver {
            StaffRef::driver("assigned_driver", driver).resolve(&tables.users)?;
        }
        if let Some(paramedic) = self.assigned_paramedic {
            StaffRef::paramedic("assigned_paramedic", paramedic).resolve(&tables.users)?;
        }
        Ok(())
    }

    fn on_delete(tables: &mut Tables, id: i64) {
        for call in tables.emergency_calls.iter_mut() {
            if call.assigned_ambulance == Some(id) {
                call.assigned_ambulance = None;
            }
        }
        tables.trips.remove_where(|t| t.ambulance == id);
        tables.driver_inspections.remove_where(|i| i.ambulance == id);
        tables.paramedic_inspections.remove_where(|i| i.ambulance == id);
        tables.maintenance_records.remove_where(|m| m.ambulance == id);
    }
}

impl Record for Patient {
    const LABEL: &'static str = "Patient";

    fn id(&self) -> i64 {
        self.id
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }
}

impl Schema for Patient {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.patients
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.patients
    }

    fn check(&self, _tables: &Tables) -> Result<(), StoreError> {
        Ok(())
    }

    fn on_delete(tables: &mut Tables, id: i64) {
        for call in tables.emergency_calls.iter_mut() {
            if call.patient == Some(id) {
                call.patient = None;
            }
        }
        tables.trips.remove_where(|t| t.patient == id);
    }
}

impl Record for EmergencyCall {
    const LABEL: &'static str = "Emergency call";

    fn id(&self) -> i64 {
        self.id
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }
}

impl Schema for EmergencyCall {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.emergency_calls
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.emergency_calls
    }

    fn check(&self, tables: &Tables) -> Result<(), StoreError> {
        if let Some(ambulance) = self.assigned_ambulance {
            require_reference(&tables.ambulances, "assigned_ambulance", ambulance)?;
        }
        if let Some(dispatcher) = self.dispatcher {
            StaffRef::dispatcher("dispatcher", dispatcher).resolve(&tables.users)?;
        }
        if let Some(patient) = self.patient {
            require_reference(&tables.patients, "patient", patient)?;
        }
        Ok(())
    }

    fn on_delete(tables: &mut Tables, id: i64) {
        tables.trips.remove_where(|t| t.call == id);
    }
}

impl Record for Trip {
    const LABEL: &'static str = "Trip";

    fn id(&self) -> i64 {
        self.id
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }
}

impl Schema for Trip {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.trips
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.trips
    }

    fn check(&self, tables: &Tables) -> Result<(), StoreError> {
        require_reference(&tables.emergency_calls, "call", self.call)?;
        require_reference(&tables.ambulances, "ambulance", self.ambulance)?;
        require_reference(&tables.patients, "patient", self.patient)?;
        if tables.trips.iter().any(|t| t.id != self.id && t.call == self.call) {
            return Err(StoreError::UniqueViolation { label: Self::LABEL, field: "call" });
        }
        Ok(())
    }
}

impl Record for DriverInspection {
    const LABEL: &'static str = "Driver inspection";

    fn id(&self) -> i64 {
        self.id
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }
}

impl Schema for DriverInspection {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.driver_inspections
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.driver_inspections
    }

    fn check(&self, tables: &Tables) -> Result<(), StoreError> {
        StaffRef::driver("driver", self.driver).resolve(&tables.users)?;
        require_reference(&tables.ambulances, "ambulance", self.ambulance)?;
        let duplicate = tables.driver_inspections.iter().any(|i| {
            i.id != self.id
                && i.driver == self.driver
                && i.ambulance == self.ambulance
                && i.date == self.date
                && i.shift == self.shift
        });
        if duplicate {
            return Err(StoreError::UniqueViolation {
                label: Self::LABEL,
                field: "driver, ambulance, date and shift",
            });
        }
        Ok(())
    }
}

impl Record for ParamedicInspection {
    const LABEL: &'static str = "Paramedic inspection";

    fn id(&self) -> i64 {
        self.id
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }
}

impl Schema for ParamedicInspection {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.paramedic_inspections
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.paramedic_inspections
    }

    fn check(&self, tables: &Tables) -> Result<(), StoreError> {
        StaffRef::paramedic("paramedic", self.paramedic).resolve(&tables.users)?;
        require_reference(&tables.ambulances, "ambulance", self.ambulance)?;
        let duplicate = tables.paramedic_inspections.iter().any(|i| {
            i.id != self.id
                && i.paramedic == self.paramedic
                && i.ambulance == self.ambulance
                && i.date == self.date
                && i.shift == self.shift
        });
        if duplicate {
            return Err(StoreError::UniqueViolation {
                label: Self::LABEL,
                field: "paramedic, ambulance, date and shift",
            });
        }
        Ok(())
    }
}

impl Record for MaintenanceRecord {
    const LABEL: &'static str = "Maintenance record";

    fn id(&self) -> i64 {
        self.id
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }
}

impl Schema for MaintenanceRecord {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.maintenance_records
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.maintenance_records
    }

    fn check(&self, tables: &Tables) -> Result<(), StoreError> {
        require_reference(&tables.ambulances, "ambulance", self.ambulance)
    }
}
