use chrono::Utc;
use tracing::{debug, info};

use shared_database::{AppState, Database};
use shared_models::error::AppError;
use shared_models::filters::contains_ignore_case;
use shared_models::pagination::Page;
use shared_models::patients::Patient;

use crate::models::{CreatePatientRequest, PatientError, PatientQuery, UpdatePatientRequest};

pub struct PatientService {
    db: Database,
}

impl PatientService {
    pub fn new(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
        }
    }

    /// Newest patients first.
    pub async fn list_patients(&self, query: PatientQuery) -> Result<Page<Patient>, AppError> {
        debug!("Listing patients with query: {:?}", query);

        let tables = self.db.read().await;
        let mut patients: Vec<Patient> = tables
            .patients
            .iter()
            .filter(|p| query.name.as_deref().map_or(true, |name| contains_ignore_case(&p.name, name)))
            .filter(|p| query.gender.map_or(true, |gender| p.gender == gender))
            .cloned()
            .collect();
        patients.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(Page::paginate(patients, query.limit, query.offset))
    }

    pub async fn get_patient(&self, patient_id: i64) -> Result<Patient, AppError> {
        debug!("Fetching patient: {}", patient_id);

        let tables = self.db.read().await;
        Ok(tables.get::<Patient>(patient_id)?.clone())
    }

    pub async fn create_patient(&self, request: CreatePatientRequest) -> Result<Patient, AppError> {
        debug!("Creating patient record for: {}", request.name);

        if request.name.trim().is_empty() {
            return Err(PatientError::Blank("name").into());
        }
        if request.age < 0 {
            return Err(PatientError::NegativeAge.into());
        }

        let now = Utc::now();
        let patient = Patient {
            id: 0,
            name: request.name,
            age: request.age,
            gender: request.gender,
            phone: request.phone,
            medical_condition: request.medical_condition,
            allergies: request.allergies,
            medications: request.medications,
            emergency_contact_name: request.emergency_contact_name,
            emergency_contact_phone: request.emergency_contact_phone,
            emergency_contact_relation: request.emergency_contact_relation,
            pickup_latitude: request.pickup_latitude,
            pickup_longitude: request.pickup_longitude,
            pickup_address: request.pickup_address,
            destination_latitude: request.destination_latitude,
            destination_longitude: request.destination_longitude,
            destination_address: request.destination_address,
            hospital_name: request.hospital_name,
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.db.begin().await;
        let patient = tx.insert(patient)?;
        tx.commit().await?;

        info!("Patient {} created", patient.id);
        Ok(patient)
    }

    pub async fn update_patient(&self, patient_id: i64, request: UpdatePatientRequest) -> Result<Patient, AppError> {
        debug!("Updating patient: {}", patient_id);

        let mut tx = self.db.begin().await;
        let mut patient = tx.get::<Patient>(patient_id)?.clone();

        if let Some(name) = request.name {
            if name.trim().is_empty() {
                return Err(PatientError::Blank("name").into());
            }
            patient.name = name;
        }
        if let Some(age) = request.age {
            if age < 0 {
                return Err(PatientError::NegativeAge.into());
            }
            patient.age = age;
        }
        if let Some(gender) = request.gender {
            patient.gender = gender;
        }
        if let Some(phone) = request.phone {
            patient.phone = phone;
        }
        if let Some(condition) = request.medical_condition {
            patient.medical_condition = condition;
        }
        if let Some(allergies) = request.allergies {
            patient.allergies = allergies;
        }
        if let Some(medications) = request.medications {
            patient.medications = medications;
        }
        if let Some(name) = request.emergency_contact_name {
            patient.emergency_contact_name = name;
        }
        if let Some(phone) = request.emergency_contact_phone {
            patient.emergency_contact_phone = phone;
        }
        if let Some(relation) = request.emergency_contact_relation {
            patient.emergency_contact_relation = relation;
        }
        if let Some(latitude) = request.pickup_latitude {
            patient.pickup_latitude = latitude;
        }
        if let Some(longitude) = request.pickup_longitude {
            patient.pickup_longitude = longitude;
        }
        if let Some(address) = request.pickup_address {
            patient.pickup_address = address;
        }
        if let Some(latitude) = request.destination_latitude {
            patient.destination_latitude = latitude;
        }
        if let Some(longitude) = request.destination_longitude {
            patient.destination_longitude = longitude;
        }
        if let Some(address) = request.destination_address {
            patient.destination_address = address;
        }
        if let Some(hospital) = request.hospital_name {
            patient.hospital_name = hospital;
        }
        patient.updated_at = Utc::now();

        let patient = tx.update(patient)?;
        tx.commit().await?;
        Ok(patient)
    }

    pub async fn delete_patient(&self, patient_id: i64) -> Result<(), AppError> {
        debug!("Deleting patient: {}", patient_id);

        let mut tx = self.db.begin().await;
        tx.delete::<Patient>(patient_id)?;
        tx.commit().await?;

        info!("Patient {} deleted", patient_id);
        Ok(())
    }
}
