//! Request and response DTOs for the hospital endpoints.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use medichat_core::domain::{Hospital, HospitalVisit, WeekDay};

/// Request payload for searching hospitals by name.
#[derive(Debug, Deserialize)]
pub struct SearchHospitals {
    pub keyword: String,
}

impl SearchHospitals {
    pub fn validate(&self) -> Result<(), String> {
        if self.keyword.trim().is_empty() {
            return Err("keyword must not be empty".to_string());
        }
        Ok(())
    }
}

/// Request payload for booking a hospital visit.
#[derive(Debug, Deserialize)]
pub struct CreateVisit {
    pub hospital_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
}

impl CreateVisit {
    /// Checks the visit time against the given clock.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), String> {
        if self.scheduled_at <= now {
            return Err("scheduled_at must be in the future".to_string());
        }
        Ok(())
    }
}

/// Hospital search result item.
#[derive(Debug, Serialize)]
pub struct HospitalDto {
    pub hospital_id: Uuid,
    pub name: String,
    pub phone: String,
    pub address: String,
}

impl From<&Hospital> for HospitalDto {
    fn from(hospital: &Hospital) -> Self {
        Self {
            hospital_id: hospital.id,
            name: hospital.name.clone(),
            phone: hospital.phone.clone(),
            address: hospital.address.clone(),
        }
    }
}

/// A booked visit, annotated with the hospital name and day of week.
#[derive(Debug, Serialize)]
pub struct VisitDto {
    pub visit_id: Uuid,
    pub hospital_name: String,
    pub scheduled_at: DateTime<Utc>,
    pub week_day: WeekDay,
}

impl VisitDto {
    pub fn new(visit: &HospitalVisit, hospital_name: impl Into<String>) -> Self {
        Self {
            visit_id: visit.id,
            hospital_name: hospital_name.into(),
            scheduled_at: visit.scheduled_at,
            week_day: visit.scheduled_at.weekday().into(),
        }
    }
}
