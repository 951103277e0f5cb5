//! In-memory derivation and filtering applied to fetched collections before
//! they are rendered: age from birth date, free-text search over list views,
//! the appointment status/date selector, and status badge classes.

use chrono::{Datelike, NaiveDate};

use crate::models::appointment::{AppointmentStatus, AppointmentSummary};
use crate::models::medical_record::MedicalRecordSummary;
use crate::models::patient::Patient;

/// Whole years elapsed since `date_of_birth` as of `today`, decremented by
/// one when the birthday has not yet occurred this year. Local calendar
/// dates only; a birth date in the future comes out negative.
pub fn age_in_years(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

fn contains_query(field: Option<&str>, query: &str) -> bool {
    field.map_or(false, |f| f.to_lowercase().contains(query))
}

/// Keeps patients whose full name, email or phone contains `query`,
/// case-insensitively. An empty query keeps everything; order is preserved.
pub fn search_patients(mut patients: Vec<Patient>, query: &str) -> Vec<Patient> {
    let query = query.to_lowercase();
    patients.retain(|patient| {
        patient.full_name().to_lowercase().contains(&query)
            || contains_query(patient.email.as_deref(), &query)
            || contains_query(patient.phone.as_deref(), &query)
    });
    patients
}

/// Keeps records whose patient name, diagnosis, symptoms or doctor name
/// contains `query`, case-insensitively.
pub fn search_medical_records(
    mut records: Vec<MedicalRecordSummary>,
    query: &str,
) -> Vec<MedicalRecordSummary> {
    let query = query.to_lowercase();
    records.retain(|record| {
        record.patient_full_name().to_lowercase().contains(&query)
            || contains_query(record.diagnosis.as_deref(), &query)
            || contains_query(record.symptoms.as_deref(), &query)
            || record.doctor_full_name().to_lowercase().contains(&query)
    });
    records
}

/// Selector over the appointment list. Anything that is not `all` or
/// `today` is treated as a status literal, so an unrecognized value matches
/// no appointment at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppointmentFilter {
    All,
    Today,
    Status(String),
}

impl AppointmentFilter {
    pub fn parse(s: &str) -> Self {
        match s {
            "all" => AppointmentFilter::All,
            "today" => AppointmentFilter::Today,
            other => AppointmentFilter::Status(other.to_string()),
        }
    }
}

pub fn filter_appointments(
    mut appointments: Vec<AppointmentSummary>,
    filter: &AppointmentFilter,
    today: NaiveDate,
) -> Vec<AppointmentSummary> {
    appointments.retain(|appointment| match filter {
        AppointmentFilter::All => true,
        AppointmentFilter::Today => appointment.appointment_date == today,
        AppointmentFilter::Status(status) => &appointment.status == status,
    });
    appointments
}

/// Display class for a status badge; unknown statuses get the muted default.
pub fn status_badge_class(status: &str) -> &'static str {
    AppointmentStatus::parse(status)
        .map(|status| status.badge_class())
        .unwrap_or("bg-gray-100 text-gray-800")
}
