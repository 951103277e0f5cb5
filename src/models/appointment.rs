use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The four statuses the scheduling workflow knows about. The `status`
/// column itself stays free text so rows carrying anything else still load
/// and fall through to the default badge.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Copy, Clone)]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
    #[serde(rename = "No Show")]
    NoShow,
}

impl AppointmentStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Scheduled" => Some(AppointmentStatus::Scheduled),
            "Completed" => Some(AppointmentStatus::Completed),
            "Cancelled" => Some(AppointmentStatus::Cancelled),
            "No Show" => Some(AppointmentStatus::NoShow),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
            AppointmentStatus::NoShow => "No Show",
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "bg-blue-100 text-blue-800",
            AppointmentStatus::Completed => "bg-green-100 text-green-800",
            AppointmentStatus::Cancelled => "bg-red-100 text-red-800",
            AppointmentStatus::NoShow => "bg-gray-100 text-gray-800",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, PartialEq, Eq, Clone)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub status: String,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

/// List-view projection: an appointment joined with the patient and doctor
/// names the schedule displays.
#[derive(Debug, Serialize, Deserialize, FromRow, PartialEq, Eq, Clone)]
pub struct AppointmentSummary {
    pub id: Uuid,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub status: String,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub patient_first_name: String,
    pub patient_last_name: String,
    pub patient_phone: Option<String>,
    pub doctor_first_name: String,
    pub doctor_last_name: String,
    pub specialization: String,
}
