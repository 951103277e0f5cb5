use actix_web::{web, HttpResponse};
use anyhow::Context;
use chrono::{Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::filters::{filter_appointments, status_badge_class, AppointmentFilter};
use crate::models::appointment::{Appointment, AppointmentStatus, AppointmentSummary};
use crate::routes::SubmissionError;

#[derive(Debug, Deserialize)]
pub struct AppointmentQuery {
    pub filter: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AppointmentView {
    #[serde(flatten)]
    pub appointment: AppointmentSummary,
    pub status_badge: &'static str,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppointmentForm {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

impl From<AppointmentForm> for Appointment {
    fn from(form: AppointmentForm) -> Self {
        Appointment {
            id: Uuid::new_v4(),
            patient_id: form.patient_id,
            doctor_id: form.doctor_id,
            appointment_date: form.appointment_date,
            appointment_time: form.appointment_time,
            status: AppointmentStatus::Scheduled.as_str().to_string(),
            reason: form.reason,
            notes: form.notes,
        }
    }
}

#[tracing::instrument(name = "Listing appointments", skip(params, connection))]
pub async fn list_appointments(
    params: web::Query<AppointmentQuery>,
    connection: web::Data<PgPool>,
) -> HttpResponse {
    let appointments = match fetch_appointments(&connection).await {
        Ok(val) => val,
        // A failed fetch degrades to an empty schedule rather than an error page
        Err(_) => Vec::new(),
    };

    let filter = AppointmentFilter::parse(params.filter.as_deref().unwrap_or("all"));
    let today = Local::now().date_naive();
    let data: Vec<AppointmentView> = filter_appointments(appointments, &filter, today)
        .into_iter()
        .map(|appointment| AppointmentView {
            status_badge: status_badge_class(&appointment.status),
            appointment,
        })
        .collect();

    HttpResponse::Ok().json(serde_json::json!({
        "status": "success",
        "length": data.len(),
        "data": data
    }))
}

#[tracing::instrument(
    name = "Scheduling a new appointment",
    skip(form, connection),
    fields(appointment_date = %form.appointment_date)
)]
pub async fn schedule_appointment(
    form: web::Json<AppointmentForm>,
    connection: web::Data<PgPool>,
) -> Result<HttpResponse, SubmissionError> {
    let appointment: Appointment = form.0.into();
    insert_appointment(&appointment, &connection)
        .await
        .context("Failed to persist the new appointment")?;
    Ok(HttpResponse::Ok().json(appointment))
}

#[tracing::instrument(name = "Fetching the appointment schedule", skip(pool))]
pub async fn fetch_appointments(pool: &PgPool) -> Result<Vec<AppointmentSummary>, sqlx::Error> {
    sqlx::query_as::<_, AppointmentSummary>(
        r#"
        SELECT a.id, a.appointment_date, a.appointment_time, a.status, a.reason, a.notes,
               p.first_name AS patient_first_name,
               p.last_name AS patient_last_name,
               p.phone AS patient_phone,
               d.first_name AS doctor_first_name,
               d.last_name AS doctor_last_name,
               d.specialization
        FROM appointments a
        JOIN patients p ON p.id = a.patient_id
        JOIN doctors d ON d.id = a.doctor_id
        ORDER BY a.appointment_date ASC, a.appointment_time ASC
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {}", e);
        e
    })
}

#[tracing::instrument(
    name = "Saving new appointment details in the database",
    skip(appointment, pool)
)]
pub async fn insert_appointment(
    appointment: &Appointment,
    pool: &PgPool,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO appointments (id, patient_id, doctor_id, appointment_date, appointment_time, status, reason, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(appointment.id)
    .bind(appointment.patient_id)
    .bind(appointment.doctor_id)
    .bind(appointment.appointment_date)
    .bind(appointment.appointment_time)
    .bind(&appointment.status)
    .bind(&appointment.reason)
    .bind(&appointment.notes)
    .execute(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {}", e);
        e
    })?;
    Ok(())
}
