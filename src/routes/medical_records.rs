use actix_web::{web, HttpResponse};
use anyhow::Context;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::filters::{age_in_years, search_medical_records};
use crate::models::medical_record::{MedicalRecord, MedicalRecordSummary};
use crate::routes::SubmissionError;

#[derive(Debug, Deserialize)]
pub struct RecordSearch {
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MedicalRecordView {
    #[serde(flatten)]
    pub record: MedicalRecordSummary,
    pub patient_age: i32,
}

#[derive(Debug, Deserialize)]
pub struct MedicalRecordForm {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub visit_date: NaiveDate,
    pub diagnosis: String,
    pub symptoms: Option<String>,
    pub treatment: Option<String>,
    pub medications: Option<String>,
    pub notes: Option<String>,
    pub follow_up_date: Option<NaiveDate>,
}

impl From<MedicalRecordForm> for MedicalRecord {
    fn from(form: MedicalRecordForm) -> Self {
        MedicalRecord {
            id: Uuid::new_v4(),
            patient_id: form.patient_id,
            doctor_id: form.doctor_id,
            visit_date: form.visit_date,
            diagnosis: Some(form.diagnosis),
            symptoms: form.symptoms,
            treatment: form.treatment,
            medications: form.medications,
            notes: form.notes,
            follow_up_date: form.follow_up_date,
        }
    }
}

#[tracing::instrument(name = "Listing medical records", skip(params, connection))]
pub async fn list_medical_records(
    params: web::Query<RecordSearch>,
    connection: web::Data<PgPool>,
) -> HttpResponse {
    let records = match fetch_medical_records(&connection).await {
        Ok(val) => val,
        // A failed fetch degrades to an empty list rather than an error page
        Err(_) => Vec::new(),
    };

    let query = params.search.as_deref().unwrap_or("");
    let today = Local::now().date_naive();
    let data: Vec<MedicalRecordView> = search_medical_records(records, query)
        .into_iter()
        .map(|record| MedicalRecordView {
            patient_age: age_in_years(record.patient_date_of_birth, today),
            record,
        })
        .collect();

    HttpResponse::Ok().json(serde_json::json!({
        "status": "success",
        "length": data.len(),
        "data": data
    }))
}

#[tracing::instrument(
    name = "Adding a new medical record",
    skip(form, connection),
    fields(visit_date = %form.visit_date)
)]
pub async fn create_medical_record(
    form: web::Json<MedicalRecordForm>,
    connection: web::Data<PgPool>,
) -> Result<HttpResponse, SubmissionError> {
    let record: MedicalRecord = form.0.into();
    insert_medical_record(&record, &connection)
        .await
        .context("Failed to persist the new medical record")?;
    Ok(HttpResponse::Ok().json(record))
}

#[tracing::instrument(name = "Fetching all medical records", skip(pool))]
pub async fn fetch_medical_records(
    pool: &PgPool,
) -> Result<Vec<MedicalRecordSummary>, sqlx::Error> {
    sqlx::query_as::<_, MedicalRecordSummary>(
        r#"
        SELECT m.id, m.visit_date, m.diagnosis, m.symptoms, m.treatment, m.medications,
               m.notes, m.follow_up_date,
               p.first_name AS patient_first_name,
               p.last_name AS patient_last_name,
               p.date_of_birth AS patient_date_of_birth,
               d.first_name AS doctor_first_name,
               d.last_name AS doctor_last_name,
               d.specialization
        FROM medical_records m
        JOIN patients p ON p.id = m.patient_id
        JOIN doctors d ON d.id = m.doctor_id
        ORDER BY m.visit_date DESC
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
    name = "Saving new medical record details in the database",
    skip(record, pool)
)]
pub async fn insert_medical_record(
    record: &MedicalRecord,
    pool: &PgPool,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO medical_records (id, patient_id, doctor_id, visit_date, diagnosis, symptoms, treatment, medications, notes, follow_up_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(record.id)
    .bind(record.patient_id)
    .bind(record.doctor_id)
    .bind(record.visit_date)
    .bind(&record.diagnosis)
    .bind(&record.symptoms)
    .bind(&record.treatment)
    .bind(&record.medications)
    .bind(&record.notes)
    .bind(record.follow_up_date)
    .execute(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {}", e);
        e
    })?;
    Ok(())
}
