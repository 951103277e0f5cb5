use actix_web::{web, HttpResponse};
use anyhow::Context;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::filters::{age_in_years, search_patients};
use crate::models::patient::Patient;
use crate::routes::SubmissionError;

#[derive(Debug, Deserialize)]
pub struct PatientSearch {
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PatientView {
    #[serde(flatten)]
    pub patient: Patient,
    pub age: i32,
}

#[derive(Debug, Deserialize)]
pub struct PatientForm {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub blood_type: Option<String>,
    pub allergies: Option<String>,
}

impl From<PatientForm> for Patient {
    fn from(form: PatientForm) -> Self {
        Patient {
            id: Uuid::new_v4(),
            first_name: form.first_name,
            last_name: form.last_name,
            date_of_birth: form.date_of_birth,
            gender: form.gender,
            phone: form.phone,
            email: form.email,
            blood_type: form.blood_type,
            allergies: form.allergies,
        }
    }
}

#[tracing::instrument(name = "Listing patients", skip(params, connection))]
pub async fn list_patients(
    params: web::Query<PatientSearch>,
    connection: web::Data<PgPool>,
) -> HttpResponse {
    let patients = match fetch_patients(&connection).await {
        Ok(val) => val,
        // A failed fetch degrades to an empty list rather than an error page
        Err(_) => Vec::new(),
    };

    let query = params.search.as_deref().unwrap_or("");
    let today = Local::now().date_naive();
    let data: Vec<PatientView> = search_patients(patients, query)
        .into_iter()
        .map(|patient| PatientView {
            age: age_in_years(patient.date_of_birth, today),
            patient,
        })
        .collect();

    HttpResponse::Ok().json(serde_json::json!({
        "status": "success",
        "length": data.len(),
        "data": data
    }))
}

#[tracing::instrument(
    name = "Registering a new patient",
    skip(form, connection),
    fields(last_name = %form.last_name)
)]
pub async fn register_patient(
    form: web::Json<PatientForm>,
    connection: web::Data<PgPool>,
) -> Result<HttpResponse, SubmissionError> {
    let patient: Patient = form.0.into();
    insert_patient(&patient, &connection)
        .await
        .context("Failed to persist the new patient")?;
    Ok(HttpResponse::Ok().json(patient))
}

#[tracing::instrument(name = "Fetching all patients", skip(pool))]
pub async fn fetch_patients(pool: &PgPool) -> Result<Vec<Patient>, sqlx::Error> {
    sqlx::query_as::<_, Patient>(
        r#"
        SELECT id, first_name, last_name, date_of_birth, gender, phone, email, blood_type, allergies
        FROM patients
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {}", e);
        e
    })
}

#[tracing::instrument(name = "Saving new patient details in the database", skip(patient, pool))]
pub async fn insert_patient(patient: &Patient, pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO patients (id, first_name, last_name, date_of_birth, gender, phone, email, blood_type, allergies)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(patient.id)
    .bind(&patient.first_name)
    .bind(&patient.last_name)
    .bind(patient.date_of_birth)
    .bind(&patient.gender)
    .bind(&patient.phone)
    .bind(&patient.email)
    .bind(&patient.blood_type)
    .bind(&patient.allergies)
    .execute(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {}", e);
        e
    })?;
    Ok(())
}
