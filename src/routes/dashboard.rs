use actix_web::{web, HttpResponse};
use chrono::Local;
use serde::Serialize;
use sqlx::PgPool;

#[derive(Debug, Serialize, Default)]
pub struct DashboardCounts {
    pub total_patients: i64,
    pub todays_appointments: i64,
    pub total_medical_records: i64,
    pub active_doctors: i64,
}

#[tracing::instrument(name = "Building the dashboard", skip(connection))]
pub async fn dashboard(connection: web::Data<PgPool>) -> HttpResponse {
    let data = match fetch_dashboard_counts(&connection).await {
        Ok(val) => val,
        // Degrade to zeroed counters, the dashboard stays up
        Err(e) => {
            tracing::error!("Failed to execute query: {}", e);
            DashboardCounts::default()
        }
    };

    HttpResponse::Ok().json(serde_json::json!({
        "status": "success",
        "data": data
    }))
}

#[tracing::instrument(name = "Counting dashboard totals", skip(pool))]
pub async fn fetch_dashboard_counts(pool: &PgPool) -> Result<DashboardCounts, sqlx::Error> {
    let today = Local::now().date_naive();

    let total_patients = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM patients")
        .fetch_one(pool)
        .await?;
    let todays_appointments =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM appointments WHERE appointment_date = $1")
            .bind(today)
            .fetch_one(pool)
            .await?;
    let total_medical_records = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM medical_records")
        .fetch_one(pool)
        .await?;
    let active_doctors = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM doctors")
        .fetch_one(pool)
        .await?;

    Ok(DashboardCounts {
        total_patients,
        todays_appointments,
        total_medical_records,
        active_doctors,
    })
}
