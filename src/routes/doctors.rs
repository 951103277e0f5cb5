use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::models::doctor::Doctor;

#[tracing::instrument(name = "Listing doctors", skip(connection))]
pub async fn list_doctors(connection: web::Data<PgPool>) -> HttpResponse {
    let data = match fetch_doctors(&connection).await {
        Ok(val) => val,
        Err(_) => Vec::new(),
    };

    HttpResponse::Ok().json(serde_json::json!({
        "status": "success",
        "length": data.len(),
        "data": data
    }))
}

#[tracing::instrument(name = "Fetching all doctors", skip(pool))]
pub async fn fetch_doctors(pool: &PgPool) -> Result<Vec<Doctor>, sqlx::Error> {
    sqlx::query_as::<_, Doctor>(
        r#"
        SELECT id, first_name, last_name, specialization
        FROM doctors
        ORDER BY last_name
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {}", e);
        e
    })
}
