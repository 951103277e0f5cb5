use chrono::{Duration, Local, NaiveDate};
use rstest::rstest;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::utils::spawn_app;
use hospital_hub::models::appointment::AppointmentSummary;

#[derive(Serialize, Deserialize, Debug)]
struct APIResponse {
    status: String,
    data: Vec<AppointmentSummary>,
    length: usize,
}

#[rstest]
#[tokio::test]
#[case("2030-04-01", "10:30:00", "Annual check-up")]
async fn scheduling_an_appointment_returns_200(
    #[case] appointment_date: &str,
    #[case] appointment_time: &str,
    #[case] reason: &str,
) {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let dob = NaiveDate::from_ymd_opt(1990, 6, 15).unwrap();
    let patient_id = app.seed_patient("Ann", "Lee", None, None, dob).await;
    let doctor_id = app.seed_doctor("Gregory", "House", "Diagnostics").await;

    let body = serde_json::json!({
        "patient_id": patient_id,
        "doctor_id": doctor_id,
        "appointment_date": appointment_date,
        "appointment_time": appointment_time,
        "reason": reason
    });

    let response = client
        .post(&format!("{}/appointments", &app.address))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(200, response.status().as_u16());

    // New appointments always start out Scheduled
    let saved: (String,) = sqlx::query_as("SELECT status FROM appointments")
        .fetch_one(&app.db_pool)
        .await
        .expect("Failed to fetch saved appointment.");
    assert_eq!("Scheduled", saved.0);
}

#[rstest]
#[tokio::test]
#[case("bad input")]
async fn scheduling_an_appointment_with_malformed_body_returns_400(#[case] input: &str) {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/appointments", &app.address))
        .header("Content-Type", "application/json")
        .body(input.to_string())
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn scheduling_against_an_unknown_patient_returns_500() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let body = serde_json::json!({
        "patient_id": Uuid::new_v4(),
        "doctor_id": Uuid::new_v4(),
        "appointment_date": "2030-04-01",
        "appointment_time": "10:30:00"
    });

    let response = client
        .post(&format!("{}/appointments", &app.address))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(500, response.status().as_u16());
}

#[tokio::test]
async fn today_filter_keeps_only_todays_appointments() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let dob = NaiveDate::from_ymd_opt(1990, 6, 15).unwrap();
    let patient_id = app.seed_patient("Ann", "Lee", None, None, dob).await;
    let doctor_id = app.seed_doctor("Gregory", "House", "Diagnostics").await;

    let today = Local::now().date_naive();
    let tomorrow = today + Duration::days(1);
    app.seed_appointment(patient_id, doctor_id, today, "Scheduled")
        .await;
    app.seed_appointment(patient_id, doctor_id, tomorrow, "Scheduled")
        .await;

    let response = client
        .get(&format!("{}/appointments?filter=today", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());

    let api_response = response
        .json::<APIResponse>()
        .await
        .expect("Failed to parse response.");
    assert_eq!(1, api_response.data.len());
    assert_eq!(today, api_response.data[0].appointment_date);
}

#[rstest]
#[case("all", 2)]
#[case("Scheduled", 1)]
#[case("Completed", 1)]
// An unrecognized selector matches no status at all
#[case("Pending", 0)]
#[tokio::test]
async fn status_filter_is_exact_string_equality(#[case] filter: &str, #[case] expected: usize) {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let dob = NaiveDate::from_ymd_opt(1990, 6, 15).unwrap();
    let patient_id = app.seed_patient("Ann", "Lee", None, None, dob).await;
    let doctor_id = app.seed_doctor("Gregory", "House", "Diagnostics").await;

    let date = NaiveDate::from_ymd_opt(2030, 4, 1).unwrap();
    app.seed_appointment(patient_id, doctor_id, date, "Scheduled")
        .await;
    app.seed_appointment(patient_id, doctor_id, date, "Completed")
        .await;

    let response = client
        .get(&format!("{}/appointments?filter={}", &app.address, filter))
        .send()
        .await
        .expect("Failed to execute request.");

    let api_response = response
        .json::<APIResponse>()
        .await
        .expect("Failed to parse response.");
    assert_eq!(expected, api_response.data.len());
    assert_eq!(api_response.length, api_response.data.len());
}

#[tokio::test]
async fn listed_appointments_carry_names_and_a_status_badge() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let dob = NaiveDate::from_ymd_opt(1990, 6, 15).unwrap();
    let patient_id = app.seed_patient("Ann", "Lee", None, None, dob).await;
    let doctor_id = app.seed_doctor("Gregory", "House", "Diagnostics").await;
    let date = NaiveDate::from_ymd_opt(2030, 4, 1).unwrap();
    app.seed_appointment(patient_id, doctor_id, date, "Completed")
        .await;

    let response = client
        .get(&format!("{}/appointments", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    let api_response = response
        .json::<Value>()
        .await
        .expect("Failed to parse response.");
    let appointments = api_response["data"].as_array().unwrap();
    assert_eq!(1, appointments.len());
    assert_eq!("Lee", appointments[0]["patient_last_name"]);
    assert_eq!("House", appointments[0]["doctor_last_name"]);
    assert_eq!("bg-green-100 text-green-800", appointments[0]["status_badge"]);
}
