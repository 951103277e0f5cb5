use chrono::{Datelike, Local, NaiveDate};
use rstest::rstest;
use serde_json::Value;

use crate::utils::spawn_app;

#[rstest]
#[tokio::test]
#[case("Ann", "Lee", "1990-06-15", "Female", "a@x.com", "555-0101")]
async fn registering_a_patient_returns_200_and_persists_the_row(
    #[case] first_name: &str,
    #[case] last_name: &str,
    #[case] date_of_birth: &str,
    #[case] gender: &str,
    #[case] email: &str,
    #[case] phone: &str,
) {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let body = serde_json::json!({
        "first_name": first_name,
        "last_name": last_name,
        "date_of_birth": date_of_birth,
        "gender": gender,
        "email": email,
        "phone": phone,
        "blood_type": "O+",
        "allergies": "Penicillin"
    });

    let response = client
        .post(&format!("{}/patients", &app.address))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(200, response.status().as_u16());

    let saved: (String, String) =
        sqlx::query_as("SELECT first_name, last_name FROM patients")
            .fetch_one(&app.db_pool)
            .await
            .expect("Failed to fetch saved patient.");
    assert_eq!(saved.0, first_name);
    assert_eq!(saved.1, last_name);
}

#[rstest]
#[tokio::test]
#[case("bad input")]
async fn registering_a_patient_with_malformed_body_returns_400(#[case] input: &str) {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/patients", &app.address))
        .header("Content-Type", "application/json")
        .body(input.to_string())
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(400, response.status().as_u16());
}

#[rstest]
// Case-insensitive substring over name, email and phone
#[case("lee", 1)]
#[case("A@X.com", 1)]
#[case("555-0101", 1)]
#[case("", 2)]
#[case("zzz", 0)]
#[tokio::test]
async fn listing_patients_applies_the_search_term(#[case] search: &str, #[case] expected: usize) {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let dob = NaiveDate::from_ymd_opt(1990, 6, 15).unwrap();
    app.seed_patient("Ann", "Lee", Some("a@x.com"), Some("555-0101"), dob)
        .await;
    app.seed_patient("Bob", "Ray", None, None, dob).await;

    let response = client
        .get(&format!("{}/patients?search={}", &app.address, search))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());

    let api_response = response
        .json::<Value>()
        .await
        .expect("Failed to parse response.");
    assert_eq!("success", api_response["status"]);
    assert_eq!(expected, api_response["data"].as_array().unwrap().len());
}

#[tokio::test]
async fn listed_patients_carry_their_derived_age() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    // Birthday already passed this year, whatever today is
    let today = Local::now().date_naive();
    let dob = NaiveDate::from_ymd_opt(today.year() - 30, 1, 1).unwrap();
    app.seed_patient("Ann", "Lee", None, None, dob).await;

    let response = client
        .get(&format!("{}/patients", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    let api_response = response
        .json::<Value>()
        .await
        .expect("Failed to parse response.");
    let patients = api_response["data"].as_array().unwrap();
    assert_eq!(1, patients.len());
    assert_eq!(30, patients[0]["age"].as_i64().unwrap());
    assert_eq!("Lee", patients[0]["last_name"]);
}
