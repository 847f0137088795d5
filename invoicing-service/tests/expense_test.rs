mod common;

use common::{TestApp, TEST_USER_ID};
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn create_and_list_expenses() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/expenses"))
        .header("X-User-ID", TEST_USER_ID)
        .json(&json!({
            "date": "2026-01-10",
            "category": "Software",
            "description": "IDE license",
            "amount": "49.99"
        }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(StatusCode::CREATED, response.status());
    let created: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(created["amount"], "49.99");

    let list: serde_json::Value = app
        .client
        .get(app.url("/expenses"))
        .header("X-User-ID", TEST_USER_ID)
        .send()
        .await
        .expect("Failed to execute request.")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["category"], "Software");
}

#[tokio::test]
async fn expense_list_honors_date_range() {
    let app = TestApp::spawn().await;

    for (date, category) in [("2026-01-10", "Software"), ("2026-03-05", "Travel")] {
        let response = app
            .client
            .post(app.url("/expenses"))
            .header("X-User-ID", TEST_USER_ID)
            .json(&json!({ "date": date, "category": category, "amount": "10" }))
            .send()
            .await
            .expect("Failed to execute request.");
        assert_eq!(StatusCode::CREATED, response.status());
    }

    let list: serde_json::Value = app
        .client
        .get(app.url("/expenses?start=2026-01-01&end=2026-01-31"))
        .header("X-User-ID", TEST_USER_ID)
        .send()
        .await
        .expect("Failed to execute request.")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["category"], "Software");
}

#[tokio::test]
async fn mileage_deduction_is_computed_at_write_time() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/mileage"))
        .header("X-User-ID", TEST_USER_ID)
        .json(&json!({
            "date": "2026-02-14",
            "description": "Client site visit",
            "miles": "100.5",
            "rate_per_mile": "0.67"
        }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(StatusCode::CREATED, response.status());
    let created: serde_json::Value = response.json().await.expect("Failed to parse JSON");

    // 100.5 * 0.67 = 67.335, rounded half-up to 67.34
    assert_eq!(created["deduction"], "67.34");
}

#[tokio::test]
async fn delete_expense_works() {
    let app = TestApp::spawn().await;

    let created: serde_json::Value = app
        .client
        .post(app.url("/expenses"))
        .header("X-User-ID", TEST_USER_ID)
        .json(&json!({ "date": "2026-01-10", "category": "Misc", "amount": "5" }))
        .send()
        .await
        .expect("Failed to execute request.")
        .json()
        .await
        .expect("Failed to parse JSON");
    let id = created["id"].as_str().unwrap();

    let response = app
        .client
        .delete(app.url(&format!("/expenses/{}", id)))
        .header("X-User-ID", TEST_USER_ID)
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(StatusCode::NO_CONTENT, response.status());

    let list: serde_json::Value = app
        .client
        .get(app.url("/expenses"))
        .header("X-User-ID", TEST_USER_ID)
        .send()
        .await
        .expect("Failed to execute request.")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(list.as_array().unwrap().len(), 0);
}
