mod common;

use common::{sample_invoice_payload, TestApp, TEST_USER_ID};
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn create_invoice_computes_totals() {
    let app = TestApp::spawn().await;

    let body = app.create_invoice(sample_invoice_payload()).await;

    assert_eq!(body["invoice_number"], "INV-0042");
    assert_eq!(body["subtotal"], "249.99");
    assert_eq!(body["total"], "249.99");
    assert_eq!(body["balance_due"], "249.99");
    assert_eq!(body["line_items"][0]["amount"], "200.00");
    assert_eq!(body["line_items"][1]["amount"], "49.99");
}

#[tokio::test]
async fn malformed_rate_and_quantity_fall_back_to_defaults() {
    let app = TestApp::spawn().await;

    let body = app
        .create_invoice(json!({
            "invoice_number": "7",
            "date": "2026-02-01",
            "bill_to": { "name": "Globex" },
            "line_items": [
                { "description": "Bad rate", "rate": "abc", "quantity": "3" },
                { "description": "No quantity", "rate": "10" }
            ]
        }))
        .await;

    // rate defaults to 0, quantity to 1
    assert_eq!(body["line_items"][0]["amount"], "0.00");
    assert_eq!(body["line_items"][1]["amount"], "10.00");
    assert_eq!(body["total"], "10.00");
}

#[tokio::test]
async fn missing_invoice_number_is_assigned_sequentially() {
    let app = TestApp::spawn().await;

    let first = app
        .create_invoice(json!({
            "date": "2026-01-01",
            "bill_to": { "name": "Globex" },
            "line_items": []
        }))
        .await;
    let second = app
        .create_invoice(json!({
            "date": "2026-01-02",
            "bill_to": { "name": "Globex" },
            "line_items": []
        }))
        .await;

    assert_eq!(first["invoice_number"], "INV-0001");
    assert_eq!(second["invoice_number"], "INV-0002");
    // An empty line-item list still yields well-formed zero totals.
    assert_eq!(first["total"], "0.00");
}

#[tokio::test]
async fn update_recomputes_totals_and_keeps_share_token() {
    let app = TestApp::spawn().await;
    let created = app.create_invoice(sample_invoice_payload()).await;
    let id = created["id"].as_str().unwrap();

    let share: serde_json::Value = app
        .client
        .post(app.url(&format!("/invoices/{}/share", id)))
        .header("X-User-ID", TEST_USER_ID)
        .send()
        .await
        .expect("Failed to execute request.")
        .json()
        .await
        .expect("Failed to parse JSON");
    let token = share["share_token"].as_str().unwrap().to_string();

    let response = app
        .client
        .put(app.url(&format!("/invoices/{}", id)))
        .header("X-User-ID", TEST_USER_ID)
        .json(&json!({
            "invoice_number": "INV-0042",
            "date": "2026-01-15",
            "bill_to": { "name": "Globex" },
            "line_items": [
                { "description": "Consulting", "rate": "150", "quantity": "2" }
            ]
        }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(StatusCode::OK, response.status());
    let updated: serde_json::Value = response.json().await.expect("Failed to parse JSON");

    assert_eq!(updated["total"], "300.00");
    assert_eq!(updated["share_token"], token.as_str());
}

#[tokio::test]
async fn sent_invoice_past_due_reports_overdue_effective_status() {
    let app = TestApp::spawn().await;

    let body = app
        .create_invoice(json!({
            "invoice_number": "8",
            "date": "2020-01-01",
            "terms": "1_day",
            "status": "sent",
            "bill_to": { "name": "Globex" },
            "line_items": [
                { "description": "Work", "rate": "100", "quantity": "1" }
            ]
        }))
        .await;

    // Stored status is untouched; only the display status changes.
    assert_eq!(body["status"], "sent");
    assert_eq!(body["effective_status"], "overdue");
}

#[tokio::test]
async fn invoices_are_scoped_to_their_owner() {
    let app = TestApp::spawn().await;
    let created = app.create_invoice(sample_invoice_payload()).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .client
        .get(app.url(&format!("/invoices/{}", id)))
        .header("X-User-ID", "someone_else")
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(StatusCode::NOT_FOUND, response.status());

    let response = app
        .client
        .get(app.url("/invoices"))
        .header("X-User-ID", "someone_else")
        .send()
        .await
        .expect("Failed to execute request.");
    let list: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(list.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn missing_user_header_is_unauthorized() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/invoices"))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(StatusCode::UNAUTHORIZED, response.status());
}

#[tokio::test]
async fn delete_invoice_works() {
    let app = TestApp::spawn().await;
    let created = app.create_invoice(sample_invoice_payload()).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .client
        .delete(app.url(&format!("/invoices/{}", id)))
        .header("X-User-ID", TEST_USER_ID)
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(StatusCode::NO_CONTENT, response.status());

    let response = app
        .client
        .get(app.url(&format!("/invoices/{}", id)))
        .header("X-User-ID", TEST_USER_ID)
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(StatusCode::NOT_FOUND, response.status());
}
