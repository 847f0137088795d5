use invoicing_service::config::{InvoicingConfig, SmtpConfig, StoreBackend, StoreConfig};
use invoicing_service::services::{MemoryStore, RecordingMailer};
use invoicing_service::startup::Application;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;

pub const TEST_USER_ID: &str = "test_user_123";

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub mailer: Arc<RecordingMailer>,
}

impl TestApp {
    /// Spawn the service on a random port with an in-memory store and a
    /// recording mailer. No external services needed.
    pub async fn spawn() -> Self {
        let config = InvoicingConfig {
            common: CoreConfig { port: 0 },
            store: StoreConfig {
                backend: StoreBackend::Memory,
                database_url: None,
            },
            smtp: SmtpConfig {
                enabled: false,
                host: "localhost".to_string(),
                port: 587,
                user: String::new(),
                password: String::new(),
                from_email: "invoices@test.local".to_string(),
                from_name: "Invoicing".to_string(),
            },
        };

        let mailer = Arc::new(RecordingMailer::new());
        let app = Application::build_with_services(
            config,
            Arc::new(MemoryStore::new()),
            mailer.clone(),
        )
        .await
        .expect("Failed to build test application");

        let port = app.port();
        tokio::spawn(app.run_until_stopped());

        let client = reqwest::Client::new();
        let health_url = format!("http://127.0.0.1:{}/health", port);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address: format!("http://127.0.0.1:{}", port),
            client,
            mailer,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// POST an invoice as the test user and return the response body.
    pub async fn create_invoice(&self, payload: serde_json::Value) -> serde_json::Value {
        let response = self
            .client
            .post(self.url("/invoices"))
            .header("X-User-ID", TEST_USER_ID)
            .json(&payload)
            .send()
            .await
            .expect("Failed to execute request.");
        assert_eq!(reqwest::StatusCode::CREATED, response.status());
        response.json().await.expect("Failed to parse JSON")
    }
}

/// A small two-line invoice: 2 x 100 + 1 x 49.99 = 249.99.
pub fn sample_invoice_payload() -> serde_json::Value {
    serde_json::json!({
        "invoice_number": "INV-0042",
        "date": "2026-01-15",
        "terms": "30_days",
        "status": "draft",
        "from": { "name": "Acme Studio", "email": "billing@acme.test" },
        "bill_to": { "name": "Globex" },
        "line_items": [
            { "name": "Consulting", "description": "Consulting", "rate": "100", "quantity": "2" },
            { "description": "License", "rate": "49.99", "quantity": "1" }
        ]
    })
}
