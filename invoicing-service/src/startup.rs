use crate::config::{InvoicingConfig, StoreBackend};
use crate::handlers;
use crate::services::{InvoiceStore, Mailer, MemoryStore, PgStore, SmtpMailer};
use axum::{
    routing::{delete, get, post},
    Router,
};
use invoice_engine::MoneyFormat;
use service_core::error::AppError;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: InvoicingConfig,
    pub store: Arc<dyn InvoiceStore>,
    pub mailer: Arc<dyn Mailer>,
    pub money: MoneyFormat,
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    pub async fn build(config: InvoicingConfig) -> Result<Self, AppError> {
        let store: Arc<dyn InvoiceStore> = match config.store.backend {
            StoreBackend::Postgres => {
                let url = config.store.database_url.as_deref().ok_or_else(|| {
                    AppError::ConfigError(anyhow::anyhow!(
                        "DATABASE_URL is required for the postgres backend"
                    ))
                })?;
                Arc::new(PgStore::connect(url).await.map_err(|e| {
                    tracing::error!("Failed to connect to Postgres: {}", e);
                    e
                })?)
            }
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
        };

        let mailer: Arc<dyn Mailer> = Arc::new(SmtpMailer::new(config.smtp.clone())?);

        Self::build_with_services(config, store, mailer).await
    }

    /// Wire the router around explicit collaborators. Tests use this with
    /// an in-memory store and a recording mailer.
    pub async fn build_with_services(
        config: InvoicingConfig,
        store: Arc<dyn InvoiceStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Result<Self, AppError> {
        let state = AppState {
            config: config.clone(),
            store,
            mailer,
            money: MoneyFormat::default(),
        };

        let app = Router::new()
            .route("/health", get(handlers::health_check))
            .route(
                "/profile",
                get(handlers::profile::get_profile).put(handlers::profile::update_profile),
            )
            .route(
                "/invoices",
                get(handlers::invoices::list_invoices).post(handlers::invoices::create_invoice),
            )
            .route(
                "/invoices/:id",
                get(handlers::invoices::get_invoice)
                    .put(handlers::invoices::update_invoice)
                    .delete(handlers::invoices::delete_invoice),
            )
            .route("/invoices/:id/view", get(handlers::render::view_invoice))
            .route("/invoices/:id/pdf", get(handlers::render::download_pdf))
            .route("/invoices/:id/email", post(handlers::render::email_invoice))
            .route(
                "/invoices/:id/share",
                post(handlers::share::create_share).delete(handlers::share::revoke_share),
            )
            .route("/share/:token", get(handlers::share::view_shared))
            .route(
                "/expenses",
                get(handlers::expenses::list_expenses).post(handlers::expenses::create_expense),
            )
            .route("/expenses/:id", delete(handlers::expenses::delete_expense))
            .route(
                "/mileage",
                get(handlers::expenses::list_mileage).post(handlers::expenses::create_mileage),
            )
            .route("/mileage/:id", delete(handlers::expenses::delete_mileage))
            .route("/reports/summary", get(handlers::reports::summary))
            .route("/reports/expenses.csv", get(handlers::reports::expenses_csv))
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
