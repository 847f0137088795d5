use invoicing_service::config::InvoicingConfig;
use invoicing_service::startup::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing("invoicing-service", "info");

    let config = InvoicingConfig::load()?;
    let application = Application::build(config).await?;

    tracing::info!("invoicing-service started");
    application.run_until_stopped().await?;

    Ok(())
}
