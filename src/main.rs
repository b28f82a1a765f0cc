use crate::{
    backend_client::create_client, configuration::Configuration,
    configuration_handler::ConfigurationHandler, http::create_app, vitals::VitalsReporter,
};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod backend;
mod backend_client;
mod configuration;
mod configuration_handler;
mod format;
mod http;
mod page;
#[cfg(test)]
mod testutils;
mod types;
mod vitals;

fn log_vitals(reporter: &VitalsReporter) {
    let log = |metric: &vitals::Metric| {
        info!(
            name = %metric.name,
            value = metric.value,
            id = %metric.id,
            delta = ?metric.delta,
            "Web vital"
        );
    };
    reporter.on_cls(log);
    reporter.on_fcp(log);
    reporter.on_fid(log);
    reporter.on_lcp(log);
    reporter.on_ttfb(log);
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("################");
    println!("# Booking Site #");
    println!("################");

    let configuration = match ConfigurationHandler::parse_arguments() {
        Ok(configuration) => configuration,
        Err(err) => {
            error!(%err, "Invalid configuration");
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let client = match create_client(&configuration.backend()) {
        Ok(client) => client,
        Err(err) => {
            error!(%err, "Failed to create backend client");
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    info!(url = %configuration.backend().url(), "Using hosted backend");

    let vitals = VitalsReporter::default();
    log_vitals(&vitals);

    let address = format!("0.0.0.0:{}", configuration.port());
    println!("Accessible at:\n{}", address.clone());
    let listener = match tokio::net::TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(%err, %address, "Failed to bind listener");
            return ExitCode::FAILURE;
        }
    };

    let app = create_app(client, vitals, configuration);
    if let Err(err) = axum::serve(listener, app).await {
        error!(%err, "Server stopped");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
