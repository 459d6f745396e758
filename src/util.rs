//! Shared helpers: tracing/dotenv init, environment lookups, app state.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{fmt, EnvFilter};

use crate::carrier_client::{CarrierClient, CarrierConfig};
use crate::models::carrier::Location;

/// Initialize dotenv and structured tracing based on RUST_LOG.
///
/// An explicit env file can be named via ENV_FILE; otherwise standard `.env`
/// discovery in the working directory applies. Existing process variables are
/// never overwritten.
pub fn init_tracing() {
    let mut env_source: String = "none".into();

    if let Ok(path) = std::env::var("ENV_FILE") {
        let path = path.trim();
        if !path.is_empty()
            && std::path::Path::new(path).is_file()
            && dotenvy::from_filename(path).is_ok()
        {
            env_source = format!("{path} (ENV_FILE)");
        }
    }

    if env_source == "none" && dotenvy::dotenv().is_ok() {
        env_source = ".env".into();
    }

    // Respects RUST_LOG potentially provided by the env file
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let subscriber = fmt().with_env_filter(EnvFilter::new(filter)).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    tracing::info!("Environment loaded from: {}", env_source);
}

/// Bind address for the HTTP server, from env or default 0.0.0.0:3000.
pub fn env_bind_addr() -> String {
    std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into())
}

/// Warehouse pickup address, assembled from WAREHOUSE_* variables. The
/// country is always AU; the carrier only quotes domestic pickups.
pub fn warehouse_from_env() -> Location {
    Location {
        contact_name: env_or("WAREHOUSE_CONTACT", "Warehouse Dispatch"),
        company_name: env_or("WAREHOUSE_COMPANY", ""),
        street: env_or("WAREHOUSE_STREET", "Melbourne CBD"),
        suburb: env_or("WAREHOUSE_SUBURB", "Melbourne"),
        state: env_or("WAREHOUSE_STATE", "VIC"),
        postcode: env_or("WAREHOUSE_POSTCODE", "3000"),
        country: "AU".to_string(),
        phone: env_or("WAREHOUSE_PHONE", ""),
        email: env_or("WAREHOUSE_EMAIL", ""),
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Shared application state used by the HTTP server and handlers.
#[derive(Clone)]
pub struct AppState {
    pub carrier: Arc<CarrierClient>,
    pub company_id: i64,
    pub warehouse: Location,
}

impl AppState {
    /// Assemble the full gateway state from the environment.
    pub fn from_env() -> anyhow::Result<Self> {
        let config = CarrierConfig::from_env()?;
        let carrier = Arc::new(CarrierClient::new(config)?);
        let company_id = std::env::var("MACHSHIP_COMPANY_ID")
            .context("MACHSHIP_COMPANY_ID must be set")?
            .trim()
            .parse::<i64>()
            .context("MACHSHIP_COMPANY_ID must be an integer")?;

        Ok(Self {
            carrier,
            company_id,
            warehouse: warehouse_from_env(),
        })
    }
}
