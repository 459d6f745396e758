use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use clap::Parser;

use freightgate::server::config_routes;
use freightgate::util::{self, AppState};

/// Freight gateway between the order front end and the carrier API.
#[derive(Debug, Parser)]
#[command(name = "freightgate", version, about)]
struct Cli {
    /// Address to bind the HTTP server on.
    #[arg(long, env = "BIND_ADDR")]
    bind: Option<String>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    util::init_tracing();
    let cli = Cli::parse();

    let state = AppState::from_env()?;
    let bind = cli.bind.unwrap_or_else(util::env_bind_addr);
    tracing::info!("freight gateway listening on {bind}");

    let data = web::Data::new(state);
    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(Cors::permissive())
            .configure(config_routes)
    })
    .bind(&bind)?
    .run()
    .await?;

    Ok(())
}
