use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use log::{error, info};

mod billing;
mod config;
mod error;
mod models;
mod routes;
mod store;

use config::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    let pool = store::connect(&config).await.map_err(|e| {
        error!("Failed to open task store {}: {}", config.database_url, e);
        std::io::Error::new(std::io::ErrorKind::Other, e)
    })?;

    let server_address = config.bind_address.clone();
    info!(
        "Server running at http://{} (reference time zone {})",
        server_address, config.reference_tz.name()
    );

    let config = web::Data::new(config);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(config.clone())
            .configure(routes::routes::task_logs_configure)
            .configure(routes::routes::reference_configure)
            .configure(routes::routes::summary_configure)
    })
    .bind(server_address)?
    .run()
    .await
}
