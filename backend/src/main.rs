mod config;
mod error;
mod ingest;
mod services;
mod state;
mod store;

#[cfg(test)]
mod test_support;

use crate::config::Config;
use crate::state::AppState;
use crate::store::Store;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::load().map_err(|e| std::io::Error::other(e.to_string()))?;
    let store =
        Store::open(&config.database_path).map_err(|e| std::io::Error::other(e.to_string()))?;

    let host = config.host.clone();
    let port = config.port;
    let state = AppState::new(store, config);

    info!("Server running at http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(services::configure)
    })
        .bind((host.as_str(), port))?
        .run()
        .await
}
