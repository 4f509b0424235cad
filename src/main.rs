use std::sync::Arc;

use actix_web::{get, web, App, HttpResponse, HttpServer, Responder, Result};
use serde::Serialize;

use crate::api::api::ErrorResponse;
use crate::config::Config;
use crate::repository::sqlite::SqliteRepository;
use crate::store::TodoStore;

mod api;
mod config;
mod models;
mod repository;
mod store;
mod telemetry;

#[derive(Serialize)]
pub struct Response {
    pub message: String,
}

#[get("/health")]
async fn healthcheck() -> impl Responder {
    let response = Response {
        message: "Everything is working fine".to_string(),
    };
    HttpResponse::Ok().json(response)
}

async fn not_found() -> Result<HttpResponse> {
    let response = ErrorResponse {
        error: "resource not found".to_string(),
    };
    Ok(HttpResponse::NotFound().json(response))
}

fn setup(config: &Config) -> anyhow::Result<web::Data<TodoStore>> {
    let store = match &config.database_url {
        Some(url) => {
            tracing::info!(database_url = %url, "using sqlite storage");
            TodoStore::new(Arc::new(SqliteRepository::new(url, config.pool_size)?))
        }
        None => {
            tracing::info!("using in-memory storage");
            TodoStore::in_memory()
        }
    };
    Ok(web::Data::new(store))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let subscriber = telemetry::get_subscriber(env!("CARGO_PKG_NAME").into(), &config.log_filter, std::io::stdout);
    telemetry::init_subscriber(subscriber)?;

    let app_data = setup(&config)?;

    tracing::info!(host = %config.host, port = config.port, "starting server");
    HttpServer::new(move || {
        App::new()
            .app_data(app_data.clone())
            .configure(api::api::config)
            .service(healthcheck)
            .default_service(web::route().to(not_found))
            .wrap(actix_web::middleware::Logger::default())
    })
        .bind((config.host.as_str(), config.port))?
        .run()
        .await?;
    Ok(())
}
