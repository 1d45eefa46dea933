use std::sync::Arc;

use actix_governor::Governor;
use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;

mod api;
mod config;
mod db;
mod docs;
mod error;
mod ids;
mod model;
mod routes;
mod service;
mod store;
mod utils;

use config::{Config, StoreBackend};
use db::{ensure_schema, init_db};
use service::{QueryService, seed::seed_if_empty};
use store::{RecordStore, memory::MemoryStore, mysql::MySqlStore};

use crate::docs::ApiDoc;
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "HRM attendance service"
}

async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn RecordStore>> {
    match config.store_backend {
        StoreBackend::Memory => {
            warn!("Using the in-memory record store, data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Mysql => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the mysql store")?;
            let pool = init_db(url).await.context("Failed to connect to MySQL")?;
            ensure_schema(&pool)
                .await
                .context("Failed to prepare database schema")?;
            Ok(Arc::new(MySqlStore::new(pool)))
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(backend = %config.store_backend, addr = %config.server_addr, "Server starting...");

    let store = open_store(&config).await?;
    let service = QueryService::new(store);

    if config.seed_demo_data {
        let today = chrono::Utc::now().date_naive();
        seed_if_empty(&service, config.demo_employees, today).await?;
    }

    let governor_conf = routes::build_limiter(config.rate_api_per_min)?;
    let service = Data::new(service);
    let server_addr = config.server_addr.clone();
    let config = Data::new(config);

    HttpServer::new(move || {
        let api_prefix = config.api_prefix.clone();
        App::new()
            .wrap(Logger::default())
            .wrap(Governor::new(&governor_conf))
            .wrap(NormalizePath::trim())
            .service(
                // wildcard {_:.*} matches the bundled JS/CSS files
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(service.clone())
            .app_data(config.clone())
            .service(index)
            .configure(|cfg| routes::configure(cfg, &api_prefix))
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {}", server_addr))?
    .run()
    .await?;

    Ok(())
}
