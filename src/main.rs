use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;
use std::sync::Arc;

mod api;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod routes;
mod service;
mod store;
mod utils;

use config::Config;
use db::{init_db, init_schema};
use service::AppState;
use store::Stores;

use crate::utils::assignment_cache;
use crate::utils::clock::{Clock, SystemClock};
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;

#[get("/")]
async fn index() -> impl Responder {
    "Time & Attendance Management Service"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let stores = match config.database_url.as_deref() {
        Some(url) => {
            let pool = init_db(url).await;
            init_schema(&pool).await.expect("Failed to bootstrap schema");
            Stores::mysql(pool)
        }
        None => {
            warn!("DATABASE_URL not set; running on the in-memory store");
            Stores::memory()
        }
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let state = AppState::build(stores.clone(), clock.clone(), &config);

    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    // Pre-resolve today's approved assignments so the first wave of punches
    // skips the store round-trip.
    let warmup_stores = stores.clone();
    let warmup_clock = clock.clone();
    actix_web::rt::spawn(async move {
        let today = warmup_clock.now().date_naive();
        if let Err(e) = assignment_cache::warmup_assignment_cache(&warmup_stores, today).await {
            eprintln!("Failed to warmup assignment cache: {:?}", e);
        }
    });

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(state.clone()))
            .app_data(Data::new(config.clone()))
            .service(index)
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await
}
