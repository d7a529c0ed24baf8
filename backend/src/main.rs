use attraction_sync::config::AppConfig;
use attraction_sync::job_controller::state::{start_job_updater, JobsState};
use attraction_sync::store::cache::CacheStore;
use attraction_sync::sync::transport::HttpTransport;
use attraction_sync::sync::SyncContext;
use attraction_sync::{commands, error, services};
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::info;
use std::sync::Arc;
use std::thread;
use tokio::sync::mpsc;

fn startup_error(err: error::Error) -> std::io::Error {
    std::io::Error::other(err.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::load().map_err(startup_error)?;
    let cache = CacheStore::open(&config.cache_path).map_err(startup_error)?;
    info!("Cache opened at {}", config.cache_path.display());

    let transport = Arc::new(HttpTransport::new(&config));
    let sync_ctx = SyncContext::new(cache.clone(), transport, &config).map_err(startup_error)?;

    // Operator commands arrive on stdin for the life of the process.
    {
        let ctx = sync_ctx.clone();
        thread::Builder::new()
            .name("commands".into())
            .spawn(move || commands::listen_for_commands(ctx))?;
    }

    let (tx, rx) = mpsc::channel(100);
    let jobs_state = JobsState::new(tx);

    let updater_state = jobs_state.clone();
    tokio::spawn(async move {
        start_job_updater(updater_state, rx).await;
    });

    let host = config.host.clone();
    let port = config.port;
    info!("Server running at http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(jobs_state.clone()))
            .app_data(web::Data::new(cache.clone()))
            .app_data(web::Data::new(sync_ctx.clone()))
            .app_data(web::Data::new(config.clone()))
            .service(services::attractions::configure_routes())
            .service(services::merge::configure_routes())
    })
        .bind((host.as_str(), port))?
        .run()
        .await
}
