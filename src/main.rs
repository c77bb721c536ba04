use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use log::{error, info, warn};
use std::sync::Arc;

use sag_throughput_api::routes::{self, cors_defaults};
use sag_throughput_api::{AppState, PredictionClient, SageMakerRuntime, Settings};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .format_module_path(false)
        .init();

    let settings = Settings::from_env();
    match &settings.endpoint_name {
        Some(name) => info!("Forwarding predictions to endpoint {}", name),
        None => warn!("SAGEMAKER_ENDPOINT_NAME not set, predictions will fail until it is"),
    }

    // Keep serving preflight requests even if the client cannot be built.
    let client: Option<Arc<dyn PredictionClient>> = match SageMakerRuntime::from_env().await {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            error!("Failed to load AWS config: {}", e);
            None
        }
    };

    let state = web::Data::new(AppState::new(settings.endpoint_name.clone(), client));
    let bind_address = settings.bind_address();

    info!("Listening on http://{} with {} workers", bind_address, settings.workers);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(cors_defaults())
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .workers(settings.workers)
    .bind(&bind_address)?
    .run()
    .await?;

    Ok(())
}
