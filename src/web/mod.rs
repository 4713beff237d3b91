mod handlers;
mod state;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;

use crate::config::DashboardConfig;
pub use state::AppState;

/// Serve the dashboard UI and its JSON API until shut down.
pub async fn start_server(config: DashboardConfig) -> std::io::Result<()> {
    let host = config.server.host.clone();
    let port = config.server.port;
    let permissive = config.server.cors_permissive;
    let data = web::Data::new(AppState::new(config));

    tracing::info!("Starting Logistics Data Analysis Dashboard on http://{host}:{port}");

    HttpServer::new(move || {
        let cors = if permissive { Cors::permissive() } else { Cors::default() };
        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            .app_data(data.clone())
            // Static files
            .route("/", web::get().to(handlers::index_html))
            .route("/app.js", web::get().to(handlers::app_js))
            .route("/style.css", web::get().to(handlers::style_css))
            // API routes
            .route("/api/catalog", web::get().to(handlers::catalog_json))
            .route("/api/dashboard", web::post().to(handlers::dashboard))
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
