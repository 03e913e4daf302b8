use std::path::PathBuf;
use std::sync::Arc;

use actix_files as fs;
use actix_web::{middleware, web, App, HttpServer};
use log::info;

use crate::cafes::store::CafeStore;
use crate::config::Config;
use crate::web::csrf::CsrfSigner;
use crate::web::handlers;

/// Start the web server for the cafe pages
pub async fn start_web_server(
    config: Config,
    store: Arc<CafeStore>,
    csrf: CsrfSigner,
) -> std::io::Result<()> {
    let (host, port) = config.bind_address();
    info!("Starting web server on http://{}:{}", host, port);

    // Create shared application state
    let app_state = web::Data::new(AppState { store, csrf });
    let static_dir = config.static_dir.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(app_state.clone())
            .configure(|cfg| routes(cfg, static_dir.clone()))
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}

/// Register every route; shared by the server and the route tests
pub fn routes(cfg: &mut web::ServiceConfig, static_dir: PathBuf) {
    cfg
        // Static files
        .service(fs::Files::new("/static", static_dir))
        // Page routes
        .route("/", web::get().to(handlers::pages::index))
        .route("/add", web::get().to(handlers::cafes::add_form))
        .route("/add", web::post().to(handlers::cafes::add_cafe))
        .route("/list", web::get().to(handlers::cafes::cafe_list))
        .route("/cafe-cards", web::get().to(handlers::cafes::cafe_cards))
        .route("/delete/{id}", web::get().to(handlers::cafes::delete_cafe))
        // Default route for 404
        .default_service(web::to(handlers::pages::not_found));
}

/// Shared application state for web handlers
pub struct AppState {
    pub store: Arc<CafeStore>,
    pub csrf: CsrfSigner,
}
