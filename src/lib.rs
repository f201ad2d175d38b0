// src/lib.rs

use axum::{
    Router,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use services::asset_store::AssetStore;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub assets: AssetStore,
}

pub mod entities {
    pub mod ipos;
    pub mod prelude;
}

pub mod services {
    pub mod asset_store;
    pub mod ipo_query;
    pub mod metrics;
}

pub mod handlers;
pub mod models;

/// Build the application router: web pages, JSON API and media files
pub fn app(state: AppState) -> Router {
    let media = ServeDir::new(state.assets.root());

    Router::new()
        // Web pages
        .route("/", get(handlers::pages::home))
        .route("/list", get(handlers::pages::ipo_list))
        .route("/detail/{id}", get(handlers::pages::ipo_detail))
        .route("/api-docs", get(handlers::pages::api_docs))
        // JSON API
        .route(
            "/api/ipo",
            get(handlers::ipo::list_ipos).post(handlers::ipo::create_ipo),
        )
        .route("/api/ipo/upcoming", get(handlers::ipo::upcoming_ipos))
        .route("/api/ipo/ongoing", get(handlers::ipo::ongoing_ipos))
        .route("/api/ipo/listed", get(handlers::ipo::listed_ipos))
        .route(
            "/api/ipo/{id}",
            get(handlers::ipo::get_ipo)
                .put(handlers::ipo::update_ipo)
                .patch(handlers::ipo::patch_ipo)
                .delete(handlers::ipo::delete_ipo),
        )
        .route(
            "/api/ipo/{id}/performance",
            get(handlers::ipo::ipo_performance),
        )
        .route("/api/ipo/{id}/logo", post(handlers::upload::upload_logo))
        .route("/api/ipo/{id}/rhp", post(handlers::upload::upload_rhp))
        .route("/api/ipo/{id}/drhp", post(handlers::upload::upload_drhp))
        // Uploaded assets
        .nest_service("/media", media)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
