use tower_http::{cors::CorsLayer, trace::TraceLayer};

use recetario::app;
use recetario::config::AppConfig;
use recetario::products::{self, ProductsState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    app::init_tracing("productos=debug,recetario=debug,axum=info,tower_http=info");

    let config = AppConfig::from_env()?;
    let app = products::router(ProductsState::seeded())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    app::serve(app, &config).await
}
