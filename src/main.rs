use recetario::app;
use recetario::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    app::init_tracing("recetario=debug,axum=info,tower_http=info");

    let state = AppState::init()?;
    let config = state.config.clone();

    let app = app::build_app(state);
    app::serve(app, &config).await
}
