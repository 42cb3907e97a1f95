use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use engine::{HeatManager, SubmissionService};
use storage::Database;
use storage::repository::{HeatRepository, ScoreRepository, ScoringModelRepository, TeamRepository};

mod config;
mod error;
mod features;
mod state;

use config::Config;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::scores::handlers::submit_score,
        features::rankings::handlers::get_ranking,
        features::heats::handlers::create_regular_heat,
        features::heats::handlers::create_final_heat,
        features::heats::handlers::list_heats,
    ),
    components(
        schemas(
            storage::dto::submission::SubmissionRequest,
            storage::dto::submission::FieldValue,
            storage::dto::ranking::RankedScoreResponse,
            storage::dto::heat::CreateHeatRequest,
            storage::models::NormalizedScore,
            storage::models::TimeComponents,
            storage::models::AttemptValue,
            storage::models::Medal,
            storage::models::RuleType,
            storage::models::ScoreFamily,
            storage::models::Heat,
            engine::SubmissionOutcome,
            engine::PropagationFailure,
        )
    ),
    tags(
        (name = "scores", description = "Judge score submission"),
        (name = "rankings", description = "Ranked results per scope"),
        (name = "heats", description = "Heat lifecycle per modality and event")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .init();

    let config = Config::from_env().context("failed to load configuration")?;

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;
    db.migrate().await.context("failed to run migrations")?;

    let pool = db.pool().clone();
    let submissions = Arc::new(SubmissionService::new(
        Arc::new(ScoreRepository::new(pool.clone())),
        Arc::new(TeamRepository::new(pool.clone())),
        Arc::new(ScoringModelRepository::new(pool.clone())),
    ));
    let heats = Arc::new(HeatManager::new(Arc::new(HeatRepository::new(pool))));

    let state = AppState { submissions, heats };

    let app = Router::new()
        .nest("/api/scores", features::scores::routes())
        .nest("/api/heats", features::heats::routes())
        .nest("/api/rankings", features::rankings::routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!(%addr, "starting scoring service");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
