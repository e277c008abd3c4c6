use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use evaluator::HttpEvaluator;
use storage::Database;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod routes;
mod state;

use config::Config;
use features::{files, hackathons, submissions};
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        hackathons::handlers::list_hackathons,
        hackathons::handlers::get_hackathon,
        hackathons::handlers::create_hackathon,
        hackathons::handlers::update_hackathon_status,
        hackathons::handlers::delete_hackathon,
        hackathons::handlers::evaluate_hackathon,
        hackathons::handlers::rank_hackathon,
        hackathons::handlers::get_leaderboard,
        hackathons::handlers::get_hackathon_analytics,
        hackathons::handlers::export_hackathon_results,
        hackathons::handlers::list_submissions,
        hackathons::handlers::upload_submission,
        submissions::handlers::get_submission,
        submissions::handlers::update_submission,
        submissions::handlers::delete_submission,
        submissions::handlers::get_submission_analysis,
        files::handlers::upload_file,
        files::handlers::list_files,
        files::handlers::get_file,
        files::handlers::get_file_content,
        files::handlers::download_file,
        files::handlers::delete_file,
    ),
    components(
        schemas(
            storage::dto::hackathon::CreateHackathonRequest,
            storage::dto::hackathon::UpdateHackathonStatusRequest,
            storage::dto::hackathon::HackathonResponse,
            storage::dto::submission::SubmissionResponse,
            storage::dto::submission::UpdateSubmissionRequest,
            storage::dto::submission::SubmissionAnalysis,
            storage::dto::ranking::LeaderboardEntry,
            storage::dto::ranking::RankingReport,
            storage::dto::ranking::EvaluationFailure,
            storage::dto::analytics::HackathonAnalytics,
            storage::dto::analytics::ScoreBucket,
            storage::dto::analytics::CriterionAverage,
            storage::dto::analytics::KeywordCount,
            storage::dto::file::StoredFileResponse,
            storage::dto::file::FileUploadResponse,
            storage::dto::common::PaginationMeta,
            storage::models::Criterion,
            storage::models::HackathonStatus,
            storage::models::FileType,
            hackathons::handlers::SubmissionUploadForm,
            files::handlers::FileUploadForm,
        )
    ),
    tags(
        (name = "hackathons", description = "Hackathons, their submissions and leaderboards"),
        (name = "submissions", description = "Single submission endpoints"),
        (name = "files", description = "File hub endpoints"),
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting hackathon evaluation API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let evaluator = HttpEvaluator::new(
        &config.evaluator_url,
        Duration::from_secs(config.evaluator_timeout_secs),
    )
    .context("Failed to build evaluation service client")?;
    tracing::info!("Evaluation service at {}", evaluator.base_url());

    let state = AppState::new(db, Arc::new(evaluator));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    let app = routes::configure(state, config.max_upload_bytes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);

    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/api/hackathons",
            "/api/hackathons/{id}",
            "/api/hackathons/{id}/evaluate",
            "/api/hackathons/{id}/leaderboard",
            "/api/hackathons/{id}/analytics",
            "/api/hackathons/{id}/results.csv",
            "/api/submissions/{id}/analysis",
            "/api/files/upload",
            "/api/files/{id}/download",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {}",
                expected
            );
        }
    }
}
