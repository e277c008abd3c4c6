use std::time::Duration;

use clap::{Parser, Subcommand};
use evaluator::{EvaluationPipeline, HttpEvaluator, SubmissionEvaluator, client};
use storage::{Database, dto::ranking::RankingReport, services::leaderboard};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "hackathon-eval")]
#[command(about = "Evaluate and rank hackathon submissions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[arg(long, env = "EVALUATOR_URL", default_value = client::DEFAULT_BASE_URL)]
    evaluator_url: String,

    #[arg(long, env = "EVALUATOR_TIMEOUT_SECS", default_value_t = client::DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate pending submissions of a hackathon, then rank them
    Evaluate { hackathon_id: i32 },
    /// Recompute ranks from stored scores without calling the service
    Rerank { hackathon_id: i32 },
    /// Fetch or generate the analysis of one evaluated submission
    Analyze { submission_id: i32 },
    /// Check that the evaluation service is reachable
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "hackathon_eval={},evaluator={},storage={}",
                    log_level, log_level, log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let evaluator = HttpEvaluator::new(&cli.evaluator_url, Duration::from_secs(cli.timeout_secs))?;

    match cli.command {
        Commands::Health => {
            if evaluator.health_check().await? {
                tracing::info!("Evaluation service at {} is healthy", evaluator.base_url());
            } else {
                return Err(format!(
                    "Evaluation service at {} is unhealthy",
                    evaluator.base_url()
                )
                .into());
            }
        }
        Commands::Evaluate { hackathon_id } => {
            let db = Database::new(&cli.database_url).await?;
            let report = EvaluationPipeline::new(db.pool(), &evaluator)
                .evaluate_hackathon(hackathon_id)
                .await?;
            print_report(&report);
        }
        Commands::Rerank { hackathon_id } => {
            let db = Database::new(&cli.database_url).await?;
            let ranked = leaderboard::rerank_hackathon(db.pool(), hackathon_id).await?;
            print_report(&RankingReport {
                hackathon_id,
                evaluated: 0,
                failed: vec![],
                leaderboard: leaderboard::leaderboard_of(&ranked),
            });
        }
        Commands::Analyze { submission_id } => {
            let db = Database::new(&cli.database_url).await?;
            let analysis = EvaluationPipeline::new(db.pool(), &evaluator)
                .analyze_submission(submission_id)
                .await?;
            println!("{}", serde_json::to_string_pretty(&analysis)?);
        }
    }

    Ok(())
}

fn print_report(report: &RankingReport) {
    for failure in &report.failed {
        tracing::warn!(
            "Submission {} ({}) was not evaluated: {}",
            failure.submission_id,
            failure.team_name,
            failure.reason
        );
    }

    println!("{:>4}  {:<30} {:>7}", "Rank", "Team", "Score");
    for entry in &report.leaderboard {
        println!(
            "{:>4}  {:<30} {:>7.2}",
            entry.rank, entry.team_name, entry.score
        );
    }
}
