use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

mod classify;
mod config;
mod dashboard;
mod error;
mod html;
mod repository;
mod server;
mod store;
mod types;

use config::ServerConfig;
use dashboard::DashboardSummary;
use store::RecordStore;

#[derive(Parser, Debug)]
#[command(name = "studysync")]
#[command(about = "Manage study groups, to-dos, classes and exams")]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory holding the JSON collection files
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the web server (default)
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory of static assets
        #[arg(long)]
        public_dir: Option<PathBuf>,
    },

    /// Create the data directory and any missing collection files
    Init,

    /// Print the dashboard summary for today
    Summary,
}

/// Build the log filter: `RUST_LOG` directives when given and valid,
/// otherwise `log_level`. Noisy HTTP internals are capped at `warn`.
fn log_filter(log_level: &str, rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(log_level))
        .add_directive("hyper=warn".parse().unwrap())
        .add_directive("tower_http=warn".parse().unwrap())
}

fn init_tracing(log_level: &str) {
    let rust_log = std::env::var("RUST_LOG").ok();

    fmt()
        .with_env_filter(log_filter(log_level, rust_log.as_deref()))
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(&args.log_level);

    let mut config = ServerConfig::from_env()?;
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }

    match args.command {
        // Default to serve if no command specified
        None => server::serve(config).await?,
        Some(Commands::Serve {
            host,
            port,
            public_dir,
        }) => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(public_dir) = public_dir {
                config.public_dir = public_dir;
            }
            server::serve(config).await?;
        }
        Some(Commands::Init) => {
            let store = RecordStore::new(&config.data_dir);
            let created = store.init().context("Failed to initialize data directory")?;
            info!(
                path = %store.data_dir().display(),
                created = created.len(),
                "Data directory ready"
            );
        }
        Some(Commands::Summary) => {
            let store = RecordStore::new(&config.data_dir);
            let summary = DashboardSummary::load(&store, classify::today())
                .context("Failed to load collections")?;

            info!(
                groups = summary.group_count,
                active_todos = summary.active_todo_count,
                classes = summary.class_count,
                upcoming_exams = summary.upcoming_exam_count,
                "Dashboard"
            );
            for item in &summary.upcoming_exams {
                info!(
                    date = %item.exam.date,
                    class = %item.class_name,
                    exam_type = %item.exam.exam_type,
                    status = item.label,
                    "Exam"
                );
            }
            for item in &summary.active_todos {
                info!(
                    title = %item.todo.title,
                    due = item.todo.due_date.as_deref().unwrap_or("-"),
                    status = item.due_status.map(|s| s.color()).unwrap_or("-"),
                    "Todo"
                );
            }
        }
    }

    Ok(())
}
