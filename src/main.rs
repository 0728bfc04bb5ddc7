//! tracehound binary entry point. All logic lives in the library.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use tracehound::config;
use tracehound::watcher::LogWatcher;
use tracehound::{run_analysis, AnalyzeOptions};
use tracehound_collab::HttpLogSource;
use tracehound_core::prelude::*;

/// Log analysis and correlation toolkit
#[derive(Parser, Debug)]
#[command(name = "thound")]
#[command(about = "Analyze application logs and correlate stack traces", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a log file and write a markdown report
    Analyze {
        /// Path to the log file
        #[arg(value_name = "LOG_FILE")]
        log_file: PathBuf,

        /// GitHub repo (owner/name) to pull code context from
        #[arg(long)]
        repo: Option<String>,

        /// Directory to write the report to
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Prior report to correlate against
        #[arg(long, value_name = "FILE")]
        cached_report: Option<PathBuf>,

        /// Local checkout to resolve trace snippets against
        #[arg(long, value_name = "DIR")]
        source_dir: Option<PathBuf>,

        /// Skip the summary/patch collaborators
        #[arg(long)]
        no_hub: bool,
    },

    /// Poll a remote log URL and append error/warning lines to a file
    Watch {
        /// URL of the remote plain-text log
        #[arg(value_name = "URL")]
        url: String,

        /// Artifact file to append hits to
        #[arg(long, value_name = "FILE", default_value = "watched_errors.log")]
        artifact: PathBuf,
    },

    /// Create a default .tracehound/config.toml
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracehound_core::logging::init()?;

    let cli = Cli::parse();
    let base_path = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let settings = config::load_settings(&base_path);

    match cli.command {
        Commands::Analyze {
            log_file,
            repo,
            output_dir,
            cached_report,
            source_dir,
            no_hub,
        } => {
            let opts = AnalyzeOptions {
                log_path: log_file,
                repo,
                output_dir,
                cached_report,
                source_dir,
                no_hub,
            };
            let report_path = run_analysis(&opts, &settings).await?;
            println!("Report written to {}", report_path.display());
            Ok(())
        }

        Commands::Watch { url, artifact } => {
            let mut watcher = LogWatcher::new(artifact);
            watcher.start(HttpLogSource::new(url))?;
            println!(
                "Watching; appending hits to {}. Press Ctrl-C to stop.",
                watcher.artifact_path().display()
            );

            tokio::signal::ctrl_c()
                .await
                .map_err(|e| Error::config(format!("failed to listen for Ctrl-C: {}", e)))?;
            watcher.shutdown().await;
            Ok(())
        }

        Commands::Init => {
            config::init_config_dir(&base_path)?;
            println!("Initialized .tracehound/config.toml");
            Ok(())
        }
    }
}
