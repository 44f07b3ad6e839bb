use anyhow::Context;
use clap::{Parser, Subcommand};
use mirror_core::config::dataset_root_from_env_value;
use mirror_core::constants::DATASET_ROOT_ENV_VAR;
use mirror_core::{DatasetMirror, MirrorConfig, ScanInfo, SessionInfo};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dataset-mirror")]
#[command(about = "Mirror MRI acquisition output into a structured dataset")]
struct Cli {
    /// Dataset root (defaults to $MIRROR_DATASET_ROOT, then ./mri_dataset)
    #[arg(long, global = true)]
    dataset_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy a scan's files into the dataset and write its metadata
    Mirror {
        /// Session record (JSON object)
        #[arg(long)]
        session: PathBuf,
        /// Scan record (JSON object)
        #[arg(long)]
        scan: PathBuf,
        /// Acquisition save area holding mat/, csv/, dcm/, ismrmrd/ and seq/
        #[arg(long)]
        source: PathBuf,
    },
    /// Print the session directory a scan would be mirrored into
    Plan {
        /// Session record (JSON object)
        #[arg(long)]
        session: PathBuf,
        /// Scan record (JSON object)
        #[arg(long)]
        scan: PathBuf,
    },
}

fn load_record<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
}

fn resolve_config(dataset_root: Option<PathBuf>) -> anyhow::Result<MirrorConfig> {
    let dataset_root = match dataset_root {
        Some(root) => root,
        None => dataset_root_from_env_value(std::env::var(DATASET_ROOT_ENV_VAR).ok()),
    };
    Ok(MirrorConfig::new(dataset_root)?)
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mirror_core=info".parse()?)
                .add_directive("dataset_mirror=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mirror = DatasetMirror::new(resolve_config(cli.dataset_root)?);

    match cli.command {
        Some(Commands::Mirror {
            session,
            scan,
            source,
        }) => {
            let session_info: SessionInfo = load_record(&session)?;
            let scan_info: ScanInfo = load_record(&scan)?;

            match mirror.try_mirror(&session_info, &scan_info, &source) {
                Ok(report) => {
                    println!("Mirrored into: {}", report.session_dir.display());
                    println!(
                        "Copied {} file(s), skipped {}",
                        report.copied.len(),
                        report.skipped.len()
                    );
                    for skipped in &report.skipped {
                        println!("  not found: {}", skipped.display());
                    }
                }
                Err(e) => {
                    tracing::error!(kind = ?e.kind(), "mirror failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Plan { session, scan }) => {
            let session_info: SessionInfo = load_record(&session)?;
            let scan_info: ScanInfo = load_record(&scan)?;
            let path = mirror.session_path(&session_info, &scan_info)?;
            println!("{}", path.session_dir().display());
        }
        None => {
            println!("Use 'dataset-mirror --help' for commands");
        }
    }

    Ok(())
}
