use avatar_batch_core::{logging, AvatarBatch, Config};
use clap::Parser;
use log::info;
use std::io;
use std::path::PathBuf;

/// Set user profile pictures from files named after the user's lastname
/// (student number), e.g. 2025100123.png
#[derive(Parser)]
#[command(name = "avatar-batch")]
#[command(about = "Batch upload user profile pictures")]
#[command(version)]
struct Cli {
    /// Directory containing the picture files
    #[arg(short, long, required_unless_present = "archive", conflicts_with = "archive")]
    path: Option<PathBuf>,

    /// ZIP archive of picture files, scanned recursively after extraction
    #[arg(short, long)]
    archive: Option<PathBuf>,

    /// Replace pictures of users that already have one
    #[arg(short, long)]
    overwrite: bool,

    /// Only show what would be done, change nothing
    #[arg(short = 'v', long)]
    preview: bool,

    /// Path to the user database (overrides the configuration file)
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Directory for rendered icons (overrides the configuration file)
    #[arg(long)]
    icon_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write logs to this directory instead of stderr
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn main() -> Result<(), anyhow::Error> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Set up configuration
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::default()
    };

    // Override config with command line arguments
    if let Some(database) = cli.database {
        config.database_path = database;
    }
    if let Some(icon_dir) = cli.icon_dir {
        config.icon_dir = icon_dir;
    }

    // Initialize logger
    match &cli.log_dir {
        Some(dir) => {
            logging::init_logger(dir, config.log_level.to_level_filter())
                .map_err(|e| anyhow::anyhow!("Failed to initialise logging: {}", e))?;
        }
        None => {
            env_logger::Builder::new()
                .filter_level(config.log_level.to_level_filter())
                .parse_env(logging::LOG_ENV_VAR)
                .init();
        }
    }

    let batch = AvatarBatch::new(config)?;
    let stdout = io::stdout();

    let (stats, preview) = if let Some(archive) = &cli.archive {
        if cli.preview {
            println!("Note: --preview is not available for archive uploads and is ignored.");
        }
        println!("Processing archive: {}", archive.display());
        println!("Overwrite existing pictures: {}", yes_no(cli.overwrite));
        println!("{}", "-".repeat(70));

        (batch.run_archive(archive, cli.overwrite, stdout.lock())?, false)
    } else {
        let path = cli
            .path
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("--path or --archive is required"))?;

        println!("Starting batch picture upload...");
        println!("Picture directory: {}", path.display());
        println!("Overwrite existing pictures: {}", yes_no(cli.overwrite));
        println!("Preview mode: {}", yes_no(cli.preview));
        println!("{}", "-".repeat(70));

        (
            batch.run_directory(path, cli.overwrite, cli.preview, stdout.lock())?,
            cli.preview,
        )
    };

    print!("{}", stats.summary(preview));
    info!("Batch upload complete");

    // Not-found users and per-file errors do not change the exit status
    Ok(())
}
