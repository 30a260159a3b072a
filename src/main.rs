use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::{error, info, warn, LevelFilter};
use waste_classifier::classifier::Classifier;
use waste_classifier::config::Config;
use waste_classifier::model::OnnxModel;
use waste_classifier::output::OutputFormat;
use waste_classifier::scanner;
use waste_classifier::session::Session;

#[cfg(debug_assertions)]
const LOG_LEVEL: LevelFilter = LevelFilter::Debug;
#[cfg(not(debug_assertions))]
const LOG_LEVEL: LevelFilter = LevelFilter::Warn;

#[derive(Parser)]
#[command(name = "waste-classifier", version, about = "Classify images of waste as organic or recyclable.")]
struct Cli {
    /// Config file. Defaults to <config dir>/waste-classifier/config.toml when present.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Model artifact, overriding the config file.
    #[arg(short, long, global = true)]
    model: Option<PathBuf>,

    /// Inference timeout in milliseconds, overriding the config file.
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify image files. Directories are searched for jpg, jpeg and png files.
    Classify {
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Do not print the session history afterwards.
        #[arg(long)]
        no_history: bool,
    },
    /// Read image paths from stdin, one per line. `history` shows the history, `quit` ends the session.
    Interactive,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { LevelFilter::Debug } else { LOG_LEVEL };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    let config = Config::load(cli.config.as_deref())?
        .with_overrides(cli.model.clone(), cli.timeout_ms);

    // The model is loaded once and shared by every classification in this process.
    info!("Loading model from {:?}", config.model_path);
    let model = match OnnxModel::load(&config.model_path) {
        Ok(model) => model,
        Err(e) => {
            error!("Error loading model: {}", e);
            return Err(e.into());
        }
    };
    let classifier = Classifier::new(Arc::new(model)).with_timeout(config.inference_timeout());
    let mut session = Session::new(Arc::new(classifier), cli.format);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Classify { paths, no_history } => {
            let files = scanner::collect_images(&paths)?;
            if files.is_empty() {
                warn!("No images found in {:?}", paths);
            }

            let failures = session.classify_files(&files, &mut out)?;
            if !no_history {
                session.show_history(&mut out)?;
            }

            if failures > 0 {
                anyhow::bail!("{} of {} images could not be classified", failures, files.len());
            }
        },
        Command::Interactive => {
            session.run_interactive(io::stdin().lock(), &mut out)?;
        },
    }

    Ok(())
}
