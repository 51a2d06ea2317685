use clap::{Parser, Subcommand};
use cli::{count_file, InputKind, Outputs};
use color_eyre::eyre::Result;
use fingers::{FingerConfig, PipelineBuilder};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count the fingers of the hand in one or more images
    Count {
        /// Images to process
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Whether the inputs are colour frames or binary masks
        #[arg(short, long, value_enum, default_value = "frame")]
        kind: InputKind,
        /// Configuration file (.toml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Directory for annotated images and extracted masks
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// Print a JSON report instead of a summary line
        #[arg(long)]
        json: bool,
    },
    /// Print the JSON schema of the configuration file
    Schema,
    /// Write a configuration file with default values
    InitConfig {
        /// Destination (.toml or .json)
        #[arg(default_value = "fingers.toml")]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Count { inputs, kind, config, output_dir, json } => {
            count(&inputs, kind, config, output_dir, json)?;
        }
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&FingerConfig::schema())?);
        }
        Commands::InitConfig { path } => {
            FingerConfig::default().to_file(&path)?;
            info!("Default configuration written to {}", path.display());
        }
    }

    Ok(())
}

fn count(
    inputs: &[PathBuf],
    kind: InputKind,
    config_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let config = match &config_path {
        Some(path) => FingerConfig::from_file(path)?,
        None => FingerConfig::default(),
    };
    let pipeline = PipelineBuilder::from_config(&config)?.build();
    info!("{}", pipeline.info());

    if let Some(dir) = &output_dir {
        std::fs::create_dir_all(dir)?;
    }

    let mut reports = Vec::with_capacity(inputs.len());
    for input in inputs {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "frame".to_string());
        let annotated = output_dir.as_ref().map(|d| d.join(format!("{stem}_annotated.png")));
        let mask = match kind {
            InputKind::Frame => output_dir.as_ref().map(|d| d.join(format!("{stem}_mask.png"))),
            InputKind::Mask => None,
        };

        let report = count_file(
            &pipeline,
            input,
            kind,
            Outputs { annotated: annotated.as_deref(), mask: mask.as_deref() },
        )?;
        info!("Processed {} ({} defect candidates)", input.display(), report.defects.len());

        if !json {
            println!("{}", report.summary());
        }
        reports.push(report);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    Ok(())
}
