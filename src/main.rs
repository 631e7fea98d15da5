use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use topoplan::config::PlannerConfig;
use topoplan::config_loader::{self, ConfigOverrides};
use topoplan::ip::LoopbackFormat;
use topoplan::orchestrator::process_projects;

/// Extract a GNS3 topology and plan its IPv6 addressing
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// GNS3 project file(s) to process
    #[arg(short, long = "project", required = true, num_args = 1..)]
    projects: Vec<PathBuf>,

    /// Path to the planner configuration YAML file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory for the topology documents
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Base IPv6 prefix for link addresses (overrides the configuration)
    #[arg(long)]
    ip_base: Option<String>,

    /// Loopback address layout (overrides the configuration)
    #[arg(long, value_enum)]
    loopback_format: Option<LoopbackFormat>,

    /// File name of the topology document (overrides the configuration)
    #[arg(long)]
    output_name: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            ip_base: self.ip_base.clone(),
            loopback_format: self.loopback_format,
            output_name: self.output_name.clone(),
        }
    }
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Starting topoplan");
    info!("Output directory: {:?}", args.output_dir);

    let mut config = match &args.config {
        Some(path) => config_loader::load_config(path)?,
        None => PlannerConfig::default(),
    };
    config_loader::apply_overrides(&mut config, &args.overrides())?;
    info!("Base prefix {}, loopback format {}", config.ip_base, config.loopback_format);

    let results = process_projects(&args.projects, &args.output_dir, &config);

    let mut failed = 0;
    for result in &results {
        match result {
            // The injection step reads these paths from stdout
            Ok(path) => println!("{}", path.display()),
            Err(_) => failed += 1,
        }
    }

    if failed > 0 {
        return Err(eyre!("{} of {} projects failed", failed, results.len()));
    }

    info!("Planning completed successfully");
    Ok(())
}
