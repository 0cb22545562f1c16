// Command-line entry point for em-import.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use em_import::application::ExtractUsecase;
use em_import::infrastructure::concurrency::build_thread_pool;
use em_import::infrastructure::config::ExtractConfig;
use em_import::infrastructure::logging::init_logging;
use em_import::infrastructure::project_loader::{ProjectLoader, SourceUnit};
use em_import::infrastructure::{LegacyMangler, SynDeclParser};
use em_import::ports::descriptor_emitter::OutputFormat;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input source file path (can specify multiple)
    #[arg(short, long)]
    input: Vec<String>,

    /// Input source folder(s), scanned recursively for .rs files
    #[arg(short = 'd', long)]
    folder: Vec<String>,

    /// Workspace Cargo.toml
    #[arg(long)]
    workspace: Option<String>,

    /// Output file path (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Config file with an [extract] table
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Parser threads (default: half the cores)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> ExtractConfig {
        ExtractConfig {
            inputs: self.input.clone(),
            folders: self.folder.clone(),
            workspace: self.workspace.clone(),
            output: self.output.clone(),
            format: self.format,
            jobs: self.jobs,
        }
    }
}

fn collect_sources(config: &ExtractConfig) -> Result<Vec<SourceUnit>> {
    let mut sources = Vec::new();

    for input_file in &config.inputs {
        sources.push(ProjectLoader::load_file(input_file)?);
    }
    for folder in &config.folders {
        sources.extend(ProjectLoader::load_folder(folder)?);
    }
    if let Some(cargo_toml) = &config.workspace {
        sources.extend(ProjectLoader::load_workspace(cargo_toml)?);
    }
    Ok(sources)
}

fn run(cli: Cli) -> Result<bool> {
    let base = match &cli.config {
        Some(path) => ExtractConfig::load(path)?,
        None => ExtractConfig::default(),
    };
    let config = base.merge(cli.overrides());
    if !config.has_sources() {
        anyhow::bail!("Please provide at least one --input <file> or --folder <dir> or --workspace <Cargo.toml>");
    }

    let sources = collect_sources(&config)?;
    info!(units = sources.len(), "collected sources");

    let pool = build_thread_pool(config.jobs)?;
    let usecase = ExtractUsecase {
        parser: &SynDeclParser,
        resolver: &LegacyMangler,
        emitter: config.format().emitter(),
        pool: Some(&pool),
    };
    let (buffer, report) = usecase.render(&sources)?;

    let mut sink: Box<dyn Write> = match &config.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Cannot create output file {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    sink.write_all(&buffer).context("Failed to write descriptors")?;
    sink.flush().context("Failed to write descriptors")?;

    info!(
        units = report.units,
        imports = report.descriptors,
        failed = report.failed.len(),
        output = %config.output.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "<stdout>".to_string()),
        "extraction completed"
    );
    Ok(report.failed.is_empty())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
