use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use specmin_core::config::{self, CONFIG_FILE_NAME, MinifierConfig};
use specmin_core::{EndpointDocument, HttpMethod, Minifier, MinifyOutput, Node, parse};

#[derive(Parser)]
#[command(
    name = "specmin",
    about = "Minify OpenAPI specs into per-endpoint documents",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Minify one or more OpenAPI specs into endpoint documents
    Minify {
        /// Spec files (YAML or JSON); later files override earlier ones
        #[arg(short, long = "input", required = true)]
        inputs: Vec<PathBuf>,

        /// Only emit documents for this HTTP method
        #[arg(short, long)]
        method: Option<String>,

        /// Output format for stdout
        #[arg(long, default_value = "yaml")]
        format: OutputFormat,

        /// Write one `<filename>.txt` per document into this directory instead
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the aggregated tag table
    Tags {
        /// Spec files (YAML or JSON)
        #[arg(short, long = "input", required = true)]
        inputs: Vec<PathBuf>,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: OutputFormat,
    },

    /// Initialize a new specmin configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Minify {
            inputs,
            method,
            format,
            output,
        } => cmd_minify(&inputs, method.as_deref(), format, output.as_deref()),

        Commands::Tags { inputs, format } => cmd_tags(&inputs, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "specmin", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Load the project config from the current directory, or the defaults.
fn load_config() -> Result<MinifierConfig> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    Ok(config::load_config(&config_path)?.unwrap_or_default())
}

fn load_specs(inputs: &[PathBuf]) -> Result<Vec<Node>> {
    inputs
        .iter()
        .map(|path| {
            log::debug!("reading {}", path.display());
            parse::from_path(path).with_context(|| format!("failed to load {}", path.display()))
        })
        .collect()
}

fn run(inputs: &[PathBuf]) -> Result<MinifyOutput> {
    let minifier = Minifier::new(load_config()?)?;
    let output = minifier.run(load_specs(inputs)?)?;
    for diagnostic in &output.diagnostics {
        eprintln!("  warning: {diagnostic}");
    }
    Ok(output)
}

fn print_formatted<T: serde::Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Yaml => print!("{}", serde_yaml_ng::to_string(value)?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

fn select_documents(output: MinifyOutput, method: Option<&str>) -> Result<Vec<EndpointDocument>> {
    let Some(method) = method else {
        return Ok(output.documents);
    };
    let method: HttpMethod = method.parse()?;
    Ok(output
        .by_method
        .get(&method)
        .cloned()
        .unwrap_or_default())
}

/// Write each document's content to `<filename>.txt` under `base`.
fn write_documents(base: &Path, documents: &[EndpointDocument]) -> Result<()> {
    fs::create_dir_all(base)
        .with_context(|| format!("failed to create output directory {}", base.display()))?;
    for document in documents {
        let path = base.join(format!("{}.txt", sanitize_filename(&document.filename)));
        fs::write(&path, &document.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        log::debug!("wrote {}", path.display());
    }
    Ok(())
}

/// Operation ids and tags may contain path separators.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect()
}

fn cmd_minify(
    inputs: &[PathBuf],
    method: Option<&str>,
    format: OutputFormat,
    output_dir: Option<&Path>,
) -> Result<()> {
    let output = run(inputs)?;
    let documents = select_documents(output, method)?;

    match output_dir {
        Some(dir) => {
            write_documents(dir, &documents)?;
            eprintln!("Wrote {} documents to {}", documents.len(), dir.display());
        }
        None => print_formatted(&documents, format)?,
    }
    Ok(())
}

fn cmd_tags(inputs: &[PathBuf], format: OutputFormat) -> Result<()> {
    let output = run(inputs)?;
    print_formatted(&output.tags, format)
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
