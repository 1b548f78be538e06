//! swagger-merger CLI
//!
//! Entry point for the `swagger-merger` command-line tool.

use std::io;
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser};
use swagger_merger::config::{user_config_path, Settings};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "swagger-merger")]
#[command(about = "Merge split OpenAPI/Swagger documents into one file", version)]
#[command(after_help = "Examples:
  swagger-merger -o swagger.json b.swagger.json c.swagger.json
  swagger-merger -o swagger.yaml api/bff/
  swagger-merger -o swagger.json -s .swagger.json -s .swagger.yml api/bff")]
struct Cli {
    /// Input files or directories, merged in order
    inputs: Vec<PathBuf>,

    /// Output file; the extension selects json/json5 or yaml/yml
    #[arg(short, long, env = "SWAGGER_MERGER_OUTPUT")]
    output: Option<PathBuf>,

    /// Pattern selecting files inside directories (repeatable)
    #[arg(short, long, env = "SWAGGER_MERGER_SUFFIX")]
    suffix: Vec<String>,

    /// Pattern for files to skip inside directories (repeatable)
    #[arg(short, long, env = "SWAGGER_MERGER_EXCLUDE")]
    exclude: Vec<String>,

    /// Indent JSON output
    #[arg(short, long, env = "SWAGGER_MERGER_BEAUTIFY")]
    beautify: bool,

    /// Fail when a key switches between mapping and non-mapping
    #[arg(long, env = "SWAGGER_MERGER_STRICT")]
    strict: bool,

    /// Config file (TOML) layered over ~/.swagger-merger.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Command-line layer for settings; unset options stay null
    fn overrides(&self) -> serde_json::Value {
        serde_json::json!({
            "output": self.output.as_ref().map(|p| p.to_string_lossy()),
            "suffix": (!self.suffix.is_empty()).then_some(&self.suffix),
            "exclude": (!self.exclude.is_empty()).then_some(&self.exclude),
            "beautify": self.beautify.then_some(true),
            "strict": self.strict.then_some(true),
        })
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = match Settings::build(
        user_config_path().as_deref(),
        cli.config.as_deref(),
        Some(cli.overrides()),
    ) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    match swagger_merger::run(&cli.inputs, &settings) {
        Ok(summary) => {
            println!(
                "merged {} file(s) into {}",
                summary.files_merged,
                summary.output.display()
            );
        }
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
