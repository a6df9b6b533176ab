use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use xprint::{CompileResponse, ExecuteResponse, PrintService, ServiceConfig};

#[derive(Parser)]
#[command(
    name = "xprint",
    version,
    about = "Compile and run receipt interpreters against the recording printer"
)]
struct Cli {
    /// YAML service config; XPRINT_* variables override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Validate and compile an interpreter without running it
    Check {
        file: PathBuf,
        #[arg(long, default_value = "local")]
        key: String,
    },
    /// Compile an interpreter and run it once
    Run {
        file: PathBuf,
        #[arg(long, default_value = "local")]
        key: String,
        #[arg(long, default_value_t = 0)]
        round: u32,
        /// Payload passed to the interpreter as `json_string`
        #[arg(long, default_value = "{}")]
        payload: String,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ServiceConfig> {
    let base = match path {
        Some(path) => {
            let yaml = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            ServiceConfig::from_yaml_str(&yaml)?
        }
        None => ServiceConfig::default(),
    };
    Ok(base.with_overrides(|var| std::env::var(var).ok())?)
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading interpreter {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let service = PrintService::new(load_config(cli.config.as_deref())?);

    let success = match cli.cmd {
        Cmd::Check { file, key } => {
            let source = read_source(&file)?;
            let result = service.compile(&key, &source, None).await;
            let response = CompileResponse::from_result(&result);
            println!("{}", serde_json::to_string_pretty(&response)?);
            response.success
        }
        Cmd::Run {
            file,
            key,
            round,
            payload,
        } => {
            let source = read_source(&file)?;
            let compiled = service.compile(&key, &source, None).await;
            if compiled.is_err() {
                let response = CompileResponse::from_result(&compiled);
                println!("{}", serde_json::to_string_pretty(&response)?);
                false
            } else {
                let result = service.execute(&key, &payload, round).await;
                let response = ExecuteResponse::from_result(&result);
                println!("{}", serde_json::to_string_pretty(&response)?);
                response.success
            }
        }
    };

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
