use std::{
    io::Write as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use shardsmith::{GenerateRequest, GenerateResponse, Host, HostConfig, parse_brand, serialize_aff};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "shardsmith", version)]
struct Cli {
    /// Host configuration file (TOML). Missing files fall back to defaults.
    #[arg(long, global = true, default_value = "shardsmith.toml")]
    config: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print registered shards with their argument schemas as JSON.
    List,
    /// Run one generation request.
    Generate(GenerateArgs),
    /// Print the effective host configuration as TOML.
    Config,
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Request JSON: `{ "id": ..., "args": { ... } }`.
    #[arg(long)]
    request: PathBuf,

    /// Caller identity as `name/version`.
    #[arg(long, default_value = concat!("shardsmith/", env!("CARGO_PKG_VERSION")))]
    brand: String,

    /// Output path. Defaults to stdout.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Write the chart as JSON instead of the textual chart format.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = HostConfig::load(&cli.config)
        .with_context(|| format!("load config '{}'", cli.config.display()))?;
    match cli.cmd {
        Command::List => cmd_list(config),
        Command::Generate(args) => cmd_generate(config, args),
        Command::Config => cmd_config(&config),
    }
}

fn cmd_list(config: HostConfig) -> anyhow::Result<()> {
    let host = Host::with_builtins(config).context("register built-in shards")?;
    let json = serde_json::to_string_pretty(&host.shards()).context("encode shard list")?;
    println!("{json}");
    Ok(())
}

fn cmd_config(config: &HostConfig) -> anyhow::Result<()> {
    print!("{}", config.to_toml_string()?);
    Ok(())
}

fn cmd_generate(config: HostConfig, args: GenerateArgs) -> anyhow::Result<()> {
    let brand = parse_brand(&args.brand).context("parse --brand")?;
    let text = std::fs::read_to_string(&args.request)
        .with_context(|| format!("read request '{}'", args.request.display()))?;
    let request: GenerateRequest = serde_json::from_str(&text)
        .with_context(|| format!("parse request '{}'", args.request.display()))?;

    let host = Host::with_builtins(config).context("register built-in shards")?;
    let response = host.respond(&brand, &request);
    host.terminate()?;

    let chart = match response {
        GenerateResponse::Chart(chart) => chart,
        GenerateResponse::Error(report) => {
            println!("{}", serde_json::to_string(&report)?);
            anyhow::bail!("shard `{}` failed: {}", request.id, report.message);
        }
    };

    let body = if args.json {
        serde_json::to_string_pretty(&chart).context("encode chart JSON")?
    } else {
        serialize_aff(&chart)
    };
    match &args.out {
        Some(path) => write_output(path, &body)?,
        None => std::io::stdout()
            .write_all(body.as_bytes())
            .context("write chart to stdout")?,
    }
    Ok(())
}

fn write_output(path: &Path, body: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, body).with_context(|| format!("write chart '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}
