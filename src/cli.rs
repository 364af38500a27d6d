use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::Read;
use std::net::IpAddr;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{self, ApiError};

#[derive(Parser, Debug)]
#[command(
    name = "fire-planner",
    version,
    about = "Deterministic investment projections: growth, fixed income, FIRE targets and dividend risk"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "FIRE_PLANNER_LOG",
        default_value = "info",
        help = "Log level for this crate; RUST_LOG takes precedence when set"
    )]
    pub log_level: String,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(about = "Serve the JSON simulation API over HTTP")]
    Serve(ServeArgs),
    #[command(about = "Compounding growth with contributions and dividends")]
    Growth(InputArgs),
    #[command(about = "Index-linked fixed income with withholding tax")]
    FixedIncome(InputArgs),
    #[command(about = "Time to a FIRE target for one of the six variants")]
    Fire(InputArgs),
    #[command(about = "Risk-adjusted dividend reinvestment against benchmarks")]
    Dividends(InputArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long, env = "FIRE_PLANNER_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,
    #[arg(short, long, env = "FIRE_PLANNER_PORT", default_value_t = 8080)]
    pub port: u16,
}

#[derive(Args, Debug)]
pub struct InputArgs {
    #[arg(
        short,
        long,
        help = "JSON payload file (same keys as the HTTP API); reads stdin when omitted"
    )]
    pub input: Option<PathBuf>,
    #[arg(long, help = "Pretty-print the JSON result")]
    pub pretty: bool,
}

pub fn init_tracing(level: &str) {
    let default_filter = format!("fire_planner={level}");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .init();
}

pub async fn run(cli: Cli) -> Result<(), ApiError> {
    match cli.command {
        Command::Serve(args) => api::run_http_server(args.host, args.port)
            .await
            .map_err(ApiError::from),
        Command::Growth(args) => simulate(&args, api::run_growth),
        Command::FixedIncome(args) => simulate(&args, api::run_fixed_income),
        Command::Fire(args) => simulate(&args, api::run_fire),
        Command::Dividends(args) => simulate(&args, api::run_dividends),
    }
}

fn simulate<P, T, F>(args: &InputArgs, run: F) -> Result<(), ApiError>
where
    P: DeserializeOwned,
    T: Serialize,
    F: FnOnce(P) -> T,
{
    let raw = read_input(args)?;
    let payload = parse_payload::<P>(&raw)?;
    let result = run(payload);
    let json = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{json}");
    Ok(())
}

fn read_input(args: &InputArgs) -> Result<String, ApiError> {
    match &args.input {
        Some(path) => {
            tracing::debug!(path = %path.display(), "reading payload file");
            Ok(std::fs::read_to_string(path)?)
        }
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

// Empty input is an empty payload: every field falls back to its default.
fn parse_payload<P: DeserializeOwned>(raw: &str) -> Result<P, ApiError> {
    let raw = raw.trim();
    let raw = if raw.is_empty() { "{}" } else { raw };
    Ok(serde_json::from_str(raw)?)
}
