use crate::demo::{run_demo, run_predict, run_thresholds, DemoArgs, PredictArgs, ThresholdArgs};
use crate::server;
use bankconvert::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "BankConvert",
    about = "Score bank customers for term-deposit subscription from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score one customer profile read from a JSON file or stdin
    Predict(PredictArgs),
    /// Resolve the economic median thresholds and report where they came from
    Thresholds(ThresholdArgs),
    /// Score two sample customers end to end against the exported artifacts
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Predict(args) => run_predict(args),
        Command::Thresholds(args) => run_thresholds(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn bare_invocation_defaults_to_serve() {
        let cli = Cli::try_parse_from(["bankconvert"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn predict_accepts_profile_and_artifact_overrides() {
        let cli = Cli::try_parse_from([
            "bankconvert",
            "predict",
            "--profile",
            "customer.json",
            "--artifact-dir",
            "models",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Predict(args)) => {
                assert_eq!(args.profile, Some(PathBuf::from("customer.json")));
                assert_eq!(args.artifacts.artifact_dir, Some(PathBuf::from("models")));
            }
            other => panic!("expected predict command, got {other:?}"),
        }
    }

    #[test]
    fn serve_port_must_fit_u16() {
        assert!(Cli::try_parse_from(["bankconvert", "serve", "--port", "70000"]).is_err());
    }
}
