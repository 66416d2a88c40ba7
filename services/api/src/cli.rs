use crate::demo::{run_demo, run_products, run_recommend, DemoArgs, FactsArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use coverage_advisor::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Coverage Advisor",
    about = "Recommend SME insurance coverages from questionnaire answers",
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
    /// Print the coverage recommendation for a facts file
    Recommend(FactsArgs),
    /// Print the three product tiers for a facts file
    Products(FactsArgs),
    /// Run a sample questionnaire through the full session flow
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
        Command::Recommend(args) => run_recommend(args),
        Command::Products(args) => run_products(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coverage_advisor::advisory::InsuranceLine;

    #[test]
    fn recommend_parses_line_aliases() {
        let cli = Cli::try_parse_from([
            "coverage-advisor",
            "recommend",
            "--facts",
            "facts.json",
            "--line",
            "dm",
            "--json",
        ])
        .expect("valid arguments");

        match cli.command {
            Some(Command::Recommend(args)) => {
                assert_eq!(args.line, InsuranceLine::DanosMateriales);
                assert!(args.json);
                assert_eq!(args.facts.to_string_lossy(), "facts.json");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_line_is_rejected() {
        let result = Cli::try_parse_from([
            "coverage-advisor",
            "products",
            "--facts",
            "facts.json",
            "--line",
            "vida",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn serve_is_the_default() {
        let cli = Cli::try_parse_from(["coverage-advisor"]).expect("no arguments");
        assert!(cli.command.is_none());
    }
}
