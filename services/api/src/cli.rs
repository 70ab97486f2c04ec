use crate::demo::{run_catalog, run_demo, CatalogCommand, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use digi_assess::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Digital Maturity Assessment",
    about = "Run and demonstrate the adaptive digital-maturity assessment service",
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
    /// Walk a full assessment in memory and print the scored result
    Demo(DemoArgs),
    /// Inspect the question bank
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the directory holding assessments.json
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args),
        Command::Catalog { command } => run_catalog(command),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["digi-assess-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn demo_accepts_a_strategy() {
        let cli = Cli::try_parse_from(["digi-assess-api", "demo", "--strategy", "lowest"])
            .expect("parses");
        assert!(matches!(cli.command, Some(Command::Demo(_))));
    }

    #[test]
    fn catalog_flow_takes_a_start_question() {
        let cli = Cli::try_parse_from([
            "digi-assess-api",
            "catalog",
            "flow",
            "--from",
            "security_policies",
        ])
        .expect("parses");
        assert!(matches!(
            cli.command,
            Some(Command::Catalog {
                command: CatalogCommand::Flow(_)
            })
        ));
    }
}
