use crate::demo::{run_board_report, run_demo, run_stages, BoardReportArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use recruit_board::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Recruiting Pipeline Board",
    about = "Serve and inspect the recruiting pipeline board from the command line",
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
    /// Print the stage catalog and the ATS statuses each stage groups
    Stages,
    /// Offline board tooling for ATS exports
    Board {
        #[command(subcommand)]
        command: BoardCommand,
    },
    /// Walk through scoping, grouping and a stage move against demo data
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum BoardCommand {
    /// Group a candidate CSV export into board columns
    Report(BoardReportArgs),
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
        Command::Stages => run_stages(),
        Command::Board {
            command: BoardCommand::Report(args),
        } => run_board_report(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["recruit-board-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn board_report_accepts_filters() {
        let cli = Cli::try_parse_from([
            "recruit-board-api",
            "board",
            "report",
            "--candidates-csv",
            "fixtures/candidates.csv",
            "--query",
            "ana",
            "--statuses",
            "Applied,Offer made",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Board {
                command: BoardCommand::Report(args),
            }) => {
                assert_eq!(args.query.as_deref(), Some("ana"));
                assert_eq!(args.statuses.as_deref(), Some("Applied,Offer made"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
