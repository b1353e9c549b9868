use crate::demo::{
    run_board_list, run_board_report, run_demo, BoardListArgs, BoardReportArgs, DemoArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use job_board::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Job Board",
    about = "Run and explore the job board back office from the command line",
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
    /// Inspect the seeded board without starting the server
    Board {
        #[command(subcommand)]
        command: BoardCommand,
    },
    /// Walk through a scripted moderation session against the seeded board
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum BoardCommand {
    /// List users, jobs, or candidates with optional search and status filters
    List(BoardListArgs),
    /// Render a CSV report to stdout or a file
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
    /// Refuse transitions the current status does not offer
    #[arg(long)]
    pub(crate) strict: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Board {
            command: BoardCommand::List(args),
        } => run_board_list(args),
        Command::Board {
            command: BoardCommand::Report(args),
        } => run_board_report(args),
        Command::Demo(args) => run_demo(args).await,
    }
}
