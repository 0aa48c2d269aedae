use crate::commands::{run_batch, run_fields, run_predict, BatchArgs, FieldsArgs, PredictArgs};
use crate::demo::{run_demo, DemoArgs};
use crate::infra::ArtifactArgs;
use crate::server;
use clap::{Args, Parser, Subcommand};
use study_advisor::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Student Score Advisor",
    about = "Predict exam scores and generate study feedback from the command line",
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
    /// Predict a score for one or more JSON field files
    Predict(PredictArgs),
    /// Score every row of a CSV export
    Batch(BatchArgs),
    /// List the input fields with their domains and defaults
    Fields(FieldsArgs),
    /// Walk through a short advising session with sample students
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
    #[command(flatten)]
    pub(crate) artifacts: ArtifactArgs,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Predict(args) => run_predict(args),
        Command::Batch(args) => run_batch(args),
        Command::Fields(args) => run_fields(args),
        Command::Demo(args) => run_demo(args),
    }
}
