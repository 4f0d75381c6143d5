use crate::demo::{print_catalogue, run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use passport_wizard::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Passport Wizard",
    about = "Run or demonstrate the study-abroad application wizard from the command line",
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
    /// Walk one application through all five wizard steps, including the payment mock
    Demo(DemoArgs),
    /// Print the static country and university catalogue
    Catalogue,
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
        Command::Demo(args) => run_demo(args).await,
        Command::Catalogue => {
            print_catalogue();
            Ok(())
        }
    }
}
