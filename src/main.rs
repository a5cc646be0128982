mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Parser, Subcommand};
use colored::Colorize;
use sportshub::ConfigManager;
use tracing_subscriber::EnvFilter;

use crate::commands::Reported;

const LOG_ENV: &str = "SPORTSHUB_LOG";

const EXAMPLES: &str = "Examples:
  $ sportshub configure
  $ sportshub leads create --organiserName \"Syrio Volleyball Academy\" --website \"syrio.com\"
  $ sportshub leads create --organiserName \"Owen\"
  $ sportshub leads search --organiserName \"Syrio\"
  $ sportshub leads progress --ticketNumber SH-12 --status CONTACTED -f notes.txt
  $ sportshub leads show";

#[derive(Parser)]
#[command(name = "sportshub", version)]
#[command(about = "CLI tool for Sportshub Leads to create Jira tickets", long_about = None)]
#[command(after_help = EXAMPLES)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, env = "SPORTSHUB_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Configure Jira credentials and settings
    Configure,

    /// Manage lead-related operations
    #[command(subcommand)]
    Leads(LeadsCommand),
}

#[derive(Subcommand)]
enum LeadsCommand {
    /// Create a new lead ticket in Jira
    Create {
        /// Name of the organiser
        #[arg(long = "organiserName")]
        organiser_name: String,

        /// Website of the organiser/company
        #[arg(long)]
        website: Option<String>,
    },

    /// Search lead tickets by organiser name
    Search {
        /// Name of the organiser
        #[arg(long = "organiserName")]
        organiser_name: String,
    },

    /// Move a lead ticket to its next (or a given) status
    #[command(group(
        ArgGroup::new("ticket")
            .args(["organiser_name", "ticket_number"])
            .required(true)
            .multiple(true)
    ))]
    Progress {
        /// Name of the organiser whose ticket should move
        #[arg(long = "organiserName")]
        organiser_name: Option<String>,

        /// Jira key of the ticket, e.g. SH-12
        #[arg(long = "ticketNumber")]
        ticket_number: Option<String>,

        /// Target status; defaults to the next status in the pipeline
        #[arg(long)]
        status: Option<String>,

        /// Text file to summarise and attach as a comment
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// List all lead tickets grouped by status
    Show,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        println!("{}", "🏃‍♂️ Sportshub CLI".blue());
        println!("{}", "Use --help to see available commands".bright_black());
        return Ok(());
    };

    let manager = match cli.config {
        Some(path) => ConfigManager::at(path),
        None => ConfigManager::new()?,
    };

    match command {
        Command::Configure => commands::configure::run(&manager).await,
        Command::Leads(leads) => {
            let config = commands::load_config(&manager)?;
            match leads {
                LeadsCommand::Create {
                    organiser_name,
                    website,
                } => commands::leads::create(&config, &organiser_name, website.as_deref()).await,
                LeadsCommand::Search { organiser_name } => {
                    commands::leads::search(&config, &organiser_name).await
                }
                LeadsCommand::Progress {
                    organiser_name,
                    ticket_number,
                    status,
                    file,
                } => {
                    commands::leads::progress(
                        &config,
                        commands::leads::ProgressOptions {
                            organiser_name,
                            ticket_number,
                            status,
                            file,
                        },
                    )
                    .await
                }
                LeadsCommand::Show => commands::leads::show(&config).await,
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if err.downcast_ref::<Reported>().is_none() {
                eprintln!("{} {err:#}", "❌ Unexpected error:".red());
            }
            ExitCode::FAILURE
        }
    }
}
