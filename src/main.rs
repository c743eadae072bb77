use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use splitsheet::cli::{
    handle_participant_command, handle_rate_command, handle_split_command, handle_submit_command,
    handle_transaction_command, ParticipantCommands, RateCommands, SplitCommandArgs, SubmitArgs,
    TransactionCommands,
};
use splitsheet::config::{paths::SplitsheetPaths, settings::Settings};
use splitsheet::storage::Storage;

/// Environment variable overriding the log filter
const LOG_ENV: &str = "SPLITSHEET_LOG";

#[derive(Parser)]
#[command(
    name = "splitsheet",
    author = "Kaylee Beyene",
    version,
    about = "Split shared expenses exactly, down to the last cent",
    long_about = "splitsheet divides a transaction among the people on a shared sheet \
                  evenly, between selected people, by shares, by percentage or by exact \
                  amounts. Shares always add up to the total."
)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the sheet's data directory
    Init,

    /// Show configuration
    Config,

    /// Participant management commands
    #[command(subcommand)]
    Participant(ParticipantCommands),

    /// Compute and show a split without recording it
    Split(SplitCommandArgs),

    /// Compute a split and record it as a transaction
    Submit(SubmitArgs),

    /// Recorded transaction commands
    #[command(subcommand)]
    Transaction(TransactionCommands),

    /// Exchange rate commands
    #[command(subcommand)]
    Rate(RateCommands),
}

fn init_logging(settings: &Settings, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&settings.log_filter))
    };

    // A second init only happens in tests; keep the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = SplitsheetPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    init_logging(&settings, cli.verbose);

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing splitsheet at: {}", paths.base_dir().display());
            settings.save(&paths)?;
            storage.save_all()?;
            println!("Initialization complete!");
            println!();
            println!("Sheet currency: {}", settings.currency_code);
            println!("Run 'splitsheet participant add <name>' to add people to the sheet.");
        }
        Some(Commands::Config) => {
            println!("splitsheet Configuration");
            println!("========================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Initialized:    {}", if paths.is_initialized() { "yes" } else { "no" });
            println!();
            println!("Settings:");
            println!(
                "  Currency:     {} ({} decimals, symbol {})",
                settings.currency_code, settings.currency_scale, settings.currency_symbol
            );
            println!("  Default mode: {}", settings.default_mode);
            println!("  Date format:  {}", settings.date_format);
            println!("  Log filter:   {}", settings.log_filter);
        }
        Some(Commands::Participant(cmd)) => {
            handle_participant_command(&storage, cmd)?;
        }
        Some(Commands::Split(args)) => {
            handle_split_command(&storage, &settings, args)?;
        }
        Some(Commands::Submit(args)) => {
            handle_submit_command(&storage, &settings, args)?;
        }
        Some(Commands::Transaction(cmd)) => {
            handle_transaction_command(&storage, cmd)?;
        }
        Some(Commands::Rate(cmd)) => {
            handle_rate_command(&storage, cmd)?;
        }
        None => {
            println!("splitsheet - exact splits for shared expenses");
            println!();
            println!("Run 'splitsheet --help' for usage information.");
        }
    }

    Ok(())
}
