use std::io;
use std::path::PathBuf;

use cadastro_core::{Collector, normalize_cpf};
use cadastro_sqlite::{Migration, PersonStore};
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod config;
mod output;

use config::RegistryConfig;
use output::{OutputFormat, format_listing, format_record};

#[derive(Debug, Parser)]
#[command(name = "cadastro", version)]
#[command(about = "Register people by CPF and list everyone stored")]
struct Cli {
    /// YAML configuration file.
    #[arg(long, global = true, env = "CADASTRO_CONFIG")]
    config: Option<PathBuf>,
    /// SQLite database file.
    #[arg(long, global = true, env = "CADASTRO_DB")]
    db: Option<PathBuf>,
    /// Table prefix.
    #[arg(long, global = true, env = "CADASTRO_PREFIX")]
    prefix: Option<String>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    /// Defaults to `register` when omitted.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Prompt for a new person, store it, then list everyone.
    Register(RegisterArgs),
    /// List every stored person.
    List(ListArgs),
    /// Report whether a CPF is already registered.
    Check(CheckArgs),
    /// Show one stored person by id.
    Show(ShowArgs),
    /// Registry table management.
    Migrate(MigrateArgs),
    /// Write the effective configuration to a YAML file.
    InitConfig(InitConfigArgs),
}

#[derive(Debug, Args, Default)]
struct RegisterArgs {
    /// Give up after this many invalid entries for one field.
    #[arg(long)]
    max_attempts: Option<u32>,
    /// Output format for the listing printed afterwards.
    #[arg(long, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Output format.
    #[arg(long, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// CPF, with or without punctuation.
    cpf: String,
}

#[derive(Debug, Args)]
struct ShowArgs {
    /// Storage id of the record.
    id: i64,
    /// Output format.
    #[arg(long, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct MigrateArgs {
    #[command(subcommand)]
    operation: MigrateOperation,
}

#[derive(Debug, Subcommand)]
enum MigrateOperation {
    /// Create the registry table.
    Up,
    /// Drop the registry table and all records.
    Down,
    /// Show whether the table exists and how many records it holds.
    Status,
}

#[derive(Debug, Args)]
struct InitConfigArgs {
    /// Destination YAML file.
    #[arg(long, default_value = "cadastro.yml")]
    output: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(cli);

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), String> {
    let command = cli
        .command
        .unwrap_or_else(|| Command::Register(RegisterArgs::default()));

    let max_attempts = match &command {
        Command::Register(args) => args.max_attempts,
        _ => None,
    };

    let mut settings = match &cli.config {
        Some(path) => RegistryConfig::load(path)
            .map_err(|e| format!("Failed to load config '{}': {e}", path.display()))?,
        None => RegistryConfig::default(),
    };
    settings.apply_overrides(cli.db, cli.prefix, max_attempts);

    match command {
        Command::Register(args) => run_register(&settings, args),
        Command::List(args) => run_list(&settings, args),
        Command::Check(args) => run_check(&settings, args),
        Command::Show(args) => run_show(&settings, args),
        Command::Migrate(args) => run_migrate(&settings, args),
        Command::InitConfig(args) => run_init_config(&settings, args),
    }
}

fn run_register(settings: &RegistryConfig, args: RegisterArgs) -> Result<(), String> {
    let migration = open_registry(settings)?;
    let store = PersonStore::new(migration.connection(), &settings.prefix)
        .map_err(|e| format!("Failed to open registry: {e}"))?;

    let person = Collector::new(io::stdin().lock(), io::stdout().lock(), &store)
        .with_policy(settings.retry_policy())
        .collect()
        .map_err(|e| format!("Failed to read registration: {e}"))?;

    store
        .register(&person)
        .map_err(|e| format!("Registration failed: {e}"))?;
    println!("{} registered successfully", person.name);

    print_listing(&store, args.format)
}

fn run_list(settings: &RegistryConfig, args: ListArgs) -> Result<(), String> {
    let migration = open_registry(settings)?;
    let store = PersonStore::new(migration.connection(), &settings.prefix)
        .map_err(|e| format!("Failed to open registry: {e}"))?;
    print_listing(&store, args.format)
}

fn run_check(settings: &RegistryConfig, args: CheckArgs) -> Result<(), String> {
    let national_id = normalize_cpf(&args.cpf);
    if national_id.is_empty() {
        return Err(format!("'{}' contains no digits", args.cpf));
    }

    let migration = open_registry(settings)?;
    let store = PersonStore::new(migration.connection(), &settings.prefix)
        .map_err(|e| format!("Failed to open registry: {e}"))?;

    match store
        .lookup(&national_id)
        .map_err(|e| format!("Lookup failed: {e}"))?
    {
        Some(id) => println!("CPF {national_id} is registered (id {id})."),
        None => println!("CPF {national_id} is not registered."),
    }
    Ok(())
}

fn run_show(settings: &RegistryConfig, args: ShowArgs) -> Result<(), String> {
    let migration = open_registry(settings)?;
    let store = PersonStore::new(migration.connection(), &settings.prefix)
        .map_err(|e| format!("Failed to open registry: {e}"))?;

    let record = store
        .find(args.id)
        .map_err(|e| format!("Lookup failed: {e}"))?
        .ok_or_else(|| format!("No record with id {}", args.id))?;
    print!("{}", format_record(&record, args.format)?);
    Ok(())
}

fn run_migrate(settings: &RegistryConfig, args: MigrateArgs) -> Result<(), String> {
    let mut migration = connect(settings)?;
    match args.operation {
        MigrateOperation::Up => {
            migration
                .up()
                .map_err(|e| format!("Migration up failed: {e}"))?;
            println!(
                "Migration up complete. Table created with prefix '{}' in '{}'.",
                settings.prefix,
                settings.database.display()
            );
        }
        MigrateOperation::Down => {
            migration
                .down()
                .map_err(|e| format!("Migration down failed: {e}"))?;
            println!(
                "Migration down complete. Table with prefix '{}' dropped from '{}'.",
                settings.prefix,
                settings.database.display()
            );
        }
        MigrateOperation::Status => {
            let status = migration
                .status()
                .map_err(|e| format!("Failed to get migration status: {e}"))?;
            println!("Migration Status:");
            println!(
                "  Table exists: {}",
                if status.tables_exist { "yes" } else { "no" }
            );
            println!("  Record count: {}", status.record_count);
        }
    }
    Ok(())
}

fn run_init_config(settings: &RegistryConfig, args: InitConfigArgs) -> Result<(), String> {
    settings
        .save(&args.output)
        .map_err(|e| format!("Failed to write '{}': {e}", args.output.display()))?;
    println!("Wrote configuration to '{}'.", args.output.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Opens the database without touching the schema.
fn connect(settings: &RegistryConfig) -> Result<Migration, String> {
    debug!(database = %settings.database.display(), prefix = %settings.prefix, "opening registry");
    let conn = rusqlite::Connection::open(&settings.database).map_err(|e| {
        format!(
            "Failed to open database '{}': {e}",
            settings.database.display()
        )
    })?;
    Migration::new(conn, &settings.prefix)
        .map_err(|e| format!("Failed to initialize migration: {e}"))
}

/// Opens the database and makes sure the registry table exists.
fn open_registry(settings: &RegistryConfig) -> Result<Migration, String> {
    let mut migration = connect(settings)?;
    migration
        .up()
        .map_err(|e| format!("Migration up failed: {e}"))?;
    Ok(migration)
}

/// Prints the listing; on a partial failure prints the rows read, then fails.
fn print_listing(store: &PersonStore<'_>, format: OutputFormat) -> Result<(), String> {
    match store.list_all() {
        Ok(records) => {
            print!("{}", format_listing(&records, format)?);
            Ok(())
        }
        Err(partial) => {
            if !partial.records.is_empty() {
                print!("{}", format_listing(&partial.records, format)?);
            }
            Err(format!("Listing failed: {}", partial.source))
        }
    }
}
