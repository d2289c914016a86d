use clap::Parser;
use passvault::cli::commands;
use passvault::cli::commands::generate::ClassFlags;
use passvault::cli::{Cli, Commands};

/// Log filter variable; defaults to warnings from this crate only.
const LOG_ENV: &str = "PASSVAULT_LOG";

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::execute(&cli),
        Commands::Add {
            ref fields,
            generate,
        } => commands::add::execute(&cli, fields, generate),
        Commands::Edit { ref id, ref fields } => commands::edit::execute(&cli, id, fields),
        Commands::List => commands::list::execute(&cli),
        Commands::Get { ref id, show } => commands::get::execute(&cli, id, show),
        Commands::Copy {
            ref id,
            clear_after,
        } => commands::copy::execute(&cli, id, clear_after),
        Commands::Delete { ref ids, force } => commands::delete::execute(&cli, ids, force),
        Commands::Move { ref id, position } => commands::move_cmd::execute(&cli, id, position),
        Commands::Search { ref query } => commands::search::execute(&cli, query),
        Commands::Generate {
            length,
            no_uppercase,
            no_lowercase,
            no_digits,
            no_symbols,
            exclude_similar,
        } => commands::generate::execute(
            &cli,
            length,
            ClassFlags {
                no_uppercase,
                no_lowercase,
                no_digits,
                no_symbols,
                exclude_similar,
            },
        ),
        Commands::Import { ref file, yes } => commands::import_cmd::execute(&cli, file, yes),
        Commands::Export {
            ref file,
            ref format,
        } => commands::export::execute(&cli, file, format.as_deref()),
        Commands::ChangePassphrase => commands::change_passphrase::execute(&cli),
        Commands::Backup { ref dest } => commands::backup::execute(&cli, dest),
        Commands::Restore { ref src, force } => commands::restore::execute(&cli, src, force),
        Commands::Audit {
            last,
            ref since,
            ref entry,
            ref op,
        } => commands::audit_cmd::execute(
            &cli,
            commands::audit_cmd::AuditArgs {
                last,
                since: since.as_deref(),
                entry: entry.as_deref(),
                op: op.as_deref(),
            },
        ),
        Commands::Completions { ref shell } => commands::completions::execute(shell.as_deref()),
    };

    if let Err(e) = result {
        passvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}

/// Install the stderr tracing subscriber, filtered by `PASSVAULT_LOG`.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new("passvault=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
