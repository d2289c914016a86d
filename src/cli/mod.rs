//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::vault::Session;

/// Minimum passphrase length to prevent trivially weak passphrases.
const MIN_PASSWORD_LEN: usize = 8;

/// Environment variable holding the vault passphrase (scripted use).
pub const PASSWORD_ENV: &str = "PASSVAULT_PASSWORD";

/// Environment variable holding the new passphrase for `change-passphrase`.
pub const NEW_PASSWORD_ENV: &str = "PASSVAULT_NEW_PASSWORD";

/// passvault: local encrypted credential store.
#[derive(Parser)]
#[command(
    name = "passvault",
    about = "Local single-file encrypted credential store",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault directory (default: .passvault)
    #[arg(long, default_value = ".passvault", global = true, env = "PASSVAULT_DIR")]
    pub vault_dir: String,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new, empty vault
    Init,

    /// Add a credential (missing fields are prompted for)
    Add {
        #[command(flatten)]
        fields: FieldArgs,

        /// Generate a random password instead of asking for one
        #[arg(short, long)]
        generate: bool,
    },

    /// Edit a credential; omitted fields keep their value
    Edit {
        /// Entry id (or unique prefix)
        id: String,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// List all credentials in display order
    List,

    /// Show one credential
    Get {
        /// Entry id (or unique prefix)
        id: String,

        /// Print the password instead of masking it
        #[arg(long)]
        show: bool,
    },

    /// Copy a password to the clipboard
    Copy {
        /// Entry id (or unique prefix)
        id: String,

        /// Clear the clipboard after this many seconds (0 keeps it)
        #[arg(long)]
        clear_after: Option<u64>,
    },

    /// Delete one or more credentials
    Delete {
        /// Entry ids (or unique prefixes)
        #[arg(required = true)]
        ids: Vec<String>,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Move a credential to a new position (1-based)
    Move {
        /// Entry id (or unique prefix)
        id: String,
        /// Target position; larger values move to the end
        position: usize,
    },

    /// Search website names and usernames
    Search {
        /// Case-insensitive text to look for
        query: String,
    },

    /// Generate a random password
    Generate {
        /// Password length (8-64, default from settings)
        #[arg(short, long)]
        length: Option<usize>,

        /// Leave out uppercase letters
        #[arg(long)]
        no_uppercase: bool,

        /// Leave out lowercase letters
        #[arg(long)]
        no_lowercase: bool,

        /// Leave out digits
        #[arg(long)]
        no_digits: bool,

        /// Leave out symbols
        #[arg(long)]
        no_symbols: bool,

        /// Leave out easily confused characters (0O1lI)
        #[arg(long)]
        exclude_similar: bool,
    },

    /// Import credentials from a CSV or text file
    Import {
        /// Path to the file to import
        file: String,

        /// Import without asking for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Export all credentials to a plaintext file
    Export {
        /// Output file path
        file: String,

        /// Output format: csv or text (default: from the file extension)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Change the vault passphrase
    ChangePassphrase,

    /// Copy the encrypted vault file to another location
    Backup {
        /// Destination file
        dest: String,
    },

    /// Replace the vault with a backup file
    Restore {
        /// Backup file to restore from
        src: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// View the audit log of vault operations
    Audit {
        /// Number of events to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Only events since a duration ago (30m, 24h, 7d, 2w) or a date (YYYY-MM-DD)
        #[arg(long)]
        since: Option<String>,
        /// Only events touching this credential (short id or prefix)
        #[arg(long)]
        entry: Option<String>,
        /// Only one kind of operation (e.g. copy, export, delete)
        #[arg(long)]
        op: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (default: from $SHELL)
        shell: Option<String>,
    },
}

/// Entry fields given on the command line.
#[derive(clap::Args, Debug, Default)]
pub struct FieldArgs {
    /// Website name
    #[arg(short, long)]
    pub website: Option<String>,

    /// Website URL (https:// is added when no scheme is given)
    #[arg(short, long)]
    pub url: Option<String>,

    /// Account username
    #[arg(long)]
    pub username: Option<String>,

    /// Password (prompted for when omitted)
    #[arg(short, long)]
    pub password: Option<String>,

    /// Free-form note
    #[arg(short, long)]
    pub note: Option<String>,
}

impl FieldArgs {
    pub fn is_empty(&self) -> bool {
        self.website.is_none()
            && self.url.is_none()
            && self.username.is_none()
            && self.password.is_none()
            && self.note.is_none()
    }
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Get the vault passphrase, trying in order:
/// 1. `PASSVAULT_PASSWORD` env var (scripts)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the passphrase is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    prompt_password_with("Enter vault passphrase")
}

/// Like `prompt_password` with a custom prompt text.
pub fn prompt_password_with(prompt: &str) -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env(PASSWORD_ENV) {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("passphrase prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new passphrase with confirmation.
///
/// `env_var` is consulted first for scripted use.  Enforces a minimum
/// length.
pub fn prompt_new_password(env_var: &str) -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env(env_var) {
        if pw.chars().count() < MIN_PASSWORD_LEN {
            return Err(VaultError::CommandFailed(format!(
                "passphrase must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        return Ok(pw);
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Choose vault passphrase")
            .with_confirmation(
                "Confirm vault passphrase",
                "Passphrases do not match, try again",
            )
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("passphrase prompt: {e}")))?;

        if password.chars().count() < MIN_PASSWORD_LEN {
            output::warning(&format!(
                "Passphrase must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(password));
    }
}

fn password_from_env(var: &str) -> Option<Zeroizing<String>> {
    std::env::var(var)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}

/// Ask a yes/no question.
pub fn confirm(prompt: &str, default: bool) -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))
}

/// Resolve the vault directory against the current directory.
pub fn vault_dir(cli: &Cli) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(&cli.vault_dir))
}

/// Load `<vault_dir>/settings.toml` (defaults when absent).
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    Settings::load(&vault_dir(cli)?)
}

/// Build the full path to the vault file from the CLI arguments.
///
/// Example: `<cwd>/.passvault/passwords.vault`
pub fn vault_path(cli: &Cli) -> Result<PathBuf> {
    let dir = vault_dir(cli)?;
    Ok(Settings::load(&dir)?.vault_path(&dir))
}

/// File name of the vault, for audit records.
pub fn vault_file_name(cli: &Cli) -> String {
    load_settings(cli).unwrap_or_default().vault_file
}

/// Open the vault: load settings, prompt for the passphrase and unlock.
pub fn open_session(cli: &Cli) -> Result<(Session, Settings)> {
    let dir = vault_dir(cli)?;
    let settings = Settings::load(&dir)?;
    let path = settings.vault_path(&dir);
    if !path.exists() {
        output::tip("Run `passvault init` to create a vault.");
        return Err(VaultError::VaultNotFound(path));
    }

    let mut session = Session::new(path, settings.lock_policy());
    let password = prompt_password()?;
    session.unlock(&password)?;
    Ok((session, settings))
}
