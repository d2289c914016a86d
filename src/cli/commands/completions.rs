//! `passvault completions`: generate shell completion scripts.
//!
//! Usage:
//!   passvault completions bash > ~/.local/share/bash-completion/completions/passvault
//!   passvault completions zsh
//!   passvault completions          # shell taken from $SHELL

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::{Result, VaultError};

/// Execute the `completions` command.
pub fn execute(shell: Option<&str>) -> Result<()> {
    let shell = match shell {
        Some(name) => parse_shell(name)?,
        None => Shell::from_env().ok_or_else(|| {
            VaultError::CommandFailed("could not detect the shell, pass it explicitly".into())
        })?,
    };
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "passvault", &mut io::stdout());
    Ok(())
}

/// Parse a shell name (case-insensitive, `ps` for PowerShell).
fn parse_shell(name: &str) -> Result<Shell> {
    let lower = name.to_lowercase();
    let canonical = if lower == "ps" { "powershell" } else { lower.as_str() };
    canonical.parse::<Shell>().map_err(|_| {
        VaultError::CommandFailed(format!(
            "unknown shell '{name}', supported: bash, zsh, fish, powershell, elvish"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_shells() {
        for (name, shell) in [
            ("bash", Shell::Bash),
            ("Zsh", Shell::Zsh),
            ("fish", Shell::Fish),
            ("ps", Shell::PowerShell),
            ("POWERSHELL", Shell::PowerShell),
            ("elvish", Shell::Elvish),
        ] {
            assert_eq!(parse_shell(name).unwrap(), shell, "{name}");
        }
    }

    #[test]
    fn parse_unknown_shell_fails() {
        assert!(parse_shell("csh").is_err());
        assert!(parse_shell("").is_err());
    }
}
