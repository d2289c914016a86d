//! `passvault generate`: print a random password.
//!
//! Does not need the vault passphrase; settings only supply defaults.

use crate::cli::{load_settings, Cli};
use crate::errors::Result;
use crate::generator::{self, PasswordPolicy};

/// Character-class switches from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassFlags {
    pub no_uppercase: bool,
    pub no_lowercase: bool,
    pub no_digits: bool,
    pub no_symbols: bool,
    pub exclude_similar: bool,
}

/// Execute the `generate` command.
pub fn execute(cli: &Cli, length: Option<usize>, flags: ClassFlags) -> Result<()> {
    let settings = load_settings(cli)?;
    let policy = build_policy(settings.password_policy(), length, flags);
    let password = generator::generate(&policy)?;
    println!("{}", password.as_str());
    Ok(())
}

fn build_policy(defaults: PasswordPolicy, length: Option<usize>, flags: ClassFlags) -> PasswordPolicy {
    PasswordPolicy {
        length: length.unwrap_or(defaults.length),
        uppercase: !flags.no_uppercase,
        lowercase: !flags.no_lowercase,
        digits: !flags.no_digits,
        symbols: !flags.no_symbols,
        exclude_similar: defaults.exclude_similar || flags.exclude_similar,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let policy = build_policy(
            PasswordPolicy::default(),
            Some(32),
            ClassFlags {
                no_symbols: true,
                ..ClassFlags::default()
            },
        );
        assert_eq!(policy.length, 32);
        assert!(!policy.symbols);
        assert!(policy.uppercase);
    }

    #[test]
    fn settings_length_is_default() {
        let defaults = PasswordPolicy {
            length: 20,
            exclude_similar: true,
            ..PasswordPolicy::default()
        };
        let policy = build_policy(defaults, None, ClassFlags::default());
        assert_eq!(policy.length, 20);
        assert!(policy.exclude_similar);
    }
}
