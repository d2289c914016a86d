//! Random password generation.

use std::ops::RangeInclusive;

use rand::{rng, Rng};
use zeroize::Zeroizing;

use crate::errors::{VaultError, Result};

pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const DIGITS: &str = "0123456789";
pub const SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Characters that are easy to confuse when read back.
pub const SIMILAR: &str = "0O1lI";

pub const LENGTH_RANGE: RangeInclusive<usize> = 8..=64;
pub const DEFAULT_LENGTH: usize = 16;

/// Which characters a generated password may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub length: usize,
    pub uppercase: bool,
    pub lowercase: bool,
    pub digits: bool,
    pub symbols: bool,
    pub exclude_similar: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            uppercase: true,
            lowercase: true,
            digits: true,
            symbols: true,
            exclude_similar: false,
        }
    }
}

impl PasswordPolicy {
    /// The candidate characters, in a fixed order.
    pub fn alphabet(&self) -> Vec<char> {
        [
            (self.uppercase, UPPERCASE),
            (self.lowercase, LOWERCASE),
            (self.digits, DIGITS),
            (self.symbols, SYMBOLS),
        ]
        .into_iter()
        .filter(|(enabled, _)| *enabled)
        .flat_map(|(_, chars)| chars.chars())
        .filter(|c| !(self.exclude_similar && SIMILAR.contains(*c)))
        .collect()
    }
}

/// Draw `policy.length` characters uniformly from the policy's alphabet.
pub fn generate(policy: &PasswordPolicy) -> Result<Zeroizing<String>> {
    if !LENGTH_RANGE.contains(&policy.length) {
        return Err(VaultError::Validation(format!(
            "password length must be between {} and {} (got {})",
            LENGTH_RANGE.start(),
            LENGTH_RANGE.end(),
            policy.length
        )));
    }

    let alphabet = policy.alphabet();
    if alphabet.is_empty() {
        return Err(VaultError::Validation(
            "select at least one character class".into(),
        ));
    }

    let mut rng = rng();
    let mut out = Zeroizing::new(String::with_capacity(policy.length));
    for _ in 0..policy.length {
        out.push(alphabet[rng.random_range(0..alphabet.len())]);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_length() {
        let pw = generate(&PasswordPolicy::default()).unwrap();
        assert_eq!(pw.chars().count(), DEFAULT_LENGTH);
    }

    #[test]
    fn digits_only() {
        let policy = PasswordPolicy {
            length: 64,
            uppercase: false,
            lowercase: false,
            symbols: false,
            ..PasswordPolicy::default()
        };
        let pw = generate(&policy).unwrap();
        assert!(pw.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn similar_characters_are_excluded() {
        let policy = PasswordPolicy {
            length: 64,
            exclude_similar: true,
            ..PasswordPolicy::default()
        };
        assert!(!policy.alphabet().iter().any(|c| SIMILAR.contains(*c)));
        for _ in 0..20 {
            let pw = generate(&policy).unwrap();
            assert!(!pw.chars().any(|c| SIMILAR.contains(c)));
        }
    }

    #[test]
    fn rejects_bad_policies() {
        let too_short = PasswordPolicy {
            length: 7,
            ..PasswordPolicy::default()
        };
        assert!(matches!(generate(&too_short), Err(VaultError::Validation(_))));

        let nothing = PasswordPolicy {
            uppercase: false,
            lowercase: false,
            digits: false,
            symbols: false,
            ..PasswordPolicy::default()
        };
        assert!(matches!(generate(&nothing), Err(VaultError::Validation(_))));
    }
}
