//! Lock/unlock session around a vault file.
//!
//! ```text
//! Locked --unlock()--> [Unlocking] --ok--> Unlocked --lock()--> Locked
//!                          |
//!                          +--err--> Locked
//! ```
//!
//! `Unlocking` is the synchronous `unlock` call itself.  While unlocked the
//! session owns the passphrase and the decrypted store; locking drops both
//! (wiping their memory) and only then notifies the lock listener.
//!
//! The session holds no timers.  The caller reports activity with
//! `touch` and polls `lock_if_idle` from whatever clock it runs.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::errors::{VaultError, Result};

use super::engine;
use super::store::CredentialStore;

/// Why a session was locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockReason {
    /// The user asked to lock.
    Explicit,
    /// No activity within the idle timeout.
    IdleTimeout,
    /// The window was minimized with lock-on-minimize enabled.
    Minimized,
}

impl fmt::Display for LockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            LockReason::Explicit => "locked",
            LockReason::IdleTimeout => "locked after inactivity",
            LockReason::Minimized => "locked on minimize",
        };
        f.write_str(text)
    }
}

/// Idle/minimize lock behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockPolicy {
    /// Lock after this much inactivity; `None` disables auto-lock.
    pub idle_timeout: Option<Duration>,
    /// Lock when the caller reports a minimize.
    pub lock_on_minimize: bool,
}

impl Default for LockPolicy {
    fn default() -> Self {
        Self {
            idle_timeout: Some(Duration::from_secs(5 * 60)),
            lock_on_minimize: true,
        }
    }
}

/// Observable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Locked,
    Unlocked,
}

struct Unlocked {
    passphrase: Zeroizing<String>,
    store: CredentialStore,
    last_activity: Instant,
}

type LockListener = Box<dyn FnMut(LockReason) + Send>;

/// A vault session.  Owns decrypted material only while unlocked.
pub struct Session {
    path: PathBuf,
    policy: LockPolicy,
    unlocked: Option<Unlocked>,
    on_lock: Option<LockListener>,
}

impl Session {
    /// A locked session for the vault at `path`.
    pub fn new(path: impl Into<PathBuf>, policy: LockPolicy) -> Self {
        Self {
            path: path.into(),
            policy,
            unlocked: None,
            on_lock: None,
        }
    }

    /// Register a callback run after every lock, once secrets are dropped.
    pub fn on_lock(&mut self, listener: impl FnMut(LockReason) + Send + 'static) {
        self.on_lock = Some(Box::new(listener));
    }

    /// Open the vault with `passphrase`.
    ///
    /// On failure the session stays locked and the error is returned
    /// unchanged (`Authentication`, `VaultNotFound`, `Format`, ...).
    pub fn unlock(&mut self, passphrase: &str) -> Result<()> {
        debug!(path = %self.path.display(), "unlocking");
        let store = engine::open(&self.path, passphrase)?;
        self.unlocked = Some(Unlocked {
            passphrase: Zeroizing::new(passphrase.to_string()),
            store,
            last_activity: Instant::now(),
        });
        Ok(())
    }

    /// Create a new vault at the session's path and unlock it.
    pub fn create(&mut self, passphrase: &str) -> Result<()> {
        let store = engine::create(&self.path, passphrase)?;
        self.unlocked = Some(Unlocked {
            passphrase: Zeroizing::new(passphrase.to_string()),
            store,
            last_activity: Instant::now(),
        });
        Ok(())
    }

    /// Drop the passphrase and store, then notify the listener.
    ///
    /// Returns `false` if the session was already locked (no notification).
    pub fn lock(&mut self, reason: LockReason) -> bool {
        let Some(unlocked) = self.unlocked.take() else {
            return false;
        };
        drop(unlocked);

        info!(path = %self.path.display(), %reason, "session locked");
        if let Some(listener) = self.on_lock.as_mut() {
            listener(reason);
        }
        true
    }

    /// Record user activity (resets the idle timer).
    pub fn touch(&mut self) {
        if let Some(unlocked) = self.unlocked.as_mut() {
            unlocked.last_activity = Instant::now();
        }
    }

    /// Lock with `IdleTimeout` if the idle timeout has passed at `now`.
    pub fn lock_if_idle(&mut self, now: Instant) -> bool {
        let (Some(timeout), Some(unlocked)) = (self.policy.idle_timeout, self.unlocked.as_ref())
        else {
            return false;
        };
        if now.saturating_duration_since(unlocked.last_activity) >= timeout {
            self.lock(LockReason::IdleTimeout)
        } else {
            false
        }
    }

    /// Report a minimize; locks when the policy says so.
    pub fn on_minimize(&mut self) -> bool {
        self.policy.lock_on_minimize && self.lock(LockReason::Minimized)
    }

    pub fn state(&self) -> SessionState {
        if self.unlocked.is_some() {
            SessionState::Unlocked
        } else {
            SessionState::Locked
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked.is_some()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The decrypted store.
    pub fn store(&self) -> Result<&CredentialStore> {
        self.unlocked
            .as_ref()
            .map(|u| &u.store)
            .ok_or(VaultError::Locked)
    }

    /// Mutable access to the decrypted store; counts as activity.
    pub fn store_mut(&mut self) -> Result<&mut CredentialStore> {
        let unlocked = self.unlocked.as_mut().ok_or(VaultError::Locked)?;
        unlocked.last_activity = Instant::now();
        Ok(&mut unlocked.store)
    }

    /// Check a passphrase by trying to open the vault file with it.
    pub fn verify(&self, passphrase: &str) -> Result<bool> {
        engine::verify(&self.path, passphrase)
    }

    /// Persist the current store under the session passphrase.
    pub fn save(&mut self) -> Result<()> {
        let unlocked = self.unlocked.as_mut().ok_or(VaultError::Locked)?;
        engine::save(&self.path, &unlocked.passphrase, &unlocked.store)?;
        unlocked.last_activity = Instant::now();
        Ok(())
    }

    /// Re-encrypt the vault under `new_passphrase`.
    ///
    /// The file is opened with `old_passphrase` and that store is saved
    /// under the new one, so `old_passphrase` is checked against the file
    /// rather than the session.  Unsaved edits are discarded: the session
    /// continues with the store as it was on disk.  Call `save` first to
    /// keep them.
    pub fn change_passphrase(&mut self, old_passphrase: &str, new_passphrase: &str) -> Result<()> {
        let unlocked = self.unlocked.as_mut().ok_or(VaultError::Locked)?;
        let on_disk = engine::open(&self.path, old_passphrase)?;
        engine::save(&self.path, new_passphrase, &on_disk)?;

        unlocked.store = on_disk;
        unlocked.passphrase = Zeroizing::new(new_passphrase.to_string());
        unlocked.last_activity = Instant::now();
        Ok(())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("path", &self.path)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
