use subtle::ConstantTimeEq;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::error::VaultError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Locked,
    Unlocked,
    Exited,
}

/// Proof that the gate was passed. Only `AuthGate` can create one, and it
/// does so at most once per gate.
#[derive(Debug)]
pub struct Unlocked {
    _private: (),
}

/// Source of startup secrets and retry decisions.
pub trait Prompter {
    /// Read one secret attempt without echoing it.
    fn read_secret(&mut self) -> std::io::Result<String>;

    /// Called after a mismatch. `true` keeps the gate locked for another try.
    fn confirm_retry(&mut self) -> std::io::Result<bool>;
}

/// Startup gate comparing typed secrets against the configured one.
pub struct AuthGate {
    expected: Zeroizing<String>,
    state: GateState,
}

impl AuthGate {
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: Zeroizing::new(expected.into()),
            state: GateState::Locked,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// `Locked -> Unlocked` on a match, `Locked -> Locked` otherwise.
    /// Outside `Locked` nothing changes and no token is issued.
    pub fn attempt(&mut self, secret: &str) -> Option<Unlocked> {
        if self.state != GateState::Locked {
            return None;
        }
        if bool::from(secret.as_bytes().ct_eq(self.expected.as_bytes())) {
            self.state = GateState::Unlocked;
            info!("vault unlocked");
            Some(Unlocked { _private: () })
        } else {
            warn!("incorrect startup secret");
            None
        }
    }

    /// `Locked -> Exited`.
    pub fn decline(&mut self) {
        if self.state == GateState::Locked {
            self.state = GateState::Exited;
            info!("user declined to retry; exiting");
        }
    }

    /// Prompt until the secret matches or the user declines to retry.
    /// Returns `None` when the gate ends in `Exited`.
    pub fn run<P: Prompter>(&mut self, prompter: &mut P) -> Result<Option<Unlocked>, VaultError> {
        while self.state == GateState::Locked {
            let attempt = Zeroizing::new(prompter.read_secret()?);
            if let Some(unlocked) = self.attempt(&attempt) {
                return Ok(Some(unlocked));
            }
            if !prompter.confirm_retry()? {
                self.decline();
            }
        }
        Ok(None)
    }
}
