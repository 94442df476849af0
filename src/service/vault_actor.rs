use crate::error::VaultError;
use crate::service::vault_ops::{Entry, VaultOps};

use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use std::fmt;
use tracing::{debug, info};

/// Fields for a new entry. The password is plaintext until the actor encrypts it.
pub struct NewEntry {
    pub site: String,
    pub user: String,
    pub password: String,
}

impl fmt::Debug for NewEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewEntry")
            .field("site", &self.site)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Messages handled by the vault actor; one per controller operation.
#[derive(Debug)]
pub enum VaultMessage {
    AddEntry(NewEntry, RpcReplyPort<Result<(), VaultError>>),
    SearchEntry(String, RpcReplyPort<Result<Entry, VaultError>>),
    /// Site and new plaintext password.
    UpdateEntry(String, String, RpcReplyPort<Result<(), VaultError>>),
    DeleteEntry(String, RpcReplyPort<Result<(), VaultError>>),
    EntryCount(RpcReplyPort<Result<i64, VaultError>>),
}

/// Handle for interacting with the vault actor. Requests are processed one
/// at a time in arrival order.
#[derive(Clone)]
pub struct VaultHandle {
    actor: ActorRef<VaultMessage>,
}

impl VaultHandle {
    pub async fn add_entry(
        &self,
        site: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<(), VaultError> {
        let entry = NewEntry {
            site: site.into(),
            user: user.into(),
            password: password.into(),
        };
        ractor::call!(self.actor, VaultMessage::AddEntry, entry)
            .map_err(|e| VaultError::Actor(format!("AddEntry RPC failed: {e}")))?
    }

    pub async fn search_entry(&self, site: impl Into<String>) -> Result<Entry, VaultError> {
        ractor::call!(self.actor, VaultMessage::SearchEntry, site.into())
            .map_err(|e| VaultError::Actor(format!("SearchEntry RPC failed: {e}")))?
    }

    pub async fn update_entry(
        &self,
        site: impl Into<String>,
        new_password: impl Into<String>,
    ) -> Result<(), VaultError> {
        ractor::call!(
            self.actor,
            VaultMessage::UpdateEntry,
            site.into(),
            new_password.into()
        )
        .map_err(|e| VaultError::Actor(format!("UpdateEntry RPC failed: {e}")))?
    }

    pub async fn delete_entry(&self, site: impl Into<String>) -> Result<(), VaultError> {
        ractor::call!(self.actor, VaultMessage::DeleteEntry, site.into())
            .map_err(|e| VaultError::Actor(format!("DeleteEntry RPC failed: {e}")))?
    }

    pub async fn entry_count(&self) -> Result<i64, VaultError> {
        ractor::call!(self.actor, VaultMessage::EntryCount)
            .map_err(|e| VaultError::Actor(format!("EntryCount RPC failed: {e}")))?
    }

    pub fn stop(&self) {
        self.actor.stop(None);
    }
}

/// ractor-based vault actor; its state is the only `VaultOps` in the process.
struct VaultActor;

#[ractor::async_trait]
impl Actor for VaultActor {
    type Msg = VaultMessage;
    type State = VaultOps;
    type Arguments = VaultOps;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        ops: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let count = ops
            .entry_count()
            .await
            .map_err(|e| ActorProcessingErr::from(format!("vault count failed: {}", e)))?;
        info!(count, "VaultActor started; Stored Passwords: {count}");
        Ok(ops)
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            VaultMessage::AddEntry(entry, rp) => {
                let res = state
                    .add_entry(&entry.site, &entry.user, &entry.password)
                    .await;
                log_outcome("add", &res);
                let _ = rp.send(res);
            }
            VaultMessage::SearchEntry(site, rp) => {
                let res = state.search_entry(&site).await;
                log_outcome("search", &res);
                let _ = rp.send(res);
            }
            VaultMessage::UpdateEntry(site, new_password, rp) => {
                let res = state.update_entry(&site, &new_password).await;
                log_outcome("update", &res);
                let _ = rp.send(res);
            }
            VaultMessage::DeleteEntry(site, rp) => {
                let res = state.delete_entry(&site).await;
                log_outcome("delete", &res);
                let _ = rp.send(res);
            }
            VaultMessage::EntryCount(rp) => {
                let _ = rp.send(state.entry_count().await);
            }
        }
        Ok(())
    }
}

fn log_outcome<T>(op: &str, res: &Result<T, VaultError>) {
    match res {
        Ok(_) => debug!(op, "vault operation succeeded"),
        Err(e) => debug!(op, error = %e, "vault operation rejected"),
    }
}

/// Spawn the vault actor around an opened `VaultOps` and return a handle.
pub async fn spawn(ops: VaultOps) -> Result<VaultHandle, VaultError> {
    let (actor, _jh) = Actor::spawn(None, VaultActor, ops)
        .await
        .map_err(|e| VaultError::Actor(format!("failed to spawn VaultActor: {e}")))?;
    Ok(VaultHandle { actor })
}
