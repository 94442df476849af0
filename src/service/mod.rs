pub mod generator;
pub mod vault_actor;
pub mod vault_ops;

pub use vault_actor::{VaultHandle, spawn};
pub use vault_ops::{Entry, VaultOps};
