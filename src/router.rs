use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::handlers::vault::{
    add_entry_handler, delete_entry_handler, entry_count_handler, generate_password_handler,
    search_entry_handler, update_entry_handler,
};
use crate::service::VaultHandle;

#[derive(Clone)]
pub struct VaultState {
    pub vault: VaultHandle,
    /// Secret every request must present; the same value the startup gate checks.
    pub access_key: Arc<str>,
}

impl VaultState {
    pub fn new(vault: VaultHandle, access_key: Arc<str>) -> Self {
        Self { vault, access_key }
    }
}

pub fn vault_router(state: VaultState) -> Router {
    Router::new()
        .route("/entries", post(add_entry_handler))
        .route(
            "/entries/{site}",
            get(search_entry_handler)
                .put(update_entry_handler)
                .delete(delete_entry_handler),
        )
        .route("/count", get(entry_count_handler))
        .route("/generate", get(generate_password_handler))
        .with_state(state)
}
