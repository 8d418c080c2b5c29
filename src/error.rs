//! Crate error type
//!
//! The simulation itself never fails; these cover the collaborators around it
//! (LocalStorage, JSON, the tip service).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// No `window.localStorage` (private mode, sandboxed iframe, native build)
    #[error("storage is unavailable")]
    StorageUnavailable,

    /// The browser rejected a storage read or write (quota, security)
    #[error("storage access failed: {0}")]
    Storage(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Network error or non-2xx response from the tip service
    #[error("tip service request failed: {0}")]
    TipService(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(target_arch = "wasm32")]
impl Error {
    /// Describe a thrown JS value
    pub fn describe_js(value: &wasm_bindgen::JsValue) -> String {
        value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value))
    }
}
