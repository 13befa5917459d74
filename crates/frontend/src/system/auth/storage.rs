use web_sys::window;

use crate::shared::config::ACCESS_TOKEN_KEY;

/// Where the access token is kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageScope {
    /// sessionStorage: dropped when the browser tab closes
    Session,
    /// localStorage: survives restarts ("remember me")
    Persistent,
}

fn get_storage(scope: StorageScope) -> Option<web_sys::Storage> {
    let window = window()?;
    match scope {
        StorageScope::Session => window.session_storage().ok()?,
        StorageScope::Persistent => window.local_storage().ok()?,
    }
}

/// Save access token to the chosen storage
pub fn save_access_token(token: &str, scope: StorageScope) {
    if let Some(storage) = get_storage(scope) {
        let _ = storage.set_item(ACCESS_TOKEN_KEY, token);
    }
}

/// Get access token, session-scoped storage first
pub fn get_access_token() -> Option<String> {
    [StorageScope::Session, StorageScope::Persistent]
        .into_iter()
        .find_map(|scope| get_storage(scope)?.get_item(ACCESS_TOKEN_KEY).ok()?)
        .filter(|token| !token.is_empty())
}

/// Clear the token from both storages
pub fn clear_tokens() {
    for scope in [StorageScope::Session, StorageScope::Persistent] {
        if let Some(storage) = get_storage(scope) {
            let _ = storage.remove_item(ACCESS_TOKEN_KEY);
        }
    }
}
