use contracts::system::auth::UserInfo;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::storage::{self, StorageScope};
use super::api;

#[derive(Clone, Debug, Default)]
pub struct AuthState {
    pub access_token: Option<String>,
    pub user_info: Option<UserInfo>,
}

/// Auth context provider component
#[component]
pub fn AuthProvider(children: ChildrenFn) -> impl IntoView {
    let (auth_state, set_auth_state) = signal(AuthState {
        access_token: storage::get_access_token(),
        user_info: None,
    });

    // Validate the stored token once on mount
    Effect::new(move |_| {
        spawn_local(async move {
            let Some(access_token) = storage::get_access_token() else {
                return;
            };
            match api::get_current_user(&access_token).await {
                Ok(user_info) => {
                    set_auth_state.set(AuthState {
                        access_token: Some(access_token),
                        user_info: Some(user_info),
                    });
                }
                Err(err) if err.is_auth() => {
                    log::info!("stored token rejected: {}", err);
                    storage::clear_tokens();
                    set_auth_state.set(AuthState::default());
                }
                Err(err) => {
                    // server unreachable: keep the token, list pages report the error
                    log::warn!("failed to load current user: {}", err);
                }
            }
        });
    });

    provide_context(auth_state);
    provide_context(set_auth_state);

    children()
}

/// Hook to access auth state
pub fn use_auth() -> (ReadSignal<AuthState>, WriteSignal<AuthState>) {
    let auth_state =
        use_context::<ReadSignal<AuthState>>().expect("AuthProvider not found in component tree");
    let set_auth_state =
        use_context::<WriteSignal<AuthState>>().expect("AuthProvider not found in component tree");

    (auth_state, set_auth_state)
}

/// Helper: Check if user is admin
pub fn is_admin() -> bool {
    let (auth_state, _) = use_auth();
    auth_state
        .get()
        .user_info
        .as_ref()
        .map(|u| u.is_admin())
        .unwrap_or(false)
}

/// Helper: Perform login. `remember_me` keeps the token across browser restarts.
pub async fn do_login(
    set_auth_state: WriteSignal<AuthState>,
    email: String,
    password: String,
    remember_me: bool,
) -> Result<(), String> {
    let response = api::login(email, password)
        .await
        .map_err(|e| e.to_string())?;

    let scope = if remember_me {
        StorageScope::Persistent
    } else {
        StorageScope::Session
    };
    storage::clear_tokens();
    storage::save_access_token(&response.access_token, scope);
    log::info!("logged in as {}", response.user.email);

    set_auth_state.set(AuthState {
        access_token: Some(response.access_token),
        user_info: Some(response.user),
    });

    Ok(())
}

/// Helper: Perform logout
pub fn do_logout(set_auth_state: WriteSignal<AuthState>) {
    storage::clear_tokens();
    set_auth_state.set(AuthState::default());
}
