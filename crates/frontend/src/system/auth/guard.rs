use leptos::prelude::*;

use super::context::use_auth;

/// Component that requires admin privileges
/// Shows fallback if not admin
#[component]
pub fn RequireAdmin(children: ChildrenFn) -> impl IntoView {
    let (auth_state, _) = use_auth();

    view! {
        <Show
            when=move || {
                let state = auth_state.get();
                state.access_token.is_some() && state.user_info.as_ref().map(|u| u.is_admin()).unwrap_or(false)
            }
            fallback=|| view! { <div class="alert alert--error">"Access denied. Admin privileges required."</div> }
        >
            {children()}
        </Show>
    }
}
