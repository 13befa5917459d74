//! Top bar: sidebar toggle, application title, current user and logout.

use crate::layout::global_context::AppGlobalContext;
use crate::shared::icons::icon;
use crate::system::auth::context::{do_logout, use_auth};
use leptos::prelude::*;

#[component]
pub fn TopHeader() -> impl IntoView {
    let ctx =
        leptos::context::use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let (auth_state, set_auth_state) = use_auth();

    let is_sidebar_visible = move || ctx.left_open.get();
    let user_name = move || {
        auth_state.with(|s| {
            s.user_info
                .as_ref()
                .map(|u| u.full_name.clone())
                .unwrap_or_default()
        })
    };

    view! {
        <div class="top-header">
            <div class="top-header__brand">
                <button
                    class="top-header__icon-btn"
                    on:click=move |_| ctx.toggle_left()
                    title=move || if is_sidebar_visible() { "Hide navigation" } else { "Show navigation" }
                >
                    {move || if is_sidebar_visible() {
                        icon("chevron-left")
                    } else {
                        icon("chevron-right")
                    }}
                </button>
                <span class="top-header__title">"Asset Console"</span>
            </div>

            <div class="top-header__actions">
                <span class="top-header__user">{user_name}</span>
                <button
                    class="top-header__icon-btn"
                    on:click=move |_| do_logout(set_auth_state)
                    title="Log out"
                >
                    {icon("logout")}
                </button>
            </div>
        </div>
    }
}
