use contracts::shared::validation::is_valid_email;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::system::auth::context::{do_login, use_auth};

#[component]
pub fn LoginPage() -> impl IntoView {
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (remember_me, set_remember_me) = signal(false);
    let (error_message, set_error_message) = signal(Option::<String>::None);
    let (is_loading, set_is_loading) = signal(false);

    let (_, set_auth_state) = use_auth();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let email_val = email.get().trim().to_string();
        let password_val = password.get();
        if !is_valid_email(&email_val) {
            set_error_message.set(Some("Please enter a valid email address".to_string()));
            return;
        }

        set_is_loading.set(true);
        set_error_message.set(None);

        spawn_local(async move {
            // успешный вход переключает AppRoutes на основной layout
            if let Err(e) = do_login(set_auth_state, email_val, password_val, remember_me.get_untracked()).await {
                set_error_message.set(Some(format!("Login failed: {}", e)));
            }
            set_is_loading.set(false);
        });
    };

    view! {
        <div class="login-container">
            <div class="login-box">
                <h1>"Asset Console"</h1>
                <h2>"Sign in"</h2>

                <Show when=move || error_message.get().is_some()>
                    <div class="error-message">
                        {move || error_message.get().unwrap_or_default()}
                    </div>
                </Show>

                <form on:submit=on_submit>
                    <div class="form-group">
                        <label for="email">"Email"</label>
                        <input
                            type="email"
                            id="email"
                            placeholder="admin@example.com"
                            value=move || email.get()
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                            required
                            disabled=move || is_loading.get()
                        />
                    </div>

                    <div class="form-group">
                        <label for="password">"Password"</label>
                        <input
                            type="password"
                            id="password"
                            value=move || password.get()
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                            required
                            disabled=move || is_loading.get()
                        />
                    </div>

                    <label class="form-group form-group--inline">
                        <input
                            type="checkbox"
                            prop:checked=move || remember_me.get()
                            on:change=move |ev| set_remember_me.set(event_target_checked(&ev))
                        />
                        " Remember me"
                    </label>

                    <button
                        type="submit"
                        class="btn-primary"
                        disabled=move || is_loading.get()
                    >
                        {move || if is_loading.get() { "Signing in..." } else { "Sign in" }}
                    </button>
                </form>
            </div>
        </div>
    }
}
