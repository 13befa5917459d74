use contracts::shared::dropdown::DropdownOption;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::api::{create_option, fetch_options, option_value_from_label};
use crate::shared::icons::icon;
use crate::system::auth::session::BrowserSession;

/// Выпадающий список значений справочника с возможностью добавить новый вариант
#[component]
pub fn DropdownField(
    /// Вид справочника, например `maintenance_type`
    kind: &'static str,
    #[prop(into)] value: Signal<String>,
    on_change: Callback<String>,
    #[prop(into)] disabled: Signal<bool>,
    #[prop(optional, into)] placeholder: String,
) -> impl IntoView {
    let options: RwSignal<Vec<DropdownOption>> = RwSignal::new(Vec::new());
    let (load_error, set_load_error) = signal::<Option<String>>(None);
    let adding = RwSignal::new(false);
    let new_label = RwSignal::new(String::new());

    Effect::new(move |_| {
        spawn_local(async move {
            match fetch_options(&BrowserSession, kind).await {
                Ok(list) => options.set(list),
                Err(e) => {
                    log::warn!("failed to load {} options: {}", kind, e);
                    set_load_error.set(Some(e.to_string()));
                }
            }
        });
    });

    let save_new = move || {
        let label = new_label.get_untracked().trim().to_string();
        let value = option_value_from_label(&label);
        if value.is_empty() {
            return;
        }
        spawn_local(async move {
            match create_option(&BrowserSession, kind, value, label).await {
                Ok(option) => {
                    let selected = option.value.clone();
                    options.update(|list| list.push(option));
                    on_change.run(selected);
                    new_label.set(String::new());
                    adding.set(false);
                }
                Err(e) => set_load_error.set(Some(e.to_string())),
            }
        });
    };

    let placeholder = if placeholder.is_empty() {
        "Select...".to_string()
    } else {
        placeholder
    };

    view! {
        <div class="dropdown-field">
            <select
                class="form__select"
                prop:value=move || value.get()
                disabled=move || disabled.get()
                on:change=move |ev| on_change.run(event_target_value(&ev))
            >
                <option value="">{placeholder}</option>
                {move || {
                    let current = value.get();
                    let mut list = options.get();
                    // значение записи, которого уже нет в справочнике
                    if !current.is_empty() && !list.iter().any(|o| o.value == current) {
                        list.push(DropdownOption { value: current.clone(), label: current });
                    }
                    list.into_iter()
                        .map(|o| {
                            let selected_value = o.value.clone();
                            view! {
                                <option value=o.value selected=move || value.get() == selected_value>
                                    {o.label}
                                </option>
                            }
                        })
                        .collect_view()
                }}
            </select>
            <Show
                when=move || adding.get()
                fallback=move || view! {
                    <button
                        type="button"
                        class="button button--ghost"
                        title="Add option"
                        disabled=move || disabled.get()
                        on:click=move |_| adding.set(true)
                    >
                        {icon("plus")}
                    </button>
                }
            >
                <input
                    type="text"
                    class="form__input"
                    placeholder="New option"
                    prop:value=move || new_label.get()
                    on:input=move |ev| new_label.set(event_target_value(&ev))
                />
                <button type="button" class="button button--primary" on:click=move |_| save_new()>
                    "Add"
                </button>
                <button type="button" class="button button--secondary" on:click=move |_| adding.set(false)>
                    "Cancel"
                </button>
            </Show>
            {move || load_error.get().map(|e| view! { <div class="form__hint form__hint--error">{e}</div> })}
        </div>
    }
}
