use contracts::shared::entity::{EntityDraft, FormMode};
use leptos::prelude::*;

use super::fields::{FieldKind, FormField};
use super::EntityPage;
use crate::shared::dropdown::DropdownField;
use crate::shared::list_controller::ListController;
use crate::shared::modal_frame::ModalFrame;

type Ctrl<P> = RwSignal<ListController<<P as EntityPage>::Entity>>;

fn field_value<P: EntityPage>(ctrl: Ctrl<P>, name: &'static str) -> String {
    ctrl.with(|c| {
        c.form()
            .session()
            .and_then(|s| s.draft.field(name).map(str::to_string))
            .unwrap_or_default()
    })
}

fn field_error<P: EntityPage>(ctrl: Ctrl<P>, name: &'static str) -> Option<String> {
    ctrl.with(|c| {
        c.form()
            .session()
            .and_then(|s| s.field_error(name).map(str::to_string))
    })
}

fn field_input<P: EntityPage>(ctrl: Ctrl<P>, field: FormField, disabled: Signal<bool>) -> AnyView {
    let name = field.name;
    let set = move |value: String| {
        ctrl.update(|c| {
            c.set_field(name, value);
        });
    };

    match field.kind {
        FieldKind::TextArea => view! {
            <textarea
                class="form__textarea"
                rows="3"
                prop:value={move || field_value::<P>(ctrl, name)}
                disabled=move || disabled.get()
                on:input=move |ev| set(event_target_value(&ev))
            />
        }
        .into_any(),
        FieldKind::Select(options) => view! {
            <select
                class="form__select"
                prop:value={move || field_value::<P>(ctrl, name)}
                disabled=move || disabled.get()
                on:change=move |ev| set(event_target_value(&ev))
            >
                <option value="">"Select..."</option>
                {options.iter().map(|(value, label)| view! {
                    <option value=*value selected={move || field_value::<P>(ctrl, name) == *value}>{*label}</option>
                }).collect_view()}
            </select>
        }
        .into_any(),
        FieldKind::Dropdown(kind) => view! {
            <DropdownField
                kind=kind
                value=Signal::derive(move || field_value::<P>(ctrl, name))
                on_change=Callback::new(set)
                disabled=disabled
            />
        }
        .into_any(),
        kind => view! {
            <input
                type=kind.input_type()
                class="form__input"
                prop:value={move || field_value::<P>(ctrl, name)}
                disabled=move || disabled.get()
                on:input=move |ev| set(event_target_value(&ev))
            />
        }
        .into_any(),
    }
}

/// Модальная форма создания / редактирования записи
pub fn form_modal<P: EntityPage>(ctrl: Ctrl<P>, on_submit: Callback<()>) -> impl IntoView {
    let mode = ctrl.with_untracked(|c| c.form().session().map(|s| s.mode));
    let mode = mode.unwrap_or(FormMode::Creating);

    let title = match mode {
        FormMode::Creating => format!("New {}", P::SINGULAR),
        FormMode::Editing => format!("Edit {}", P::SINGULAR),
    };
    let submitting = Signal::derive(move || {
        ctrl.with(|c| c.form().session().map(|s| s.submitting).unwrap_or(false))
    });
    let form_error = move || ctrl.with(|c| c.form().session().and_then(|s| s.form_error.clone()));
    let close = Callback::new(move |_| ctrl.update(|c| c.cancel_form()));

    let fields = P::form_fields()
        .into_iter()
        .filter(|f| f.visible_in(mode))
        .map(|field| {
            let name = field.name;
            view! {
                <div class="form__group">
                    <label class="form__label">
                        {field.label}
                        {field.required.then(|| view! { <span class="form__required">" *"</span> })}
                    </label>
                    {field_input::<P>(ctrl, field, submitting)}
                    {move || field_error::<P>(ctrl, name).map(|e| view! {
                        <div class="form__hint form__hint--error">{e}</div>
                    })}
                </div>
            }
        })
        .collect_view();

    view! {
        <ModalFrame title=title on_close=close>
            <form on:submit=move |ev: leptos::ev::SubmitEvent| {
                ev.prevent_default();
                on_submit.run(());
            }>
                <div class="modal-body">
                    {move || form_error().map(|e| view! { <div class="alert alert--error">{e}</div> })}
                    {fields}
                </div>
                <div class="modal-footer">
                    <button
                        type="button"
                        class="button button--secondary"
                        on:click=move |_| close.run(())
                    >
                        "Cancel"
                    </button>
                    <button
                        type="submit"
                        class="button button--primary"
                        disabled=move || submitting.get()
                    >
                        {move || if submitting.get() { "Saving..." } else { "Save" }}
                    </button>
                </div>
            </form>
        </ModalFrame>
    }
}
