//! Чекбокс в заголовке таблицы: выбрать / снять все строки текущей страницы

use leptos::prelude::*;
use thaw::*;
use wasm_bindgen::JsCast;

#[derive(Debug, Clone, Copy, PartialEq)]
enum CheckboxState {
    Unchecked,
    Checked,
    Indeterminate,
}

fn checkbox_state(page_ids: &[String], selected: &[String]) -> CheckboxState {
    if page_ids.is_empty() {
        return CheckboxState::Unchecked;
    }
    let selected_count = page_ids.iter().filter(|id| selected.contains(id)).count();
    if selected_count == 0 {
        CheckboxState::Unchecked
    } else if selected_count == page_ids.len() {
        CheckboxState::Checked
    } else {
        CheckboxState::Indeterminate
    }
}

/// Показывает три состояния: unchecked, checked, indeterminate
#[component]
pub fn TableHeaderCheckbox(
    /// Id строк текущей страницы
    #[prop(into)]
    page_ids: Signal<Vec<String>>,

    /// Выбранные id
    #[prop(into)]
    selected: Signal<Vec<String>>,

    /// Callback при изменении (true = выбрать все, false = снять все)
    on_change: Callback<bool>,
) -> impl IntoView {
    let state = Signal::derive(move || checkbox_state(&page_ids.get(), &selected.get()));

    let checkbox_ref = NodeRef::<leptos::html::Input>::new();

    // indeterminate задаётся только через DOM свойство
    Effect::new(move |_| {
        if let Some(input) = checkbox_ref.get() {
            let current = state.get();
            if let Some(input_el) = input.dyn_ref::<web_sys::HtmlInputElement>() {
                input_el.set_indeterminate(matches!(current, CheckboxState::Indeterminate));
            }
        }
    });

    view! {
        <TableHeaderCell resizable=false class="fixed-checkbox-column">
            <input
                node_ref=checkbox_ref
                type="checkbox"
                class="table__checkbox"
                prop:checked=move || matches!(state.get(), CheckboxState::Checked)
                on:change=move |ev| on_change.run(event_target_checked(&ev))
            />
        </TableHeaderCell>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_checkbox_state() {
        let page = ids(&["1", "2"]);
        assert_eq!(checkbox_state(&page, &[]), CheckboxState::Unchecked);
        assert_eq!(checkbox_state(&page, &ids(&["2"])), CheckboxState::Indeterminate);
        assert_eq!(checkbox_state(&page, &ids(&["1", "2"])), CheckboxState::Checked);
        assert_eq!(checkbox_state(&[], &ids(&["1"])), CheckboxState::Unchecked);
    }
}
