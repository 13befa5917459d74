//! Чекбокс выбора строки

use leptos::prelude::*;
use thaw::*;

/// Останавливает propagation клика, чтобы не срабатывал клик по строке
#[component]
pub fn TableCellCheckbox(
    #[prop(into)]
    item_id: String,

    #[prop(into)]
    checked: Signal<bool>,

    /// Callback при изменении (item_id, checked)
    on_change: Callback<(String, bool)>,
) -> impl IntoView {
    view! {
        <TableCell class="fixed-checkbox-column" on:click=|e| e.stop_propagation()>
            <input
                type="checkbox"
                class="table__checkbox"
                prop:checked=move || checked.get()
                on:change=move |ev| {
                    let checked = event_target_checked(&ev);
                    on_change.run((item_id.clone(), checked));
                }
            />
        </TableCell>
    }
}
