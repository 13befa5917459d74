//! Сортируемая ячейка заголовка таблицы
//!
//! ```rust,ignore
//! <SortableHeaderCell
//!     label="Name"
//!     sort_field="name"
//!     current_sort_field=Signal::derive(move || ctrl.with(|c| c.sort_field().map(str::to_string)))
//!     sort_direction=Signal::derive(move || ctrl.with(|c| c.sort_direction()))
//!     on_sort=Callback::new(move |field| change_sort(field))
//! />
//! ```

use contracts::shared::list::SortDirection;
use leptos::prelude::*;
use thaw::*;

use crate::shared::list_utils::{get_sort_class, get_sort_indicator};

#[component]
pub fn SortableHeaderCell(
    #[prop(into)]
    label: String,

    /// Поле сортировки на сервере
    #[prop(into)]
    sort_field: String,

    #[prop(into)]
    current_sort_field: Signal<Option<String>>,

    #[prop(into)]
    sort_direction: Signal<SortDirection>,

    on_sort: Callback<String>,

    #[prop(optional, default = 100.0)]
    min_width: f64,
) -> impl IntoView {
    let sort_field_for_click = sort_field.clone();
    let sort_field_for_indicator = sort_field.clone();

    view! {
        <TableHeaderCell resizable=false min_width=min_width>
            <div
                class="table__sortable-header"
                style="cursor: pointer; padding-right: 12px;"
                on:click=move |_| on_sort.run(sort_field_for_click.clone())
            >
                {label}
                <span class=move || get_sort_class(current_sort_field.get().as_deref(), &sort_field)>
                    {move || {
                        get_sort_indicator(
                            current_sort_field.get().as_deref(),
                            &sort_field_for_indicator,
                            sort_direction.get(),
                        )
                    }}
                </span>
            </div>
        </TableHeaderCell>
    }
}
