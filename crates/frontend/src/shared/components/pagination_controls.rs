use contracts::shared::list::{Pagination, PAGE_SIZE_OPTIONS};
use leptos::prelude::*;

use crate::shared::icons::icon;

/// Текст вида "11–20 of 250"
pub fn range_label(pagination: &Pagination) -> String {
    if pagination.total_records == 0 {
        return "No records".to_string();
    }
    format!(
        "{}–{} of {}",
        pagination.start_record, pagination.end_record, pagination.total_records
    )
}

/// PaginationControls component - reusable pagination controls
#[component]
pub fn PaginationControls(
    /// Current page (1-based)
    #[prop(into)]
    current_page: Signal<usize>,

    /// Server pagination block
    #[prop(into)]
    pagination: Signal<Pagination>,

    /// Current page size
    #[prop(into)]
    page_size: Signal<usize>,

    /// Callback when page changes
    on_page_change: Callback<usize>,

    /// Callback when page size changes
    on_page_size_change: Callback<usize>,
) -> impl IntoView {
    let total_pages = move || pagination.get().total_pages;
    let on_first = move || current_page.get() <= 1;
    let on_last = move || current_page.get() >= total_pages();

    view! {
        <div class="pagination-controls">
            <span class="pagination-info">{move || range_label(&pagination.get())}</span>
            <button
                class="pagination-btn"
                on:click=move |_| on_page_change.run(1)
                disabled=on_first
                title="First page"
            >
                {icon("chevrons-left")}
            </button>
            <button
                class="pagination-btn"
                on:click=move |_| on_page_change.run(current_page.get().saturating_sub(1))
                disabled=on_first
                title="Previous page"
            >
                {icon("chevron-left")}
            </button>
            <span class="pagination-info">
                {move || format!("{} / {}", current_page.get(), total_pages().max(1))}
            </span>
            <button
                class="pagination-btn"
                on:click=move |_| on_page_change.run(current_page.get() + 1)
                disabled=on_last
                title="Next page"
            >
                {icon("chevron-right")}
            </button>
            <button
                class="pagination-btn"
                on:click=move |_| on_page_change.run(total_pages())
                disabled=on_last
                title="Last page"
            >
                {icon("chevrons-right")}
            </button>
            <select
                class="page-size-select"
                on:change=move |ev| {
                    if let Ok(size) = event_target_value(&ev).parse() {
                        on_page_size_change.run(size);
                    }
                }
                prop:value=move || page_size.get().to_string()
            >
                {PAGE_SIZE_OPTIONS.iter().map(|&size| {
                    view! {
                        <option value={size.to_string()} selected=move || page_size.get() == size>
                            {format!("{} / page", size)}
                        </option>
                    }
                }).collect_view()}
            </select>
        </div>
    }
}
