/// Утилиты для списков: индикаторы сортировки и строка поиска
use contracts::shared::list::{SortDirection, SEARCH_ALL_FIELDS};
use leptos::prelude::*;

/// Поле, доступное для поиска: (техническое имя, подпись)
pub type SearchFieldOption = (&'static str, &'static str);

/// Получить индикатор сортировки для заголовка
pub fn get_sort_indicator(current_field: Option<&str>, field: &str, direction: SortDirection) -> &'static str {
    if current_field == Some(field) {
        if direction.is_ascending() { " ▲" } else { " ▼" }
    } else {
        " ⇅"
    }
}

/// CSS-класс индикатора: активная колонка подсвечивается
pub fn get_sort_class(current_field: Option<&str>, field: &str) -> &'static str {
    if current_field == Some(field) {
        "table__sort-indicator table__sort-indicator--active"
    } else {
        "table__sort-indicator"
    }
}

/// Строка поиска с выбором поля.
///
/// Каждое изменение текста уходит в `on_input` (задержку держит контроллер),
/// Enter и смена поля применяются сразу через `on_submit`.
#[component]
pub fn SearchInput(
    /// Применённый фильтр (для подсветки)
    #[prop(into)]
    applied: Signal<String>,
    on_input: Callback<(String, String)>,
    on_submit: Callback<(String, String)>,
    /// Поля поиска; "all" добавляется автоматически
    #[prop(optional)]
    fields: Vec<SearchFieldOption>,
    #[prop(optional, into)]
    placeholder: String,
) -> impl IntoView {
    let placeholder = if placeholder.is_empty() {
        "Search...".to_string()
    } else {
        placeholder
    };

    let text = RwSignal::new(String::new());
    let field = RwSignal::new(SEARCH_ALL_FIELDS.to_string());
    let has_fields = !fields.is_empty();

    let is_filter_active = move || !applied.get().is_empty();

    let clear_filter = move |_| {
        text.set(String::new());
        on_submit.run((String::new(), field.get_untracked()));
    };

    view! {
        <div class="search-input" style="position: relative; display: inline-flex; align-items: center; gap: 6px;">
            {has_fields.then(|| view! {
                <select
                    class="search-input__field"
                    prop:value=move || field.get()
                    on:change=move |ev| {
                        field.set(event_target_value(&ev));
                        on_submit.run((text.get_untracked(), field.get_untracked()));
                    }
                >
                    <option value=SEARCH_ALL_FIELDS>"All fields"</option>
                    {fields.iter().map(|(name, label)| view! {
                        <option value=*name>{*label}</option>
                    }).collect_view()}
                </select>
            })}
            <input
                type="text"
                placeholder=placeholder
                style=move || format!(
                    "width: 250px; padding: 6px 32px 6px 10px; border: 1px solid #ddd; border-radius: 4px; font-size: 15px; background: {};",
                    if is_filter_active() { "#fffbea" } else { "white" }
                )
                prop:value=move || text.get()
                on:input=move |ev| {
                    let val = event_target_value(&ev);
                    text.set(val.clone());
                    on_input.run((val, field.get_untracked()));
                }
                on:keydown=move |ev: leptos::ev::KeyboardEvent| {
                    if ev.key() == "Enter" {
                        on_submit.run((text.get_untracked(), field.get_untracked()));
                    }
                }
            />
            {move || if !text.get().is_empty() {
                view! {
                    <button
                        style="position: absolute; right: 6px; background: none; border: none; cursor: pointer; padding: 4px; display: inline-flex; align-items: center; color: #666; line-height: 1;"
                        on:click=clear_filter
                        title="Clear"
                    >
                        {crate::shared::icons::icon("x")}
                    </button>
                }.into_any()
            } else {
                view! { <></> }.into_any()
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_indicator() {
        assert_eq!(get_sort_indicator(Some("name"), "name", SortDirection::Asc), " ▲");
        assert_eq!(get_sort_indicator(Some("name"), "name", SortDirection::Desc), " ▼");
        assert_eq!(get_sort_indicator(Some("email"), "name", SortDirection::Asc), " ⇅");
        assert_eq!(get_sort_indicator(None, "name", SortDirection::Asc), " ⇅");
    }

    #[test]
    fn test_sort_class() {
        assert!(get_sort_class(Some("name"), "name").ends_with("--active"));
        assert_eq!(get_sort_class(None, "name"), "table__sort-indicator");
    }
}
