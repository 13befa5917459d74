//! Общая страница списка: заголовок, поиск, пагинация, таблица с выбором строк,
//! модальная форма, импорт и экспорт. Конкретная страница описывает только
//! колонки, поля формы и поля поиска через [`EntityPage`].

pub mod fields;
pub mod form_modal;

use contracts::shared::entity::ListEntity;
use contracts::shared::list::SortDirection;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlInputElement;

use crate::shared::api_error::ApiError;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::table::{SortableHeaderCell, TableCellCheckbox, TableHeaderCheckbox};
use crate::shared::config::SEARCH_DEBOUNCE_MS;
use crate::shared::export::{download_bytes, download_text, export_filename, CsvExportable};
use crate::shared::icons::icon;
use crate::shared::list_controller::ops::{self, ExportOutcome, ImportSummary};
use crate::shared::list_controller::{
    ExportFormat, ImportFile, ListController, LoadStatus, RestCollectionApi, SubmitRejected,
};
use crate::shared::list_utils::{SearchFieldOption, SearchInput};
use crate::system::auth::context::{do_logout, use_auth};
use crate::system::auth::session::BrowserSession;

pub use fields::{or_dash, Column, FieldKind, FormField};

/// Настройка страницы списка для одного типа записей
pub trait EntityPage: 'static {
    type Entity: ListEntity + CsvExportable;

    /// Заголовок страницы, например "Customers"
    const TITLE: &'static str;
    /// Название одной записи в заголовке формы
    const SINGULAR: &'static str;

    fn columns() -> Vec<Column<Self::Entity>>;

    fn form_fields() -> Vec<FormField>;

    /// Поля для выбора в строке поиска (кроме "all")
    fn search_fields() -> Vec<SearchFieldOption> {
        Vec::new()
    }

    /// Сортировка при открытии страницы
    fn default_sort() -> Option<(&'static str, SortDirection)> {
        None
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Notice {
    Info(String),
    Warning(String),
    Error(String),
}

fn browser_confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

fn api<E: ListEntity>() -> RestCollectionApi<E> {
    RestCollectionApi::new()
}

/// Читает выбранный пользователем файл целиком
async fn read_picked_file(input: &HtmlInputElement) -> Result<Option<ImportFile>, String> {
    let Some(file) = input.files().and_then(|files| files.get(0)) else {
        return Ok(None);
    };
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("Failed to read file: {:?}", e))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(Some(ImportFile {
        name: file.name(),
        content_type: file.type_(),
        bytes,
    }))
}

/// Ключ строки таблицы: id плюс содержимое, чтобы изменённая на сервере
/// запись перерисовывалась после перечитывания списка
fn row_key<E: ListEntity>(item: &E) -> String {
    format!("{}:{:?}", item.entity_id(), item)
}

/// Страница списка для `P`
pub fn list_page<P: EntityPage>() -> impl IntoView {
    let mut initial = ListController::<P::Entity>::default();
    if let Some((field, direction)) = P::default_sort() {
        initial = initial.with_sort(field, direction);
    }
    let ctrl = RwSignal::new(initial);
    let notice: RwSignal<Option<Notice>> = RwSignal::new(None);
    let import_summary: RwSignal<Option<ImportSummary>> = RwSignal::new(None);
    let busy = RwSignal::new(false);
    let (_, set_auth_state) = use_auth();

    // Ошибка авторизации возвращает на страницу входа; остальные показываются один раз
    let report = move |err: ApiError| {
        if err.is_auth() {
            log::info!("{}: session ended: {}", P::Entity::RESOURCE, err);
            do_logout(set_auth_state);
        } else {
            notice.set(Some(Notice::Error(err.to_string())));
        }
    };
    // ошибка загрузки уже видна в состоянии таблицы
    let report_fetch = move |err: Option<ApiError>| {
        if let Some(err) = err.filter(ApiError::is_auth) {
            report(err);
        }
    };

    let load = move || {
        spawn_local(async move {
            report_fetch(ops::fetch_page(&ctrl, &api::<P::Entity>(), &BrowserSession).await.err());
        });
    };

    Effect::new(move |_| load());

    let on_search_input = Callback::new(move |(text, field): (String, String)| {
        spawn_local(async move {
            let delay = TimeoutFuture::new(SEARCH_DEBOUNCE_MS);
            report_fetch(
                ops::apply_filter(&ctrl, &api::<P::Entity>(), &BrowserSession, &text, &field, delay)
                    .await
                    .err(),
            );
        });
    });
    let on_search_submit = Callback::new(move |(text, field): (String, String)| {
        spawn_local(async move {
            report_fetch(
                ops::apply_filter_now(&ctrl, &api::<P::Entity>(), &BrowserSession, &text, &field)
                    .await
                    .err(),
            );
        });
    });
    let on_page_change = Callback::new(move |page: usize| {
        spawn_local(async move {
            report_fetch(ops::go_to_page(&ctrl, &api::<P::Entity>(), &BrowserSession, page).await.err());
        });
    });
    let on_page_size_change = Callback::new(move |size: usize| {
        spawn_local(async move {
            report_fetch(
                ops::change_page_size(&ctrl, &api::<P::Entity>(), &BrowserSession, size)
                    .await
                    .err(),
            );
        });
    });
    let on_sort = Callback::new(move |field: String| {
        spawn_local(async move {
            report_fetch(ops::change_sort(&ctrl, &api::<P::Entity>(), &BrowserSession, &field).await.err());
        });
    });

    let on_edit = move |id: String| {
        spawn_local(async move {
            if let Err(err) = ops::load_for_edit(&ctrl, &api::<P::Entity>(), &BrowserSession, &id).await {
                report(err);
            }
        });
    };
    let on_delete = move |id: String| {
        spawn_local(async move {
            match ops::delete_one(&ctrl, &api::<P::Entity>(), &BrowserSession, &id, browser_confirm).await {
                Ok(true) => notice.set(Some(Notice::Info(format!("{} deleted", P::SINGULAR)))),
                Ok(false) => {}
                Err(err) => report(err),
            }
        });
    };
    let on_delete_selected = move |_| {
        let ids = ctrl.with_untracked(|c| c.selected_ids());
        spawn_local(async move {
            let count = ids.len();
            match ops::delete_many(&ctrl, &api::<P::Entity>(), &BrowserSession, ids, browser_confirm).await {
                Ok(true) => notice.set(Some(Notice::Info(format!("Deleted {} records", count)))),
                Ok(false) => {}
                Err(err) => report(err),
            }
        });
    };

    let on_submit = Callback::new(move |_| {
        spawn_local(async move {
            match ops::submit_form(&ctrl, &api::<P::Entity>(), &BrowserSession).await {
                Ok(()) => notice.set(Some(Notice::Info(format!("{} saved", P::SINGULAR)))),
                Err(SubmitRejected::Api(err)) if err.is_auth() => report(err),
                // ошибки полей и формы отображаются в самой форме
                Err(_) => {}
            }
        });
    });

    let file_input = NodeRef::<leptos::html::Input>::new();
    let on_file_picked = move |_| {
        let Some(input) = file_input.get_untracked() else {
            return;
        };
        busy.set(true);
        spawn_local(async move {
            match read_picked_file(&input).await {
                Ok(Some(file)) => {
                    match ops::import_file(&ctrl, &api::<P::Entity>(), &BrowserSession, &file).await {
                        Ok(summary) => import_summary.set(Some(summary)),
                        Err(err) => report(err),
                    }
                }
                Ok(None) => {}
                Err(message) => notice.set(Some(Notice::Error(message))),
            }
            // тот же файл можно выбрать повторно
            input.set_value("");
            busy.set(false);
        });
    };

    let on_export = move |format: ExportFormat| {
        busy.set(true);
        spawn_local(async move {
            let resource = P::Entity::RESOURCE;
            match ops::export_current_view(&ctrl, &api::<P::Entity>(), &BrowserSession, format).await {
                Ok(ExportOutcome::Server { bytes, format }) => {
                    let name = export_filename(resource, format.as_str());
                    if let Err(e) = download_bytes(&bytes, &name, format.content_type()) {
                        notice.set(Some(Notice::Error(e)));
                    }
                }
                Ok(ExportOutcome::Fallback(export)) => {
                    let name = export_filename(resource, ExportFormat::Csv.as_str());
                    match download_text(&export.content, &name, ExportFormat::Csv.content_type()) {
                        Ok(()) => notice.set(Some(Notice::Warning(export.notice()))),
                        Err(e) => notice.set(Some(Notice::Error(e))),
                    }
                }
                Err(err) => report(err),
            }
            busy.set(false);
        });
    };

    let page_ids = Signal::derive(move || {
        ctrl.with(|c| c.items().iter().map(|e| e.entity_id().to_string()).collect::<Vec<_>>())
    });
    let selected = Signal::derive(move || ctrl.with(|c| c.selected_ids()));
    let selected_count = move || selected.get().len();
    let sort_field = Signal::derive(move || ctrl.with(|c| c.sort_field().map(str::to_string)));
    let sort_direction = Signal::derive(move || ctrl.with(|c| c.sort_direction()));
    let loading = move || ctrl.with(|c| c.is_loading());
    // форма пересоздаётся только при открытии; поля обновляются через prop:value
    let form_open = Memo::new(move |_| ctrl.with(|c| c.form().is_open()));

    let header_cells = P::columns()
        .into_iter()
        .map(|column| match column.sort_field {
            Some(field) => view! {
                <SortableHeaderCell
                    label=column.label
                    sort_field=field
                    current_sort_field=sort_field
                    sort_direction=sort_direction
                    on_sort=on_sort
                    min_width=column.min_width
                />
            }
            .into_any(),
            None => view! {
                <TableHeaderCell resizable=false min_width=column.min_width>{column.label}</TableHeaderCell>
            }
            .into_any(),
        })
        .collect_view();

    let status_row = move || {
        let colspan = (P::columns().len() + 2).to_string();
        let message = ctrl.with(|c| match c.status() {
            LoadStatus::Failed(e) | LoadStatus::Unauthorized(e) => Some(e.clone()),
            LoadStatus::Ready if c.items().is_empty() => Some("No records found".to_string()),
            _ => None,
        });
        message.map(|m| view! {
            <tr><td colspan=colspan class="table__empty">{m}</td></tr>
        })
    };

    view! {
        <div class="page">
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">{P::TITLE}</h1>
                    <Badge>{move || ctrl.with(|c| c.pagination().total_records.to_string())}</Badge>
                </div>
                <div class="page__header-right">
                    <Show when=move || selected_count() != 0>
                        <Button appearance=ButtonAppearance::Secondary on_click=on_delete_selected>
                            {icon("trash")}
                            {move || format!(" Delete selected ({})", selected_count())}
                        </Button>
                    </Show>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| on_export(ExportFormat::Csv)
                        disabled=Signal::derive(move || busy.get())
                    >
                        {icon("download")}
                        " CSV"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| on_export(ExportFormat::Xlsx)
                        disabled=Signal::derive(move || busy.get())
                    >
                        {icon("download")}
                        " Excel"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| {
                            if let Some(input) = file_input.get_untracked() {
                                input.click();
                            }
                        }
                        disabled=Signal::derive(move || busy.get())
                    >
                        {icon("upload")}
                        " Import"
                    </Button>
                    <input
                        node_ref=file_input
                        type="file"
                        accept=".csv,.xlsx,.xls"
                        style="display: none;"
                        on:change=on_file_picked
                    />
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| load()
                        disabled=Signal::derive(loading)
                    >
                        {icon("refresh")}
                        {move || if loading() { " Loading..." } else { " Refresh" }}
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| ctrl.update(|c| c.open_create())
                    >
                        {icon("plus")}
                        {format!(" New {}", P::SINGULAR)}
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || notice.get().map(|n| {
                    let (class, text) = match n {
                        Notice::Info(t) => ("alert alert--info", t),
                        Notice::Warning(t) => ("alert alert--warning", t),
                        Notice::Error(t) => ("alert alert--error", t),
                    };
                    view! {
                        <div class=class>
                            {text}
                            <button class="alert__close" on:click=move |_| notice.set(None)>{icon("x")}</button>
                        </div>
                    }
                })}

                {move || import_summary.get().map(|summary| {
                    let class = if summary.failed_count == 0 { "alert alert--info" } else { "alert alert--warning" };
                    view! {
                    <div class=class>
                        <strong>{summary.message()}</strong>
                        <ul class="import-errors">
                            {summary.row_messages().into_iter().map(|m| view! { <li>{m}</li> }).collect_view()}
                        </ul>
                        <button class="alert__close" on:click=move |_| import_summary.set(None)>{icon("x")}</button>
                    </div>
                    }
                })}

                <div class="filter-panel">
                    <div class="filter-panel-header">
                        <div class="filter-panel-header__left">
                            <SearchInput
                                applied=Signal::derive(move || ctrl.with(|c| c.search_text().to_string()))
                                on_input=on_search_input
                                on_submit=on_search_submit
                                fields=P::search_fields()
                            />
                        </div>
                        <div class="filter-panel-header__right">
                            <PaginationControls
                                current_page=Signal::derive(move || ctrl.with(|c| c.page()))
                                pagination=Signal::derive(move || ctrl.with(|c| c.pagination()))
                                page_size=Signal::derive(move || ctrl.with(|c| c.page_size()))
                                on_page_change=on_page_change
                                on_page_size_change=on_page_size_change
                            />
                        </div>
                    </div>
                </div>

                <div class="table-wrapper">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCheckbox
                                    page_ids=page_ids
                                    selected=selected
                                    on_change=Callback::new(move |checked| ctrl.update(|c| c.toggle_select_all(checked)))
                                />
                                {header_cells}
                                <TableHeaderCell resizable=false min_width=90.0></TableHeaderCell>
                            </TableRow>
                        </TableHeader>

                        <TableBody>
                            {status_row}
                            <For
                                each=move || ctrl.with(|c| c.items().to_vec())
                                key=|item: &P::Entity| row_key(item)
                                children=move |item: P::Entity| {
                                    let id = item.entity_id().to_string();
                                    let id_for_check = id.clone();
                                    let id_for_edit = id.clone();
                                    let id_for_delete = id.clone();
                                    let cells = P::columns()
                                        .into_iter()
                                        .map(|column| {
                                            let text = (column.render)(&item);
                                            view! {
                                                <TableCell>
                                                    <TableCellLayout truncate=true>{text}</TableCellLayout>
                                                </TableCell>
                                            }
                                        })
                                        .collect_view();
                                    view! {
                                        <TableRow>
                                            <TableCellCheckbox
                                                item_id=id
                                                checked=Signal::derive(move || ctrl.with(|c| c.is_selected(&id_for_check)))
                                                on_change=Callback::new(move |(id, checked): (String, bool)| {
                                                    ctrl.update(|c| c.set_selected(&id, checked))
                                                })
                                            />
                                            {cells}
                                            <TableCell>
                                                <Button
                                                    appearance=ButtonAppearance::Subtle
                                                    on_click=move |_| on_edit(id_for_edit.clone())
                                                    attr:title="Edit"
                                                >
                                                    {icon("edit")}
                                                </Button>
                                                <Button
                                                    appearance=ButtonAppearance::Subtle
                                                    on_click=move |_| on_delete(id_for_delete.clone())
                                                    attr:title="Delete"
                                                >
                                                    {icon("trash")}
                                                </Button>
                                            </TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>
                </div>

                <Show when=move || form_open.get()>
                    {form_modal::form_modal::<P>(ctrl, on_submit)}
                </Show>
            </div>
        </div>
    }
}
