//! Контроллер постраничного списка с поиском, сортировкой, выбором строк
//! и модальной формой создания / редактирования.
//!
//! Сам контроллер синхронный: каждая операция с сервером разбита на
//! `begin_*` (снимок параметров) и `finish_*` (применение ответа). Асинхронная
//! часть живёт в [`ops`] и работает через [`ControllerHandle`], поэтому одна и та
//! же логика используется и в `RwSignal` на странице, и в `RefCell` в тестах.

pub mod api;
pub mod form;
pub mod handle;
pub mod ops;

#[cfg(test)]
pub(crate) mod fake;

use std::collections::BTreeSet;

use contracts::shared::entity::ListEntity;
use contracts::shared::list::{
    is_valid_page_size, ListQuery, ListResponse, Pagination, SortDirection, DEFAULT_PAGE_SIZE,
    SEARCH_ALL_FIELDS,
};

use crate::shared::api_error::ApiError;
use crate::shared::export::{build_csv, CsvExportable};

pub use api::{CollectionApi, ExportFormat, ImportFile, RestCollectionApi};
pub use form::{FormSession, ModalForm, SubmitRejected, SubmitTicket};
pub use handle::ControllerHandle;

/// Состояние загрузки страницы
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    /// Нет токена или сервер его отклонил
    Unauthorized(String),
    Failed(String),
}

/// Снимок запроса страницы с номером поколения
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: ListQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// Ответ на устаревший запрос, состояние не тронуто
    Stale,
    Failed,
    /// Текущая страница исчезла (например, после удаления); номер страницы
    /// уже исправлен, нужен повторный запрос
    PageOutOfRange,
}

/// Отложенный (debounce) фильтр
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterTicket {
    generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingFilter {
    generation: u64,
    text: String,
    field: String,
}

/// Локальная выгрузка видимых строк, когда серверный экспорт недоступен
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackExport {
    /// CSV с BOM
    pub content: String,
    pub rows: usize,
    pub total_records: usize,
}

impl FallbackExport {
    pub fn notice(&self) -> String {
        format!(
            "Server export is unavailable. The file contains only the {} loaded rows out of {} matching records.",
            self.rows,
            self.total_records.max(self.rows)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListController<E: ListEntity> {
    items: Vec<E>,
    pagination: Pagination,
    page: usize,
    page_size: usize,
    search_text: String,
    search_field: String,
    sort_field: Option<String>,
    sort_direction: SortDirection,
    selection: BTreeSet<String>,
    status: LoadStatus,
    form: ModalForm<E::Draft>,
    fetch_generation: u64,
    filter_generation: u64,
    pending_filter: Option<PendingFilter>,
}

impl<E: ListEntity> Default for ListController<E> {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl<E: ListEntity> ListController<E> {
    pub fn new(page_size: usize) -> Self {
        let page_size = if is_valid_page_size(page_size) {
            page_size
        } else {
            DEFAULT_PAGE_SIZE
        };
        Self {
            items: Vec::new(),
            pagination: Pagination::default(),
            page: 1,
            page_size,
            search_text: String::new(),
            search_field: SEARCH_ALL_FIELDS.to_string(),
            sort_field: None,
            sort_direction: SortDirection::Asc,
            selection: BTreeSet::new(),
            status: LoadStatus::Idle,
            form: ModalForm::default(),
            fetch_generation: 0,
            filter_generation: 0,
            pending_filter: None,
        }
    }

    /// Начальная сортировка страницы
    pub fn with_sort(mut self, field: &str, direction: SortDirection) -> Self {
        self.sort_field = Some(field.to_string());
        self.sort_direction = direction;
        self
    }

    // ------------------------------------------------------------------
    // Чтение состояния
    // ------------------------------------------------------------------

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn search_field(&self) -> &str {
        &self.search_field
    }

    pub fn sort_field(&self) -> Option<&str> {
        self.sort_field.as_deref()
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    pub fn form(&self) -> &ModalForm<E::Draft> {
        &self.form
    }

    pub fn query(&self) -> ListQuery {
        ListQuery {
            page: self.page,
            page_size: self.page_size,
            search: self.search_text.clone(),
            search_field: self.search_field.clone(),
            sort_field: self.sort_field.clone(),
            sort_direction: self.sort_direction,
        }
    }

    // ------------------------------------------------------------------
    // Загрузка страницы
    // ------------------------------------------------------------------

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.fetch_generation += 1;
        self.status = LoadStatus::Loading;
        FetchTicket {
            generation: self.fetch_generation,
            query: self.query(),
        }
    }

    /// Применяет ответ `list`. Ответы на устаревшие запросы отбрасываются.
    pub fn finish_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: Result<ListResponse<E>, ApiError>,
    ) -> FetchOutcome {
        if ticket.generation != self.fetch_generation {
            return FetchOutcome::Stale;
        }

        match result {
            Ok(response) => {
                let total_pages = response.pagination.total_pages;
                if response.data.is_empty() && self.page > 1 && total_pages < self.page {
                    self.page = total_pages.max(1);
                    return FetchOutcome::PageOutOfRange;
                }
                self.items = response.data;
                self.pagination = response.pagination;
                self.reconcile_selection();
                self.status = LoadStatus::Ready;
                FetchOutcome::Applied
            }
            Err(err) => {
                self.items.clear();
                self.pagination = Pagination::default();
                self.selection.clear();
                self.status = if err.is_auth() {
                    LoadStatus::Unauthorized(err.to_string())
                } else {
                    LoadStatus::Failed(err.to_string())
                };
                FetchOutcome::Failed
            }
        }
    }

    pub fn mark_unauthorized(&mut self, err: &ApiError) {
        if err.is_auth() {
            self.status = LoadStatus::Unauthorized(err.to_string());
        }
    }

    // ------------------------------------------------------------------
    // Фильтр, страницы, сортировка
    // ------------------------------------------------------------------

    /// Запоминает новый фильтр; применится только последний из серии
    pub fn queue_filter(&mut self, text: &str, field: &str) -> FilterTicket {
        self.filter_generation += 1;
        self.pending_filter = Some(PendingFilter {
            generation: self.filter_generation,
            text: text.trim().to_string(),
            field: normalize_search_field(field),
        });
        FilterTicket {
            generation: self.filter_generation,
        }
    }

    /// Вызывается по истечении задержки. true, если фильтр изменился и нужен запрос.
    pub fn settle_filter(&mut self, ticket: FilterTicket) -> bool {
        match &self.pending_filter {
            Some(pending) if pending.generation == ticket.generation => {}
            _ => return false,
        }
        let Some(pending) = self.pending_filter.take() else {
            return false;
        };
        self.set_filter(pending.text, pending.field)
    }

    /// Немедленное применение (Enter, кнопка сброса)
    pub fn apply_filter_now(&mut self, text: &str, field: &str) -> bool {
        self.filter_generation += 1;
        self.pending_filter = None;
        self.set_filter(text.trim().to_string(), normalize_search_field(field))
    }

    fn set_filter(&mut self, text: String, field: String) -> bool {
        if text == self.search_text && field == self.search_field {
            return false;
        }
        self.search_text = text;
        self.search_field = field;
        self.page = 1;
        true
    }

    pub fn change_page_size(&mut self, size: usize) -> bool {
        if !is_valid_page_size(size) {
            log::warn!("page size {} is not one of the allowed options", size);
            return false;
        }
        self.page_size = size;
        self.page = 1;
        true
    }

    /// Переход на страницу `n` (с 1); вне диапазона ничего не делает
    pub fn go_to_page(&mut self, n: usize) -> bool {
        if n < 1 || n > self.pagination.total_pages {
            return false;
        }
        self.page = n;
        true
    }

    /// Клик по заголовку колонки: то же поле меняет направление, новое сортируется по возрастанию
    pub fn change_sort(&mut self, field: &str) -> bool {
        if self.sort_field.as_deref() == Some(field) {
            self.sort_direction = self.sort_direction.toggled();
        } else {
            self.sort_field = Some(field.to_string());
            self.sort_direction = SortDirection::Asc;
        }
        self.page = 1;
        true
    }

    // ------------------------------------------------------------------
    // Выбор строк (только текущая страница)
    // ------------------------------------------------------------------

    fn contains_item(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.entity_id() == id)
    }

    fn reconcile_selection(&mut self) {
        let items = &self.items;
        self.selection
            .retain(|id| items.iter().any(|item| item.entity_id() == id));
    }

    pub fn toggle_selection(&mut self, id: &str) {
        if !self.selection.remove(id) && self.contains_item(id) {
            self.selection.insert(id.to_string());
        }
    }

    pub fn set_selected(&mut self, id: &str, checked: bool) {
        if checked {
            if self.contains_item(id) {
                self.selection.insert(id.to_string());
            }
        } else {
            self.selection.remove(id);
        }
    }

    /// Выбирает ровно строки текущей страницы (или снимает выбор)
    pub fn toggle_select_all(&mut self, checked: bool) {
        self.selection.clear();
        if checked {
            self.selection = self
                .items
                .iter()
                .map(|item| item.entity_id().to_string())
                .collect();
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id) && self.contains_item(id)
    }

    /// Выбранные id, присутствующие в загруженной странице
    pub fn selected_ids(&self) -> Vec<String> {
        self.selection
            .iter()
            .filter(|id| self.contains_item(id))
            .cloned()
            .collect()
    }

    // ------------------------------------------------------------------
    // Удаление
    // ------------------------------------------------------------------

    pub fn finish_delete(&mut self, id: &str) {
        self.selection.remove(id);
    }

    pub fn finish_delete_many(&mut self) {
        self.selection.clear();
    }

    // ------------------------------------------------------------------
    // Модальная форма
    // ------------------------------------------------------------------

    pub fn open_create(&mut self) {
        self.form.open_create();
    }

    pub fn open_edit(&mut self, entity: &E) {
        self.form
            .open_edit(entity.entity_id().to_string(), entity.to_draft());
    }

    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        self.form.set_field(name, value)
    }

    pub fn cancel_form(&mut self) {
        self.form.cancel();
    }

    pub fn begin_submit(&mut self) -> Result<SubmitTicket<E::Draft>, SubmitRejected> {
        self.form.begin_submit()
    }

    pub fn finish_submit(
        &mut self,
        ticket: &SubmitTicket<E::Draft>,
        result: &Result<(), ApiError>,
    ) -> bool {
        if let Err(err) = result {
            self.mark_unauthorized(err);
        }
        self.form.finish_submit(ticket, result)
    }

    // ------------------------------------------------------------------
    // Экспорт видимых строк
    // ------------------------------------------------------------------

    pub fn fallback_export(&self) -> FallbackExport
    where
        E: CsvExportable,
    {
        FallbackExport {
            content: build_csv(&self.items),
            rows: self.items.len(),
            total_records: self.pagination.total_records,
        }
    }
}

fn normalize_search_field(field: &str) -> String {
    let field = field.trim();
    if field.is_empty() {
        SEARCH_ALL_FIELDS.to_string()
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::fake::{customer, page_of};
    use super::*;
    use contracts::domain::a001_customer::Customer;

    fn loaded(ids: &[&str], total_records: usize) -> ListController<Customer> {
        let mut ctrl = ListController::<Customer>::default();
        let ticket = ctrl.begin_fetch();
        let items = ids.iter().map(|id| customer(id, "Name")).collect();
        ctrl.finish_fetch(&ticket, Ok(page_of(items, 1, 10, total_records)));
        ctrl
    }

    #[test]
    fn test_go_to_page_out_of_range_is_noop() {
        let mut ctrl = loaded(&["1", "2"], 25);
        assert_eq!(ctrl.pagination().total_pages, 3);
        let before = ctrl.clone();

        assert!(!ctrl.go_to_page(0));
        assert!(!ctrl.go_to_page(4));
        assert_eq!(ctrl, before);

        assert!(ctrl.go_to_page(3));
        assert_eq!(ctrl.page(), 3);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut ctrl = ListController::<Customer>::default();
        let slow = ctrl.begin_fetch();
        ctrl.apply_filter_now("acme", "all");
        let fast = ctrl.begin_fetch();

        let fresh = page_of(vec![customer("2", "Acme")], 1, 10, 1);
        assert_eq!(ctrl.finish_fetch(&fast, Ok(fresh)), FetchOutcome::Applied);

        let old = page_of(vec![customer("1", "Old")], 1, 10, 1);
        assert_eq!(ctrl.finish_fetch(&slow, Ok(old)), FetchOutcome::Stale);
        assert_eq!(ctrl.items()[0].id, "2");
    }

    #[test]
    fn test_fetch_failure_clears_items_and_pagination() {
        let mut ctrl = loaded(&["1", "2"], 2);
        ctrl.toggle_select_all(true);

        let ticket = ctrl.begin_fetch();
        let outcome = ctrl.finish_fetch(&ticket, Err(ApiError::generic("offline")));
        assert_eq!(outcome, FetchOutcome::Failed);
        assert!(ctrl.items().is_empty());
        assert_eq!(ctrl.pagination(), Pagination::default());
        assert!(ctrl.selected_ids().is_empty());
        assert_eq!(ctrl.status(), &LoadStatus::Failed("offline".into()));
    }

    #[test]
    fn test_select_all_is_page_scoped() {
        let mut ctrl = loaded(&["1", "2", "3"], 30);
        ctrl.toggle_select_all(true);
        assert_eq!(ctrl.selected_ids(), vec!["1", "2", "3"]);

        assert!(ctrl.go_to_page(2));
        let ticket = ctrl.begin_fetch();
        let next = vec![customer("3", "Kept"), customer("4", "New")];
        ctrl.finish_fetch(&ticket, Ok(page_of(next, 2, 10, 30)));
        assert_eq!(ctrl.selected_ids(), vec!["3"]);
        assert!(!ctrl.is_selected("1"));
    }

    #[test]
    fn test_selection_ignores_unknown_ids() {
        let mut ctrl = loaded(&["1"], 1);
        ctrl.toggle_selection("42");
        ctrl.set_selected("43", true);
        assert!(ctrl.selected_ids().is_empty());

        ctrl.toggle_selection("1");
        assert!(ctrl.is_selected("1"));
        ctrl.toggle_selection("1");
        assert!(!ctrl.is_selected("1"));
    }

    #[test]
    fn test_debounced_filter_only_last_value_wins() {
        let mut ctrl = loaded(&["1"], 1);
        assert!(ctrl.go_to_page(1));

        let first = ctrl.queue_filter("ac", "all");
        let second = ctrl.queue_filter("acme ", "name");
        assert!(!ctrl.settle_filter(first));
        assert!(ctrl.settle_filter(second));
        assert_eq!(ctrl.search_text(), "acme");
        assert_eq!(ctrl.search_field(), "name");
        assert_eq!(ctrl.page(), 1);

        // same filter again: nothing to fetch
        let again = ctrl.queue_filter("acme", "name");
        assert!(!ctrl.settle_filter(again));
    }

    #[test]
    fn test_page_size_and_sort_reset_page() {
        let mut ctrl = loaded(&["1"], 40);
        assert!(ctrl.go_to_page(3));

        assert!(!ctrl.change_page_size(30));
        assert_eq!(ctrl.page(), 3);

        assert!(ctrl.change_page_size(25));
        assert_eq!((ctrl.page(), ctrl.page_size()), (1, 25));

        assert!(ctrl.go_to_page(2));
        ctrl.change_sort("name");
        assert_eq!(ctrl.page(), 1);
        assert_eq!(ctrl.query().sort_field.as_deref(), Some("name"));
        assert_eq!(ctrl.sort_direction(), SortDirection::Asc);
        ctrl.change_sort("name");
        assert_eq!(ctrl.sort_direction(), SortDirection::Desc);
        ctrl.change_sort("email");
        assert_eq!(ctrl.sort_direction(), SortDirection::Asc);
    }

    #[test]
    fn test_vanished_page_moves_back() {
        let mut ctrl = loaded(&["1"], 21);
        assert!(ctrl.go_to_page(3));
        let ticket = ctrl.begin_fetch();
        let outcome = ctrl.finish_fetch(&ticket, Ok(page_of(vec![], 3, 10, 20)));
        assert_eq!(outcome, FetchOutcome::PageOutOfRange);
        assert_eq!(ctrl.page(), 2);
    }
}
