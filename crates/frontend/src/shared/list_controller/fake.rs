//! In-memory customer collection for controller tests

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use async_trait::async_trait;
use contracts::domain::a001_customer::{Customer, CustomerDraft};
use contracts::shared::import::ImportResult;
use contracts::shared::list::{ListQuery, ListResponse, Pagination};

use super::api::{CollectionApi, ExportFormat, ImportFile};
use crate::shared::api_error::ApiError;

pub fn customer(id: &str, name: &str) -> Customer {
    Customer {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{}@example.com", id),
        phone: None,
        company: None,
        address: None,
        site_id: None,
        site_name: None,
        notes: None,
        created_at: None,
    }
}

pub fn page_of(
    items: Vec<Customer>,
    page: usize,
    page_size: usize,
    total_records: usize,
) -> ListResponse<Customer> {
    ListResponse {
        data: items,
        pagination: Pagination::compute(total_records, page, page_size),
    }
}

fn optional(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn apply_draft(target: &mut Customer, draft: &CustomerDraft) {
    target.name = draft.name.clone();
    target.email = draft.email.clone();
    target.phone = optional(&draft.phone);
    target.company = optional(&draft.company);
    target.address = optional(&draft.address);
    target.site_id = optional(&draft.site_id);
    target.notes = optional(&draft.notes);
}

#[derive(Default)]
pub struct FakeApi {
    store: RefCell<Vec<Customer>>,
    next_id: Cell<usize>,
    calls: RefCell<HashMap<&'static str, usize>>,
    next_error: RefCell<Option<ApiError>>,
    list_error: RefCell<Option<ApiError>>,
    last_query: RefCell<Option<ListQuery>>,
    import_result: RefCell<Option<Result<ImportResult, ApiError>>>,
    export_result: RefCell<Option<Result<Vec<u8>, ApiError>>>,
}

impl FakeApi {
    pub fn new(items: Vec<Customer>) -> Self {
        let api = Self::default();
        api.next_id.set(items.len());
        *api.store.borrow_mut() = items;
        api
    }

    /// `c-1 .. c-n`, named `Customer 1 .. Customer n`
    pub fn with_customers(n: usize) -> Self {
        Self::new(
            (1..=n)
                .map(|i| customer(&format!("c-{}", i), &format!("Customer {}", i)))
                .collect(),
        )
    }

    pub fn calls(&self, op: &str) -> usize {
        self.calls.borrow().get(op).copied().unwrap_or(0)
    }

    pub fn last_query(&self) -> Option<ListQuery> {
        self.last_query.borrow().clone()
    }

    /// The next call of any kind fails with `err`
    pub fn fail_next(&self, err: ApiError) {
        *self.next_error.borrow_mut() = Some(err);
    }

    /// The next `list` call fails with `err`; other calls are unaffected
    pub fn fail_next_list(&self, err: ApiError) {
        *self.list_error.borrow_mut() = Some(err);
    }

    pub fn set_import_result(&self, result: Result<ImportResult, ApiError>) {
        *self.import_result.borrow_mut() = Some(result);
    }

    pub fn set_export_result(&self, result: Result<Vec<u8>, ApiError>) {
        *self.export_result.borrow_mut() = Some(result);
    }

    /// Another client changes the collection
    pub fn remove_behind_the_scenes(&self, id: &str) {
        self.store.borrow_mut().retain(|c| c.id != id);
    }

    fn record(&self, op: &'static str) -> Result<(), ApiError> {
        *self.calls.borrow_mut().entry(op).or_insert(0) += 1;
        match self.next_error.borrow_mut().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn not_found(id: &str) -> ApiError {
        ApiError::generic(format!("Record {} not found", id))
    }
}

#[async_trait(?Send)]
impl CollectionApi<Customer> for FakeApi {
    async fn list(&self, _token: &str, query: &ListQuery) -> Result<ListResponse<Customer>, ApiError> {
        *self.last_query.borrow_mut() = Some(query.clone());
        self.record("list")?;
        if let Some(err) = self.list_error.borrow_mut().take() {
            return Err(err);
        }

        let needle = query.search.to_lowercase();
        let matching: Vec<Customer> = self
            .store
            .borrow()
            .iter()
            .filter(|c| needle.is_empty() || c.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        let total = matching.len();
        let items = matching
            .into_iter()
            .skip((query.page.max(1) - 1) * query.page_size)
            .take(query.page_size)
            .collect();
        Ok(page_of(items, query.page, query.page_size, total))
    }

    async fn get(&self, _token: &str, id: &str) -> Result<Customer, ApiError> {
        self.record("get")?;
        self.store
            .borrow()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn create(&self, _token: &str, draft: &CustomerDraft) -> Result<Customer, ApiError> {
        self.record("create")?;
        self.next_id.set(self.next_id.get() + 1);
        let mut created = customer(&format!("c-{}", self.next_id.get()), "");
        apply_draft(&mut created, draft);
        self.store.borrow_mut().push(created.clone());
        Ok(created)
    }

    async fn update(&self, _token: &str, id: &str, draft: &CustomerDraft) -> Result<Customer, ApiError> {
        self.record("update")?;
        let mut store = self.store.borrow_mut();
        let target = store
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        apply_draft(target, draft);
        Ok(target.clone())
    }

    async fn remove(&self, _token: &str, id: &str) -> Result<(), ApiError> {
        self.record("remove")?;
        self.store.borrow_mut().retain(|c| c.id != id);
        Ok(())
    }

    async fn remove_many(&self, _token: &str, ids: &[String]) -> Result<(), ApiError> {
        self.record("remove_many")?;
        self.store.borrow_mut().retain(|c| !ids.contains(&c.id));
        Ok(())
    }

    async fn import(&self, _token: &str, _file: &ImportFile) -> Result<ImportResult, ApiError> {
        self.record("import")?;
        self.import_result
            .borrow_mut()
            .take()
            .unwrap_or_else(|| Ok(ImportResult::default()))
    }

    async fn export(
        &self,
        _token: &str,
        _format: ExportFormat,
        query: &ListQuery,
    ) -> Result<Vec<u8>, ApiError> {
        *self.last_query.borrow_mut() = Some(query.clone());
        self.record("export")?;
        self.export_result
            .borrow_mut()
            .take()
            .unwrap_or_else(|| Ok(b"id,name\n".to_vec()))
    }
}
