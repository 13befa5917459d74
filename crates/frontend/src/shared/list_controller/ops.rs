//! Асинхронные операции списка
//!
//! Каждая операция: синхронный шаг контроллера -> запрос к API -> синхронное
//! применение ответа. Ошибки не повторяются автоматически и не глотаются:
//! загрузка страницы пишет ошибку в состояние, остальные возвращают её вызывающему.

use std::future::Future;

use contracts::shared::entity::{FormMode, ListEntity};
use contracts::shared::import::{ImportResult, ImportRowError};

use super::api::{CollectionApi, ExportFormat, ImportFile};
use super::form::SubmitRejected;
use super::handle::ControllerHandle;
use super::{FallbackExport, FetchOutcome};
use crate::shared::api_error::{ApiError, AuthFailure};
use crate::shared::export::CsvExportable;
use crate::system::auth::session::Session;

fn access_token<S: Session + ?Sized>(session: &S) -> Result<String, ApiError> {
    session
        .access_token()
        .ok_or(ApiError::Auth(AuthFailure::MissingCredential))
}

/// Отклонённый сервером токен удаляется из хранилища
fn forget_rejected_credential<T, S: Session + ?Sized>(session: &S, result: &Result<T, ApiError>) {
    if let Err(err) = result {
        if err.is_rejected_credential() {
            session.clear();
        }
    }
}

fn mark_unauthorized<E, H>(handle: &H, err: &ApiError)
where
    E: ListEntity,
    H: ControllerHandle<E> + ?Sized,
{
    if err.is_auth() {
        handle.mutate(|c| c.mark_unauthorized(err));
    }
}

/// Загружает текущую страницу (fetchPage)
pub async fn fetch_page<E, H, A, S>(handle: &H, api: &A, session: &S) -> Result<(), ApiError>
where
    E: ListEntity,
    H: ControllerHandle<E> + ?Sized,
    A: CollectionApi<E> + ?Sized,
    S: Session + ?Sized,
{
    // второй проход нужен, только если текущая страница исчезла
    for _ in 0..2 {
        let Some(ticket) = handle.mutate(|c| c.begin_fetch()) else {
            return Ok(());
        };
        log::debug!("{}: fetching {:?}", E::RESOURCE, ticket.query);

        let result = match access_token(session) {
            Ok(token) => api.list(&token, &ticket.query).await,
            Err(err) => Err(err),
        };
        forget_rejected_credential(session, &result);
        let error = result.as_ref().err().cloned();

        let outcome = handle.mutate(|c| c.finish_fetch(&ticket, result));
        match outcome {
            Some(FetchOutcome::PageOutOfRange) => continue,
            Some(FetchOutcome::Stale) => {
                log::debug!("{}: dropped stale response #{}", E::RESOURCE, ticket.generation);
                return Ok(());
            }
            _ => {}
        }
        return match error {
            Some(err) => {
                log::warn!("{}: failed to load page: {}", E::RESOURCE, err);
                Err(err)
            }
            None => Ok(()),
        };
    }
    Ok(())
}

/// Фильтр с задержкой; `delay` задаёт таймер debounce.
/// Возвращает true, если был выполнен запрос.
pub async fn apply_filter<E, H, A, S, D>(
    handle: &H,
    api: &A,
    session: &S,
    text: &str,
    field: &str,
    delay: D,
) -> Result<bool, ApiError>
where
    E: ListEntity,
    H: ControllerHandle<E> + ?Sized,
    A: CollectionApi<E> + ?Sized,
    S: Session + ?Sized,
    D: Future<Output = ()>,
{
    let Some(ticket) = handle.mutate(|c| c.queue_filter(text, field)) else {
        return Ok(false);
    };
    delay.await;
    if handle.mutate(|c| c.settle_filter(ticket)) != Some(true) {
        return Ok(false);
    }
    fetch_page(handle, api, session).await.map(|_| true)
}

/// Немедленное применение фильтра (Enter / сброс)
pub async fn apply_filter_now<E, H, A, S>(
    handle: &H,
    api: &A,
    session: &S,
    text: &str,
    field: &str,
) -> Result<bool, ApiError>
where
    E: ListEntity,
    H: ControllerHandle<E> + ?Sized,
    A: CollectionApi<E> + ?Sized,
    S: Session + ?Sized,
{
    if handle.mutate(|c| c.apply_filter_now(text, field)) != Some(true) {
        return Ok(false);
    }
    fetch_page(handle, api, session).await.map(|_| true)
}

pub async fn change_page_size<E, H, A, S>(
    handle: &H,
    api: &A,
    session: &S,
    size: usize,
) -> Result<bool, ApiError>
where
    E: ListEntity,
    H: ControllerHandle<E> + ?Sized,
    A: CollectionApi<E> + ?Sized,
    S: Session + ?Sized,
{
    if handle.mutate(|c| c.change_page_size(size)) != Some(true) {
        return Ok(false);
    }
    fetch_page(handle, api, session).await.map(|_| true)
}

pub async fn go_to_page<E, H, A, S>(
    handle: &H,
    api: &A,
    session: &S,
    page: usize,
) -> Result<bool, ApiError>
where
    E: ListEntity,
    H: ControllerHandle<E> + ?Sized,
    A: CollectionApi<E> + ?Sized,
    S: Session + ?Sized,
{
    if handle.mutate(|c| c.go_to_page(page)) != Some(true) {
        return Ok(false);
    }
    fetch_page(handle, api, session).await.map(|_| true)
}

pub async fn change_sort<E, H, A, S>(
    handle: &H,
    api: &A,
    session: &S,
    field: &str,
) -> Result<(), ApiError>
where
    E: ListEntity,
    H: ControllerHandle<E> + ?Sized,
    A: CollectionApi<E> + ?Sized,
    S: Session + ?Sized,
{
    if handle.mutate(|c| c.change_sort(field)) != Some(true) {
        return Ok(());
    }
    fetch_page(handle, api, session).await
}

/// Удаление одной записи. `confirm` показывает пользователю вопрос;
/// без подтверждения запрос не отправляется. Ok(false): пользователь отказался.
pub async fn delete_one<E, H, A, S>(
    handle: &H,
    api: &A,
    session: &S,
    id: &str,
    confirm: impl FnOnce(&str) -> bool,
) -> Result<bool, ApiError>
where
    E: ListEntity,
    H: ControllerHandle<E> + ?Sized,
    A: CollectionApi<E> + ?Sized,
    S: Session + ?Sized,
{
    if !confirm("Delete this record? This cannot be undone.") {
        return Ok(false);
    }
    let token = access_token(session)?;
    let result = api.remove(&token, id).await;
    forget_rejected_credential(session, &result);

    if let Err(err) = result {
        log::warn!("{}: failed to delete {}: {}", E::RESOURCE, id, err);
        mark_unauthorized(handle, &err);
        return Err(err);
    }

    log::info!("{}: deleted {}", E::RESOURCE, id);
    handle.mutate(|c| c.finish_delete(id));
    // запись удалена; ошибка перечитывания видна в состоянии списка
    let _ = fetch_page(handle, api, session).await;
    Ok(true)
}

/// Массовое удаление одним запросом. Ошибка считается полной; список всё
/// равно перечитывается, чтобы показать фактическое состояние сервера.
pub async fn delete_many<E, H, A, S>(
    handle: &H,
    api: &A,
    session: &S,
    ids: Vec<String>,
    confirm: impl FnOnce(&str) -> bool,
) -> Result<bool, ApiError>
where
    E: ListEntity,
    H: ControllerHandle<E> + ?Sized,
    A: CollectionApi<E> + ?Sized,
    S: Session + ?Sized,
{
    if ids.is_empty() {
        return Ok(false);
    }
    let question = format!("Delete {} selected records? This cannot be undone.", ids.len());
    if !confirm(&question) {
        return Ok(false);
    }
    let token = access_token(session)?;
    let result = api.remove_many(&token, &ids).await;
    forget_rejected_credential(session, &result);

    match result {
        Ok(()) => {
            log::info!("{}: deleted {} records", E::RESOURCE, ids.len());
            handle.mutate(|c| c.finish_delete_many());
            let _ = fetch_page(handle, api, session).await;
            Ok(true)
        }
        Err(err) => {
            log::warn!("{}: bulk delete failed: {}", E::RESOURCE, err);
            if err.is_auth() {
                mark_unauthorized(handle, &err);
            } else {
                let _ = fetch_page(handle, api, session).await;
            }
            Err(err)
        }
    }
}

/// Открывает форму редактирования с полной записью, загруженной через `get`
pub async fn load_for_edit<E, H, A, S>(
    handle: &H,
    api: &A,
    session: &S,
    id: &str,
) -> Result<(), ApiError>
where
    E: ListEntity,
    H: ControllerHandle<E> + ?Sized,
    A: CollectionApi<E> + ?Sized,
    S: Session + ?Sized,
{
    let token = access_token(session)?;
    let result = api.get(&token, id).await;
    forget_rejected_credential(session, &result);
    match result {
        Ok(entity) => {
            handle.mutate(|c| c.open_edit(&entity));
            Ok(())
        }
        Err(err) => {
            mark_unauthorized(handle, &err);
            Err(err)
        }
    }
}

/// Отправка открытой формы (createEntity / updateEntity)
pub async fn submit_form<E, H, A, S>(handle: &H, api: &A, session: &S) -> Result<(), SubmitRejected>
where
    E: ListEntity,
    H: ControllerHandle<E> + ?Sized,
    A: CollectionApi<E> + ?Sized,
    S: Session + ?Sized,
{
    let ticket = handle
        .mutate(|c| c.begin_submit())
        .ok_or(SubmitRejected::NotOpen)??;

    let result = match access_token(session) {
        Err(err) => Err(err),
        Ok(token) => match (ticket.mode, ticket.entity_id.as_deref()) {
            (FormMode::Editing, Some(id)) => api.update(&token, id, &ticket.draft).await.map(|_| ()),
            _ => api.create(&token, &ticket.draft).await.map(|_| ()),
        },
    };
    forget_rejected_credential(session, &result);
    handle.mutate(|c| c.finish_submit(&ticket, &result));

    match result {
        Ok(()) => {
            log::info!("{}: saved", E::RESOURCE);
            // форма уже закрыта; ошибка загрузки видна в состоянии списка
            let _ = fetch_page(handle, api, session).await;
            Ok(())
        }
        Err(err) => {
            log::warn!("{}: save rejected: {}", E::RESOURCE, err);
            Err(SubmitRejected::Api(err))
        }
    }
}

/// Итог импорта для показа пользователю
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported_count: usize,
    pub failed_count: usize,
    pub errors: Vec<ImportRowError>,
}

impl ImportSummary {
    pub fn message(&self) -> String {
        if self.failed_count == 0 {
            format!("Imported {} records", self.imported_count)
        } else {
            format!(
                "Imported {} records, {} failed",
                self.imported_count, self.failed_count
            )
        }
    }

    pub fn row_messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .map(|e| format!("Row {}: {}", e.row, e.error))
            .collect()
    }
}

impl From<ImportResult> for ImportSummary {
    fn from(result: ImportResult) -> Self {
        Self {
            imported_count: result.imported_count,
            failed_count: result.failed_count,
            errors: result.errors,
        }
    }
}

/// Импорт файла (importFile). После ответа список перечитывается всегда,
/// кроме ошибки авторизации: часть строк могла сохраниться.
pub async fn import_file<E, H, A, S>(
    handle: &H,
    api: &A,
    session: &S,
    file: &ImportFile,
) -> Result<ImportSummary, ApiError>
where
    E: ListEntity,
    H: ControllerHandle<E> + ?Sized,
    A: CollectionApi<E> + ?Sized,
    S: Session + ?Sized,
{
    let token = access_token(session)?;
    log::debug!("{}: importing {} ({} bytes)", E::RESOURCE, file.name, file.bytes.len());
    let result = api.import(&token, file).await;
    forget_rejected_credential(session, &result);

    let summary = match result {
        Ok(result) | Err(ApiError::PartialImport(result)) => Ok(ImportSummary::from(result)),
        Err(err) => Err(err),
    };

    match &summary {
        Err(err) if err.is_auth() => mark_unauthorized(handle, err),
        _ => {
            let _ = fetch_page(handle, api, session).await;
        }
    }
    summary
}

/// Результат экспорта
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Файл, сформированный сервером по текущему фильтру и сортировке
    Server { bytes: Vec<u8>, format: ExportFormat },
    /// Локальный CSV только из загруженной страницы
    Fallback(FallbackExport),
}

impl ExportOutcome {
    /// Файл содержит только загруженные строки, а не всю выборку
    pub fn is_partial(&self) -> bool {
        matches!(self, ExportOutcome::Fallback(_))
    }
}

/// Экспорт текущего представления (exportCurrentView)
pub async fn export_current_view<E, H, A, S>(
    handle: &H,
    api: &A,
    session: &S,
    format: ExportFormat,
) -> Result<ExportOutcome, ApiError>
where
    E: ListEntity + CsvExportable,
    H: ControllerHandle<E> + ?Sized,
    A: CollectionApi<E> + ?Sized,
    S: Session + ?Sized,
{
    let Some(query) = handle.inspect(|c| c.query()) else {
        return Err(ApiError::generic("The list is no longer available"));
    };
    let token = access_token(session)?;
    let result = api.export(&token, format, &query).await;
    forget_rejected_credential(session, &result);

    match result {
        Ok(bytes) if !bytes.is_empty() => return Ok(ExportOutcome::Server { bytes, format }),
        Ok(_) => log::warn!("{}: server export returned an empty file", E::RESOURCE),
        Err(err) if err.is_auth() => {
            mark_unauthorized(handle, &err);
            return Err(err);
        }
        Err(err) => log::warn!("{}: server export failed: {}", E::RESOURCE, err),
    }

    handle
        .inspect(|c| ExportOutcome::Fallback(c.fallback_export()))
        .ok_or_else(|| ApiError::generic("The list is no longer available"))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::future::ready;

    use contracts::domain::a001_customer::{Customer, CustomerDraft};
    use contracts::shared::entity::{EntityDraft, ListEntity};

    use super::super::fake::{customer, FakeApi};
    use super::super::{ListController, LoadStatus};
    use super::*;
    use crate::shared::export::UTF8_BOM;
    use crate::system::auth::session::fake::FakeSession;

    fn controller() -> RefCell<ListController<Customer>> {
        RefCell::new(ListController::default())
    }

    #[tokio::test]
    async fn test_fetch_page_populates_state() {
        let api = FakeApi::with_customers(25);
        let session = FakeSession::logged_in();
        let ctrl = controller();

        fetch_page(&ctrl, &api, &session).await.unwrap();

        let c = ctrl.borrow();
        assert_eq!(c.items().len(), 10);
        assert_eq!(c.pagination().total_records, 25);
        assert_eq!(c.pagination().total_pages, 3);
        assert_eq!((c.pagination().start_record, c.pagination().end_record), (1, 10));
        assert_eq!(c.status(), &LoadStatus::Ready);
    }

    #[tokio::test]
    async fn test_missing_credential_makes_no_call() {
        let api = FakeApi::with_customers(3);
        let session = FakeSession::anonymous();
        let ctrl = controller();

        let err = fetch_page(&ctrl, &api, &session).await.unwrap_err();
        assert_eq!(err, ApiError::Auth(AuthFailure::MissingCredential));
        assert_eq!(api.calls("list"), 0);
        assert!(matches!(ctrl.borrow().status(), LoadStatus::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_rejected_credential_clears_session() {
        let api = FakeApi::with_customers(3);
        api.fail_next(ApiError::Auth(AuthFailure::Rejected));
        let session = FakeSession::logged_in();
        let ctrl = controller();

        assert!(fetch_page(&ctrl, &api, &session).await.is_err());
        assert_eq!(session.cleared.get(), 1);
        assert!(session.access_token().is_none());
        assert!(ctrl.borrow().items().is_empty());
    }

    #[tokio::test]
    async fn test_identical_filter_twice_fetches_once() {
        let api = FakeApi::with_customers(30);
        let session = FakeSession::logged_in();
        let ctrl = controller();
        fetch_page(&ctrl, &api, &session).await.unwrap();
        let before = api.calls("list");

        assert!(apply_filter(&ctrl, &api, &session, "Customer 1", "all", ready(())).await.unwrap());
        assert!(!apply_filter(&ctrl, &api, &session, "Customer 1", "all", ready(())).await.unwrap());
        assert_eq!(api.calls("list"), before + 1);
    }

    #[tokio::test]
    async fn test_burst_of_keystrokes_fetches_final_value() {
        let api = FakeApi::with_customers(30);
        let session = FakeSession::logged_in();
        let ctrl = controller();

        let first = ctrl.borrow_mut().queue_filter("Cust", "all");
        // the first keystroke's timer fires while the second one is waiting
        let delay = async {
            assert!(!ctrl.borrow_mut().settle_filter(first));
        };
        assert!(apply_filter(&ctrl, &api, &session, "Customer 2", "name", delay)
            .await
            .unwrap());

        assert_eq!(api.calls("list"), 1);
        assert_eq!(api.last_query().unwrap().search, "Customer 2");
        assert_eq!(ctrl.borrow().search_field(), "name");
    }

    #[tokio::test]
    async fn test_go_to_page_out_of_range_does_not_fetch() {
        let api = FakeApi::with_customers(25);
        let session = FakeSession::logged_in();
        let ctrl = controller();
        fetch_page(&ctrl, &api, &session).await.unwrap();

        assert!(!go_to_page(&ctrl, &api, &session, 0).await.unwrap());
        assert!(!go_to_page(&ctrl, &api, &session, 4).await.unwrap());
        assert_eq!(api.calls("list"), 1);

        assert!(go_to_page(&ctrl, &api, &session, 3).await.unwrap());
        assert_eq!(ctrl.borrow().items().len(), 5);
        assert_eq!(ctrl.borrow().pagination().start_record, 21);
    }

    #[tokio::test]
    async fn test_select_all_then_page_change_drops_other_page() {
        let api = FakeApi::with_customers(25);
        let session = FakeSession::logged_in();
        let ctrl = controller();
        fetch_page(&ctrl, &api, &session).await.unwrap();

        ctrl.borrow_mut().toggle_select_all(true);
        assert_eq!(ctrl.borrow().selected_ids().len(), 10);

        go_to_page(&ctrl, &api, &session, 2).await.unwrap();
        let c = ctrl.borrow();
        assert!(c.selected_ids().is_empty());
        for id in c.selected_ids() {
            assert!(c.items().iter().any(|item| item.entity_id() == id));
        }
    }

    #[tokio::test]
    async fn test_create_round_trip() {
        let api = FakeApi::default();
        let session = FakeSession::logged_in();
        let ctrl = controller();

        ctrl.borrow_mut().open_create();
        {
            let mut c = ctrl.borrow_mut();
            c.set_field("name", "  Northwind  ".into());
            c.set_field("email", " buyer@northwind.io ".into());
            c.set_field("phone", "+1 (555) 010-0200".into());
            c.set_field("notes", " VIP ".into());
        }
        let submitted = ctrl.borrow().form().session().unwrap().draft.clone();

        submit_form(&ctrl, &api, &session).await.unwrap();

        let c = ctrl.borrow();
        assert!(!c.form().is_open());
        assert_eq!(c.items().len(), 1);
        assert_eq!(c.items()[0].to_draft(), submitted.trimmed());
        assert_eq!(api.calls("create"), 1);
        assert_eq!(api.calls("list"), 1);
    }

    #[tokio::test]
    async fn test_invalid_draft_never_reaches_network() {
        let api = FakeApi::default();
        let session = FakeSession::logged_in();
        let ctrl = controller();
        ctrl.borrow_mut().open_create();
        ctrl.borrow_mut().set_field("name", "A".into());

        let err = submit_form(&ctrl, &api, &session).await.unwrap_err();
        let SubmitRejected::Invalid(fields) = err else {
            panic!("expected local validation error");
        };
        assert_eq!(fields["name"], "Name must be at least 2 characters");
        assert_eq!(fields["email"], "Email is required");
        assert_eq!(api.calls("create"), 0);
        assert!(ctrl.borrow().form().is_open());
    }

    #[tokio::test]
    async fn test_server_field_errors_keep_draft() {
        let api = FakeApi::with_customers(1);
        let session = FakeSession::logged_in();
        let ctrl = controller();
        fetch_page(&ctrl, &api, &session).await.unwrap();

        let existing = ctrl.borrow().items()[0].clone();
        ctrl.borrow_mut().open_edit(&existing);
        ctrl.borrow_mut().set_field("email", "dup@example.com".into());

        let mut fields = contracts::shared::validation::FieldErrors::new();
        fields.insert("email".into(), "Email already taken".into());
        api.fail_next(ApiError::Validation { fields });

        let err = submit_form(&ctrl, &api, &session).await.unwrap_err();
        assert!(matches!(err, SubmitRejected::Api(ApiError::Validation { .. })));

        let c = ctrl.borrow();
        let form = c.form().session().unwrap();
        assert_eq!(form.field_error("email"), Some("Email already taken"));
        assert_eq!(form.draft.email, "dup@example.com");
        assert!(!form.submitting);
        assert_eq!(api.calls("list"), 1);
    }

    #[tokio::test]
    async fn test_edit_uses_update_and_get() {
        let api = FakeApi::with_customers(2);
        let session = FakeSession::logged_in();
        let ctrl = controller();
        fetch_page(&ctrl, &api, &session).await.unwrap();

        load_for_edit(&ctrl, &api, &session, "c-2").await.unwrap();
        ctrl.borrow_mut().set_field("name", "Renamed".into());
        submit_form(&ctrl, &api, &session).await.unwrap();

        assert_eq!(api.calls("get"), 1);
        assert_eq!(api.calls("update"), 1);
        assert_eq!(api.calls("create"), 0);
        let c = ctrl.borrow();
        assert!(c.items().iter().any(|i| i.id == "c-2" && i.name == "Renamed"));
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let api = FakeApi::with_customers(2);
        let session = FakeSession::logged_in();
        let ctrl = controller();
        fetch_page(&ctrl, &api, &session).await.unwrap();

        assert!(!delete_one(&ctrl, &api, &session, "c-1", |_| false).await.unwrap());
        assert!(!delete_many(&ctrl, &api, &session, vec!["c-1".into()], |_| false)
            .await
            .unwrap());
        assert_eq!(api.calls("remove") + api.calls("remove_many"), 0);
    }

    #[tokio::test]
    async fn test_delete_then_refetch_reconciles_selection() {
        let api = FakeApi::new(vec![customer("1", "Alpha"), customer("2", "Beta")]);
        let session = FakeSession::logged_in();
        let ctrl = controller();
        fetch_page(&ctrl, &api, &session).await.unwrap();
        ctrl.borrow_mut().toggle_select_all(true);

        // another client removes id=2 while we delete id=1
        api.remove_behind_the_scenes("2");
        assert!(delete_one(&ctrl, &api, &session, "1", |_| true).await.unwrap());

        let c = ctrl.borrow();
        assert!(c.items().is_empty());
        assert!(c.selected_ids().is_empty());
        assert_eq!(api.calls("list"), 2);
    }

    #[tokio::test]
    async fn test_delete_one_keeps_other_selection() {
        let api = FakeApi::new(vec![customer("1", "Alpha"), customer("2", "Beta")]);
        let session = FakeSession::logged_in();
        let ctrl = controller();
        fetch_page(&ctrl, &api, &session).await.unwrap();
        ctrl.borrow_mut().toggle_select_all(true);

        delete_one(&ctrl, &api, &session, "1", |_| true).await.unwrap();
        assert_eq!(ctrl.borrow().selected_ids(), vec!["2".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_delete_leaves_state_untouched() {
        let api = FakeApi::with_customers(2);
        let session = FakeSession::logged_in();
        let ctrl = controller();
        fetch_page(&ctrl, &api, &session).await.unwrap();
        ctrl.borrow_mut().toggle_select_all(true);
        let before = ctrl.borrow().clone();

        api.fail_next(ApiError::generic("Customer has open tickets"));
        let err = delete_one(&ctrl, &api, &session, "c-1", |_| true).await.unwrap_err();
        assert_eq!(err.to_string(), "Customer has open tickets");
        assert_eq!(*ctrl.borrow(), before);
        assert_eq!(api.calls("list"), 1);
    }

    #[tokio::test]
    async fn test_delete_reports_success_when_refetch_fails() {
        let api = FakeApi::with_customers(3);
        let session = FakeSession::logged_in();
        let ctrl = controller();
        fetch_page(&ctrl, &api, &session).await.unwrap();

        api.fail_next_list(ApiError::generic("Service unavailable"));
        assert!(delete_one(&ctrl, &api, &session, "c-1", |_| true).await.unwrap());
        assert_eq!(
            *ctrl.borrow().status(),
            LoadStatus::Failed("Service unavailable".to_string())
        );

        ctrl.borrow_mut().toggle_select_all(true);
        api.fail_next_list(ApiError::generic("Service unavailable"));
        assert!(delete_many(&ctrl, &api, &session, vec!["c-2".into()], |_| true)
            .await
            .unwrap());
        assert_eq!(api.calls("remove"), 1);
        assert_eq!(api.calls("remove_many"), 1);
        assert!(session.access_token().is_some());
    }

    #[tokio::test]
    async fn test_bulk_delete_success_and_failure() {
        let api = FakeApi::with_customers(4);
        let session = FakeSession::logged_in();
        let ctrl = controller();
        fetch_page(&ctrl, &api, &session).await.unwrap();
        ctrl.borrow_mut().toggle_select_all(true);
        let ids = ctrl.borrow().selected_ids();

        api.fail_next(ApiError::generic("Bulk delete failed"));
        assert!(delete_many(&ctrl, &api, &session, ids.clone(), |_| true).await.is_err());
        // still refetched for ground truth
        assert_eq!(api.calls("list"), 2);
        assert_eq!(api.calls("remove_many"), 1);

        assert!(delete_many(&ctrl, &api, &session, ids, |_| true).await.unwrap());
        let c = ctrl.borrow();
        assert!(c.selected_ids().is_empty());
        assert!(c.items().is_empty());
        assert_eq!(api.calls("remove_many"), 2);
    }

    #[tokio::test]
    async fn test_import_summary_and_single_refetch() {
        let api = FakeApi::with_customers(3);
        api.set_import_result(Ok(ImportResult {
            imported_count: 7,
            failed_count: 3,
            errors: vec![
                ImportRowError { row: 2, error: "bad email".into() },
                ImportRowError { row: 5, error: "missing name".into() },
                ImportRowError { row: 9, error: "duplicate".into() },
            ],
        }));
        let session = FakeSession::logged_in();
        let ctrl = controller();

        let file = ImportFile {
            name: "customers.csv".into(),
            content_type: "text/csv".into(),
            bytes: b"name,email\n".to_vec(),
        };
        let summary = import_file(&ctrl, &api, &session, &file).await.unwrap();

        assert!(summary.message().contains('7'));
        assert!(summary.message().contains('3'));
        assert_eq!(summary.message(), "Imported 7 records, 3 failed");
        assert_eq!(summary.row_messages()[0], "Row 2: bad email");
        assert_eq!(api.calls("list"), 1);
    }

    #[tokio::test]
    async fn test_partial_import_error_still_refetches() {
        let api = FakeApi::with_customers(3);
        api.set_import_result(Err(ApiError::PartialImport(ImportResult {
            imported_count: 1,
            failed_count: 1,
            errors: vec![],
        })));
        let session = FakeSession::logged_in();
        let ctrl = controller();
        let file = ImportFile {
            name: "x.csv".into(),
            content_type: "text/csv".into(),
            bytes: vec![],
        };

        let summary = import_file(&ctrl, &api, &session, &file).await.unwrap();
        assert_eq!(summary.failed_count, 1);
        assert_eq!(api.calls("list"), 1);
    }

    #[tokio::test]
    async fn test_export_falls_back_to_loaded_rows() {
        let api = FakeApi::with_customers(250);
        api.set_export_result(Err(ApiError::generic("export service down")));
        let session = FakeSession::logged_in();
        let ctrl = controller();
        fetch_page(&ctrl, &api, &session).await.unwrap();

        let outcome = export_current_view(&ctrl, &api, &session, ExportFormat::Csv)
            .await
            .unwrap();
        assert!(outcome.is_partial());
        let ExportOutcome::Fallback(export) = outcome else {
            panic!("expected fallback export");
        };
        assert_eq!(export.rows, 10);
        assert_eq!(export.total_records, 250);
        assert!(export.content.starts_with(UTF8_BOM));
        // header + 10 rows
        assert_eq!(export.content.lines().count(), 11);
        assert!(export.notice().contains("10"));
        assert!(export.notice().contains("250"));
    }

    #[tokio::test]
    async fn test_export_empty_payload_falls_back() {
        let api = FakeApi::with_customers(3);
        api.set_export_result(Ok(Vec::new()));
        let session = FakeSession::logged_in();
        let ctrl = controller();
        fetch_page(&ctrl, &api, &session).await.unwrap();

        let outcome = export_current_view(&ctrl, &api, &session, ExportFormat::Xlsx)
            .await
            .unwrap();
        assert!(outcome.is_partial());
    }

    #[tokio::test]
    async fn test_server_export_used_when_available() {
        let api = FakeApi::with_customers(3);
        let session = FakeSession::logged_in();
        let ctrl = controller();
        ctrl.borrow_mut().apply_filter_now("Customer", "name");

        let outcome = export_current_view(&ctrl, &api, &session, ExportFormat::Xlsx)
            .await
            .unwrap();
        assert!(!outcome.is_partial());
        assert_eq!(api.last_query().unwrap().search_field, "name");
    }

    #[tokio::test]
    async fn test_draft_from_blank_template() {
        let ctrl = controller();
        ctrl.borrow_mut().open_create();
        assert_eq!(
            ctrl.borrow().form().session().unwrap().draft,
            CustomerDraft::default()
        );
    }
}
