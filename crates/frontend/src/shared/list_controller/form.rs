//! Жизненный цикл модальной формы создания / редактирования
//!
//! `closed -> creating|editing -> submitting -> closed` при успехе,
//! `submitting -> creating|editing` (с ошибками) при неудаче.
//! Отмена из любого открытого состояния сразу закрывает форму без вопросов.

use contracts::shared::entity::{EntityDraft, FormMode};
use contracts::shared::validation::FieldErrors;
use thiserror::Error;

use crate::shared::api_error::ApiError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitRejected {
    #[error("No form is open")]
    NotOpen,
    #[error("The form is already being submitted")]
    InFlight,
    #[error("Please correct the highlighted fields")]
    Invalid(FieldErrors),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Открытая форма
#[derive(Debug, Clone, PartialEq)]
pub struct FormSession<D> {
    pub mode: FormMode,
    /// Id редактируемой записи (None при создании)
    pub entity_id: Option<String>,
    pub draft: D,
    pub field_errors: FieldErrors,
    /// Ошибка уровня формы (сеть, сервер, сессия)
    pub form_error: Option<String>,
    pub submitting: bool,
    generation: u64,
}

impl<D> FormSession<D> {
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors.get(field).map(String::as_str)
    }
}

/// Данные, снятые с формы в момент отправки
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitTicket<D> {
    pub mode: FormMode,
    pub entity_id: Option<String>,
    /// Черновик с обрезанными пробелами
    pub draft: D,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModalForm<D> {
    session: Option<FormSession<D>>,
    generation: u64,
}

impl<D> Default for ModalForm<D> {
    fn default() -> Self {
        Self {
            session: None,
            generation: 0,
        }
    }
}

impl<D: EntityDraft> ModalForm<D> {
    pub fn session(&self) -> Option<&FormSession<D>> {
        self.session.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn open_create(&mut self) {
        self.open(FormMode::Creating, None, D::default());
    }

    pub fn open_edit(&mut self, entity_id: String, draft: D) {
        self.open(FormMode::Editing, Some(entity_id), draft);
    }

    fn open(&mut self, mode: FormMode, entity_id: Option<String>, draft: D) {
        self.generation += 1;
        self.session = Some(FormSession {
            mode,
            entity_id,
            draft,
            field_errors: FieldErrors::new(),
            form_error: None,
            submitting: false,
            generation: self.generation,
        });
    }

    /// Черновик отбрасывается
    pub fn cancel(&mut self) {
        self.session = None;
    }

    /// Ввод в поле; ошибка этого поля снимается
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.submitting || !session.draft.set_field(name, value) {
            return false;
        }
        session.field_errors.remove(name);
        true
    }

    /// Проверяет все поля; при успехе переводит форму в `submitting`
    pub fn begin_submit(&mut self) -> Result<SubmitTicket<D>, SubmitRejected> {
        let session = self.session.as_mut().ok_or(SubmitRejected::NotOpen)?;
        if session.submitting {
            return Err(SubmitRejected::InFlight);
        }

        let draft = session.draft.trimmed();
        let errors = draft.validate(session.mode);
        session.form_error = None;
        if !errors.is_empty() {
            session.field_errors = errors.clone();
            return Err(SubmitRejected::Invalid(errors));
        }

        session.field_errors.clear();
        session.submitting = true;
        Ok(SubmitTicket {
            mode: session.mode,
            entity_id: session.entity_id.clone(),
            draft,
            generation: session.generation,
        })
    }

    /// Применяет ответ сервера. Ответ для уже закрытой или переоткрытой
    /// формы игнорируется; возвращает true, если форма была затронута.
    pub fn finish_submit(&mut self, ticket: &SubmitTicket<D>, result: &Result<(), ApiError>) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.generation != ticket.generation {
            return false;
        }

        match result {
            Ok(()) => {
                self.session = None;
            }
            Err(ApiError::Validation { fields }) => {
                session.submitting = false;
                session.field_errors = fields.clone();
                // поле, которого нет на форме, иначе потерялось бы
                let unknown: Vec<String> = fields
                    .iter()
                    .filter(|(name, _)| session.draft.field(name).is_none())
                    .map(|(_, message)| message.clone())
                    .collect();
                session.form_error = (!unknown.is_empty()).then(|| unknown.join("; "));
            }
            Err(err) => {
                session.submitting = false;
                session.form_error = Some(err.to_string());
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_customer::CustomerDraft;

    fn filled(form: &mut ModalForm<CustomerDraft>) {
        form.set_field("name", "  Acme  ".into());
        form.set_field("email", "ops@acme.io".into());
    }

    #[test]
    fn test_cancel_discards_draft() {
        let mut form = ModalForm::<CustomerDraft>::default();
        form.open_create();
        filled(&mut form);
        form.cancel();
        assert!(!form.is_open());

        form.open_create();
        assert_eq!(form.session().unwrap().draft, CustomerDraft::default());
    }

    #[test]
    fn test_invalid_submit_keeps_draft_and_reports_all_fields() {
        let mut form = ModalForm::<CustomerDraft>::default();
        form.open_create();
        form.set_field("phone", "12".into());

        let err = form.begin_submit().unwrap_err();
        let SubmitRejected::Invalid(errors) = err else {
            panic!("expected validation errors");
        };
        assert_eq!(errors.len(), 3);

        let session = form.session().unwrap();
        assert!(!session.submitting);
        assert_eq!(session.draft.phone, "12");
        assert_eq!(session.field_error("name"), Some("Name is required"));
    }

    #[test]
    fn test_editing_a_field_clears_its_error() {
        let mut form = ModalForm::<CustomerDraft>::default();
        form.open_create();
        let _ = form.begin_submit();
        form.set_field("name", "Acme".into());

        let session = form.session().unwrap();
        assert!(session.field_error("name").is_none());
        assert!(session.field_error("email").is_some());
    }

    #[test]
    fn test_submit_ticket_is_trimmed_and_blocks_resubmit() {
        let mut form = ModalForm::<CustomerDraft>::default();
        form.open_create();
        filled(&mut form);

        let ticket = form.begin_submit().unwrap();
        assert_eq!(ticket.draft.name, "Acme");
        assert_eq!(ticket.mode, FormMode::Creating);
        assert_eq!(form.begin_submit(), Err(SubmitRejected::InFlight));
        assert!(!form.set_field("name", "Other".into()));
    }

    #[test]
    fn test_server_field_errors_return_to_editing() {
        let mut form = ModalForm::<CustomerDraft>::default();
        form.open_edit("c-1".into(), CustomerDraft {
            name: "Acme".into(),
            email: "ops@acme.io".into(),
            ..Default::default()
        });
        let ticket = form.begin_submit().unwrap();

        let mut fields = FieldErrors::new();
        fields.insert("email".into(), "Email already taken".into());
        fields.insert("tenant".into(), "Tenant is locked".into());
        assert!(form.finish_submit(&ticket, &Err(ApiError::Validation { fields })));

        let session = form.session().unwrap();
        assert!(!session.submitting);
        assert_eq!(session.mode, FormMode::Editing);
        assert_eq!(session.field_error("email"), Some("Email already taken"));
        assert_eq!(session.form_error.as_deref(), Some("Tenant is locked"));
        assert_eq!(session.draft.name, "Acme");
    }

    #[test]
    fn test_success_closes_and_stale_result_is_ignored() {
        let mut form = ModalForm::<CustomerDraft>::default();
        form.open_create();
        filled(&mut form);
        let ticket = form.begin_submit().unwrap();

        // user cancels and starts another form before the response arrives
        form.cancel();
        form.open_create();
        assert!(!form.finish_submit(&ticket, &Err(ApiError::generic("boom"))));
        assert!(form.session().unwrap().form_error.is_none());

        filled(&mut form);
        let ticket = form.begin_submit().unwrap();
        assert!(form.finish_submit(&ticket, &Ok(())));
        assert!(!form.is_open());
    }
}
