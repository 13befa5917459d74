//! Единая ошибка обращения к API
//!
//! Сервер возвращает ошибки в нескольких формах; все они приводятся к
//! [`ApiError`] здесь, на границе сети, чтобы UI не разбирал сырой JSON.

use contracts::shared::import::ImportResult;
use contracts::shared::validation::FieldErrors;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthFailure {
    /// Токена нет в хранилище, запрос не отправлялся
    #[error("Not authenticated. Please login.")]
    MissingCredential,
    /// Сервер отклонил токен (просрочен или отозван)
    #[error("Your session has expired. Please login again.")]
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Please correct the highlighted fields")]
    Validation { fields: FieldErrors },

    #[error(transparent)]
    Auth(#[from] AuthFailure),

    #[error("{message}")]
    Generic { message: String },

    #[error("Imported {} records, {} failed", .0.imported_count, .0.failed_count)]
    PartialImport(ImportResult),
}

impl ApiError {
    pub fn generic(message: impl Into<String>) -> Self {
        ApiError::Generic {
            message: message.into(),
        }
    }

    pub fn network(err: impl std::fmt::Display) -> Self {
        ApiError::generic(format!("Failed to send request: {}", err))
    }

    pub fn parse(err: impl std::fmt::Display) -> Self {
        ApiError::generic(format!("Failed to parse response: {}", err))
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Auth(_))
    }

    /// Сервер отклонил токен; сохранённый токен нужно удалить
    pub fn is_rejected_credential(&self) -> bool {
        matches!(self, ApiError::Auth(AuthFailure::Rejected))
    }

    /// Ошибки полей (пусто для остальных видов)
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ApiError::Validation { fields } => Some(fields),
            _ => None,
        }
    }

    /// Нормализует неуспешный ответ сервера
    pub fn from_response(status: u16, body: &str) -> Self {
        // 403 означает отказ в правах, а не просроченный токен: сессия остаётся
        if status == 401 {
            return ApiError::Auth(AuthFailure::Rejected);
        }

        let fallback = || ApiError::generic(format!("Request failed with status {}", status));

        let Ok(Value::Object(root)) = serde_json::from_str::<Value>(body) else {
            let text = body.trim();
            if !text.is_empty() && text.len() <= 200 && !text.starts_with('<') {
                return ApiError::generic(text);
            }
            return fallback();
        };

        if root.contains_key("importedCount") || root.contains_key("failedCount") {
            if let Ok(result) = serde_json::from_value::<ImportResult>(Value::Object(root.clone())) {
                return ApiError::PartialImport(result);
            }
        }

        let fields = extract_field_errors(&root);
        if !fields.is_empty() {
            return ApiError::Validation { fields };
        }

        extract_message(&root).map(ApiError::generic).unwrap_or_else(fallback)
    }
}

/// `{errors: {field: [msg]}}`, `{errors: {field: msg}}`, `{errors: [{field, message}]}`
fn extract_field_errors(root: &Map<String, Value>) -> FieldErrors {
    let mut fields = FieldErrors::new();
    let errors = root
        .get("errors")
        .or_else(|| root.get("error").and_then(|e| e.get("errors")));

    match errors {
        Some(Value::Object(map)) => {
            for (field, value) in map {
                let message = match value {
                    Value::String(s) => Some(s.clone()),
                    Value::Array(list) => list.iter().find_map(|v| v.as_str().map(str::to_string)),
                    _ => None,
                };
                if let Some(message) = message {
                    fields.insert(to_snake_case(field), message);
                }
            }
        }
        Some(Value::Array(list)) => {
            for item in list {
                let field = ["field", "path", "param"]
                    .iter()
                    .find_map(|k| item.get(*k).and_then(Value::as_str));
                let message = ["message", "msg"]
                    .iter()
                    .find_map(|k| item.get(*k).and_then(Value::as_str));
                if let (Some(field), Some(message)) = (field, message) {
                    fields.insert(to_snake_case(field), message.to_string());
                }
            }
        }
        _ => {}
    }
    fields
}

/// `{message}`, `{error: "..."}`, `{error: {message}}`, `{detail}`
fn extract_message(root: &Map<String, Value>) -> Option<String> {
    if let Some(message) = root.get("message").and_then(Value::as_str) {
        return Some(message.to_string());
    }
    match root.get("error") {
        Some(Value::String(s)) => return Some(s.clone()),
        Some(Value::Object(inner)) => {
            if let Some(message) = inner.get("message").and_then(Value::as_str) {
                return Some(message.to_string());
            }
        }
        _ => {}
    }
    root.get("detail").and_then(Value::as_str).map(str::to_string)
}

/// Сервер отдаёт имена полей в camelCase, черновики используют snake_case
fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_statuses() {
        assert_eq!(
            ApiError::from_response(401, ""),
            ApiError::Auth(AuthFailure::Rejected)
        );
    }

    #[test]
    fn test_forbidden_keeps_session_and_server_message() {
        let err = ApiError::from_response(403, r#"{"message": "Only admins may delete customers"}"#);
        assert!(!err.is_auth());
        assert!(!err.is_rejected_credential());
        assert_eq!(err, ApiError::generic("Only admins may delete customers"));
    }

    #[test]
    fn test_field_errors_object_of_arrays() {
        let err = ApiError::from_response(
            422,
            r#"{"errors": {"email": ["Email already taken"], "firstName": ["Too short"]}}"#,
        );
        let fields = err.field_errors().unwrap();
        assert_eq!(fields["email"], "Email already taken");
        assert_eq!(fields["first_name"], "Too short");
    }

    #[test]
    fn test_field_errors_object_of_strings() {
        let err = ApiError::from_response(400, r#"{"errors": {"name": "Name exists"}}"#);
        assert_eq!(err.field_errors().unwrap()["name"], "Name exists");
    }

    #[test]
    fn test_field_errors_list() {
        let err = ApiError::from_response(
            400,
            r#"{"message": "Validation failed", "errors": [{"field": "phone", "message": "Bad phone"}, {"path": "siteId", "msg": "Unknown site"}]}"#,
        );
        let fields = err.field_errors().unwrap();
        assert_eq!(fields["phone"], "Bad phone");
        assert_eq!(fields["site_id"], "Unknown site");
    }

    #[test]
    fn test_generic_messages() {
        assert_eq!(
            ApiError::from_response(500, r#"{"message": "Database unavailable"}"#).to_string(),
            "Database unavailable"
        );
        assert_eq!(
            ApiError::from_response(500, r#"{"error": {"message": "boom"}}"#).to_string(),
            "boom"
        );
        assert_eq!(
            ApiError::from_response(404, r#"{"detail": "Not found"}"#).to_string(),
            "Not found"
        );
        assert_eq!(
            ApiError::from_response(502, "<html>Bad gateway</html>").to_string(),
            "Request failed with status 502"
        );
        assert_eq!(
            ApiError::from_response(500, "upstream timeout").to_string(),
            "upstream timeout"
        );
    }

    #[test]
    fn test_partial_import_body() {
        let err = ApiError::from_response(
            207,
            r#"{"importedCount": 7, "failedCount": 3, "errors": [{"row": 2, "error": "bad email"}]}"#,
        );
        match err {
            ApiError::PartialImport(result) => {
                assert_eq!(result.imported_count, 7);
                assert_eq!(result.failed_count, 3);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
