use contracts::shared::dropdown::{CreateDropdownOptionDto, DropdownOption};
use gloo_net::http::{Request, Response};

use crate::shared::api_error::{ApiError, AuthFailure};
use crate::shared::api_utils::{api_url, bearer};
use crate::system::auth::session::Session;

fn options_url(kind: &str) -> String {
    api_url(&format!("/api/dropdown-options/{}", urlencoding::encode(kind)))
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if !response.ok() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::from_response(status, &body));
    }
    response.json::<T>().await.map_err(ApiError::parse)
}

/// Варианты справочника `kind`
pub async fn fetch_options<S: Session + ?Sized>(
    session: &S,
    kind: &str,
) -> Result<Vec<DropdownOption>, ApiError> {
    let token = session
        .access_token()
        .ok_or(ApiError::Auth(AuthFailure::MissingCredential))?;

    let response = Request::get(&options_url(kind))
        .header("Authorization", &bearer(&token))
        .send()
        .await
        .map_err(ApiError::network)?;
    let result = decode(response).await;
    if matches!(&result, Err(err) if err.is_rejected_credential()) {
        session.clear();
    }
    result
}

/// Добавляет новый вариант и возвращает его в виде, сохранённом сервером
pub async fn create_option<S: Session + ?Sized>(
    session: &S,
    kind: &str,
    value: String,
    label: String,
) -> Result<DropdownOption, ApiError> {
    let token = session
        .access_token()
        .ok_or(ApiError::Auth(AuthFailure::MissingCredential))?;

    let dto = CreateDropdownOptionDto { value, label };
    let response = Request::post(&options_url(kind))
        .header("Authorization", &bearer(&token))
        .json(&dto)
        .map_err(|e| ApiError::generic(format!("Failed to serialize request: {}", e)))?
        .send()
        .await
        .map_err(ApiError::network)?;
    let result = decode(response).await;
    if matches!(&result, Err(err) if err.is_rejected_credential()) {
        session.clear();
    }
    result
}

/// Значение нового варианта из введённой подписи: `"Preventive Check"` -> `"preventive_check"`
pub fn option_value_from_label(label: &str) -> String {
    let mut value = String::new();
    for word in label.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
        if !value.is_empty() {
            value.push('_');
        }
        value.push_str(&word.to_lowercase());
    }
    value
}
