//! REST collection endpoint used by the list controller
//!
//! One [`CollectionApi`] per entity type; [`RestCollectionApi`] talks to
//! `/api/{resource}` with `gloo-net`, tests plug in an in-memory fake.

use std::marker::PhantomData;

use async_trait::async_trait;
use contracts::shared::entity::ListEntity;
use contracts::shared::import::ImportResult;
use contracts::shared::list::{ListQuery, ListResponse};
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, FormData};

use crate::shared::api_error::ApiError;
use crate::shared::api_utils::{api_url, bearer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv;charset=utf-8;",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

/// Файл, выбранный пользователем для импорта
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[async_trait(?Send)]
pub trait CollectionApi<E: ListEntity> {
    async fn list(&self, token: &str, query: &ListQuery) -> Result<ListResponse<E>, ApiError>;

    /// Full record, when list rows carry only a summary
    async fn get(&self, token: &str, id: &str) -> Result<E, ApiError>;

    async fn create(&self, token: &str, draft: &E::Draft) -> Result<E, ApiError>;

    async fn update(&self, token: &str, id: &str, draft: &E::Draft) -> Result<E, ApiError>;

    async fn remove(&self, token: &str, id: &str) -> Result<(), ApiError>;

    /// One call for the whole id set
    async fn remove_many(&self, token: &str, ids: &[String]) -> Result<(), ApiError>;

    async fn import(&self, token: &str, file: &ImportFile) -> Result<ImportResult, ApiError>;

    async fn export(
        &self,
        token: &str,
        format: ExportFormat,
        query: &ListQuery,
    ) -> Result<Vec<u8>, ApiError>;
}

#[derive(Serialize)]
struct BulkDeleteRequest<'a> {
    ids: &'a [String],
}

/// `/api/{E::RESOURCE}` over HTTP
pub struct RestCollectionApi<E> {
    base: String,
    _entity: PhantomData<fn() -> E>,
}

impl<E: ListEntity> RestCollectionApi<E> {
    pub fn new() -> Self {
        Self::with_base(api_url(&format!("/api/{}", E::RESOURCE)))
    }

    pub fn with_base(base: String) -> Self {
        Self {
            base,
            _entity: PhantomData,
        }
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/{}", self.base, urlencoding::encode(id))
    }

    fn query_string(query: &ListQuery) -> Result<String, ApiError> {
        serde_qs::to_string(query)
            .map_err(|e| ApiError::generic(format!("Failed to encode query: {}", e)))
    }
}

impl<E: ListEntity> Default for RestCollectionApi<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for RestCollectionApi<E> {
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
            _entity: PhantomData,
        }
    }
}

/// Проверяет статус и приводит ошибку к [`ApiError`]
async fn ensure_ok(response: Response) -> Result<Response, ApiError> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    log::warn!("request to {} failed with {}", response.url(), status);
    Err(ApiError::from_response(status, &body))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let response = ensure_ok(response).await?;
    response.json::<T>().await.map_err(ApiError::parse)
}

fn js_error(err: JsValue) -> ApiError {
    ApiError::generic(format!("Failed to prepare upload: {:?}", err))
}

fn multipart(file: &ImportFile) -> Result<FormData, ApiError> {
    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(file.bytes.as_slice()));

    let properties = BlobPropertyBag::new();
    properties.set_type(&file.content_type);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &properties).map_err(js_error)?;

    let form = FormData::new().map_err(js_error)?;
    form.append_with_blob_and_filename("file", &blob, &file.name)
        .map_err(js_error)?;
    Ok(form)
}

#[async_trait(?Send)]
impl<E: ListEntity> CollectionApi<E> for RestCollectionApi<E> {
    async fn list(&self, token: &str, query: &ListQuery) -> Result<ListResponse<E>, ApiError> {
        let url = format!("{}?{}", self.base, Self::query_string(query)?);
        let response = Request::get(&url)
            .header("Authorization", &bearer(token))
            .send()
            .await
            .map_err(ApiError::network)?;
        decode(response).await
    }

    async fn get(&self, token: &str, id: &str) -> Result<E, ApiError> {
        let response = Request::get(&self.item_url(id))
            .header("Authorization", &bearer(token))
            .send()
            .await
            .map_err(ApiError::network)?;
        decode(response).await
    }

    async fn create(&self, token: &str, draft: &E::Draft) -> Result<E, ApiError> {
        let response = Request::post(&self.base)
            .header("Authorization", &bearer(token))
            .json(draft)
            .map_err(|e| ApiError::generic(format!("Failed to serialize request: {}", e)))?
            .send()
            .await
            .map_err(ApiError::network)?;
        decode(response).await
    }

    async fn update(&self, token: &str, id: &str, draft: &E::Draft) -> Result<E, ApiError> {
        let response = Request::put(&self.item_url(id))
            .header("Authorization", &bearer(token))
            .json(draft)
            .map_err(|e| ApiError::generic(format!("Failed to serialize request: {}", e)))?
            .send()
            .await
            .map_err(ApiError::network)?;
        decode(response).await
    }

    async fn remove(&self, token: &str, id: &str) -> Result<(), ApiError> {
        let response = Request::delete(&self.item_url(id))
            .header("Authorization", &bearer(token))
            .send()
            .await
            .map_err(ApiError::network)?;
        ensure_ok(response).await.map(|_| ())
    }

    async fn remove_many(&self, token: &str, ids: &[String]) -> Result<(), ApiError> {
        let response = Request::post(&format!("{}/bulk-delete", self.base))
            .header("Authorization", &bearer(token))
            .json(&BulkDeleteRequest { ids })
            .map_err(|e| ApiError::generic(format!("Failed to serialize request: {}", e)))?
            .send()
            .await
            .map_err(ApiError::network)?;
        ensure_ok(response).await.map(|_| ())
    }

    async fn import(&self, token: &str, file: &ImportFile) -> Result<ImportResult, ApiError> {
        let form = multipart(file)?;
        let response = Request::post(&format!("{}/import", self.base))
            .header("Authorization", &bearer(token))
            .body(form)
            .map_err(|e| ApiError::generic(format!("Failed to build upload: {}", e)))?
            .send()
            .await
            .map_err(ApiError::network)?;
        decode(response).await
    }

    async fn export(
        &self,
        token: &str,
        format: ExportFormat,
        query: &ListQuery,
    ) -> Result<Vec<u8>, ApiError> {
        let url = format!(
            "{}/export?format={}&{}",
            self.base,
            format.as_str(),
            Self::query_string(query)?
        );
        let response = Request::get(&url)
            .header("Authorization", &bearer(token))
            .send()
            .await
            .map_err(ApiError::network)?;
        let response = ensure_ok(response).await?;
        response.binary().await.map_err(ApiError::parse)
    }
}
