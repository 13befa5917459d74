use contracts::system::auth::{LoginRequest, LoginResponse, UserInfo};
use gloo_net::http::{Request, Response};

use crate::shared::api_error::ApiError;
use crate::shared::api_utils::{api_url, bearer};

async fn read_error(response: Response) -> ApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    ApiError::from_response(status, &body)
}

/// Login with email and password
pub async fn login(email: String, password: String) -> Result<LoginResponse, ApiError> {
    let request = LoginRequest { email, password };

    let response = Request::post(&api_url("/api/auth/login"))
        .json(&request)
        .map_err(|e| ApiError::generic(format!("Failed to serialize request: {}", e)))?
        .send()
        .await
        .map_err(ApiError::network)?;

    if response.status() == 401 {
        return Err(ApiError::generic("Invalid email or password"));
    }
    if !response.ok() {
        return Err(read_error(response).await);
    }

    response
        .json::<LoginResponse>()
        .await
        .map_err(ApiError::parse)
}

/// Get current user info
pub async fn get_current_user(access_token: &str) -> Result<UserInfo, ApiError> {
    let response = Request::get(&api_url("/api/auth/me"))
        .header("Authorization", &bearer(access_token))
        .send()
        .await
        .map_err(ApiError::network)?;

    if !response.ok() {
        return Err(read_error(response).await);
    }

    response.json::<UserInfo>().await.map_err(ApiError::parse)
}
