//! Настройки клиента: адрес API, задержки и ключи хранилища

/// Порт backend сервера, если адрес не задан при сборке
pub const API_PORT: u16 = 3000;

/// Адрес API, заданный при сборке (`API_BASE_URL=https://assets.example.com trunk build`)
pub const API_BASE_URL_OVERRIDE: Option<&str> = option_env!("API_BASE_URL");

/// Задержка между последним нажатием клавиши и запросом списка, мс
pub const SEARCH_DEBOUNCE_MS: u32 = 500;

/// Ключ токена доступа в localStorage / sessionStorage
pub const ACCESS_TOKEN_KEY: &str = "asset_console_access_token";
