use serde::{Deserialize, Serialize};

/// Ошибка импорта одной строки файла
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRowError {
    /// Номер строки в файле (как его считает сервер)
    pub row: usize,
    pub error: String,
}

/// Результат импорта файла в коллекцию
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    #[serde(default)]
    pub imported_count: usize,
    #[serde(default)]
    pub failed_count: usize,
    #[serde(default)]
    pub errors: Vec<ImportRowError>,
}

impl ImportResult {
    pub fn is_partial(&self) -> bool {
        self.failed_count > 0 || !self.errors.is_empty()
    }
}
