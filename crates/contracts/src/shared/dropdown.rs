use serde::{Deserialize, Serialize};

/// Вариант значения справочного выпадающего списка
/// (тип обслуживания, тип гарантии, отдел, площадка и т.п.)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropdownOption {
    pub value: String,
    pub label: String,
}

/// Запрос на добавление нового варианта
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDropdownOptionDto {
    pub value: String,
    pub label: String,
}

/// Известные виды справочников
pub mod kinds {
    pub const MAINTENANCE_TYPE: &str = "maintenance_type";
    pub const WARRANTY_TYPE: &str = "warranty_type";
    pub const DEPARTMENT: &str = "department";
    pub const SITE: &str = "site";
    pub const USER_ROLE: &str = "user_role";
}
