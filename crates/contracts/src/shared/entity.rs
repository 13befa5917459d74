//! Общие трейты для записей, которые редактируются через списки и модальные формы
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

use super::validation::{validate_fields, FieldErrors, FieldRules};

/// Режим модальной формы
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Creating,
    Editing,
}

/// Редактируемая копия полей записи (то, что уходит в create/update)
pub trait EntityDraft:
    Clone + Debug + Default + PartialEq + Serialize + Send + Sync + 'static
{
    /// Значение поля по техническому имени
    fn field(&self, name: &str) -> Option<&str>;

    /// Установить значение поля; false если такого поля нет
    fn set_field(&mut self, name: &str, value: String) -> bool;

    /// Правила проверки для режима формы
    fn rules(mode: FormMode) -> Vec<FieldRules>;

    /// Копия с обрезанными пробелами (то, что реально отправляется на сервер)
    fn trimmed(&self) -> Self;

    fn validate(&self, mode: FormMode) -> FieldErrors {
        let rules = Self::rules(mode);
        validate_fields(&rules, |name| self.field(name))
    }
}

/// Запись коллекции, которую отдаёт сервер
pub trait ListEntity: Clone + Debug + DeserializeOwned + Send + Sync + 'static {
    type Draft: EntityDraft;

    /// Сегмент пути REST ресурса, например `"customers"`
    const RESOURCE: &'static str;

    /// Стабильный серверный идентификатор
    fn entity_id(&self) -> &str;

    /// Черновик для формы редактирования
    fn to_draft(&self) -> Self::Draft;
}

/// Обрезает пробелы у строкового поля черновика
pub fn trim_field(value: &str) -> String {
    value.trim().to_string()
}

/// Сериализует денежное поле черновика числом; пустая строка уходит как `null`,
/// нечисловой ввод отправляется как есть (сервер вернёт ошибку поля)
pub fn serialize_amount<S>(value: &str, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return serializer.serialize_none();
    }
    match trimmed.parse::<f64>() {
        Ok(number) => serializer.serialize_f64(number),
        Err(_) => serializer.serialize_str(trimmed),
    }
}

/// Обратная операция для ответа сервера: число или строка -> строка черновика
pub fn format_amount(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
