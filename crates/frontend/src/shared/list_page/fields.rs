//! Описание колонок таблицы и полей модальной формы

use contracts::shared::entity::FormMode;

/// Вид поля формы
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Phone,
    Password,
    Date,
    Number,
    TextArea,
    /// Фиксированный список (значение, подпись)
    Select(&'static [(&'static str, &'static str)]),
    /// Справочник с сервера, `kind` из `contracts::shared::dropdown::kinds`
    Dropdown(&'static str),
}

impl FieldKind {
    /// Атрибут `type` для `<input>`
    pub fn input_type(self) -> &'static str {
        match self {
            FieldKind::Email => "email",
            FieldKind::Phone => "tel",
            FieldKind::Password => "password",
            FieldKind::Date => "date",
            FieldKind::Number => "number",
            _ => "text",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField {
    /// Имя поля черновика
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    /// Отметка `*`; сама проверка живёт в правилах черновика
    pub required: bool,
    /// Поле показывается только при создании (пароль)
    pub create_only: bool,
}

impl FormField {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            create_only: false,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn create_only(mut self) -> Self {
        self.create_only = true;
        self
    }

    pub fn visible_in(&self, mode: FormMode) -> bool {
        !self.create_only || mode == FormMode::Creating
    }
}

/// Колонка таблицы
pub struct Column<E> {
    /// Поле сортировки на сервере; `None`: колонка не сортируется
    pub sort_field: Option<&'static str>,
    pub label: &'static str,
    pub render: fn(&E) -> String,
    pub min_width: f64,
}

impl<E> Clone for Column<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Column<E> {}

impl<E> Column<E> {
    pub fn sortable(sort_field: &'static str, label: &'static str, render: fn(&E) -> String) -> Self {
        Self {
            sort_field: Some(sort_field),
            label,
            render,
            min_width: 120.0,
        }
    }

    pub fn plain(label: &'static str, render: fn(&E) -> String) -> Self {
        Self {
            sort_field: None,
            label,
            render,
            min_width: 100.0,
        }
    }

    pub fn width(mut self, min_width: f64) -> Self {
        self.min_width = min_width;
        self
    }
}

/// Необязательное значение для ячейки
pub fn or_dash(value: &Option<String>) -> String {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}
