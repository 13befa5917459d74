//! Справочные выпадающие списки (тип обслуживания, тип гарантии, отдел, площадка, роль)

pub mod api;
pub mod field;

pub use field::DropdownField;
