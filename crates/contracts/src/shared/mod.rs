pub mod dropdown;
pub mod entity;
pub mod import;
pub mod list;
pub mod validation;
