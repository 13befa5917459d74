pub mod api_error;
pub mod api_utils;
pub mod components;
pub mod config;
pub mod date_utils;
pub mod dropdown;
pub mod export;
pub mod icons;
pub mod list_controller;
pub mod list_page;
pub mod list_utils;
pub mod modal_frame;
