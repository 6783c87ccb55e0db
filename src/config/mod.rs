//! Layered configuration: files under `config/`, then `APP__` environment

mod app_config;

pub use app_config::*;
