pub mod batch;
pub mod cache;
pub mod config;
pub mod console;
pub mod db;
pub mod error;
pub mod fields;
pub mod i18n;
pub mod openai;
pub mod retry;
pub mod runner;
pub mod server;
pub mod translator;
pub mod validation;
