pub mod api;
pub mod classify;
pub mod config;
pub mod errors;
pub mod line;
pub mod models;
pub mod pipeline;
pub mod scrape;
pub mod services;
pub mod sheets;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::line::LineClient;
use crate::services::notifier::Notifier;
use crate::sheets::SheetsClient;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub line: LineClient,
    pub sheets: SheetsClient,
    pub notifier: Option<Arc<Notifier>>,
}
