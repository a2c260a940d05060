use std::sync::Arc;

use configs::FormsConfig;
use service::forms::{FormRepository, FormService};

/// Shared handler state; cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub forms: FormService,
    pub default_limit: i64,
}

impl AppState {
    pub fn new(repo: Arc<dyn FormRepository>, cfg: FormsConfig) -> Self {
        Self {
            forms: FormService::new(repo).with_max_limit(i64::from(cfg.max_limit)),
            default_limit: i64::from(cfg.default_limit),
        }
    }
}
