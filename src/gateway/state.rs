use std::sync::Arc;

use crate::service::PlagiarismService;
use crate::web::WebComparer;

/// Shared handler state. Cloning is cheap.
#[derive(Clone)]
pub struct HandlerState {
    pub service: Arc<PlagiarismService>,

    pub web: Arc<WebComparer>,
}

impl HandlerState {
    pub fn new(service: Arc<PlagiarismService>, web: Arc<WebComparer>) -> Self {
        Self { service, web }
    }
}
