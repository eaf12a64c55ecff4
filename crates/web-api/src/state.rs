use std::sync::Arc;

use application::EventService;

#[derive(Clone)]
pub struct AppState {
    pub event_service: Arc<EventService>,
}

impl AppState {
    pub fn new(event_service: Arc<EventService>) -> Self {
        Self { event_service }
    }
}
