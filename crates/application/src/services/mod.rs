mod event_service;

pub use event_service::{
    CreateEventRequest, CreatedEvent, EventService, EventServiceDependencies,
};
