mod profile_event;

pub use profile_event::ProfileChangedEvent;
