pub mod event_source;

pub use event_source::{EventSource, KeyboardEventSource, SimulatedEventSource};
