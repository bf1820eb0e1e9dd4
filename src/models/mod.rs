pub mod activity_event;
pub mod event_action;
pub mod file_descriptor;
pub mod segment;
pub mod session_state;
