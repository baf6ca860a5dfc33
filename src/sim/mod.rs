pub mod event;
pub mod lobby;
pub mod match_state;
pub mod router;
pub mod schedule;
pub mod step;
