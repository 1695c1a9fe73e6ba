// Event domain module
// An event is a time slot (date + time) holding up to three matches

#![allow(clippy::module_inception)]

pub mod event;
pub mod schedule;
pub mod slot;
pub mod value_objects;

pub use event::{Event, EventDetails, EventInput};
pub use value_objects::SlotTime;
