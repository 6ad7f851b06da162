//! Event booking support.

pub mod calculator;

pub use calculator::{EventPlan, EventType, MenuType};
