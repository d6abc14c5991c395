//! Route handlers.

pub mod health;
pub mod root;
pub mod schedule;
pub mod widgets;
