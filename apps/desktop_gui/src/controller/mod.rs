//! Controller layer: UI events, store dispatch, and command orchestration.

pub mod events;
pub mod orchestration;
