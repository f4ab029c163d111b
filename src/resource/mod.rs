//! Async resource state.
//!
//! Data-fetching actions move a [`Resource`] through
//! `Idle → Loading → Success | Error` and use a [`RequestTracker`] so that a
//! superseded request cannot overwrite a newer one.

mod resource;
mod tracker;

pub use resource::Resource;
pub use tracker::{RequestToken, RequestTracker};
