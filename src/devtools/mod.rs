//! Action inspection.
//!
//! Every dispatched action can be reported, with its label and the state it
//! produced, to an [`Inspector`].

mod inspector;

pub use inspector::{devtools, ActionRecord, Inspector, RecordingInspector, TracingInspector};
