//! The orchestration layer: the management service, its error taxonomy and
//! the transition-record plumbing.

pub mod error;
pub mod management;
pub mod record;

pub use error::ServiceError;
pub use management::{Completion, ManagementService};
pub use record::{
    log_records, ChannelSink, CollectingSink, RecordSink, TransitionKind, TransitionRecord,
};
