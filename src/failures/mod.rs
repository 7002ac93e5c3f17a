//! Failure log and recovery
//!
//! Every entry the batch runner cannot harvest leaves one line in a failure
//! log. A later run reads the log back to retry exactly those entries.

mod log;
mod recovery;

pub use log::{FailureLog, FAILURE_LEVEL};
pub use recovery::{
    id_from_key_value_line, id_from_plain_line, recover_failed_ids, RecoveredEntry,
};

impl FailureLog {
    /// Identifiers of every failure recorded so far
    pub fn recover(&self) -> std::io::Result<Vec<RecoveredEntry>> {
        recover_failed_ids(self.path(), self.format())
    }
}
