//! Status channel towards the host.

use std::sync::mpsc::Sender;

use tracing::debug;

use tabml_model::PipelineStatus;

/// Receives every status indicator change of a pipeline.
pub trait StatusSink: Send {
    fn publish(&self, status: PipelineStatus);
}

/// Emits status changes as `tracing` debug events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl StatusSink for TracingSink {
    fn publish(&self, status: PipelineStatus) {
        debug!(
            status = status.label(),
            color = ?status.color(),
            shape = ?status.shape(),
            "pipeline status"
        );
    }
}

impl StatusSink for Sender<PipelineStatus> {
    fn publish(&self, status: PipelineStatus) {
        // A dropped receiver only means nobody is watching.
        let _ = self.send(status);
    }
}
