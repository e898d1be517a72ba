//! Error kinds the core distinguishes, per the error-handling design:
//! invariant violations abort (they are bugs), everything else is a typed
//! `CoreError` the caller decides how to surface.

use crate::container::ContainerId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("toolkit reported an inconsistency for window {container:?}: {detail}")]
    ToolkitInconsistency { container: ContainerId, detail: String },

    #[error("requested operation is impossible: {0}")]
    ImpossibleOperation(String),

    #[error("IPC protocol error: {0}")]
    IpcProtocol(String),

    #[error("IPC command parse error: {0}")]
    IpcParse(String),

    #[error("animation target window vanished before completion")]
    AnimationTargetVanished,
}

/// Aborts the process with a diagnostic, per spec's "invariant violation is
/// a bug, abort" rule. Call sites use this instead of a bare `unreachable!`
/// so the message always names the violated invariant.
#[track_caller]
pub fn invariant_violation(detail: impl std::fmt::Display) -> ! {
    panic!("container tree invariant violated: {detail}");
}
