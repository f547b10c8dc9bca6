use thiserror::Error;

use crate::common::Role;

/// Errors that fail a whole directive.
///
/// Channel write failures are NOT here: they are recorded per recipient as
/// failed delivery records. Audit write failures never surface at all; they
/// go to telemetry only.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The user/role directory could not be reached; the directive fails
    /// rather than delivering to a partial or stale recipient set.
    #[error("user directory unavailable for role {role}: {source}")]
    DirectoryUnavailable {
        role: Role,
        #[source]
        source: anyhow::Error,
    },

    /// The directory lookup exceeded its deadline. Not retried inline.
    #[error("user directory lookup for role {role} timed out after {timeout_ms}ms")]
    DirectoryTimeout { role: Role, timeout_ms: u64 },
}
