/// Errors surfaced by the STM runtime.
///
/// The core commit/retry protocol has no structured error channel of its
/// own — logical abort and commit conflict are expressed as plain `bool`s
/// and handled by looping, never by raising. `StmError` only exists for the
/// one condition that is fatal *and* recoverable by the caller: an
/// optional, caller-configured retry budget (see [`crate::StmConfig`])
/// running out.
#[derive(Debug, thiserror::Error)]
pub enum StmError {
    /// The transaction's retry budget (`StmConfig::max_retries`) was
    /// exhausted without reaching a successful commit.
    #[error("transaction aborted after {attempts} retries without committing")]
    RetriesExhausted {
        /// Number of action invocations attempted, including the first.
        attempts: u32,
    },
}
