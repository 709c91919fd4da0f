//! Uploading a dump, including the "file already exists" round trip.
//!
//! ```text
//! Idle --start--> Uploading --stored--> Done
//!                     |  \--error--> Failed
//!                     \--409--> AwaitingDecision --decide--> Uploading
//! ```

use tracing::{info, warn};

use crate::client::{AnalyticsClient, Transport, UploadOutcome};
use crate::error::ApiError;

/// What to do when the service already holds a file with the same name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictDecision {
    ReuseExisting,
    Overwrite,
}

impl ConflictDecision {
    /// `(reuse, overwrite)` flags sent with the retried upload.
    pub fn flags(self) -> (bool, bool) {
        match self {
            ConflictDecision::ReuseExisting => (true, false),
            ConflictDecision::Overwrite => (false, true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    Uploading,
    AwaitingDecision { existing: String },
    Done { file_name: String },
    Failed { message: String },
}

/// One upload attempt to run; holds the bytes so a retry can resend them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadAttempt {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub reuse: bool,
    pub overwrite: bool,
    generation: u64,
}

#[derive(Debug, Clone)]
pub struct UploadFlow {
    phase: UploadPhase,
    pending: Option<(String, Vec<u8>)>,
    generation: u64,
}

impl Default for UploadFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadFlow {
    pub fn new() -> Self {
        Self {
            phase: UploadPhase::Idle,
            pending: None,
            generation: 0,
        }
    }

    pub fn phase(&self) -> &UploadPhase {
        &self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase == UploadPhase::Uploading
    }

    /// The stored file name once the upload has finished.
    pub fn file_name(&self) -> Option<&str> {
        match &self.phase {
            UploadPhase::Done { file_name } => Some(file_name),
            _ => None,
        }
    }

    fn attempt(&mut self, file_name: String, bytes: Vec<u8>, reuse: bool, overwrite: bool) -> UploadAttempt {
        self.generation += 1;
        self.phase = UploadPhase::Uploading;
        UploadAttempt {
            file_name,
            bytes,
            reuse,
            overwrite,
            generation: self.generation,
        }
    }

    /// Start uploading a freshly picked file. Ignored while a previous upload
    /// is still running.
    pub fn start(&mut self, file_name: impl Into<String>, bytes: Vec<u8>) -> Option<UploadAttempt> {
        if self.is_busy() {
            return None;
        }
        let file_name = file_name.into();
        self.pending = Some((file_name.clone(), bytes.clone()));
        Some(self.attempt(file_name, bytes, false, false))
    }

    /// Answer the conflict prompt; only valid while awaiting a decision.
    pub fn decide(&mut self, decision: ConflictDecision) -> Option<UploadAttempt> {
        if !matches!(self.phase, UploadPhase::AwaitingDecision { .. }) {
            return None;
        }
        let (file_name, bytes) = self.pending.clone()?;
        let (reuse, overwrite) = decision.flags();
        info!(%file_name, ?decision, "resolving upload conflict");
        Some(self.attempt(file_name, bytes, reuse, overwrite))
    }

    /// Dismiss the conflict prompt without uploading.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.pending = None;
        self.phase = UploadPhase::Idle;
    }

    pub fn apply(&mut self, attempt: &UploadAttempt, result: Result<UploadOutcome, ApiError>) -> &UploadPhase {
        if attempt.generation != self.generation {
            return &self.phase;
        }

        self.phase = match result {
            Ok(UploadOutcome::Stored { file_name }) => {
                info!(%file_name, "dump uploaded");
                self.pending = None;
                UploadPhase::Done { file_name }
            }
            Ok(UploadOutcome::Conflict { file_name }) => UploadPhase::AwaitingDecision { existing: file_name },
            Err(e) => {
                warn!(file_name = %attempt.file_name, error = %e, "upload failed");
                self.pending = None;
                UploadPhase::Failed {
                    message: "Failed to upload file".to_string(),
                }
            }
        };
        &self.phase
    }

    pub async fn send<T: Transport>(
        client: &AnalyticsClient<T>,
        attempt: &UploadAttempt,
    ) -> Result<UploadOutcome, ApiError> {
        client
            .upload(&attempt.file_name, attempt.bytes.clone(), attempt.reuse, attempt.overwrite)
            .await
    }

    /// Send `attempt` and apply the outcome.
    pub async fn run<T: Transport>(&mut self, client: &AnalyticsClient<T>, attempt: UploadAttempt) -> &UploadPhase {
        let result = Self::send(client, &attempt).await;
        self.apply(&attempt, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_waits_for_decision() {
        let mut flow = UploadFlow::new();
        let first = flow.start("dump.zip", vec![1, 2, 3]).unwrap();
        assert!(!first.reuse && !first.overwrite);
        assert!(flow.start("other.zip", vec![]).is_none());

        flow.apply(
            &first,
            Ok(UploadOutcome::Conflict {
                file_name: "dump.zip".into(),
            }),
        );
        assert_eq!(
            flow.phase(),
            &UploadPhase::AwaitingDecision {
                existing: "dump.zip".into()
            }
        );

        let retry = flow.decide(ConflictDecision::Overwrite).unwrap();
        assert_eq!(retry.bytes, vec![1, 2, 3]);
        assert!(retry.overwrite && !retry.reuse);

        flow.apply(
            &retry,
            Ok(UploadOutcome::Stored {
                file_name: "dump.zip".into(),
            }),
        );
        assert_eq!(flow.file_name(), Some("dump.zip"));
    }

    #[test]
    fn test_decide_outside_conflict_is_ignored() {
        let mut flow = UploadFlow::new();
        assert!(flow.decide(ConflictDecision::ReuseExisting).is_none());
    }

    #[test]
    fn test_cancel_drops_in_flight_result() {
        let mut flow = UploadFlow::new();
        let attempt = flow.start("dump.zip", vec![]).unwrap();
        flow.cancel();
        flow.apply(
            &attempt,
            Ok(UploadOutcome::Stored {
                file_name: "dump.zip".into(),
            }),
        );
        assert_eq!(flow.phase(), &UploadPhase::Idle);
    }

    #[test]
    fn test_error_fails_with_generic_message() {
        let mut flow = UploadFlow::new();
        let attempt = flow.start("dump.zip", vec![]).unwrap();
        flow.apply(&attempt, Err(ApiError::Status { status: 500, body: "disk full".into() }));
        assert_eq!(
            flow.phase(),
            &UploadPhase::Failed {
                message: "Failed to upload file".into()
            }
        );
        assert!(flow.start("dump.zip", vec![]).is_some());
    }
}
