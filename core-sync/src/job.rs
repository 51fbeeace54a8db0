//! # Run State Machine
//!
//! Tracks the phase of a reconciliation run and what it accomplished.
//!
//! ## State Machine
//!
//! ```text
//! Start → ScanLocal → Authenticate → ListRemote → ProcessItem* → Done
//!                          ↓                           ↓
//!                       Aborted ←──────────────────────┘
//! ```
//!
//! `ListRemote` goes straight to `Done` when no eligible image was found.
//! `Done` and `Aborted` are terminal.

use crate::{Result, SyncError};
use std::fmt;

/// Phase of a reconciliation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Start,
    ScanLocal,
    Authenticate,
    ListRemote,
    ProcessItem,
    Done,
    Aborted,
}

impl SyncPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncPhase::Start => "start",
            SyncPhase::ScanLocal => "scan_local",
            SyncPhase::Authenticate => "authenticate",
            SyncPhase::ListRemote => "list_remote",
            SyncPhase::ProcessItem => "process_item",
            SyncPhase::Done => "done",
            SyncPhase::Aborted => "aborted",
        }
    }

    fn can_transition_to(&self, to: SyncPhase) -> bool {
        matches!(
            (self, to),
            (SyncPhase::Start, SyncPhase::ScanLocal)
                | (SyncPhase::ScanLocal, SyncPhase::Authenticate)
                | (SyncPhase::Authenticate, SyncPhase::ListRemote)
                | (SyncPhase::Authenticate, SyncPhase::Aborted)
                | (SyncPhase::ListRemote, SyncPhase::ProcessItem)
                | (SyncPhase::ListRemote, SyncPhase::Done)
                | (SyncPhase::ProcessItem, SyncPhase::ProcessItem)
                | (SyncPhase::ProcessItem, SyncPhase::Done)
                | (SyncPhase::ProcessItem, SyncPhase::Aborted)
        )
    }
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a run stopped early
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// No bearer token could be obtained
    Authentication(String),
    /// The original image was not accepted
    OriginalUpload,
    /// The thumbnail could not be produced
    ThumbnailGeneration(String),
    /// The thumbnail was not accepted
    ThumbnailUpload,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::Authentication(msg) => write!(f, "authentication failed: {}", msg),
            AbortReason::OriginalUpload => f.write_str("original upload failed"),
            AbortReason::ThumbnailGeneration(msg) => {
                write!(f, "thumbnail generation failed: {}", msg)
            }
            AbortReason::ThumbnailUpload => f.write_str("thumbnail upload failed"),
        }
    }
}

/// Outcome of a reconciliation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Last phase reached
    pub phase: SyncPhase,
    /// Eligible images found locally
    pub scanned: usize,
    /// Images already present remotely
    pub skipped: usize,
    /// Images whose original and thumbnail were both uploaded
    pub uploaded: usize,
    /// Image being processed when the run aborted
    pub aborted_at: Option<String>,
    pub abort_reason: Option<AbortReason>,
    /// Remote listing failed and was treated as empty
    pub remote_degraded: bool,
}

impl Default for SyncReport {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncReport {
    pub fn new() -> Self {
        Self {
            phase: SyncPhase::Start,
            scanned: 0,
            skipped: 0,
            uploaded: 0,
            aborted_at: None,
            abort_reason: None,
            remote_degraded: false,
        }
    }

    /// Move to the next phase.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidStateTransition`] if `to` does not follow
    /// the current phase.
    pub fn transition(&mut self, to: SyncPhase) -> Result<()> {
        if !self.phase.can_transition_to(to) {
            return Err(SyncError::InvalidStateTransition {
                from: self.phase.as_str().to_string(),
                to: to.as_str().to_string(),
            });
        }

        self.phase = to;
        Ok(())
    }

    /// Enter `Aborted`, recording the item (if any) and the reason.
    pub fn abort(&mut self, item: Option<&str>, reason: AbortReason) -> Result<()> {
        self.transition(SyncPhase::Aborted)?;
        self.aborted_at = item.map(str::to_string);
        self.abort_reason = Some(reason);
        Ok(())
    }

    /// The run reached `Done`
    pub fn is_success(&self) -> bool {
        self.phase == SyncPhase::Done
    }

    /// Eligible images neither skipped nor uploaded
    pub fn remaining(&self) -> usize {
        self.scanned.saturating_sub(self.skipped + self.uploaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let mut report = SyncReport::new();
        for phase in [
            SyncPhase::ScanLocal,
            SyncPhase::Authenticate,
            SyncPhase::ListRemote,
            SyncPhase::ProcessItem,
            SyncPhase::ProcessItem,
            SyncPhase::Done,
        ] {
            report.transition(phase).unwrap();
        }

        assert!(report.is_success());
    }

    #[test]
    fn test_empty_run_skips_process_item() {
        let mut report = SyncReport::new();
        report.transition(SyncPhase::ScanLocal).unwrap();
        report.transition(SyncPhase::Authenticate).unwrap();
        report.transition(SyncPhase::ListRemote).unwrap();
        report.transition(SyncPhase::Done).unwrap();

        assert!(report.is_success());
    }

    #[test]
    fn test_invalid_transitions() {
        let mut report = SyncReport::new();
        assert!(report.transition(SyncPhase::Authenticate).is_err());

        report.transition(SyncPhase::ScanLocal).unwrap();
        assert!(matches!(
            report.transition(SyncPhase::Aborted),
            Err(SyncError::InvalidStateTransition { ref from, ref to })
                if from == "scan_local" && to == "aborted"
        ));
        assert_eq!(report.phase, SyncPhase::ScanLocal);
    }

    #[test]
    fn test_terminal_phases_are_final() {
        let mut report = SyncReport::new();
        report.transition(SyncPhase::ScanLocal).unwrap();
        report.transition(SyncPhase::Authenticate).unwrap();
        report
            .abort(None, AbortReason::Authentication("401".to_string()))
            .unwrap();

        assert!(!report.is_success());
        assert!(report.transition(SyncPhase::ListRemote).is_err());
        assert!(report.transition(SyncPhase::Done).is_err());
    }

    #[test]
    fn test_abort_records_item() {
        let mut report = SyncReport::new();
        for phase in [
            SyncPhase::ScanLocal,
            SyncPhase::Authenticate,
            SyncPhase::ListRemote,
            SyncPhase::ProcessItem,
        ] {
            report.transition(phase).unwrap();
        }
        report.scanned = 3;
        report.uploaded = 1;

        report
            .abort(Some("22222.jpg"), AbortReason::ThumbnailUpload)
            .unwrap();

        assert_eq!(report.phase, SyncPhase::Aborted);
        assert_eq!(report.aborted_at.as_deref(), Some("22222.jpg"));
        assert_eq!(report.abort_reason, Some(AbortReason::ThumbnailUpload));
        assert_eq!(report.remaining(), 2);
    }

    #[test]
    fn test_abort_reason_display() {
        assert_eq!(
            AbortReason::Authentication("bad credentials".to_string()).to_string(),
            "authentication failed: bad credentials"
        );
        assert_eq!(AbortReason::OriginalUpload.to_string(), "original upload failed");
    }
}
