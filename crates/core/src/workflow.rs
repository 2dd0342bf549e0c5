//! State machine of the attendance-submission workflow.
//!
//! ```text
//! Idle -> Locating -> Ready -> Submitting -> Succeeded | Failed
//!                       ^                         |
//!                       +------- acknowledge -----+
//! ```
//!
//! The state is pure: it decides which actions are available and what
//! the outcome of a submission does to the coordinate and capture. The
//! IO (location provider, camera, HTTP) is driven by
//! `presensi_client::submitter`, which holds this state behind a lock so
//! that checking a precondition and entering `Submitting` is one step.

use crate::capture::Capture;
use crate::geo::{Coordinate, LocationFailure};

/// Which attendance action a submission performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionKind {
    CheckIn,
    CheckOut,
}

impl SubmissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionKind::CheckIn => "check-in",
            SubmissionKind::CheckOut => "check-out",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Locating,
    Ready,
    Submitting(SubmissionKind),
    Succeeded(SubmissionKind),
    Failed(SubmissionKind),
}

/// Why an action is currently unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Precondition {
    #[error("Lokasi belum tersedia")]
    MissingCoordinate,

    #[error("Foto belum diambil")]
    MissingCapture,

    #[error("Lokasi sedang dicari")]
    Locating,

    #[error("Presensi sedang diproses")]
    Busy,
}

#[derive(Debug, Clone)]
pub struct WorkflowState {
    phase: Phase,
    coordinate: Option<Coordinate>,
    capture: Option<Capture>,
    location_error: Option<LocationFailure>,
    message: Option<String>,
    error: Option<String>,
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            coordinate: None,
            capture: None,
            location_error: None,
            message: None,
            error: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn coordinate(&self) -> Option<&Coordinate> {
        self.coordinate.as_ref()
    }

    pub fn capture(&self) -> Option<&Capture> {
        self.capture.as_ref()
    }

    pub fn location_error(&self) -> Option<&LocationFailure> {
        self.location_error.as_ref()
    }

    /// Last success message from the server.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Last failure message (server-provided or generic).
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_locating(&self) -> bool {
        self.phase == Phase::Locating
    }

    /// The busy flag: true while a submission is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Submitting(_))
    }

    pub fn check_in_blocker(&self) -> Option<Precondition> {
        self.check_out_blocker().or_else(|| {
            if self.capture.is_none() {
                Some(Precondition::MissingCapture)
            } else {
                None
            }
        })
    }

    pub fn check_out_blocker(&self) -> Option<Precondition> {
        if self.is_busy() {
            Some(Precondition::Busy)
        } else if self.is_locating() {
            Some(Precondition::Locating)
        } else if self.coordinate.is_none() {
            Some(Precondition::MissingCoordinate)
        } else {
            None
        }
    }

    pub fn can_check_in(&self) -> bool {
        self.check_in_blocker().is_none()
    }

    pub fn can_check_out(&self) -> bool {
        self.check_out_blocker().is_none()
    }

    /// Enter `Locating`. A fix cannot be requested mid-submission.
    pub fn begin_locating(&mut self) -> Result<(), Precondition> {
        if self.is_busy() {
            return Err(Precondition::Busy);
        }
        self.phase = Phase::Locating;
        Ok(())
    }

    /// Apply the result of a position request. Success clears any prior
    /// failure; failure clears any prior coordinate.
    pub fn resolve_location(&mut self, result: Result<Coordinate, LocationFailure>) {
        match result {
            Ok(coordinate) => {
                self.coordinate = Some(coordinate);
                self.location_error = None;
            }
            Err(failure) => {
                self.coordinate = None;
                self.location_error = Some(failure);
            }
        }
        if matches!(self.phase, Phase::Idle | Phase::Locating | Phase::Ready) {
            self.phase = self.settled_phase();
        }
    }

    /// Store a freshly frozen frame, replacing any previous one.
    pub fn set_capture(&mut self, capture: Capture) -> Result<(), Precondition> {
        if self.is_busy() {
            return Err(Precondition::Busy);
        }
        self.capture = Some(capture);
        Ok(())
    }

    /// Discard the current frame (retake).
    pub fn clear_capture(&mut self) -> Result<(), Precondition> {
        if self.is_busy() {
            return Err(Precondition::Busy);
        }
        self.capture = None;
        Ok(())
    }

    /// Check check-in preconditions and, if they hold, enter `Submitting`.
    /// Returns the coordinate and capture to send.
    pub fn begin_check_in(&mut self) -> Result<(Coordinate, Capture), Precondition> {
        if let Some(blocker) = self.check_in_blocker() {
            return Err(blocker);
        }
        let (Some(coordinate), Some(capture)) = (self.coordinate, self.capture.clone()) else {
            return Err(Precondition::MissingCapture);
        };
        self.enter_submitting(SubmissionKind::CheckIn);
        Ok((coordinate, capture))
    }

    /// Check check-out preconditions and, if they hold, enter `Submitting`.
    pub fn begin_check_out(&mut self) -> Result<Coordinate, Precondition> {
        if let Some(blocker) = self.check_out_blocker() {
            return Err(blocker);
        }
        let Some(coordinate) = self.coordinate else {
            return Err(Precondition::MissingCoordinate);
        };
        self.enter_submitting(SubmissionKind::CheckOut);
        Ok(coordinate)
    }

    /// Record the outcome of the in-flight submission.
    ///
    /// Success clears the capture so the next check-in needs a fresh
    /// photo. Failure keeps both the coordinate and the capture.
    pub fn finish_submission(&mut self, kind: SubmissionKind, outcome: Result<String, String>) {
        match outcome {
            Ok(message) => {
                self.capture = None;
                self.message = Some(message);
                self.error = None;
                self.phase = Phase::Succeeded(kind);
            }
            Err(error) => {
                self.message = None;
                self.error = Some(error);
                self.phase = Phase::Failed(kind);
            }
        }
    }

    /// Leave `Succeeded`/`Failed` once the outcome has been shown.
    pub fn acknowledge(&mut self) {
        if matches!(self.phase, Phase::Succeeded(_) | Phase::Failed(_)) {
            self.phase = self.settled_phase();
        }
    }

    fn enter_submitting(&mut self, kind: SubmissionKind) {
        self.message = None;
        self.error = None;
        self.phase = Phase::Submitting(kind);
    }

    fn settled_phase(&self) -> Phase {
        if self.coordinate.is_some() {
            Phase::Ready
        } else {
            Phase::Idle
        }
    }
}
