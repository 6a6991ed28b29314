//! Profile verification wizard
//!
//! The wizard step is derived from the user's three verification timestamps:
//!
//! ```text
//! email_verified_at?  ──no──▶ 1 EmailVerification
//!        │yes
//! documents_submitted_at? ──no──▶ 2 DocumentUpload
//!        │yes
//! documents_verified_at?  ──no──▶ 3 Pending
//!        │yes
//!        ▼
//!   4 Completed
//! ```
//!
//! After a successful step action the wizard advances by one locally,
//! without waiting for the server to confirm the new timestamps.

use serde::{Deserialize, Serialize};

use super::user::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStep {
    EmailVerification = 1,
    DocumentUpload = 2,
    Pending = 3,
    Completed = 4,
}

impl VerificationStep {
    pub const ALL: [VerificationStep; 4] = [
        VerificationStep::EmailVerification,
        VerificationStep::DocumentUpload,
        VerificationStep::Pending,
        VerificationStep::Completed,
    ];

    /// Step for a user record
    pub fn for_user(user: &User) -> Self {
        if user.email_verified_at.is_none() {
            VerificationStep::EmailVerification
        } else if user.documents_submitted_at.is_none() {
            VerificationStep::DocumentUpload
        } else if user.documents_verified_at.is_none() {
            VerificationStep::Pending
        } else {
            VerificationStep::Completed
        }
    }

    /// Unknown ordinals render the email step
    pub fn from_ordinal(ordinal: u8) -> Self {
        match ordinal {
            2 => VerificationStep::DocumentUpload,
            3 => VerificationStep::Pending,
            4 => VerificationStep::Completed,
            _ => VerificationStep::EmailVerification,
        }
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Following step; `Completed` is absorbing
    pub fn next(self) -> Self {
        Self::from_ordinal((self.ordinal() + 1).min(4))
    }

    pub fn title(self) -> &'static str {
        match self {
            VerificationStep::EmailVerification => "Email",
            VerificationStep::DocumentUpload => "Documents",
            VerificationStep::Pending => "Review",
            VerificationStep::Completed => "Done",
        }
    }

    /// Whether the user can act on this step (steps 3 and 4 only display status)
    pub fn accepts_action(self) -> bool {
        matches!(
            self,
            VerificationStep::EmailVerification | VerificationStep::DocumentUpload
        )
    }
}

/// Marker for one entry of the progress bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepState {
    Completed,
    Current,
    Upcoming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepProgress {
    pub step: VerificationStep,
    pub state: StepState,
}

/// Local wizard state
///
/// Holds the step currently displayed. `sync` re-derives it from the user
/// whenever the user object changes; `advance` moves it forward after a
/// successful action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationWizard {
    current: VerificationStep,
}

impl Default for VerificationWizard {
    fn default() -> Self {
        Self {
            current: VerificationStep::EmailVerification,
        }
    }
}

impl VerificationWizard {
    pub fn for_user(user: &User) -> Self {
        Self {
            current: VerificationStep::for_user(user),
        }
    }

    pub fn current(&self) -> VerificationStep {
        self.current
    }

    /// Re-derive the step from the user record; no user leaves the step as is
    pub fn sync(&mut self, user: Option<&User>) -> VerificationStep {
        if let Some(user) = user {
            self.current = VerificationStep::for_user(user);
        }
        self.current
    }

    pub fn advance(&mut self) -> VerificationStep {
        self.current = self.current.next();
        self.current
    }

    pub fn progress(&self) -> [StepProgress; 4] {
        VerificationStep::ALL.map(|step| StepProgress {
            step,
            state: if step < self.current {
                StepState::Completed
            } else if step == self.current {
                StepState::Current
            } else {
                StepState::Upcoming
            },
        })
    }

    pub fn is_complete(&self) -> bool {
        self.current == VerificationStep::Completed
    }
}
