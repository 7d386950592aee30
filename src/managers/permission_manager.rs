//! Permission Manager for QR Nexus.
//!
//! Wraps the platform permission prompt for the camera and the media
//! library. A denial aborts the calling flow with a user-facing message;
//! nothing is retried automatically.

use std::collections::HashMap;

use crate::types::errors::PermissionError;
use crate::types::permission::{PermissionKind, PermissionStatus};

/// Platform side of a permission prompt.
pub trait PermissionProvider: Send {
    /// Current status without prompting.
    fn status(&self, kind: PermissionKind) -> PermissionStatus;
    /// Prompts the user (if the platform still allows it) and returns the answer.
    fn request(&mut self, kind: PermissionKind) -> PermissionStatus;
}

/// Trait defining permission management operations.
pub trait PermissionManagerTrait {
    fn require(&mut self, kind: PermissionKind) -> Result<(), PermissionError>;
    fn last_status(&self, kind: PermissionKind) -> PermissionStatus;
}

/// Permission manager remembering the last answer per capability.
pub struct PermissionManager {
    provider: Box<dyn PermissionProvider>,
    answers: HashMap<PermissionKind, PermissionStatus>,
}

impl PermissionManager {
    pub fn new(provider: Box<dyn PermissionProvider>) -> Self {
        Self {
            provider,
            answers: HashMap::new(),
        }
    }
}

impl PermissionManagerTrait for PermissionManager {
    /// Ensures `kind` is granted, prompting when it is not yet.
    fn require(&mut self, kind: PermissionKind) -> Result<(), PermissionError> {
        let status = match self.provider.status(kind) {
            PermissionStatus::Granted => PermissionStatus::Granted,
            _ => self.provider.request(kind),
        };
        self.answers.insert(kind, status);

        if status == PermissionStatus::Granted {
            Ok(())
        } else {
            log::info!("permission {:?} not granted ({:?})", kind, status);
            Err(PermissionError::Denied(kind))
        }
    }

    fn last_status(&self, kind: PermissionKind) -> PermissionStatus {
        self.answers
            .get(&kind)
            .copied()
            .unwrap_or(PermissionStatus::Undetermined)
    }
}

/// Provider that grants everything; used by headless hosts.
#[derive(Debug, Default)]
pub struct GrantAll;

impl PermissionProvider for GrantAll {
    fn status(&self, _kind: PermissionKind) -> PermissionStatus {
        PermissionStatus::Granted
    }

    fn request(&mut self, _kind: PermissionKind) -> PermissionStatus {
        PermissionStatus::Granted
    }
}
