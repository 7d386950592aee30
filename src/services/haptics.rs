//! Haptic feedback gated by the user's vibration preference.
//!
//! The enabled flag is owned by the [`Haptics`] value and set from
//! [`AppSettings`](crate::types::settings::AppSettings); components that
//! vibrate receive a `Haptics` instead of reading shared state.

use serde::{Deserialize, Serialize};

/// Strength of an impact tap.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImpactStyle {
    Light,
    #[default]
    Medium,
    Heavy,
}

/// Outcome signalled by a notification pattern.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Success,
    Warning,
    Error,
}

/// Platform vibration engine.
pub trait HapticEngine: Send {
    fn impact(&self, style: ImpactStyle);
    fn notification(&self, kind: NotificationKind);
    fn selection(&self);
}

/// Engine that only logs; used where the platform has no vibration motor.
#[derive(Debug, Default)]
pub struct LogEngine;

impl HapticEngine for LogEngine {
    fn impact(&self, style: ImpactStyle) {
        log::trace!("haptic impact {:?}", style);
    }

    fn notification(&self, kind: NotificationKind) {
        log::trace!("haptic notification {:?}", kind);
    }

    fn selection(&self) {
        log::trace!("haptic selection");
    }
}

/// Haptic feedback that is a no-op while disabled.
pub struct Haptics {
    engine: Box<dyn HapticEngine>,
    enabled: bool,
}

impl Haptics {
    pub fn new(engine: Box<dyn HapticEngine>, enabled: bool) -> Self {
        Self { engine, enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn impact(&self, style: ImpactStyle) {
        if self.enabled {
            self.engine.impact(style);
        }
    }

    pub fn notification(&self, kind: NotificationKind) {
        if self.enabled {
            self.engine.notification(kind);
        }
    }

    pub fn selection(&self) {
        if self.enabled {
            self.engine.selection();
        }
    }
}
