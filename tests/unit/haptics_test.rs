//! Unit tests for preference-gated haptic feedback.

use std::sync::{Arc, Mutex};

use qrnexus::services::haptics::{HapticEngine, Haptics, ImpactStyle, NotificationKind};

/// Engine recording every call as a short label.
#[derive(Clone, Default)]
struct Recorder {
    calls: Arc<Mutex<Vec<String>>>,
}

impl HapticEngine for Recorder {
    fn impact(&self, style: ImpactStyle) {
        self.calls.lock().unwrap().push(format!("impact:{:?}", style));
    }

    fn notification(&self, kind: NotificationKind) {
        self.calls.lock().unwrap().push(format!("notification:{:?}", kind));
    }

    fn selection(&self) {
        self.calls.lock().unwrap().push("selection".to_string());
    }
}

#[test]
fn test_enabled_haptics_reach_engine() {
    let recorder = Recorder::default();
    let haptics = Haptics::new(Box::new(recorder.clone()), true);

    haptics.impact(ImpactStyle::default());
    haptics.notification(NotificationKind::Error);
    haptics.selection();

    assert_eq!(
        *recorder.calls.lock().unwrap(),
        vec!["impact:Medium", "notification:Error", "selection"]
    );
}

#[test]
fn test_disabled_haptics_are_silent() {
    let recorder = Recorder::default();
    let haptics = Haptics::new(Box::new(recorder.clone()), false);

    haptics.impact(ImpactStyle::Heavy);
    haptics.notification(NotificationKind::Success);
    haptics.selection();

    assert!(recorder.calls.lock().unwrap().is_empty());
}

#[test]
fn test_set_enabled_takes_effect_immediately() {
    let recorder = Recorder::default();
    let mut haptics = Haptics::new(Box::new(recorder.clone()), true);

    haptics.set_enabled(false);
    assert!(!haptics.is_enabled());
    haptics.selection();
    assert!(recorder.calls.lock().unwrap().is_empty());

    haptics.set_enabled(true);
    haptics.selection();
    assert_eq!(recorder.calls.lock().unwrap().len(), 1);
}

#[test]
fn test_default_styles() {
    assert_eq!(ImpactStyle::default(), ImpactStyle::Medium);
    assert_eq!(NotificationKind::default(), NotificationKind::Success);
}
