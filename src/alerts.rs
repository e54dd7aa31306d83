/*
 *  alerts.rs
 *
 *  PhaseScope - stereo field monitor
 *  (c) 2025-26 the PhaseScope authors
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */
//! Phase and mono-compatibility alerting. Evaluation is pure and runs on
//! every submitted sample, independent of render cadence; delivery goes
//! through caller-registered callbacks and keeps no history here.

use std::panic::{AssertUnwindSafe, catch_unwind};

use arrayvec::ArrayVec;
use log::warn;

use crate::sample::StereoSample;

/// |correlation| below this is a high-severity phase problem.
pub const PHASE_POOR_THRESHOLD: f32 = 0.3;
/// |correlation| below this (but not poor) is a medium phase problem.
pub const PHASE_MODERATE_THRESHOLD: f32 = 0.6;
/// Mono compatibility below this raises a mono alert.
pub const MONO_COMPAT_THRESHOLD: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
}

impl AlertSeverity {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertSeverity::Low => "low",
            AlertSeverity::Medium => "medium",
            AlertSeverity::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Phase,
    MonoCompatibility,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alert {
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub message: &'static str,
    /// The raw reading that tripped the rule.
    pub value: f32,
}

/// Inspect one sample. At most one phase alert and one mono alert per
/// sample; thresholds compare with `<`, so the boundary values
/// themselves do not fire.
pub fn evaluate(sample: &StereoSample) -> ArrayVec<Alert, 2> {
    let mut alerts = ArrayVec::new();

    let corr = sample.correlation.abs();
    if corr < PHASE_POOR_THRESHOLD {
        alerts.push(Alert {
            kind: AlertKind::Phase,
            severity: AlertSeverity::High,
            message: "poor phase correlation detected",
            value: sample.correlation,
        });
    } else if corr < PHASE_MODERATE_THRESHOLD {
        alerts.push(Alert {
            kind: AlertKind::Phase,
            severity: AlertSeverity::Medium,
            message: "moderate phase issues",
            value: sample.correlation,
        });
    }

    if sample.mono_compatibility < MONO_COMPAT_THRESHOLD {
        alerts.push(Alert {
            kind: AlertKind::MonoCompatibility,
            severity: AlertSeverity::Medium,
            message: "mono compatibility degraded",
            value: sample.mono_compatibility,
        });
    }

    alerts
}

pub type PhaseAlertHandler = Box<dyn FnMut(&str, AlertSeverity)>;
pub type MonoAlertHandler = Box<dyn FnMut(f32)>;

/// Owns the outbound alert callbacks. Handlers are treated as untrusted
/// observers: each invocation is isolated so one panicking handler
/// cannot swallow the remaining alerts for the same sample.
#[derive(Default)]
pub struct AlertSink {
    on_phase: Option<PhaseAlertHandler>,
    on_mono: Option<MonoAlertHandler>,
}

impl AlertSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_phase_handler(&mut self, handler: PhaseAlertHandler) {
        self.on_phase = Some(handler);
    }

    pub fn set_mono_handler(&mut self, handler: MonoAlertHandler) {
        self.on_mono = Some(handler);
    }

    /// Deliver alerts in evaluation order.
    pub fn dispatch(&mut self, alerts: &[Alert]) {
        for alert in alerts {
            match alert.kind {
                AlertKind::Phase => {
                    if let Some(cb) = self.on_phase.as_mut() {
                        let outcome =
                            catch_unwind(AssertUnwindSafe(|| cb(alert.message, alert.severity)));
                        if outcome.is_err() {
                            warn!("phase alert handler panicked; continuing");
                        }
                    }
                }
                AlertKind::MonoCompatibility => {
                    if let Some(cb) = self.on_mono.as_mut() {
                        let outcome = catch_unwind(AssertUnwindSafe(|| cb(alert.value)));
                        if outcome.is_err() {
                            warn!("mono alert handler panicked; continuing");
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn sample_with(correlation: f32, mono_compatibility: f32) -> StereoSample {
        StereoSample {
            correlation,
            mono_compatibility,
            ..Default::default()
        }
    }

    #[test]
    fn test_phase_boundary_high() {
        // exactly 0.3 is not poor; just below is
        let alerts = evaluate(&sample_with(0.3, 1.0));
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, AlertSeverity::Medium);

        let alerts = evaluate(&sample_with(0.2999, 1.0));
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, AlertSeverity::High);
        assert_eq!(alerts[0].message, "poor phase correlation detected");
    }

    #[test]
    fn test_phase_boundary_medium() {
        // exactly 0.6 produces no phase alert at all
        assert!(evaluate(&sample_with(0.6, 1.0)).is_empty());
        let alerts = evaluate(&sample_with(0.5999, 1.0));
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].message, "moderate phase issues");
    }

    #[test]
    fn test_phase_uses_magnitude() {
        let alerts = evaluate(&sample_with(-0.1, 1.0));
        assert_eq!(alerts[0].severity, AlertSeverity::High);
        assert!(evaluate(&sample_with(-0.9, 1.0)).is_empty());
    }

    #[test]
    fn test_mono_boundary() {
        assert!(evaluate(&sample_with(1.0, 0.7)).is_empty());
        let alerts = evaluate(&sample_with(1.0, 0.6999));
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::MonoCompatibility);
        assert!((alerts[0].value - 0.6999).abs() < 1e-6);
    }

    #[test]
    fn test_both_rules_fire_once_each() {
        let alerts = evaluate(&sample_with(0.1, 0.5));
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].kind, AlertKind::Phase);
        assert_eq!(alerts[1].kind, AlertKind::MonoCompatibility);
    }

    #[test]
    fn test_sink_delivers_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut sink = AlertSink::new();
        let s1 = Rc::clone(&seen);
        sink.set_phase_handler(Box::new(move |msg, sev| {
            s1.borrow_mut().push(format!("{}:{msg}", sev.as_str()));
        }));
        let s2 = Rc::clone(&seen);
        sink.set_mono_handler(Box::new(move |v| {
            s2.borrow_mut().push(format!("mono:{v:.1}"));
        }));

        sink.dispatch(&evaluate(&sample_with(0.1, 0.5)));
        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], "high:poor phase correlation detected");
        assert_eq!(seen[1], "mono:0.5");
    }

    #[test]
    fn test_panicking_handler_does_not_block_later_alerts() {
        let prev_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(|_| {}));

        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut sink = AlertSink::new();
        sink.set_phase_handler(Box::new(|_, _| panic!("observer bug")));
        let s = Rc::clone(&seen);
        sink.set_mono_handler(Box::new(move |v| s.borrow_mut().push(v)));

        sink.dispatch(&evaluate(&sample_with(0.1, 0.5)));
        std::panic::set_hook(prev_hook);

        assert_eq!(seen.borrow().len(), 1);
    }
}
