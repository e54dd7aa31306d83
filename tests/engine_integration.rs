/*
 *  tests/engine_integration.rs
 *
 *  End-to-end tests for the visualization engine public API.
 *
 *  PhaseScope - stereo field monitor
 *  (c) 2025-26 the PhaseScope authors
 */

use std::cell::RefCell;
use std::rc::Rc;

use phasescope::{
    AlertSeverity, ColorScheme, DisplayMode, FrameSurface, PhaseScope, StereoSample, VizConfig,
};

fn engine(width: u32, height: u32, config: VizConfig) -> PhaseScope<FrameSurface<embedded_graphics::pixelcolor::Rgb888>> {
    let scheme = ColorScheme::by_id_or_default(&config.color_scheme);
    let surface = FrameSurface::new(width, height, scheme.background);
    PhaseScope::new(surface, config).expect("engine construction")
}

fn clean_sample() -> StereoSample {
    StereoSample {
        correlation: 1.0,
        stereo_width: 0.0,
        mono_compatibility: 1.0,
        phase_stability: 1.0,
        left_energy: 0.5,
        right_energy: 0.5,
        stereo_position: 0.0,
        ..Default::default()
    }
}

#[test]
fn balance_mode_centers_the_dot_and_stays_quiet() {
    let mut config = VizConfig::default();
    config.mode = DisplayMode::Balance;
    let mut scope = engine(200, 200, config);

    let phase_count = Rc::new(RefCell::new(0u32));
    let mono_count = Rc::new(RefCell::new(0u32));
    let p = Rc::clone(&phase_count);
    scope.on_phase_alert(Box::new(move |_, _| *p.borrow_mut() += 1));
    let m = Rc::clone(&mono_count);
    scope.on_mono_compatibility_alert(Box::new(move |_| *m.borrow_mut() += 1));

    scope.submit_sample(clean_sample());
    scope.tick(0);

    let accent = scope.scheme().accent;
    assert_eq!(scope.surface().get(100, 100), Some(accent));
    assert_eq!(*phase_count.borrow(), 0);
    assert_eq!(*mono_count.borrow(), 0);
}

#[test]
fn problem_sample_fires_exactly_one_high_phase_and_one_mono_alert() {
    let mut scope = engine(160, 120, VizConfig::default());

    let phase_alerts = Rc::new(RefCell::new(Vec::new()));
    let mono_values = Rc::new(RefCell::new(Vec::new()));
    let p = Rc::clone(&phase_alerts);
    scope.on_phase_alert(Box::new(move |msg, sev| {
        p.borrow_mut().push((msg.to_string(), sev));
    }));
    let m = Rc::clone(&mono_values);
    scope.on_mono_compatibility_alert(Box::new(move |v| m.borrow_mut().push(v)));

    scope.submit_sample(StereoSample {
        correlation: 0.1,
        mono_compatibility: 0.5,
        ..clean_sample()
    });

    let phase_alerts = phase_alerts.borrow();
    assert_eq!(phase_alerts.len(), 1);
    assert_eq!(phase_alerts[0].1, AlertSeverity::High);
    assert_eq!(phase_alerts[0].0, "poor phase correlation detected");
    let mono_values = mono_values.borrow();
    assert_eq!(mono_values.len(), 1);
    assert!((mono_values[0] - 0.5).abs() < 1e-6);
}

#[test]
fn warnings_toggle_gates_alerting() {
    let mut config = VizConfig::default();
    config.show_warnings = false;
    let mut scope = engine(160, 120, config);

    let count = Rc::new(RefCell::new(0u32));
    let c = Rc::clone(&count);
    scope.on_phase_alert(Box::new(move |_, _| *c.borrow_mut() += 1));

    scope.submit_sample(StereoSample { correlation: 0.0, ..clean_sample() });
    assert_eq!(*count.borrow(), 0);

    scope.set_show_warnings(true);
    scope.submit_sample(StereoSample { correlation: 0.0, ..clean_sample() });
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn alerting_is_not_rate_limited_but_rendering_coalesces() {
    let mut config = VizConfig::default();
    config.target_fps = 30;
    let mut scope = engine(120, 120, config);

    let count = Rc::new(RefCell::new(0u32));
    let c = Rc::clone(&count);
    scope.on_phase_alert(Box::new(move |_, _| *c.borrow_mut() += 1));

    // a burst of samples between two ticks: every one is alert-checked
    for _ in 0..5 {
        scope.submit_sample(StereoSample { correlation: 0.1, ..clean_sample() });
    }
    scope.tick(0);
    assert_eq!(*count.borrow(), 5);
    assert_eq!(scope.stats().frames_rendered, 1);
}

#[test]
fn idle_engine_renders_chrome_without_a_sample() {
    let mut scope = engine(160, 120, VizConfig::default());
    scope.tick(0);
    assert!(!scope.is_active());
    // corner stays background, but the frame did render
    let bg = scope.scheme().background;
    assert_eq!(scope.surface().get(0, 0), Some(bg));
    assert_eq!(scope.stats().frames_rendered, 1);
}

#[test]
fn repeated_renders_of_the_same_sample_are_pixel_identical() {
    let mut config = VizConfig::default();
    config.show_history = false; // pure renderer path only
    config.target_fps = 60;
    let mut scope = engine(140, 140, config);

    scope.submit_sample(StereoSample { correlation: 0.4, stereo_width: 0.7, ..clean_sample() });
    scope.tick(0);
    let first = scope.surface().as_slice().to_vec();
    scope.tick(17);
    let second = scope.surface().as_slice().to_vec();
    assert_eq!(scope.stats().frames_rendered, 2);
    assert_eq!(first, second);
}

#[test]
fn frame_rate_ceiling_holds_under_fast_refresh() {
    let mut config = VizConfig::default();
    config.target_fps = 30;
    let mut scope = engine(120, 120, config);
    scope.submit_sample(clean_sample());

    // 200Hz refresh for one second
    for i in 0..200u64 {
        scope.tick(i * 5);
    }
    let stats = scope.stats();
    assert!(stats.frames_rendered <= 31, "rendered {}", stats.frames_rendered);
    assert!(stats.frames_rendered >= 28);
}

#[test]
fn stop_is_idempotent_and_halts_rendering() {
    let mut scope = engine(120, 120, VizConfig::default());
    scope.submit_sample(clean_sample());
    scope.tick(0);
    assert_eq!(scope.stats().frames_rendered, 1);

    scope.stop();
    scope.stop();
    for i in 1..50u64 {
        scope.tick(i * 100);
    }
    assert_eq!(scope.stats().frames_rendered, 1);

    scope.start();
    scope.tick(10_000);
    assert_eq!(scope.stats().frames_rendered, 2);
}

#[test]
fn mode_switch_is_a_configuration_change() {
    let mut scope = engine(160, 160, VizConfig::default());
    scope.submit_sample(StereoSample {
        correlation: 0.8,
        correlation_history: Some(vec![0.1, 0.4, 0.8]),
        ..clean_sample()
    });
    for (i, mode) in [
        DisplayMode::Goniometer,
        DisplayMode::Correlation,
        DisplayMode::Balance,
        DisplayMode::History,
    ]
    .into_iter()
    .enumerate()
    {
        scope.set_mode(mode);
        scope.tick(i as u64 * 1000);
    }
    assert_eq!(scope.stats().frames_rendered, 4);
    assert_eq!(scope.config().mode, DisplayMode::History);
}

#[test]
fn sample_scripts_round_trip_through_yaml() {
    let samples = vec![
        StereoSample { correlation: 0.25, timestamp_ms: Some(12), ..clean_sample() },
        StereoSample {
            correlation: -0.5,
            correlation_history: Some(vec![0.0, -0.25, -0.5]),
            ..clean_sample()
        },
    ];
    let yaml = serde_yaml::to_string(&samples).unwrap();
    let back: Vec<StereoSample> = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(back, samples);
}
