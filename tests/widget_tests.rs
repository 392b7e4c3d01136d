use liquid_ether::{
    Autopilot, AutopilotState, EtherConfig, Lifecycle, LiquidEther, PointerEvent, PointerTracker,
    SurfaceRect, Transition,
};
use web_time::{Duration, Instant};

const FRAME: Duration = Duration::from_millis(16);

fn quiet_config() -> EtherConfig {
    EtherConfig {
        resolution: 0.5,
        colors: vec!["#000000".into(), "#ffffff".into()],
        background: "#20304080".into(),
        mouse_force: 0.0,
        auto_demo: false,
        ..Default::default()
    }
}

#[test]
fn test_autopilot_activates_exactly_once_after_delay() {
    let t0 = Instant::now();
    let mut pointer = PointerTracker::new(2.2);
    let mut pilot = Autopilot::with_seed(true, 0.5, 0.25, t0, 11);

    let mut activations = Vec::new();
    for i in 1..=120u32 {
        let now = t0 + FRAME * i;
        if pilot.update(now, t0, &mut pointer) == Some(Transition::Activated) {
            activations.push(now);
        }
        pointer.update();
    }

    assert_eq!(activations.len(), 1);
    let idle = activations[0] - t0;
    assert!(idle >= Duration::from_millis(250), "activated after {idle:?}");
    assert!(idle < Duration::from_millis(250) + FRAME);
    assert_eq!(pilot.state(), AutopilotState::Active);
    assert!(pointer.is_auto_active());
}

#[test]
fn test_autopilot_yields_to_pointer_inside() {
    let t0 = Instant::now();
    let surface = SurfaceRect::sized(100.0, 100.0);
    let mut pointer = PointerTracker::new(1.0);
    let mut pilot = Autopilot::with_seed(true, 0.5, 0.0, t0, 5);

    assert_eq!(pilot.update(t0 + FRAME, t0, &mut pointer), Some(Transition::Activated));
    pointer.set_position(50.0, 50.0, &surface, t0 + FRAME);
    assert_eq!(pilot.update(t0 + FRAME * 2, t0, &mut pointer), Some(Transition::Stopped));
    assert_eq!(pilot.state(), AutopilotState::Inactive);
    assert!(!pointer.is_auto_active());
}

#[test]
fn test_widget_autopilot_hand_off() {
    let config = EtherConfig {
        auto_demo: true,
        auto_resume_delay: 200.0,
        ..quiet_config()
    };
    let t0 = Instant::now();
    let surface = SurfaceRect::sized(80.0, 60.0);
    let mut ether = LiquidEther::with_seed(config, 9).unwrap();
    ether.mount(surface, t0);

    let mut now = t0;
    let mut became_active = 0;
    let mut last = ether.autopilot_state();
    for _ in 0..30 {
        now += FRAME;
        ether.frame(now).unwrap();
        let state = ether.autopilot_state();
        if last == AutopilotState::Inactive && state == AutopilotState::Active {
            became_active += 1;
        }
        last = state;
    }
    assert_eq!(became_active, 1);
    assert_eq!(last, AutopilotState::Active);

    // genuine input wins immediately, before the next frame
    assert!(ether.handle_event(PointerEvent::Move { x: 40.0, y: 30.0 }, now));
    assert_eq!(ether.autopilot_state(), AutopilotState::Inactive);
    assert!(!ether.pointer().is_auto_active());

    now += FRAME;
    ether.frame(now).unwrap();
    assert_eq!(ether.autopilot_state(), AutopilotState::Inactive);

    // leaving and staying idle hands control back
    ether.handle_event(PointerEvent::Leave, now);
    for _ in 0..20 {
        now += FRAME;
        ether.frame(now).unwrap();
    }
    assert_eq!(ether.autopilot_state(), AutopilotState::Active);
}

#[test]
fn test_multi_touch_is_ignored() {
    let t0 = Instant::now();
    let mut ether = LiquidEther::mounted(quiet_config(), SurfaceRect::sized(50.0, 50.0), t0).unwrap();
    let ev = PointerEvent::TouchMove { x: 10.0, y: 10.0, touches: 2 };
    assert!(!ether.handle_event(ev, t0));
    let ev = PointerEvent::TouchStart { x: 10.0, y: 10.0, touches: 1 };
    assert!(ether.handle_event(ev, t0));
    assert!(ether.pointer().is_inside());
}

#[test]
fn test_resize_reallocates_grid() {
    let t0 = Instant::now();
    let mut ether = LiquidEther::mounted(quiet_config(), SurfaceRect::sized(64.0, 64.0), t0).unwrap();
    assert_eq!(ether.grid_size(), (32, 32));
    ether.frame(t0 + FRAME).unwrap();

    ether.resize(SurfaceRect::sized(301.0, 199.0));
    assert_eq!(ether.grid_size(), (150, 99));
    assert_eq!(ether.state(), Lifecycle::Running);
    let frame = ether.frame(t0 + FRAME * 2).unwrap();
    assert_eq!(frame.dimensions(), (301, 199));

    ether.resize(SurfaceRect::sized(0.0, 0.0));
    assert_eq!(ether.grid_size(), (1, 1));
    assert!(ether.frame(t0 + FRAME * 3).is_some());
}

#[test]
fn test_no_forcing_renders_plain_background() {
    let t0 = Instant::now();
    let mut ether = LiquidEther::mounted(quiet_config(), SurfaceRect::sized(40.0, 30.0), t0).unwrap();
    // input still arrives, but with zero force it must not stir anything
    ether.handle_event(PointerEvent::Move { x: 5.0, y: 5.0 }, t0);
    ether.handle_event(PointerEvent::Move { x: 35.0, y: 25.0 }, t0 + FRAME);

    let frame = ether.frame(t0 + FRAME).unwrap();
    assert_eq!(frame.dimensions(), (40, 30));
    assert!(frame.pixels().all(|p| p.0 == [0x20, 0x30, 0x40, 0x80]));
}

#[test]
fn test_forcing_changes_the_picture() {
    let config = EtherConfig { mouse_force: 20.0, cursor_size: 20.0, ..quiet_config() };
    let t0 = Instant::now();
    let mut ether = LiquidEther::mounted(config, SurfaceRect::sized(80.0, 80.0), t0).unwrap();

    let mut now = t0;
    for i in 0..10 {
        now += FRAME;
        ether.handle_event(PointerEvent::Move { x: 20.0 + 4.0 * i as f32, y: 40.0 }, now);
        ether.frame(now).unwrap();
    }
    let frame = ether.last_frame();
    assert!(frame.pixels().any(|p| p.0 != [0x20, 0x30, 0x40, 0x80]));
}

#[test]
fn test_disposed_widget_ignores_everything() {
    let t0 = Instant::now();
    let mut ether = LiquidEther::mounted(quiet_config(), SurfaceRect::sized(40.0, 40.0), t0).unwrap();
    ether.handle_event(PointerEvent::Move { x: 10.0, y: 10.0 }, t0);
    let coords = ether.pointer().coords();
    let rendered = ether.frames_rendered();

    ether.dispose();
    assert_eq!(ether.state(), Lifecycle::Disposed);
    assert!(ether.frame(t0 + FRAME).is_none());
    assert!(!ether.handle_event(PointerEvent::Move { x: 30.0, y: 30.0 }, t0 + FRAME));
    assert_eq!(ether.pointer().coords(), coords);
    assert_eq!(ether.frames_rendered(), rendered);
    assert_eq!(ether.last_frame().dimensions(), (0, 0));

    // no remount after teardown
    assert!(!ether.mount(SurfaceRect::sized(40.0, 40.0), t0));
    ether.resize(SurfaceRect::sized(80.0, 80.0));
    assert_eq!(ether.grid_size(), (1, 1));
}

#[test]
fn test_huge_resume_delay_keeps_autopilot_parked() {
    let config = EtherConfig {
        auto_demo: true,
        auto_resume_delay: 1e30,
        ..quiet_config()
    };
    assert!(config.validate().is_ok());

    let t0 = Instant::now();
    let mut ether = LiquidEther::mounted(config, SurfaceRect::sized(40.0, 40.0), t0).unwrap();
    let mut now = t0;
    for _ in 0..10 {
        now += FRAME;
        ether.frame(now).unwrap();
    }
    assert_eq!(ether.autopilot_state(), AutopilotState::Inactive);
}
