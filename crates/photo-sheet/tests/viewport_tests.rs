use photo_sheet::constants::{PASSPORT_ASPECT_RATIO, POLAROID_ASPECT_RATIO};
use photo_sheet::viewport::*;
use photo_sheet::ValidationError;

fn passport_engine() -> ViewportEngine {
    let mut engine = ViewportEngine::new(FrameSpec::passport(), Size::new(600.0, 500.0));
    engine.set_natural_size(1200, 1600);
    engine
}

fn polaroid_engine() -> ViewportEngine {
    let mut engine = ViewportEngine::new(FrameSpec::polaroid(), Size::new(460.0, 600.0));
    engine.set_natural_size(1200, 1600);
    engine
}

fn drag(engine: &mut ViewportEngine, from: Point, to: Point) {
    engine.on_drag_start(from);
    engine.on_drag_move(to);
    engine.on_drag_end();
}

fn assert_in_bounds(crop: &CropRegion) {
    assert!(crop.x >= 0.0 && crop.y >= 0.0, "{crop:?}");
    assert!(crop.width > 0.0 && crop.height > 0.0, "{crop:?}");
    assert!(crop.x + crop.width <= 1.0 + 1e-9, "{crop:?}");
    assert!(crop.y + crop.height <= 1.0 + 1e-9, "{crop:?}");
}

/// Small deterministic generator for drag sequences
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next()
    }
}

#[test]
fn test_passport_scenario_keeps_aspect() {
    let mut engine = passport_engine();
    drag(&mut engine, Point::new(300.0, 250.0), Point::new(250.0, 220.0));
    assert_eq!(engine.state().pan, Point::new(-50.0, -30.0));
    engine.on_zoom_change(1.5);

    let crop = engine.compute_crop_region().unwrap();
    assert_in_bounds(&crop);
    assert_eq!(crop.zoom, 1.5);
    assert_eq!((crop.natural_width, crop.natural_height), (1200, 1600));
    assert!((crop.pixel_aspect_ratio() - PASSPORT_ASPECT_RATIO).abs() < 1e-6);
}

#[test]
fn test_polaroid_crop_keeps_aspect() {
    let mut engine = polaroid_engine();
    engine.on_zoom_change(2.0);
    drag(&mut engine, Point::new(100.0, 100.0), Point::new(40.0, 20.0));
    let crop = engine.compute_crop_region().unwrap();
    assert_in_bounds(&crop);
    assert!((crop.pixel_aspect_ratio() - POLAROID_ASPECT_RATIO).abs() < 1e-6);
}

#[test]
fn test_zoom_is_clamped_and_idempotent() {
    let mut engine = passport_engine();
    engine.on_zoom_change(10.0);
    assert_eq!(engine.state().zoom, 3.0);
    assert!(!engine.can_zoom_in());
    engine.on_zoom_change(0.01);
    assert_eq!(engine.state().zoom, 0.5);
    assert!(!engine.can_zoom_out());

    engine.on_zoom_change(1.7);
    let once = *engine.state();
    engine.on_zoom_change(1.7);
    assert_eq!(*engine.state(), once);

    let mut polaroid = polaroid_engine();
    polaroid.on_zoom_change(0.5);
    assert_eq!(polaroid.state().zoom, 1.0);
}

#[test]
fn test_zoom_buttons_step() {
    let mut engine = passport_engine().with_zoom_step(0.25);
    engine.zoom_in();
    engine.zoom_in();
    assert!((engine.state().zoom - 1.5).abs() < 1e-9);
    engine.zoom_out();
    assert!((engine.state().zoom - 1.25).abs() < 1e-9);
    engine.reset();
    assert_eq!(engine.state().zoom, 1.0);
    assert_eq!(engine.state().pan, Point::ZERO);
}

#[test]
fn test_cover_fill_drags_stay_in_bounds() {
    let mut rng = Lcg(42);
    let mut engine = polaroid_engine();
    for _ in 0..500 {
        if rng.next() < 0.2 {
            engine.on_zoom_change(rng.range(0.5, 3.5));
        }
        let from = Point::new(rng.range(0.0, 460.0), rng.range(0.0, 500.0));
        let to = Point::new(rng.range(-400.0, 900.0), rng.range(-400.0, 900.0));
        drag(&mut engine, from, to);

        let state = engine.state();
        let c = state.container;
        assert!(state.pan.x <= 0.0 && state.pan.x >= -(c.width * state.zoom - c.width) - 1e-9);
        assert!(state.pan.y <= 0.0 && state.pan.y >= -(c.height * state.zoom - c.height) - 1e-9);

        let crop = engine.compute_crop_region().unwrap();
        assert_in_bounds(&crop);
    }
}

#[test]
fn test_fixed_frame_crops_are_valid_or_rejected() {
    let mut rng = Lcg(7);
    let mut engine = passport_engine();
    for _ in 0..500 {
        engine.on_zoom_change(rng.range(0.5, 3.0));
        let from = Point::new(rng.range(0.0, 600.0), rng.range(0.0, 500.0));
        let to = Point::new(rng.range(0.0, 600.0), rng.range(0.0, 500.0));
        drag(&mut engine, from, to);
        match engine.compute_crop_region() {
            Ok(crop) => assert_in_bounds(&crop),
            Err(ValidationError::InvalidCrop(_)) => {}
            Err(other) => panic!("unexpected error {other:?}"),
        }
        engine.reset();
    }
}

#[test]
fn test_image_not_loaded() {
    let engine = ViewportEngine::new(FrameSpec::passport(), Size::new(600.0, 500.0));
    assert!(!engine.is_loaded());
    assert_eq!(
        engine.compute_crop_region(),
        Err(ValidationError::ImageNotLoaded)
    );
}

#[test]
fn test_frame_dragged_off_image_is_rejected() {
    let mut engine = passport_engine();
    drag(&mut engine, Point::new(0.0, 0.0), Point::new(2000.0, 0.0));
    assert!(matches!(
        engine.compute_crop_region(),
        Err(ValidationError::InvalidCrop(_))
    ));
}

#[derive(Default)]
struct CountingHost {
    attached: u32,
    detached: u32,
}

impl PointerListenerHost for CountingHost {
    type Token = u32;

    fn attach(&mut self) -> u32 {
        self.attached += 1;
        self.attached
    }

    fn detach(&mut self, token: u32) {
        assert_eq!(token, self.attached);
        self.detached += 1;
    }
}

#[test]
fn test_drag_scope_releases_listeners() {
    let mut engine = passport_engine();
    let mut host = CountingHost::default();

    let mut scope = DragScope::begin(&mut engine, &mut host, Point::new(10.0, 10.0));
    scope.move_to(Point::new(30.0, 20.0));
    assert!(scope.engine().is_dragging());
    scope.end();
    assert_eq!((host.attached, host.detached), (1, 1));
    assert_eq!(engine.state().pan, Point::new(20.0, 10.0));

    {
        let mut scope = DragScope::begin(&mut engine, &mut host, Point::new(0.0, 0.0));
        scope.move_to(Point::new(5.0, 5.0));
    }
    assert_eq!((host.attached, host.detached), (2, 2));
    assert!(!engine.is_dragging());

    let mut scope = DragScope::begin(&mut engine, &mut host, Point::new(0.0, 0.0));
    scope.move_to(Point::new(100.0, 100.0));
    scope.cancel();
    assert_eq!((host.attached, host.detached), (3, 3));
    assert_eq!(engine.state().pan, Point::new(25.0, 15.0));
}
