use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tile_wall::boundary::{FixedBoundary, SharedBoundary};
use tile_wall::drop::SourceDescriptor;
use tile_wall::error::EngineError;
use tile_wall::geometry::{CanvasRect, Point, Size, box_within};
use tile_wall::probe::{NaturalSizeProbe, ProbeError};
use tile_wall::session::{Corner, Handle};
use tile_wall::tile::Tile;
use tile_wall::workspace::Modifiers;
use tile_wall::{CanvasId, Workspace};

const SETTLE: Duration = Duration::from_secs(5);

/// Answers from a fixed table, optionally after a per-source delay.
#[derive(Default)]
struct TableProbe {
    sizes: HashMap<String, (Size, Duration)>,
}

impl TableProbe {
    fn with(mut self, src: &str, size: Size, delay: Duration) -> Self {
        self.sizes.insert(src.to_string(), (size, delay));
        self
    }
}

impl NaturalSizeProbe for TableProbe {
    fn probe(&self, src: &str) -> Result<Size, ProbeError> {
        let (size, delay) = self
            .sizes
            .get(src)
            .copied()
            .ok_or_else(|| ProbeError::Io(io::Error::new(io::ErrorKind::NotFound, src.to_string())))?;
        thread::sleep(delay);
        Ok(size)
    }
}

fn hd() -> Size {
    Size::new(640.0, 360.0)
}

fn wall(probe: TableProbe) -> (Workspace, CanvasId) {
    let mut workspace = Workspace::new(Arc::new(probe));
    let id = workspace.add_canvas("Video Wall", 4, FixedBoundary::sized(400.0, 300.0));
    (workspace, id)
}

fn source(src: &str) -> SourceDescriptor {
    SourceDescriptor::new(src, src.trim_end_matches(".png"))
}

fn only_tile(workspace: &Workspace, canvas: CanvasId) -> Tile {
    let canvas = workspace.canvas(canvas).expect("canvas");
    assert_eq!(canvas.store().len(), 1);
    canvas.store().iter().next().cloned().expect("one tile")
}

fn drop_and_settle(workspace: &mut Workspace, canvas: CanvasId, src: &str, at: Point) -> Tile {
    workspace
        .drop_source(canvas, source(src), at)
        .expect("drop accepted");
    let placed = workspace.settle_drops(SETTLE);
    assert_eq!(placed.len(), 1);
    workspace
        .canvas(canvas)
        .and_then(|c| c.store().get(placed[0]).cloned())
        .expect("placed tile")
}

#[test]
fn drop_near_corner_fits_and_clamps() {
    let (mut workspace, wall_id) = wall(TableProbe::default().with("wall.png", hd(), Duration::ZERO));
    let tile = drop_and_settle(&mut workspace, wall_id, "wall.png", Point::new(50.0, 50.0));

    assert_eq!(tile.size, Size::new(160.0, 90.0));
    assert_eq!(tile.position, Point::new(80.0, 50.0));
    assert_eq!(tile.nat, hd());
    assert_eq!(workspace.selection(), Some((wall_id, tile.id)));
}

#[test]
fn small_corner_resize_clamps_to_minimum_height() {
    let (mut workspace, wall_id) = wall(TableProbe::default().with("wall.png", hd(), Duration::ZERO));
    let tile = drop_and_settle(&mut workspace, wall_id, "wall.png", Point::new(200.0, 150.0));
    assert_eq!(tile.position, Point::new(200.0, 150.0));

    workspace
        .pointer_down_on_handle(
            wall_id,
            tile.id,
            Handle::Corner(Corner::SouthEast),
            Modifiers::default(),
        )
        .expect("resize starts");
    workspace.pointer_move(Point::new(210.0, 160.0));
    workspace.tick();
    workspace.pointer_up(Point::new(210.0, 160.0));

    let after = only_tile(&workspace, wall_id);
    assert_eq!(after.size, Size::new(53.0, 30.0));
    assert_eq!(after.position, Point::new(200.0, 150.0));
}

#[test]
fn fifth_drop_is_rejected_while_four_are_resolving() {
    let slow = Duration::from_millis(50);
    let probe = TableProbe::default().with("slow.png", hd(), slow);
    let (mut workspace, wall_id) = wall(probe);

    for i in 0..4 {
        workspace
            .drop_source(wall_id, source("slow.png"), Point::new(60.0 + 80.0 * i as f64, 150.0))
            .expect("slot reserved");
    }
    let rejected = workspace.drop_source(wall_id, source("slow.png"), Point::new(200.0, 150.0));
    assert!(matches!(
        rejected,
        Err(EngineError::CapacityExceeded { limit: 4, .. })
    ));

    let notices = workspace.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(
        notices[0].message,
        "Maximum 4 images allowed on Video Wall. Please remove an image before adding a new one."
    );

    assert_eq!(workspace.settle_drops(SETTLE).len(), 4);
    let canvas = workspace.canvas(wall_id).expect("canvas");
    assert_eq!(canvas.store().len(), 4);
    assert_eq!(canvas.occupancy(), 4);

    let before = canvas.tiles();
    assert!(workspace.drop_source(wall_id, source("slow.png"), Point::new(1.0, 1.0)).is_err());
    assert_eq!(workspace.take_notices().len(), 1);
    assert_eq!(workspace.canvas(wall_id).expect("canvas").tiles(), before);
}

#[test]
fn racing_drops_keep_their_own_sizes() {
    let probe = TableProbe::default()
        .with("late.png", Size::new(300.0, 300.0), Duration::from_millis(80))
        .with("early.png", Size::new(1920.0, 1080.0), Duration::ZERO);
    let mut workspace = Workspace::new(Arc::new(probe));
    let wall_id = workspace.add_canvas("Video Wall", 4, FixedBoundary::sized(800.0, 600.0));

    workspace
        .drop_source(wall_id, source("late.png"), Point::new(100.0, 100.0))
        .expect("late reserved");
    workspace
        .drop_source(wall_id, source("early.png"), Point::new(600.0, 400.0))
        .expect("early reserved");
    assert_eq!(workspace.pending_drops(), 2);
    assert_eq!(workspace.settle_drops(SETTLE).len(), 2);

    let canvas = workspace.canvas(wall_id).expect("canvas");
    let by_src = |src: &str| {
        canvas
            .store()
            .iter()
            .find(|t| t.src == src)
            .cloned()
            .expect("tile for source")
    };
    let late = by_src("late.png");
    let early = by_src("early.png");
    assert_eq!(late.nat, Size::new(300.0, 300.0));
    assert_eq!(late.size, Size::new(100.0, 100.0));
    assert_eq!(late.position, Point::new(100.0, 100.0));
    assert_eq!(early.nat, Size::new(1920.0, 1080.0));
    assert_eq!(early.size, Size::new(160.0, 90.0));
    assert_eq!(early.position, Point::new(600.0, 400.0));
}

#[test]
fn failed_probe_places_fallback_tile() {
    let (mut workspace, wall_id) = wall(TableProbe::default());
    let tile = drop_and_settle(&mut workspace, wall_id, "missing.png", Point::new(200.0, 150.0));
    assert_eq!(tile.nat, hd());
    assert_eq!(tile.size, Size::new(160.0, 90.0));
    assert!(workspace.take_notices().is_empty());
}

#[test]
fn repeated_gestures_leave_no_listeners() {
    let (mut workspace, wall_id) = wall(TableProbe::default().with("wall.png", hd(), Duration::ZERO));
    let tile = drop_and_settle(&mut workspace, wall_id, "wall.png", Point::new(200.0, 150.0));

    for i in 0..20 {
        let at = only_tile(&workspace, wall_id).position;
        if i % 2 == 0 {
            workspace
                .pointer_down_on_tile(wall_id, tile.id, at)
                .expect("move starts");
        } else {
            workspace
                .pointer_down_on_handle(
                    wall_id,
                    tile.id,
                    Handle::Corner(Corner::NorthWest),
                    Modifiers::default(),
                )
                .expect("resize starts");
        }
        assert_eq!(workspace.registry().active_count(), 2);
        workspace.pointer_move(Point::new(at.x + 3.0, at.y - 2.0));
        workspace.tick();
        workspace.pointer_up(Point::new(at.x + 3.0, at.y - 2.0));
        assert_eq!(workspace.registry().active_count(), 0);
        assert!(!workspace.gesture_in_progress());
    }
}

#[test]
fn burst_of_moves_writes_once_per_frame() {
    let (mut workspace, wall_id) = wall(TableProbe::default().with("wall.png", hd(), Duration::ZERO));
    let tile = drop_and_settle(&mut workspace, wall_id, "wall.png", Point::new(200.0, 150.0));

    workspace
        .pointer_down_on_tile(wall_id, tile.id, tile.position)
        .expect("move starts");
    for i in 0..50 {
        workspace.pointer_move(Point::new(200.0 + i as f64, 150.0));
    }
    let report = workspace.tick();
    assert_eq!(report.geometry_writes, 1);

    let canvas = workspace.canvas(wall_id).expect("canvas");
    assert_eq!(canvas.controller().writes(), 1);
    assert_eq!(canvas.controller().coalesced(), 49);
    assert_eq!(only_tile(&workspace, wall_id).position, Point::new(249.0, 150.0));

    assert_eq!(workspace.tick().geometry_writes, 0);
    workspace.pointer_up(Point::new(249.0, 150.0));
}

#[test]
fn snapshot_survives_later_writes() {
    let (mut workspace, wall_id) = wall(TableProbe::default().with("wall.png", hd(), Duration::ZERO));
    let tile = drop_and_settle(&mut workspace, wall_id, "wall.png", Point::new(200.0, 150.0));
    let snapshot = workspace.canvas(wall_id).expect("canvas").tiles();

    workspace
        .pointer_down_on_tile(wall_id, tile.id, tile.position)
        .expect("move starts");
    workspace.pointer_move(Point::new(120.0, 100.0));
    workspace.tick();
    workspace.pointer_up(Point::new(120.0, 100.0));

    assert_eq!(snapshot[0].position, Point::new(200.0, 150.0));
    assert_eq!(only_tile(&workspace, wall_id).position, Point::new(120.0, 100.0));
}

#[test]
fn delete_and_remove_control() {
    let probe = TableProbe::default().with("wall.png", hd(), Duration::ZERO);
    let (mut workspace, wall_id) = wall(probe);
    let first = drop_and_settle(&mut workspace, wall_id, "wall.png", Point::new(100.0, 100.0));
    let second = drop_and_settle(&mut workspace, wall_id, "wall.png", Point::new(300.0, 200.0));

    assert_eq!(workspace.delete_selected(), Some((wall_id, second.id)));
    assert_eq!(workspace.selection(), None);
    let ids = |workspace: &Workspace| workspace.canvas(wall_id).expect("canvas").store().ids();
    assert_eq!(ids(&workspace), vec![first.id]);

    let before = workspace.canvas(wall_id).expect("canvas").tiles();
    assert_eq!(workspace.delete_selected(), None);
    assert_eq!(ids(&workspace), vec![first.id]);
    assert_eq!(workspace.canvas(wall_id).expect("canvas").tiles(), before);
    assert_eq!(only_tile(&workspace, wall_id), first);

    assert_eq!(workspace.remove_tile(wall_id, first.id), Ok(true));
    assert_eq!(workspace.remove_tile(wall_id, first.id), Ok(false));
    assert!(workspace.canvas(wall_id).expect("canvas").store().is_empty());
}

#[test]
fn shrinking_canvas_mid_move_keeps_tile_inside() {
    let probe = TableProbe::default().with("wall.png", hd(), Duration::ZERO);
    let mut workspace = Workspace::new(Arc::new(probe));
    let boundary = SharedBoundary::new();
    boundary.set(CanvasRect::new(100.0, 50.0, 800.0, 600.0));
    let wall_id = workspace.add_canvas("Video Wall", 4, boundary.clone());

    // client (500, 350) is canvas-local (400, 300)
    let tile = drop_and_settle(&mut workspace, wall_id, "wall.png", Point::new(500.0, 350.0));
    assert_eq!(tile.position, Point::new(400.0, 300.0));

    workspace
        .pointer_down_on_tile(wall_id, tile.id, Point::new(500.0, 350.0))
        .expect("move starts");
    boundary.set(CanvasRect::new(100.0, 50.0, 300.0, 200.0));
    workspace.pointer_move(Point::new(900.0, 650.0));
    workspace.tick();

    let moved = only_tile(&workspace, wall_id);
    assert!(box_within(moved.position, moved.size, CanvasRect::sized(300.0, 200.0), 1.0));
    assert_eq!(moved.position, Point::new(220.0, 155.0));

    boundary.clear();
    workspace.pointer_move(Point::new(100.0, 50.0));
    workspace.tick();
    assert_eq!(only_tile(&workspace, wall_id).position, moved.position);
    workspace.pointer_up(Point::new(100.0, 50.0));
    assert!(!workspace.gesture_in_progress());
}
