//! Property-based invariants of tile geometry under move and resize gestures.
//!
//! 1. Containment: after any sample the tile box lies inside the canvas
//! 2. Minimum size: no resize produces `w < 40` or `h < 30`
//! 3. Natural-size ceiling: no resize upscales past the source dimensions
//! 4. Aspect fidelity: aspect-locked resizes stay within 0.02 of the ratio
//! 5. Moves never change the size
//! 6. `clamp_center` is idempotent
//! 7. Bring-to-front only reorders
//! 8. A dropped tile keeps the source ratio and fits the canvas

use proptest::prelude::*;
use tile_wall::boundary::FixedBoundary;
use tile_wall::canvas::Canvas;
use tile_wall::constants::{MIN_H, MIN_W};
use tile_wall::drop::{ResolvedDrop, SourceDescriptor, initial_size};
use tile_wall::geometry::{CanvasRect, Point, Size, box_within, clamp_center};
use tile_wall::session::{Handle, ResizePolicy};
use tile_wall::tile::{Tile, TileId};

/// Whole-pixel rounding slack.
const ROUNDING: f64 = 1.0;
const ASPECT_TOLERANCE: f64 = 0.02;

// ── Helpers ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Scene {
    canvas: Size,
    nat: Size,
    drop_at: Point,
}

fn arb_scene() -> impl Strategy<Value = Scene> {
    (
        120.0f64..1600.0,
        300.0f64..1000.0,
        200.0f64..2000.0,
        0.5f64..2.0,
        0.0f64..1.0,
        0.0f64..1.0,
    )
        .prop_map(|(cw, ch, nat_w, aspect, fx, fy)| {
            let (cw, ch, nat_w) = (cw.round(), ch.round(), nat_w.round());
            Scene {
                canvas: Size::new(cw, ch),
                nat: Size::new(nat_w, (nat_w / aspect).round()),
                drop_at: Point::new(fx * cw, fy * ch),
            }
        })
}

fn arb_handle() -> impl Strategy<Value = Handle> {
    prop::sample::select(Handle::ALL.to_vec())
}

fn arb_policy() -> impl Strategy<Value = ResizePolicy> {
    (any::<bool>(), any::<bool>()).prop_map(|(keep_ratio, anchor_opposite)| ResizePolicy {
        keep_ratio,
        anchor_opposite,
    })
}

/// Pointer samples as fractions of the canvas, reaching past every edge.
fn arb_samples() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((-0.25f64..1.25, -0.25f64..1.25), 1..12)
}

fn drop_tile(canvas: &mut Canvas, at: Point, nat: Size) -> TileId {
    let pending = canvas
        .begin_drop(SourceDescriptor::new("prop.png", "prop"), at)
        .expect("slot available");
    canvas.complete_drop(ResolvedDrop {
        pending,
        nat,
        failure: None,
    })
}

fn place(scene: &Scene) -> (Canvas, TileId) {
    let mut canvas = Canvas::standalone(
        "Video Wall",
        4,
        FixedBoundary::sized(scene.canvas.w, scene.canvas.h),
    );
    let id = drop_tile(&mut canvas, scene.drop_at, scene.nat);
    (canvas, id)
}

fn tile(canvas: &Canvas, id: TileId) -> Tile {
    canvas.store().get(id).cloned().expect("tile present")
}

fn check_contained(tile: &Tile, scene: &Scene) -> Result<(), TestCaseError> {
    let rect = CanvasRect::sized(scene.canvas.w, scene.canvas.h);
    prop_assert!(
        box_within(tile.position, tile.size, rect, ROUNDING),
        "tile {:?} @ {:?} escapes canvas {:?}",
        tile.size,
        tile.position,
        scene.canvas
    );
    Ok(())
}

// ═════════════════════════════════════════════════════════════════════════
// 1-4. Resize samples
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn resize_samples_respect_bounds(
        scene in arb_scene(),
        handle in arb_handle(),
        policy in arb_policy(),
        samples in arb_samples(),
    ) {
        let (mut canvas, id) = place(&scene);
        canvas.pointer_down_on_handle(id, handle, policy).expect("resize starts");
        for (fx, fy) in samples {
            canvas.pointer_move(Point::new(fx * scene.canvas.w, fy * scene.canvas.h));
            canvas.flush_frame();
            let t = tile(&canvas, id);
            check_contained(&t, &scene)?;
            prop_assert!(t.size.w >= MIN_W && t.size.h >= MIN_H, "below minimum: {:?}", t.size);
            prop_assert!(
                t.size.w <= scene.nat.w && t.size.h <= scene.nat.h,
                "{:?} exceeds natural {:?}",
                t.size,
                scene.nat
            );
            if policy.keep_ratio {
                let drift = (t.size.w / t.size.h - t.aspect).abs();
                prop_assert!(drift < ASPECT_TOLERANCE, "aspect drift {} for {:?}", drift, t.size);
            }
        }
        canvas.pointer_up();
        prop_assert!(canvas.session().is_idle());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1, 5. Move samples
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn move_samples_stay_inside_and_keep_size(scene in arb_scene(), samples in arb_samples()) {
        let (mut canvas, id) = place(&scene);
        let before = tile(&canvas, id);
        canvas.pointer_down_on_tile(id, before.position).expect("move starts");
        for (fx, fy) in samples {
            canvas.pointer_move(Point::new(fx * scene.canvas.w, fy * scene.canvas.h));
            canvas.flush_frame();
            let t = tile(&canvas, id);
            check_contained(&t, &scene)?;
            prop_assert_eq!(t.size, before.size);
        }
        canvas.pointer_up();
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. clamp_center idempotence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn clamp_center_is_idempotent(
        cx in -500.0f64..2500.0,
        cy in -500.0f64..2500.0,
        w in 1.0f64..3000.0,
        h in 1.0f64..3000.0,
        rw in 1.0f64..2000.0,
        rh in 1.0f64..2000.0,
    ) {
        let rect = CanvasRect::sized(rw, rh);
        let size = Size::new(w, h);
        let once = clamp_center(Point::new(cx, cy), size, rect);
        let twice = clamp_center(once, size, rect);
        prop_assert_eq!(once, twice);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Bring-to-front
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn bring_to_front_only_reorders(
        points in prop::collection::vec((0.0f64..800.0, 0.0f64..600.0), 2..6),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut canvas = Canvas::standalone("Video Wall", 6, FixedBoundary::sized(800.0, 600.0));
        let ids: Vec<TileId> = points
            .iter()
            .map(|(x, y)| drop_tile(&mut canvas, Point::new(*x, *y), Size::new(640.0, 360.0)))
            .collect();
        let before: Vec<Tile> = canvas.store().iter().cloned().collect();
        let chosen = ids[pick.index(ids.len())];
        let at = tile(&canvas, chosen).position;

        canvas.pointer_down_on_tile(chosen, at).expect("move starts");
        canvas.pointer_up();

        let order = canvas.store().ids();
        prop_assert_eq!(order.last().copied(), Some(chosen));
        let expected: Vec<TileId> = ids.iter().copied().filter(|id| *id != chosen).collect();
        prop_assert_eq!(&order[..order.len() - 1], expected.as_slice());
        for old in &before {
            prop_assert_eq!(Some(old), canvas.store().get(old.id));
        }
        prop_assert_eq!(canvas.selected(), Some(chosen));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 8. Initial drop size
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn initial_size_keeps_ratio_inside_canvas(
        cw in 60.0f64..1600.0,
        ch in 40.0f64..1000.0,
        nat_w in 1.0f64..4000.0,
        aspect in 0.25f64..4.0,
    ) {
        let nat = Size::new(nat_w.round(), (nat_w / aspect).round().max(1.0));
        let size = initial_size(nat, CanvasRect::sized(cw, ch));
        prop_assert!(size.w >= MIN_W && size.h >= MIN_H);
        prop_assert!(size.w <= cw.floor() && size.h <= ch.floor(), "{:?} outside {}x{}", size, cw, ch);
        if size.w > MIN_W && size.h > MIN_H {
            prop_assert!(size.w <= nat.w && size.h <= nat.h);
            let drift = (size.w / size.h - nat.w / nat.h).abs();
            prop_assert!(drift < ASPECT_TOLERANCE, "aspect drift {} for {:?} from {:?}", drift, size, nat);
        }
    }
}
