use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use clap::Parser;
use crossterm::event::{Event, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use tile_wall::app::App;
use tile_wall::config::EditorConfig;
use tile_wall::constants::{MIN_H, MIN_W};
use tile_wall::drivers::OutputDriver;
use tile_wall::drivers::scripted::HeadlessOutputDriver;
use tile_wall::geometry::{CanvasRect, box_within};
use tile_wall::probe::ImageProbe;
use tile_wall::ui::hit::{HitTarget, hit_canvas, tile_rects};
use tile_wall::ui::layout::CanvasArea;
use tile_wall::workspace::FrameReport;

/// Slack for the containment check, matching the engine's whole-pixel rounding.
const CONTAINMENT_TOLERANCE: f64 = 1.0;

#[derive(Parser, Debug)]
#[command(
    name = "wall-bench",
    version = env!("CARGO_PKG_VERSION"),
    about = "Drives synthetic move and resize gestures through the tile-wall host, without a terminal"
)]
struct BenchCli {
    /// How long to run the benchmark.
    #[arg(
        short = 'd',
        long = "duration",
        value_name = "SECONDS",
        default_value_t = 3.0
    )]
    duration_seconds: f64,

    /// Pointer samples delivered between two frames.
    #[arg(short = 's', long = "samples", value_name = "N", default_value_t = 8)]
    samples_per_frame: u32,

    /// Frames each gesture lasts before the pointer is released.
    #[arg(long = "gesture-frames", value_name = "N", default_value_t = 30)]
    gesture_frames: u32,

    /// Tiles dropped on the wall before the storm starts.
    #[arg(short = 't', long = "tiles", value_name = "N", default_value_t = 4)]
    tiles: usize,

    /// Virtual terminal width in cells.
    #[arg(long, value_name = "COLS", default_value_t = 160)]
    cols: u16,

    /// Virtual terminal height in cells.
    #[arg(long, value_name = "ROWS", default_value_t = 50)]
    rows: u16,

    /// Only lay out and tick the engine; skip drawing.
    #[arg(long)]
    no_render: bool,

    /// Seed for the pointer random walk. Defaults to the clock.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,
}

struct BenchConfig {
    duration: Duration,
    samples_per_frame: u32,
    gesture_frames: u32,
    tiles: usize,
    area: Rect,
    render: bool,
    seed: u64,
}

impl TryFrom<&BenchCli> for BenchConfig {
    type Error = String;

    fn try_from(cli: &BenchCli) -> Result<Self, Self::Error> {
        if !(0.1..=600.0).contains(&cli.duration_seconds) {
            return Err("duration must be between 0.1 and 600 seconds".to_string());
        }
        if !(1..=10_000).contains(&cli.samples_per_frame) {
            return Err("samples per frame must be between 1 and 10000".to_string());
        }
        if cli.gesture_frames == 0 {
            return Err("gesture frames must be at least 1".to_string());
        }
        if !(1..=64).contains(&cli.tiles) {
            return Err("tiles must be between 1 and 64".to_string());
        }
        if cli.cols < 40 || cli.rows < 12 {
            return Err("the virtual terminal must be at least 40x12 cells".to_string());
        }
        Ok(Self {
            duration: Duration::from_secs_f64(cli.duration_seconds),
            samples_per_frame: cli.samples_per_frame,
            gesture_frames: cli.gesture_frames,
            tiles: cli.tiles,
            area: Rect::new(0, 0, cli.cols, cli.rows),
            render: !cli.no_render,
            seed: cli.seed.unwrap_or_else(clock_seed),
        })
    }
}

fn main() -> io::Result<()> {
    let args = BenchCli::parse();
    let config = BenchConfig::try_from(&args)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;

    let stats = run_benchmark(&config)?;
    println!("{}", stats.final_report(&config));
    Ok(())
}

struct Bench {
    app: App,
    output: HeadlessOutputDriver,
    rng: Lcg,
    stats: BenchStats,
    cursor: (u16, u16),
}

fn run_benchmark(config: &BenchConfig) -> io::Result<BenchStats> {
    let mut editor = EditorConfig::default();
    editor.wall.capacity = config.tiles;
    editor.monitors.clear();
    let mut bench = Bench {
        app: App::new(&editor, Arc::new(ImageProbe)),
        output: HeadlessOutputDriver::new(config.area.width, config.area.height)?,
        rng: Lcg::new(config.seed),
        stats: BenchStats::new(),
        cursor: (0, 0),
    };
    bench.frame(config)?;
    bench.seed_tiles(config)?;
    bench.stats.restart();

    while bench.stats.elapsed() < config.duration {
        if !bench.gesture(config)? {
            break;
        }
    }
    bench.stats.coalesced = bench
        .app
        .workspace()
        .canvases()
        .iter()
        .map(|c| c.controller().coalesced())
        .sum();
    bench.stats.mark_completed();
    Ok(bench.stats)
}

impl Bench {
    fn send(&mut self, kind: MouseEventKind, column: u16, row: u16, modifiers: KeyModifiers) {
        self.app.handle_event(&Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers,
        }));
    }

    fn frame(&mut self, config: &BenchConfig) -> io::Result<()> {
        let start = Instant::now();
        let report = if config.render {
            let app = &mut self.app;
            let mut report = FrameReport::default();
            self.output.draw(|mut frame| {
                report = app.frame(&mut frame);
            })?;
            report
        } else {
            self.app.relayout(config.area);
            self.app.tick()
        };
        self.stats.record_frame(report.geometry_writes as u64, start.elapsed());
        self.stats.violations += self.violations();
        Ok(())
    }

    /// Drag sources from the sidebar onto random wall cells until the wall
    /// holds `config.tiles` tiles.
    fn seed_tiles(&mut self, config: &BenchConfig) -> io::Result<()> {
        let rows = self.app.layout().source_rows.clone();
        let Some(wall) = self.app.layout().canvases.first().copied() else {
            return Err(io::Error::other("the wall has no room on screen"));
        };
        if rows.is_empty() {
            return Err(io::Error::other("the source list has no room on screen"));
        }
        for i in 0..config.tiles {
            let source = rows[i % rows.len()];
            let target = (
                wall.inner.x + self.rng.below(wall.inner.width.max(1)),
                wall.inner.y + self.rng.below(wall.inner.height.max(1)),
            );
            self.send(MouseEventKind::Down(MouseButton::Left), source.x, source.y, KeyModifiers::NONE);
            self.send(MouseEventKind::Drag(MouseButton::Left), target.0, target.1, KeyModifiers::NONE);
            self.send(MouseEventKind::Up(MouseButton::Left), target.0, target.1, KeyModifiers::NONE);
        }
        self.app.workspace_mut().settle_drops(Duration::from_secs(10));
        self.frame(config)
    }

    /// One press-drag-release on a random tile. `false` when the wall is empty.
    fn gesture(&mut self, config: &BenchConfig) -> io::Result<bool> {
        let scale = self.app.scale();
        let Some(area) = self.app.layout().canvases.first().copied() else {
            return Ok(false);
        };
        let Some(canvas) = self.app.workspace().canvas(area.id) else {
            return Ok(false);
        };
        let rects = tile_rects(canvas, &area, scale);
        if rects.is_empty() {
            return Ok(false);
        }
        let (_, rect) = rects[self.rng.below(rects.len() as u16) as usize];
        let body = (rect.x + rect.width / 2, rect.y + rect.height / 2);

        // the storm never presses a remove control
        if self.hits_remove(&area, body) {
            return Ok(true);
        }
        let resize = self.rng.below(2) == 0;
        let press = if resize {
            // select first so the handles are live
            self.send(MouseEventKind::Down(MouseButton::Left), body.0, body.1, KeyModifiers::NONE);
            self.send(MouseEventKind::Up(MouseButton::Left), body.0, body.1, KeyModifiers::NONE);
            (rect.right() - 1, rect.bottom() - 1)
        } else {
            body
        };
        if self.hits_remove(&area, press) {
            return Ok(true);
        }
        let modifiers = match self.rng.below(4) {
            0 => KeyModifiers::SHIFT,
            1 => KeyModifiers::ALT,
            _ => KeyModifiers::NONE,
        };
        self.send(MouseEventKind::Down(MouseButton::Left), press.0, press.1, modifiers);
        if self.app.workspace().gesture_in_progress() {
            self.stats.gestures += 1;
        }

        self.cursor = press;
        for _ in 0..config.gesture_frames {
            for _ in 0..config.samples_per_frame {
                self.step_cursor(config.area);
                let (col, row) = self.cursor;
                self.send(MouseEventKind::Drag(MouseButton::Left), col, row, modifiers);
                self.stats.samples += 1;
            }
            self.frame(config)?;
        }
        let (col, row) = self.cursor;
        self.send(MouseEventKind::Up(MouseButton::Left), col, row, modifiers);
        self.frame(config)?;
        Ok(true)
    }

    fn hits_remove(&self, area: &CanvasArea, (column, row): (u16, u16)) -> bool {
        self.app
            .workspace()
            .canvas(area.id)
            .and_then(|canvas| hit_canvas(canvas, area, self.app.scale(), column, row))
            .is_some_and(|hit| matches!(hit, HitTarget::Remove(_)))
    }

    fn step_cursor(&mut self, area: Rect) {
        let step = |value: u16, delta: u16, max: u16| {
            (value + delta).saturating_sub(2).min(max.saturating_sub(1))
        };
        let dx = self.rng.below(5);
        let dy = self.rng.below(5);
        self.cursor = (
            step(self.cursor.0, dx, area.width),
            step(self.cursor.1, dy, area.height),
        );
    }

    /// Tiles currently outside their canvas or below the minimum size.
    fn violations(&self) -> u64 {
        self.app
            .workspace()
            .canvases()
            .iter()
            .filter_map(|canvas| canvas.rect().map(|rect| (canvas, rect)))
            .map(|(canvas, rect)| {
                let local = CanvasRect::sized(rect.width, rect.height);
                canvas
                    .store()
                    .iter()
                    .filter(|t| {
                        !box_within(t.position, t.size, local, CONTAINMENT_TOLERANCE)
                            || t.size.w < MIN_W
                            || t.size.h < MIN_H
                    })
                    .count() as u64
            })
            .sum()
    }
}

struct BenchStats {
    start: Instant,
    completed_at: Option<Instant>,
    frame_count: u64,
    geometry_writes: u64,
    samples: u64,
    gestures: u64,
    coalesced: u64,
    violations: u64,
    total_frame_time: Duration,
    slowest_frame: Duration,
}

impl BenchStats {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            completed_at: None,
            frame_count: 0,
            geometry_writes: 0,
            samples: 0,
            gestures: 0,
            coalesced: 0,
            violations: 0,
            total_frame_time: Duration::ZERO,
            slowest_frame: Duration::ZERO,
        }
    }

    /// Forget the setup frames.
    fn restart(&mut self) {
        *self = Self::new();
    }

    fn elapsed(&self) -> Duration {
        match self.completed_at {
            Some(done) => done.duration_since(self.start),
            None => self.start.elapsed(),
        }
    }

    fn mark_completed(&mut self) {
        self.completed_at = Some(Instant::now());
    }

    fn record_frame(&mut self, writes: u64, frame_time: Duration) {
        self.frame_count = self.frame_count.saturating_add(1);
        self.geometry_writes = self.geometry_writes.saturating_add(writes);
        self.total_frame_time += frame_time;
        self.slowest_frame = self.slowest_frame.max(frame_time);
    }

    fn average_frame_ms(&self) -> f64 {
        if self.frame_count == 0 {
            return 0.0;
        }
        (self.total_frame_time.as_secs_f64() / self.frame_count as f64) * 1_000.0
    }

    fn final_report(&self, config: &BenchConfig) -> String {
        let elapsed = self.elapsed().as_secs_f64();
        let samples_per_sec = if elapsed > 0.0 {
            self.samples as f64 / elapsed
        } else {
            0.0
        };
        let writes_per_frame = if self.frame_count > 0 {
            self.geometry_writes as f64 / self.frame_count as f64
        } else {
            0.0
        };

        indoc::formatdoc!(
            r#"
            Wall bench finished ({mode}, seed {seed}).
            Duration: {elapsed:.2}s (target {target:.2}s)
            Gestures: {gestures} | Pointer samples: {samples} (~{samples_per_sec:.0}/s)
            Frames: {frames} | Geometry writes: {writes} ({writes_per_frame:.2}/frame)
            Samples coalesced away: {coalesced}
            Avg frame: {avg:.3} ms | Worst: {worst:.3} ms
            Containment or minimum-size violations: {violations}
            "#,
            mode = if config.render { "rendered" } else { "engine only" },
            seed = config.seed,
            elapsed = elapsed,
            target = config.duration.as_secs_f64(),
            gestures = self.gestures,
            samples = self.samples,
            samples_per_sec = samples_per_sec,
            frames = self.frame_count,
            writes = self.geometry_writes,
            writes_per_frame = writes_per_frame,
            coalesced = self.coalesced,
            avg = self.average_frame_ms(),
            worst = self.slowest_frame.as_secs_f64() * 1_000.0,
            violations = self.violations,
        )
    }
}

struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0xA5A5_A5A5_1234_5678,
        }
    }

    fn next(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }

    /// Uniform-ish value in `0..bound`; `bound` of zero yields zero.
    fn below(&mut self, bound: u16) -> u16 {
        if bound == 0 {
            return 0;
        }
        (self.next() % bound as u32) as u16
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(render: bool) -> BenchConfig {
        BenchConfig {
            duration: Duration::from_millis(50),
            samples_per_frame: 6,
            gesture_frames: 3,
            tiles: 3,
            area: Rect::new(0, 0, 120, 40),
            render,
            seed: 7,
        }
    }

    #[test]
    fn storm_keeps_tiles_contained() {
        for render in [false, true] {
            let stats = run_benchmark(&config(render)).expect("bench runs");
            assert!(stats.gestures > 0);
            assert_eq!(stats.violations, 0);
            // at most one geometry write per frame with one canvas
            assert!(stats.geometry_writes <= stats.frame_count);
        }
    }

    #[test]
    fn cli_validation() {
        let cli = BenchCli::try_parse_from(["wall-bench", "--samples", "0"]).expect("parses");
        assert!(BenchConfig::try_from(&cli).is_err());
        let cli = BenchCli::try_parse_from(["wall-bench", "--seed", "3", "--no-render"]).expect("parses");
        let config = BenchConfig::try_from(&cli).expect("valid");
        assert_eq!(config.seed, 3);
        assert!(!config.render);
    }
}
