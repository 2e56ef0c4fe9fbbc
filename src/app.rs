//! The terminal host: turns crossterm input into workspace operations and
//! draws the workspace every frame.

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use crate::boundary::SharedBoundary;
use crate::canvas::CanvasId;
use crate::config::EditorConfig;
use crate::drivers::{InputDriver, OutputDriver};
use crate::drop::SourceDescriptor;
use crate::event_loop::{ControlFlow, EventLoop, LoopEvent};
use crate::log_buffer::LogBufferHandle;
use crate::probe::NaturalSizeProbe;
use crate::ui::UiFrame;
use crate::ui::hit::{HitTarget, hit_canvas};
use crate::ui::layout::HostLayout;
use crate::ui::render::{HostView, StatusLine, canvas_order, render_host};
use crate::ui::scale::CellScale;
use crate::ui::thumbnail::ThumbnailCache;
use crate::workspace::{FrameReport, Modifiers, Workspace};

pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const NOTICE_TTL: Duration = Duration::from_secs(4);

pub struct App {
    workspace: Workspace,
    boundaries: Vec<(CanvasId, SharedBoundary)>,
    layout: HostLayout,
    scale: CellScale,
    sources: Vec<SourceDescriptor>,
    thumbnails: ThumbnailCache,
    logs: Option<LogBufferHandle>,
    ghost: Option<(u16, u16)>,
    notice: Option<(String, Instant)>,
}

impl App {
    pub fn new(config: &EditorConfig, probe: Arc<dyn NaturalSizeProbe>) -> Self {
        let mut shared = Vec::new();
        let workspace = Workspace::from_config(config, probe, |_| {
            let boundary = SharedBoundary::new();
            shared.push(boundary.clone());
            boundary
        });
        let boundaries = workspace
            .canvases()
            .iter()
            .map(|c| c.id())
            .zip(shared)
            .collect();
        Self {
            workspace,
            boundaries,
            layout: HostLayout::default(),
            scale: CellScale::new(config.cell_width, config.cell_height),
            sources: config.sources.clone(),
            thumbnails: ThumbnailCache::new(),
            logs: None,
            ghost: None,
            notice: None,
        }
    }

    /// Show the last line of `logs` in the status bar.
    pub fn with_log_buffer(mut self, logs: LogBufferHandle) -> Self {
        self.logs = Some(logs);
        self
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn workspace_mut(&mut self) -> &mut Workspace {
        &mut self.workspace
    }

    pub fn layout(&self) -> &HostLayout {
        &self.layout
    }

    pub fn scale(&self) -> CellScale {
        self.scale
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_ref().map(|(text, _)| text.as_str())
    }

    pub fn run<I, O>(&mut self, input: I, output: &mut O) -> io::Result<()>
    where
        I: InputDriver,
        O: OutputDriver,
    {
        let mut event_loop = EventLoop::new(input, FRAME_INTERVAL);
        event_loop.driver().set_mouse_capture(true)?;
        event_loop.run(|_, event| match event {
            LoopEvent::Input(evt) => Ok(self.handle_event(&evt)),
            LoopEvent::Frame => {
                output.draw(|mut frame| {
                    self.frame(&mut frame);
                })?;
                Ok(ControlFlow::Continue)
            }
        })
    }

    /// One host frame: lay out, tick the engine, draw.
    pub fn frame(&mut self, frame: &mut UiFrame<'_>) -> FrameReport {
        self.relayout(frame.area());
        let report = self.tick();
        self.draw(frame);
        report
    }

    /// Recompute the screen layout and publish each canvas rectangle to the
    /// engine. A canvas squeezed to nothing is reported as unmeasurable.
    pub fn relayout(&mut self, area: Rect) {
        self.layout = HostLayout::compute(area, &canvas_order(&self.workspace), self.sources.len());
        for (id, boundary) in &self.boundaries {
            match self.layout.canvas_area(*id) {
                Some(region) if region.inner.width > 0 && region.inner.height > 0 => {
                    boundary.set(self.scale.canvas_rect(region.inner));
                }
                _ => boundary.clear(),
            }
        }
    }

    pub fn tick(&mut self) -> FrameReport {
        let report = self.workspace.tick();
        if let Some(latest) = self.workspace.take_notices().pop() {
            self.notice = Some((latest.message, Instant::now()));
        }
        if self
            .notice
            .as_ref()
            .is_some_and(|(_, at)| at.elapsed() >= NOTICE_TTL)
        {
            self.notice = None;
        }
        report
    }

    pub fn draw(&mut self, frame: &mut UiFrame<'_>) {
        let status = match (&self.notice, &self.logs) {
            (Some((text, _)), _) => StatusLine::Notice(text.clone()),
            (None, Some(logs)) => logs.last_line().map(StatusLine::Log).unwrap_or_default(),
            (None, None) => StatusLine::Empty,
        };
        let view = HostView {
            workspace: &self.workspace,
            layout: &self.layout,
            scale: self.scale,
            sources: &self.sources,
            ghost: self.ghost,
            status,
        };
        render_host(frame, &view, &mut self.thumbnails);
    }

    pub fn handle_event(&mut self, event: &Event) -> ControlFlow {
        match event {
            Event::Key(key) => self.handle_key(*key),
            Event::Mouse(mouse) => {
                self.handle_mouse(*mouse);
                ControlFlow::Continue
            }
            _ => ControlFlow::Continue,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> ControlFlow {
        if key.kind == KeyEventKind::Release {
            return ControlFlow::Continue;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('c') if ctrl => return ControlFlow::Quit,
            KeyCode::Char('q') => return ControlFlow::Quit,
            KeyCode::Delete | KeyCode::Backspace => {
                self.workspace.delete_selected();
            }
            KeyCode::Esc => {
                if self.workspace.cancel_source_drag().is_some() {
                    self.ghost = None;
                }
                self.workspace.clear_selection();
            }
            _ => {}
        }
        ControlFlow::Continue
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (column, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let modifiers = Modifiers {
                    shift: mouse.modifiers.contains(KeyModifiers::SHIFT),
                    alt: mouse.modifiers.contains(KeyModifiers::ALT),
                };
                self.pointer_down(column, row, modifiers);
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.workspace.dragging().is_some() {
                    self.ghost = Some((column, row));
                } else {
                    self.workspace.pointer_move(self.scale.pointer(column, row));
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.pointer_up(column, row),
            _ => {}
        }
    }

    fn pointer_down(&mut self, column: u16, row: u16, modifiers: Modifiers) {
        if let Some(index) = self.layout.source_at(column, row) {
            if let Some(source) = self.sources.get(index).cloned() {
                self.workspace.begin_source_drag(source);
                self.ghost = Some((column, row));
            }
            return;
        }
        let Some(area) = self.layout.canvas_at(column, row).copied() else {
            return;
        };
        let Some(canvas) = self.workspace.canvas(area.id) else {
            return;
        };
        let client = self.scale.pointer(column, row);
        let result = match hit_canvas(canvas, &area, self.scale, column, row) {
            Some(HitTarget::Remove(tile)) => self.workspace.remove_tile(area.id, tile).map(|_| ()),
            Some(HitTarget::Handle(tile, handle)) => {
                self.workspace
                    .pointer_down_on_handle(area.id, tile, handle, modifiers)
            }
            Some(HitTarget::Body(tile)) => self.workspace.pointer_down_on_tile(area.id, tile, client),
            None => self.workspace.pointer_down_on_empty(area.id),
        };
        if let Err(err) = result {
            tracing::debug!(canvas = %area.id, error = %err, "pointer-down ignored");
        }
    }

    fn pointer_up(&mut self, column: u16, row: u16) {
        let client = self.scale.pointer(column, row);
        if self.workspace.dragging().is_none() {
            self.workspace.pointer_up(client);
            return;
        }
        self.ghost = None;
        match self.layout.canvas_at(column, row).map(|a| a.id) {
            Some(canvas) => {
                // rejections are already logged and turned into notices
                let _ = self.workspace.drop_dragged(canvas, client);
            }
            None => {
                if let Some(source) = self.workspace.cancel_source_drag() {
                    tracing::debug!(src = %source.src, "source released outside any canvas");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::scripted::{HeadlessOutputDriver, ScriptedInputDriver};
    use crate::geometry::{Point, Size};
    use crate::probe::ProbeError;

    struct FixedProbe;

    impl NaturalSizeProbe for FixedProbe {
        fn probe(&self, _src: &str) -> Result<Size, ProbeError> {
            Ok(Size::new(640.0, 360.0))
        }
    }

    const SCREEN: Rect = Rect {
        x: 0,
        y: 0,
        width: 120,
        height: 41,
    };

    fn app(config: &EditorConfig) -> App {
        let mut app = App::new(config, Arc::new(FixedProbe));
        app.relayout(SCREEN);
        app
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn wall(app: &App) -> CanvasId {
        app.workspace().canvases()[0].id()
    }

    /// Drag the first source onto the wall at cell (60, 10) and wait for it.
    fn drop_camera(app: &mut App) {
        app.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 3, 1));
        assert_eq!(
            app.workspace().dragging().map(|s| s.name.as_str()),
            Some("Camera")
        );
        app.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 60, 10));
        app.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 60, 10));
        app.workspace_mut().settle_drops(Duration::from_secs(5));
    }

    #[test]
    fn boundaries_follow_layout() {
        let mut app = app(&EditorConfig::default());
        let id = wall(&app);
        let rect = app.workspace().canvas(id).and_then(|c| c.rect());
        assert_eq!(rect, Some(crate::geometry::CanvasRect::new(200.0, 16.0, 752.0, 352.0)));
        app.relayout(Rect::new(0, 0, 3, 2));
        assert_eq!(app.workspace().canvas(id).and_then(|c| c.rect()), None);
    }

    #[test]
    fn drop_move_resize_and_delete() {
        let mut app = app(&EditorConfig::default());
        let id = wall(&app);
        drop_camera(&mut app);

        let tile = app.workspace().canvas(id).and_then(|c| c.store().iter().next().cloned());
        let tile = tile.expect("tile placed");
        assert_eq!(tile.size, Size::new(160.0, 90.0));
        assert_eq!(tile.position, Point::new(284.0, 152.0));
        assert_eq!(app.workspace().selection(), Some((id, tile.id)));

        // body occupies cells 51..71 x 8..13
        app.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 60, 10));
        app.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 62, 10));
        app.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 64, 10));
        assert_eq!(app.tick().geometry_writes, 1);
        app.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 64, 10));
        let moved = app.workspace().canvas(id).and_then(|c| c.store().get(tile.id).cloned());
        assert_eq!(moved.map(|t| t.position), Some(Point::new(316.0, 152.0)));
        assert!(!app.workspace().gesture_in_progress());

        // south-east corner is now at (74, 12)
        app.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 74, 12));
        assert!(app.workspace().gesture_in_progress());
        app.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 78, 14));
        app.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 78, 14));
        let resized = app.workspace().canvas(id).and_then(|c| c.store().get(tile.id).cloned());
        let resized = resized.expect("tile still present");
        assert_eq!(resized.size, Size::new(224.0, 126.0));
        assert_eq!(resized.position, Point::new(316.0, 152.0));

        app.handle_event(&key(KeyCode::Delete));
        assert!(app.workspace().canvas(id).is_some_and(|c| c.store().is_empty()));
    }

    #[test]
    fn full_canvas_raises_notice() {
        let mut config = EditorConfig::default();
        config.wall.capacity = 1;
        let mut app = app(&config);
        drop_camera(&mut app);
        app.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 3, 1));
        app.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 40, 15));
        app.tick();
        assert_eq!(
            app.notice(),
            Some("Maximum 1 images allowed on Video Wall. Please remove an image before adding a new one.")
        );
        assert_eq!(app.workspace().canvases()[0].store().len(), 1);
    }

    #[test]
    fn escape_abandons_source_drag_and_selection() {
        let mut app = app(&EditorConfig::default());
        drop_camera(&mut app);
        app.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 3, 2));
        assert!(app.workspace().dragging().is_some());
        app.handle_event(&key(KeyCode::Esc));
        assert!(app.workspace().dragging().is_none());
        assert_eq!(app.workspace().selection(), None);
        // a release outside every canvas places nothing
        app.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 3, 2));
        app.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 10, 30));
        assert_eq!(app.workspace().pending_drops(), 0);
    }

    #[test]
    fn remove_control_deletes_unselected_tile() {
        let mut app = app(&EditorConfig::default());
        let id = wall(&app);
        drop_camera(&mut app);
        app.handle_event(&key(KeyCode::Esc));
        app.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 69, 8));
        app.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 69, 8));
        assert!(app.workspace().canvas(id).is_some_and(|c| c.store().is_empty()));
    }

    #[test]
    fn run_draws_until_quit() {
        let mut app = App::new(&EditorConfig::default(), Arc::new(FixedProbe));
        let input = ScriptedInputDriver::new([key(KeyCode::Char('x')), key(KeyCode::Char('q'))]);
        let mut output = HeadlessOutputDriver::new(120, 41).expect("terminal");
        app.run(input, &mut output).expect("run");
        assert!(output.frames() >= 1);
        let title: String = (0..120)
            .filter_map(|x| output.buffer().cell((x, 0)).map(|c| c.symbol().to_string()))
            .collect();
        assert!(title.contains("Video Wall 0/4"));
    }
}
