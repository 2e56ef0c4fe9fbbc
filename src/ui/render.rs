use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType};

use super::hit::{remove_cell, tile_rects};
use super::layout::{CanvasArea, HostLayout};
use super::scale::CellScale;
use super::thumbnail::{ThumbnailCache, render_raster};
use super::{UiFrame, truncate_to_width};
use crate::canvas::{Canvas, CanvasId};
use crate::drop::SourceDescriptor;
use crate::theme;
use crate::workspace::Workspace;

const KEY_HINTS: &str = "drag a source onto a canvas | del remove | esc deselect | q quit";
const REMOVE_GLYPH: &str = "x";
const GHOST_PREFIX: &str = "+ ";

/// Everything one frame of the host draws.
pub struct HostView<'a> {
    pub workspace: &'a Workspace,
    pub layout: &'a HostLayout,
    pub scale: CellScale,
    pub sources: &'a [SourceDescriptor],
    /// Cell under the pointer while a source is being dragged.
    pub ghost: Option<(u16, u16)>,
    pub status: StatusLine,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusLine {
    #[default]
    Empty,
    Notice(String),
    Log(String),
}

pub fn render_host(frame: &mut UiFrame<'_>, view: &HostView<'_>, thumbnails: &mut ThumbnailCache) {
    render_sidebar(frame, view);
    let drop_target = view.ghost.and_then(|(col, row)| view.layout.canvas_at(col, row)).map(|a| a.id);
    for area in &view.layout.canvases {
        if let Some(canvas) = view.workspace.canvas(area.id) {
            render_canvas(frame, canvas, area, view.scale, drop_target == Some(area.id), thumbnails);
        }
    }
    render_ghost(frame, view);
    render_status(frame, view.layout.status, &view.status);
}

fn render_sidebar(frame: &mut UiFrame<'_>, view: &HostView<'_>) {
    let sidebar = view.layout.sidebar;
    if sidebar.width == 0 || sidebar.height == 0 {
        return;
    }
    let block = Block::bordered()
        .title(" Sources ")
        .border_style(Style::default().fg(theme::canvas_border()));
    frame.render_widget(block, sidebar);
    let dragged = view.workspace.dragging().map(|d| d.src.as_str());
    for (row, source) in view.layout.source_rows.iter().zip(view.sources) {
        let style = if dragged == Some(source.src.as_str()) {
            Style::default()
                .fg(theme::sidebar_active_fg())
                .bg(theme::sidebar_active_bg())
        } else {
            Style::default().fg(theme::sidebar_fg())
        };
        frame.fill(*row, style);
        let label = truncate_to_width(&source.name, row.width as usize);
        frame.set_string(row.x, row.y, &label, style);
    }
}

fn render_canvas(
    frame: &mut UiFrame<'_>,
    canvas: &Canvas,
    area: &CanvasArea,
    scale: CellScale,
    drop_target: bool,
    thumbnails: &mut ThumbnailCache,
) {
    let border = if drop_target {
        theme::canvas_drop_target()
    } else {
        theme::canvas_border()
    };
    let title = format!(
        " {} {}/{} ",
        canvas.name(),
        canvas.occupancy(),
        canvas.capacity()
    );
    let block = Block::bordered()
        .title(title)
        .border_style(Style::default().fg(border))
        .title_style(Style::default().fg(theme::canvas_title()));
    frame.render_widget(block, area.frame);

    let selected = canvas.selected();
    for (id, rect) in tile_rects(canvas, area, scale) {
        let Some(tile) = canvas.store().get(id) else {
            continue;
        };
        render_tile(frame, &tile.src, &tile.name, rect, selected == Some(id), thumbnails);
    }
}

fn render_tile(
    frame: &mut UiFrame<'_>,
    src: &str,
    name: &str,
    rect: Rect,
    selected: bool,
    thumbnails: &mut ThumbnailCache,
) {
    frame.fill(rect, Style::default());
    if rect.width < 2 || rect.height < 2 {
        frame.set_symbol(rect.x, rect.y, "#", Style::default().fg(theme::tile_border()));
        return;
    }
    let (border_type, border_color) = if selected {
        (BorderType::Double, theme::selection())
    } else {
        (BorderType::Plain, theme::tile_border())
    };
    let mut block = Block::bordered()
        .border_type(border_type)
        .border_style(Style::default().fg(border_color));
    if rect.width > 6 {
        // leave room for the remove control near the right corner
        let label = truncate_to_width(name, rect.width as usize - 5);
        block = block
            .title(label)
            .title_style(Style::default().fg(theme::tile_label()));
    }
    let inner = block.inner(rect);
    frame.render_widget(block, rect);
    if let Some(raster) = thumbnails.get(src) {
        render_raster(frame, raster, inner);
    }
    if let Some((x, y)) = remove_cell(rect) {
        let style = Style::default()
            .fg(theme::remove_control())
            .add_modifier(Modifier::BOLD);
        frame.set_symbol(x, y, REMOVE_GLYPH, style);
    }
}

fn render_ghost(frame: &mut UiFrame<'_>, view: &HostView<'_>) {
    let (Some((col, row)), Some(source)) = (view.ghost, view.workspace.dragging()) else {
        return;
    };
    let style = Style::default()
        .fg(theme::sidebar_active_fg())
        .bg(theme::accent());
    frame.set_string(col, row, &format!("{GHOST_PREFIX}{}", source.name), style);
}

fn render_status(frame: &mut UiFrame<'_>, area: Rect, status: &StatusLine) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let base = Style::default().fg(theme::status_fg()).bg(theme::status_bg());
    frame.fill(area, base);
    let (left, left_style) = match status {
        StatusLine::Empty => ("", base),
        StatusLine::Notice(text) => (text.as_str(), base.fg(theme::notice_fg())),
        StatusLine::Log(text) => (text.as_str(), base),
    };
    let width = area.width as usize;
    let left = truncate_to_width(left, width);
    frame.set_string(area.x, area.y, &left, left_style);
    let used = left.chars().count();
    let hints = KEY_HINTS.chars().count();
    if used + hints + 2 <= width {
        let x = area.x + (width - hints) as u16;
        frame.set_string(x, area.y, KEY_HINTS, base);
    }
}

/// Canvases shown by the host, in layout order (wall first).
pub fn canvas_order(workspace: &Workspace) -> Vec<CanvasId> {
    workspace.canvases().iter().map(|c| c.id()).collect()
}
