use std::path::Path;

use clap::Parser;
use indoc::indoc;

use crate::constants::{
    DEFAULT_CANVAS_CAPACITY, DEFAULT_CELL_HEIGHT, DEFAULT_CELL_WIDTH, PRIMARY_CANVAS_NAME,
    SECONDARY_CANVAS_PREFIX,
};
use crate::drop::SourceDescriptor;
use crate::session::ResizePolicy;

/// Secondary canvases the host can lay out side by side.
pub const MAX_MONITORS: usize = 3;

/// Sources shipped under `assets/sources/`, used when none are given.
const BUNDLED_SOURCES: &[(&str, &str)] = &[
    ("Camera", "camera.svg"),
    ("Presentation", "presentation.svg"),
    ("Conference", "conference.svg"),
    ("Sharepoint", "sharepoint.svg"),
    ("Dashboard", "dashboard.svg"),
    ("Image", "image.svg"),
    ("Main Display", "main-display.svg"),
    ("Secondary Display", "secondary-display.svg"),
];

const KEY_HELP: &str = indoc! {"
    Mouse:
      Drag a source from the sidebar onto a canvas to place it.
      Drag a tile to move it; drag a corner or side of the selected tile to resize.
      Shift while grabbing a handle resizes freely, Alt pins the opposite side.
      Click the x on a tile's top border to remove it.

    Keys:
      Delete, Backspace   remove the selected tile
      Esc                 clear the selection, drop a dragged source
      q, Ctrl+Q, Ctrl+C   quit
"};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "tile-wall",
    version = env!("CARGO_PKG_VERSION"),
    about = "Drag image sources onto a video wall and table monitors, then move and resize them",
    after_help = KEY_HELP
)]
pub struct Cli {
    /// Image sources as `name=path` or `path`. Defaults to the bundled samples.
    #[arg(value_name = "SOURCES")]
    pub sources: Vec<String>,

    /// Maximum number of tiles on the video wall.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_CANVAS_CAPACITY)]
    pub wall_capacity: usize,

    /// Maximum number of tiles on each table monitor.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_CANVAS_CAPACITY)]
    pub monitor_capacity: usize,

    /// Number of table monitors below the wall.
    #[arg(long, value_name = "N", default_value_t = MAX_MONITORS)]
    pub monitors: usize,

    /// Resize freely instead of keeping the image's aspect ratio.
    #[arg(long)]
    pub freeform: bool,

    /// Ignore Shift/Alt when a resize starts.
    #[arg(long)]
    pub no_modifiers: bool,

    /// Width of one terminal cell in canvas pixels.
    #[arg(long, value_name = "PX", default_value_t = DEFAULT_CELL_WIDTH)]
    pub cell_width: u16,

    /// Height of one terminal cell in canvas pixels.
    #[arg(long, value_name = "PX", default_value_t = DEFAULT_CELL_HEIGHT)]
    pub cell_height: u16,

    /// Log verbosity (error, warn, info, debug, trace).
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasConfig {
    pub name: String,
    pub capacity: usize,
}

impl CanvasConfig {
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            capacity,
        }
    }

    /// "Table Monitors A", "Table Monitors B", ...
    pub fn monitor(index: usize, capacity: usize) -> Self {
        let letter = (b'A' + (index % 26) as u8) as char;
        Self::new(format!("{SECONDARY_CANVAS_PREFIX} {letter}"), capacity)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    pub wall: CanvasConfig,
    pub monitors: Vec<CanvasConfig>,
    pub resize_policy: ResizePolicy,
    pub modifiers: bool,
    pub cell_width: u16,
    pub cell_height: u16,
    pub sources: Vec<SourceDescriptor>,
    pub log_level: tracing::Level,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            wall: CanvasConfig::new(PRIMARY_CANVAS_NAME, DEFAULT_CANVAS_CAPACITY),
            monitors: (0..MAX_MONITORS)
                .map(|i| CanvasConfig::monitor(i, DEFAULT_CANVAS_CAPACITY))
                .collect(),
            resize_policy: ResizePolicy::default(),
            modifiers: true,
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
            sources: bundled_sources(),
            log_level: tracing::Level::INFO,
        }
    }
}

impl EditorConfig {
    /// The wall first, then the monitors in order.
    pub fn canvases(&self) -> impl Iterator<Item = &CanvasConfig> {
        std::iter::once(&self.wall).chain(self.monitors.iter())
    }
}

impl TryFrom<&Cli> for EditorConfig {
    type Error = String;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        if cli.wall_capacity == 0 || cli.monitor_capacity == 0 {
            return Err("capacities must be at least 1".to_string());
        }
        if cli.monitors > MAX_MONITORS {
            return Err(format!("at most {MAX_MONITORS} table monitors are supported"));
        }
        if !(1..=64).contains(&cli.cell_width) || !(1..=64).contains(&cli.cell_height) {
            return Err("cell width and height must be between 1 and 64 pixels".to_string());
        }
        let log_level = cli
            .log_level
            .parse::<tracing::Level>()
            .map_err(|_| format!("unknown log level '{}'", cli.log_level))?;
        let sources = if cli.sources.is_empty() {
            bundled_sources()
        } else {
            cli.sources
                .iter()
                .map(|arg| {
                    SourceDescriptor::parse(arg).ok_or_else(|| format!("invalid source '{arg}'"))
                })
                .collect::<Result<Vec<_>, _>>()?
        };
        let resize_policy = if cli.freeform {
            ResizePolicy::FREEFORM
        } else {
            ResizePolicy::default()
        };
        Ok(Self {
            wall: CanvasConfig::new(PRIMARY_CANVAS_NAME, cli.wall_capacity),
            monitors: (0..cli.monitors)
                .map(|i| CanvasConfig::monitor(i, cli.monitor_capacity))
                .collect(),
            resize_policy,
            modifiers: !cli.no_modifiers,
            cell_width: cli.cell_width,
            cell_height: cli.cell_height,
            sources,
            log_level,
        })
    }
}

pub fn bundled_sources() -> Vec<SourceDescriptor> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/sources");
    BUNDLED_SOURCES
        .iter()
        .map(|(name, file)| SourceDescriptor::new(dir.join(file).to_string_lossy(), *name))
        .collect()
}
