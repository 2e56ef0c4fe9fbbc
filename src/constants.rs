//! Shared crate-wide constants.

/// Smallest width, in canvas pixels, a tile may be resized to.
pub const MIN_W: f64 = 40.0;

/// Smallest height, in canvas pixels, a tile may be resized to.
pub const MIN_H: f64 = 30.0;

/// Upper bound for the width of a freshly dropped tile.
pub const INITIAL_MAX_W: f64 = 160.0;

/// Upper bound for the height of a freshly dropped tile.
pub const INITIAL_MAX_H: f64 = 100.0;

/// Natural size assumed when a source image cannot be probed.
///
/// Matches a common 16:9 thumbnail so a failed probe still produces a tile
/// with a sensible aspect ratio.
pub const FALLBACK_NATURAL_W: f64 = 640.0;
pub const FALLBACK_NATURAL_H: f64 = 360.0;

/// Default tile capacity of every canvas.
pub const DEFAULT_CANVAS_CAPACITY: usize = 4;

/// Display name of the primary canvas.
pub const PRIMARY_CANVAS_NAME: &str = "Video Wall";

/// Prefix used to name secondary canvases ("Table Monitors A", "B", ...).
pub const SECONDARY_CANVAS_PREFIX: &str = "Table Monitors";

/// Horizontal size, in canvas pixels, of one terminal cell in the host.
///
/// Units: pixels per column. Together with [`DEFAULT_CELL_HEIGHT`] this maps
/// terminal mouse coordinates into canvas pixels and back when drawing.
pub const DEFAULT_CELL_WIDTH: u16 = 8;

/// Vertical size, in canvas pixels, of one terminal cell in the host.
pub const DEFAULT_CELL_HEIGHT: u16 = 16;
