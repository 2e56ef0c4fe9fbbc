//! Pointer-driven placement of image tiles on bounded canvases.
//!
//! The engine (`workspace`, `canvas`, `controller` and the geometry below
//! them) is independent of any terminal; `app`, `ui`, `drivers` and
//! `event_loop` make up the crossterm/ratatui host.

pub mod app;
pub mod boundary;
pub mod canvas;
pub mod coalesce;
pub mod config;
pub mod constants;
pub mod controller;
pub mod drivers;
pub mod drop;
pub mod error;
pub mod event_loop;
pub mod geometry;
pub mod listeners;
pub mod log_buffer;
pub mod probe;
pub mod resize;
pub mod selection;
pub mod session;
pub mod theme;
pub mod tile;
pub mod tracing_sub;
pub mod ui;
pub mod workspace;

pub use canvas::{Canvas, CanvasId};
pub use error::{EngineError, EngineResult};
pub use workspace::Workspace;
