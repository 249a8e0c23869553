// Library interface for gpxsplit
// This allows integration tests to access internal modules

pub mod config;
pub mod errors;
pub mod loader;
pub mod navigation;
pub mod track;
pub mod ui;

// Re-export commonly used types
pub use config::AppConfig;
pub use errors::GpxSplitError;
pub use loader::{LoadState, LoaderContext, TrackLoader, ViewState};
pub use navigation::{Navigator, PostSplitParams, Route, SplitMapParams};
pub use track::{FileStore, LocalFileStore, Track, TrackPoint, parse_gpx};
pub use ui::{GpxSplitApp, RenderedView};
