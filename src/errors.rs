// Error types for gpxsplit

use snafu::Snafu;
use std::io;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum GpxSplitError {
    // Errors while loading a track
    #[snafu(display("Could not read {reference}: {source}"))]
    FileRead {
        reference: String,
        source: io::Error,
    },
    #[snafu(display("Could not parse GPX file: {reason}"))]
    GpxParse { reason: String },
    #[snafu(display("The GPX file does not contain any track or route points"))]
    EmptyTrack,
    #[snafu(display("The track loader stopped before reading {reference}"))]
    LoadAborted { reference: String },

    // Split errors
    #[snafu(display("Split index {index} is outside of the track ({len} points)"))]
    InvalidSplitIndex { index: usize, len: usize },

    // Config management errors
    #[snafu(display("Could not find application data directory to save config file"))]
    NoConfigDir,
    #[snafu(display("Error accessing config file: {source}"))]
    ConfigIO { source: io::Error },
    #[snafu(display("Error serializing config file: {source}"))]
    ConfigSerialize { source: serde_json::Error },

    // Application startup errors
    #[snafu(display("No GPX file selected"))]
    NoInputFile,
    #[snafu(display("Could not start the background runtime: {source}"))]
    Runtime { source: io::Error },
    #[snafu(display("Could not start the user interface: {reason}"))]
    Gui { reason: String },
}
