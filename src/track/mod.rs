// Track module
// Reading, parsing and geometry of GPX tracks

pub mod parser;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use parser::parse_gpx;
pub use storage::{FileStore, LocalFileStore, MemoryFileStore};
pub use types::{Track, TrackPoint};
