mod entry;
mod summary;

pub use entry::{DEFAULT_SCREENSHOT_NAME, Report, ScreenshotEntry, ShapeError};
pub use summary::{EntryOutcome, ExtractionSummary};
