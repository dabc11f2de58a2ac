mod builder;
mod request;

pub use builder::{placeholder_name, ArchiveBuilder, ArchiveStream, ArchiveSummary, EntryOutcome};
pub use request::{
    normalize_file_name, ArchiveEntry, DownloadItem, DownloadPayload, DownloadRequest,
};

/// File name offered to the browser for the bundled mods.
pub const ARCHIVE_NAME: &str = "mineshish_mods.zip";
