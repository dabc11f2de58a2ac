use std::io::{self, SeekFrom};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_zip::tokio::write::ZipFileWriter;
use async_zip::{Compression, DeflateOption, ZipEntryBuilder};
use axum::body::Bytes;
use futures_util::io::AsyncWriteExt as _;
use futures_util::stream::{self, BoxStream, StreamExt};
use reqwest::{Client, Response};
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncSeekExt, AsyncWrite, AsyncWriteExt as _};
use tokio::task::JoinHandle;
use tokio_util::compat::TokioAsyncReadCompatExt;
use tokio_util::io::ReaderStream;
use tracing::{debug, error, info, warn};

use super::request::{ArchiveEntry, DownloadRequest};
use crate::core::error::{SiteError, SiteResult};

/// Bytes buffered between the zip encoder and the HTTP response.
const PIPE_CAPACITY: usize = 64 * 1024;

/// Response body of an archive being built.
pub type ArchiveStream = BoxStream<'static, io::Result<Bytes>>;

/// How one requested file ended up in the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Stored { bytes: u64 },
    /// The file could not be fetched; an error note was stored instead.
    Placeholder { name: String },
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub stored: usize,
    pub placeholders: usize,
}

/// Result of the fetch stage for one entry.
enum Fetched {
    /// The whole body, rewound, in an anonymous scratch file.
    Spooled(File),
    /// The remote side failed; nothing of the file may reach the archive.
    Failed(SiteError),
}

/// Streams remote files into a zip, one entry at a time.
///
/// Each file is downloaded completely to a scratch file before its entry
/// is opened, so a transfer that breaks off leaves only its placeholder.
pub struct ArchiveBuilder {
    client: Client,
    /// Per-file timeout for remote fetches.
    timeout: Duration,
    /// Where scratch files go; the system temp dir when unset.
    spool_dir: Option<PathBuf>,
}

impl ArchiveBuilder {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self {
            client,
            timeout,
            spool_dir: None,
        }
    }

    pub fn with_spool_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.spool_dir = dir;
        self
    }

    // ── Streaming into a response ───────────────────────

    /// Start building the archive in the background and return its bytes
    /// as a stream.
    pub async fn open(self: &Arc<Self>, request: DownloadRequest) -> SiteResult<ArchiveStream> {
        let (sink, source) = tokio::io::duplex(PIPE_CAPACITY);

        let builder = Arc::clone(self);
        let task = tokio::spawn(async move {
            let mut sink = sink;
            builder.write_archive(request.entries(), &mut sink).await
        });

        stream_archive(source, task).await
    }

    // ── Pipeline ────────────────────────────────────────

    /// Write the zip for `entries` into `sink`: fetch, append, and after
    /// the last entry finalize.
    ///
    /// Remote failures become placeholder entries. Any error returned here
    /// is fatal: the sink is unusable, scratch space is unavailable, or
    /// the encoder failed.
    pub async fn write_archive<W>(
        &self,
        entries: &[ArchiveEntry],
        sink: &mut W,
    ) -> SiteResult<ArchiveSummary>
    where
        W: AsyncWrite + Unpin,
    {
        let mut writer = ZipFileWriter::with_tokio(sink);
        let mut summary = ArchiveSummary::default();

        for entry in entries {
            let fetched = self.fetch(entry).await?;
            match append_entry(&mut writer, entry, fetched).await? {
                EntryOutcome::Stored { bytes } => {
                    debug!("Stored {} ({} bytes)", entry.filename, bytes);
                    summary.stored += 1;
                }
                EntryOutcome::Placeholder { name } => {
                    debug!("Stored placeholder {}", name);
                    summary.placeholders += 1;
                }
            }
        }

        let sink = writer.close().await?.into_inner();
        sink.shutdown().await?;
        Ok(summary)
    }

    /// Download `entry` into a scratch file. Only local IO errors are
    /// returned as `Err`; remote failures come back as [`Fetched::Failed`].
    async fn fetch(&self, entry: &ArchiveEntry) -> SiteResult<Fetched> {
        let mut file = self.spool_file()?;

        let resp = match self.request(entry).await {
            Ok(resp) => resp,
            Err(e) => return Ok(Fetched::Failed(e)),
        };

        let mut body = resp.bytes_stream();
        let mut received = 0u64;
        while let Some(chunk) = body.next().await {
            match chunk {
                Ok(bytes) => {
                    file.write_all(&bytes).await?;
                    received += bytes.len() as u64;
                }
                Err(e) => {
                    warn!(
                        "Transfer of {} broke off after {} bytes: {}",
                        entry.filename, received, e
                    );
                    return Ok(Fetched::Failed(e.into()));
                }
            }
        }

        file.flush().await?;
        file.seek(SeekFrom::Start(0)).await?;
        Ok(Fetched::Spooled(file))
    }

    async fn request(&self, entry: &ArchiveEntry) -> SiteResult<Response> {
        let resp = self
            .client
            .get(&entry.url)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SiteError::UpstreamStatus {
                url: entry.url.clone(),
                status: status.as_u16(),
            });
        }
        Ok(resp)
    }

    /// Anonymous temp file, removed by the OS once dropped.
    fn spool_file(&self) -> SiteResult<File> {
        let file = match &self.spool_dir {
            Some(dir) => tempfile::tempfile_in(dir)?,
            None => tempfile::tempfile()?,
        };
        Ok(File::from_std(file))
    }
}

/// Turn the encoder output into a response body.
///
/// Waits for the first chunk so a failure before any output surfaces as an
/// error here. A failure after that ends the stream with an error item
/// instead of a clean end. Dropping the stream breaks the pipe and the
/// encoder stops at its next write.
async fn stream_archive<R>(
    source: R,
    task: JoinHandle<SiteResult<ArchiveSummary>>,
) -> SiteResult<ArchiveStream>
where
    R: AsyncRead + Send + 'static,
{
    let outcome = stream::once(async move {
        match task.await {
            Ok(Ok(summary)) => {
                info!(
                    "Archive complete: {} files, {} placeholders",
                    summary.stored, summary.placeholders
                );
                None
            }
            Ok(Err(e)) => {
                error!("Archive aborted: {}", e);
                Some(Err(io::Error::other(e.to_string())))
            }
            Err(e) => {
                error!("Archive task failed: {}", e);
                Some(Err(io::Error::other(e)))
            }
        }
    })
    .filter_map(futures_util::future::ready);

    let mut body = ReaderStream::new(source).chain(outcome).boxed();
    match body.next().await {
        Some(Err(e)) => Err(SiteError::Io(e)),
        first => Ok(stream::iter(first).chain(body).boxed()),
    }
}

async fn append_entry<W>(
    writer: &mut ZipFileWriter<W>,
    entry: &ArchiveEntry,
    fetched: Fetched,
) -> SiteResult<EntryOutcome>
where
    W: AsyncWrite + Unpin,
{
    let file = match fetched {
        Fetched::Spooled(file) => file,
        Fetched::Failed(e) => {
            warn!("Download failed for {}: {}", entry.filename, e);
            return write_placeholder(writer, entry, &e).await;
        }
    };

    let mut entry_writer = writer
        .write_entry_stream(entry_builder(entry.filename.clone()))
        .await?;
    let bytes = futures_util::io::copy(file.compat(), &mut entry_writer).await?;
    entry_writer.close().await?;

    Ok(EntryOutcome::Stored { bytes })
}

async fn write_placeholder<W>(
    writer: &mut ZipFileWriter<W>,
    entry: &ArchiveEntry,
    error: &SiteError,
) -> SiteResult<EntryOutcome>
where
    W: AsyncWrite + Unpin,
{
    let name = placeholder_name(&entry.filename);
    let note = format!("Error: {}", error);
    writer
        .write_entry_whole(entry_builder(name.clone()), note.as_bytes())
        .await?;
    Ok(EntryOutcome::Placeholder { name })
}

pub fn placeholder_name(filename: &str) -> String {
    format!("ERROR_{}.txt", filename)
}

fn entry_builder(name: String) -> ZipEntryBuilder {
    ZipEntryBuilder::new(name.into(), Compression::Deflate).deflate_option(DeflateOption::Maximum)
}
