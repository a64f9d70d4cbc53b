use super::error::DownloadError;
use super::types::{DownloadJob, DownloadStatus};
use super::utils::destination_path;
use crate::sources::{MediaStream, StreamSource};
use az_core::{Clock, DisplaySurface, ProgressFrame, TransferTracker};
use log::{debug, info, warn};
use std::{
    fs::{self, File},
    io::{ErrorKind, Read, Write},
    path::PathBuf,
};

/// Copies `reader` into `writer` one chunk at a time, reporting every chunk
/// to `tracker`. Returns the number of bytes written.
///
/// The first read or write error ends the loop; whatever was written so far
/// stays in `writer`.
pub fn transfer<R, W, S, C, F>(
    reader: &mut R,
    writer: &mut W,
    tracker: &mut TransferTracker<S, C>,
    chunk_size: usize,
    mut on_chunk: F,
) -> Result<u64, DownloadError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
    S: DisplaySurface,
    C: Clock,
    F: FnMut(&ProgressFrame),
{
    let mut buffer = vec![0u8; chunk_size.max(1)];
    let mut transferred = 0u64;

    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(source) => return Err(DownloadError::Read { transferred, source }),
        };

        writer
            .write_all(&buffer[..n])
            .map_err(|source| DownloadError::Write { transferred, source })?;
        transferred += n as u64;

        tracker.record(n);
        on_chunk(&tracker.frame());
    }

    writer
        .flush()
        .map_err(|source| DownloadError::Write { transferred, source })?;
    Ok(transferred)
}

pub fn process_download<S, F>(
    job: &DownloadJob,
    source: &dyn StreamSource,
    surface: S,
    callback: F,
) -> Result<PathBuf, DownloadError>
where
    S: DisplaySurface,
    F: Fn(DownloadStatus),
{
    callback(DownloadStatus::Starting);

    // 1. Setup Paths
    fs::create_dir_all(&job.output_dir).map_err(|e| {
        DownloadError::filesystem("Failed to create downloads directory", &job.output_dir, e)
    })?;
    let path = destination_path(&job.output_dir, &job.title, &job.format.mime_type);

    // 2. Open Stream
    callback(DownloadStatus::Resolving);
    debug!(
        "opening '{}' ({}) via {}",
        job.format.quality,
        job.format.mime_type,
        source.name()
    );
    let MediaStream { mut reader, total } = source.open(&job.format)?;

    let mut file = File::create(&path)
        .map_err(|e| DownloadError::filesystem("Failed to create file", &path, e))?;

    info!("saving {} bytes to {}", total, path.display());
    callback(DownloadStatus::Saving {
        path: path.clone(),
        total,
    });

    // 3. Transfer
    let mut tracker = TransferTracker::new(total, surface).with_estimator(job.estimator);
    let result = transfer(&mut reader, &mut file, &mut tracker, job.chunk_size, |frame| {
        callback(DownloadStatus::Downloading {
            current: frame.current,
            total: frame.total,
            rate: frame.rate,
        })
    });
    tracker.finish();

    let written = result.map_err(|e| {
        warn!("transfer to {} aborted: {}", path.display(), e);
        e
    })?;
    if total > 0 && written != total {
        warn!(
            "stream declared {} bytes but delivered {} for {}",
            total,
            written,
            path.display()
        );
    }

    callback(DownloadStatus::Finished(path.clone()));
    Ok(path)
}
