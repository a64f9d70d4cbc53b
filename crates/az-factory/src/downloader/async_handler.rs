use super::core::process_download;
use super::types::{DownloadJob, DownloadStatus};
use crate::sources::StreamSource;
use az_core::NullSurface;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

pub fn run_async(
    job: DownloadJob,
    source: Box<dyn StreamSource + Send>,
    sender: Sender<DownloadStatus>,
) -> JoinHandle<()> {
    // The whole transfer, tracker included, stays on this one worker thread
    thread::spawn(move || {
        let tx = sender.clone();
        let result = process_download(&job, source.as_ref(), NullSurface, move |status| {
            let _ = tx.send(status);
        });
        if let Err(e) = result {
            let _ = sender.send(DownloadStatus::Error(e.to_string()));
        }
    })
}
