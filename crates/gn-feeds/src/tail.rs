//! File tail source — follow one growing log file line by line.
//!
//! The file is read from the start and then followed. New data is noticed
//! through `notify` events on the parent directory, with a polling fallback
//! for filesystems that do not deliver events. At every end-of-file the
//! source checks the path again:
//!
//! - a different file now lives at the path (rotation) → reopen, offset 0;
//! - the file is shorter than what was read (truncation) → seek to 0;
//! - the path is gone → keep waiting until it is recreated.
//!
//! A partial trailing line is held back until its newline arrives. If the
//! file is rotated or truncated first, the held-back bytes are returned as a
//! line of their own before reading resumes.

use std::io::{self, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum TailError {
    #[error("log file {} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error tailing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TailError {
    fn io(path: &Path, source: io::Error) -> Self {
        TailError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Device and inode of an open file; `None` where the platform has no
/// stable equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileIdentity {
    dev: u64,
    ino: u64,
}

#[cfg(unix)]
fn file_identity(meta: &std::fs::Metadata) -> Option<FileIdentity> {
    use std::os::unix::fs::MetadataExt;
    Some(FileIdentity {
        dev: meta.dev(),
        ino: meta.ino(),
    })
}

#[cfg(not(unix))]
fn file_identity(_meta: &std::fs::Metadata) -> Option<FileIdentity> {
    None
}

/// What to do after end-of-file.
enum Follow {
    /// Nothing changed; wait for more data.
    Wait,
    /// Reading restarted at offset 0 of a new or truncated file.
    Restarted,
}

/// One followed log file.
pub struct TailSource {
    path: PathBuf,
    reader: BufReader<File>,
    identity: Option<FileIdentity>,
    offset: u64,
    pending: Vec<u8>,
    wake: mpsc::Receiver<()>,
    _watcher: Option<RecommendedWatcher>,
    poll_interval: Duration,
}

impl TailSource {
    /// Open `path` for following. Fails with [`TailError::NotFound`] when the
    /// file does not exist yet.
    pub async fn open(path: impl Into<PathBuf>, poll_interval: Duration) -> Result<Self, TailError> {
        let path = path.into();
        let (file, identity) = match open_file(&path).await? {
            Some(opened) => opened,
            None => return Err(TailError::NotFound(path)),
        };

        let (tx, wake) = mpsc::channel(1);
        let watcher = match watch_parent(&path, tx) {
            Ok(w) => Some(w),
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "filesystem notifications unavailable; polling only"
                );
                None
            }
        };

        tracing::info!(path = %path.display(), "tailing log file");
        Ok(Self {
            path,
            reader: BufReader::new(file),
            identity,
            offset: 0,
            pending: Vec::new(),
            wake,
            _watcher: watcher,
            poll_interval,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wait for and return the next complete line, without its line ending.
    /// Invalid UTF-8 is replaced rather than rejected.
    ///
    /// An error is terminal: the source must not be polled again.
    pub async fn next_line(&mut self) -> Result<String, TailError> {
        loop {
            let n = self
                .reader
                .read_until(b'\n', &mut self.pending)
                .await
                .map_err(|e| TailError::io(&self.path, e))?;

            if n > 0 {
                self.offset += n as u64;
                if self.pending.last() == Some(&b'\n') {
                    return Ok(self.take_line());
                }
                continue;
            }

            match self.follow_path().await? {
                Follow::Wait => self.wait_for_change().await,
                Follow::Restarted if self.pending.is_empty() => {}
                Follow::Restarted => return Ok(self.take_line()),
            }
        }
    }

    fn take_line(&mut self) -> String {
        let mut bytes = std::mem::take(&mut self.pending);
        if bytes.last() == Some(&b'\n') {
            bytes.pop();
        }
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// At end-of-file: react to rotation or truncation. `pending` is left
    /// alone so the caller can flush it.
    async fn follow_path(&mut self) -> Result<Follow, TailError> {
        let meta = match tokio::fs::metadata(&self.path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Follow::Wait),
            Err(e) => return Err(TailError::io(&self.path, e)),
        };

        if file_identity(&meta) != self.identity {
            let Some((file, identity)) = open_file(&self.path).await? else {
                return Ok(Follow::Wait);
            };
            tracing::info!(path = %self.path.display(), "log file rotated; reopening");
            self.reader = BufReader::new(file);
            self.identity = identity;
            self.offset = 0;
            return Ok(Follow::Restarted);
        }

        if meta.len() < self.offset {
            tracing::warn!(
                path = %self.path.display(),
                previous_offset = self.offset,
                current_size = meta.len(),
                "log file truncated; reading from the start"
            );
            self.reader
                .seek(SeekFrom::Start(0))
                .await
                .map_err(|e| TailError::io(&self.path, e))?;
            self.offset = 0;
            return Ok(Follow::Restarted);
        }

        Ok(Follow::Wait)
    }

    async fn wait_for_change(&mut self) {
        match tokio::time::timeout(self.poll_interval, self.wake.recv()).await {
            Ok(Some(())) | Err(_) => {}
            // No watcher feeding the channel.
            Ok(None) => tokio::time::sleep(self.poll_interval).await,
        }
    }
}

/// Open `path`, returning `None` when it does not exist.
async fn open_file(path: &Path) -> Result<Option<(File, Option<FileIdentity>)>, TailError> {
    let file = match File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(TailError::io(path, e)),
    };
    let meta = file.metadata().await.map_err(|e| TailError::io(path, e))?;
    Ok(Some((file, file_identity(&meta))))
}

fn watch_parent(path: &Path, tx: mpsc::Sender<()>) -> notify::Result<RecommendedWatcher> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path.file_name().map(|n| n.to_os_string());

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        let Ok(event) = res else { return };
        let relevant = event.paths.is_empty()
            || event
                .paths
                .iter()
                .any(|p| p.file_name() == file_name.as_deref());
        if relevant {
            // A full channel already holds a pending wake-up.
            let _ = tx.try_send(());
        }
    })?;
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}
