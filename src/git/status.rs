use git2::{Repository, Status, StatusOptions};
use std::path::Path;
use std::thread::JoinHandle;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

/// Working tree state of a path, most significant first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatusKind {
    MergeConflict,
    Added,
    Staged,
    Removed,
    Modified,
    Missing,
    Untracked,
}

impl StatusKind {
    /// The most significant kind among the flags, `None` for clean or
    /// ignored paths
    pub fn from_status(status: Status) -> Option<Self> {
        if status.is_conflicted() {
            Some(StatusKind::MergeConflict)
        } else if status.is_index_new() {
            Some(StatusKind::Added)
        } else if status.intersects(Status::INDEX_MODIFIED | Status::INDEX_RENAMED | Status::INDEX_TYPECHANGE) {
            Some(StatusKind::Staged)
        } else if status.is_index_deleted() {
            Some(StatusKind::Removed)
        } else if status.intersects(Status::WT_MODIFIED | Status::WT_RENAMED | Status::WT_TYPECHANGE) {
            Some(StatusKind::Modified)
        } else if status.is_wt_deleted() {
            Some(StatusKind::Missing)
        } else if status.is_wt_new() {
            Some(StatusKind::Untracked)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathStatus {
    pub path: String,
    pub kind: StatusKind,
    /// Has changes staged in the index
    pub index: bool,
    /// Has changes in the working tree
    pub working: bool,
}

impl PathStatus {
    pub fn from_entry(path: &str, status: Status) -> Option<Self> {
        let kind = StatusKind::from_status(status)?;
        Some(Self {
            path: path.to_string(),
            kind,
            index: status.intersects(
                Status::INDEX_NEW
                    | Status::INDEX_MODIFIED
                    | Status::INDEX_DELETED
                    | Status::INDEX_RENAMED
                    | Status::INDEX_TYPECHANGE,
            ),
            working: status.intersects(
                Status::WT_NEW
                    | Status::WT_MODIFIED
                    | Status::WT_DELETED
                    | Status::WT_RENAMED
                    | Status::WT_TYPECHANGE
                    | Status::CONFLICTED,
            ),
        })
    }
}

enum ScanEvent {
    Path(PathStatus),
    Done(usize),
    Failed(String),
}

/// Working tree status computed on a worker thread.
///
/// Results arrive one path at a time; the owner collects them with
/// [`StatusScan::drain`] on its own thread. Dropping the scan discards
/// whatever the worker still produces.
pub struct StatusScan {
    receiver: UnboundedReceiver<ScanEvent>,
    finished: bool,
    worker: Option<JoinHandle<()>>,
}

impl StatusScan {
    pub fn start(path: &Path) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let path = path.to_path_buf();
        info!("Starting status scan of {}", path.display());

        let worker = std::thread::Builder::new()
            .name("status-scan".to_string())
            .spawn(move || scan(&path, &sender));

        let worker = match worker {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("Could not start status scan: {}", e);
                None
            }
        };
        let finished = worker.is_none();

        Self {
            receiver,
            finished,
            worker,
        }
    }

    /// Everything delivered since the last call, without blocking
    pub fn drain(&mut self) -> Vec<PathStatus> {
        let mut statuses = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if let Some(status) = self.handle(event) {
                        statuses.push(status);
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.finish();
                    break;
                }
            }
        }
        statuses
    }

    /// Block until the worker is done and return the remaining results
    pub fn wait(&mut self) -> Vec<PathStatus> {
        let mut statuses = Vec::new();
        while let Some(event) = self.receiver.blocking_recv() {
            if let Some(status) = self.handle(event) {
                statuses.push(status);
            }
        }
        self.finish();
        statuses
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn handle(&mut self, event: ScanEvent) -> Option<PathStatus> {
        match event {
            ScanEvent::Path(status) => Some(status),
            ScanEvent::Done(count) => {
                debug!("Status scan finished with {} paths", count);
                self.finish();
                None
            }
            ScanEvent::Failed(reason) => {
                warn!("Status scan failed: {}", reason);
                self.finish();
                None
            }
        }
    }

    fn finish(&mut self) {
        self.finished = true;
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Status scan worker panicked");
            }
        }
    }
}

fn scan(path: &Path, sender: &UnboundedSender<ScanEvent>) {
    let result = (|| -> Result<usize, git2::Error> {
        let repo = Repository::open(path)?;
        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = repo.statuses(Some(&mut options))?;
        let mut sent = 0;
        for entry in statuses.iter() {
            let Some(status) = entry
                .path()
                .and_then(|p| PathStatus::from_entry(p, entry.status()))
            else {
                continue;
            };
            if sender.send(ScanEvent::Path(status)).is_err() {
                // Receiver dropped, nobody wants the rest.
                return Ok(sent);
            }
            sent += 1;
        }
        Ok(sent)
    })();

    let event = match result {
        Ok(count) => ScanEvent::Done(count),
        Err(e) => ScanEvent::Failed(e.message().to_string()),
    };
    let _ = sender.send(event);
}
