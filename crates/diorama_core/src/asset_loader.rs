//! Background asset loading
//!
//! The [`AssetLoader`] owns a worker thread that decodes images and OBJ
//! models off the frame loop. Requests go in through one channel, owned
//! results come back through another and are polled once per frame. The
//! worker never touches the scene graph.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use crate::asset_error::AssetError;
use crate::model::ModelData;
use crate::texture::TextureData;

/// Something to load; relative paths resolve against the loader's root
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetRequest {
    /// One image
    Texture(PathBuf),
    /// Several images that are only useful together
    TextureSet(Vec<PathBuf>),
    /// An OBJ file plus its MTL and diffuse maps
    Model(PathBuf),
}

/// Identifies a submitted request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetTicket(u64);

/// A finished load
#[derive(Debug)]
pub enum LoadedAsset {
    Texture(Result<TextureData, AssetError>),
    /// One result per requested path, in request order
    TextureSet(Vec<Result<TextureData, AssetError>>),
    Model(Result<ModelData, AssetError>),
}

/// Result of a background load
#[derive(Debug)]
pub struct LoadResult {
    /// Ticket returned by [`AssetLoader::load_async`]
    pub ticket: AssetTicket,
    pub asset: LoadedAsset,
}

struct Job {
    ticket: AssetTicket,
    request: AssetRequest,
}

/// Background asset loader using a dedicated worker thread
///
/// The worker thread runs until the loader is dropped.
pub struct AssetLoader {
    root: PathBuf,
    sender: Sender<Job>,
    receiver: Receiver<LoadResult>,
    next_ticket: u64,
    pending: usize,
}

impl AssetLoader {
    /// Create a loader resolving relative paths against `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let (job_tx, job_rx) = channel::<Job>();
        let (result_tx, result_rx) = channel::<LoadResult>();

        thread::spawn(move || {
            while let Ok(job) = job_rx.recv() {
                let asset = load(&job.request);
                if result_tx.send(LoadResult { ticket: job.ticket, asset }).is_err() {
                    break;
                }
            }
        });

        Self {
            root: root.into(),
            sender: job_tx,
            receiver: result_rx,
            next_ticket: 0,
            pending: 0,
        }
    }

    /// Root directory for relative paths
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Queue a request, returning the ticket its result will carry
    ///
    /// Returns `None` if the worker thread has exited; no result will ever
    /// arrive for such a request.
    pub fn load_async(&mut self, request: AssetRequest) -> Option<AssetTicket> {
        let ticket = AssetTicket(self.next_ticket);
        self.next_ticket += 1;

        let request = self.resolve(request);
        log::debug!("Queued asset load {:?}: {:?}", ticket, request);

        if self.sender.send(Job { ticket, request }).is_err() {
            log::error!("Asset worker has exited; dropping {:?}", ticket);
            return None;
        }
        self.pending += 1;
        Some(ticket)
    }

    /// Take one finished load, if any (non-blocking)
    pub fn poll(&mut self) -> Option<LoadResult> {
        match self.receiver.try_recv() {
            Ok(result) => {
                self.pending = self.pending.saturating_sub(1);
                Some(result)
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Take every finished load available now (non-blocking)
    pub fn poll_all(&mut self) -> Vec<LoadResult> {
        let mut results = Vec::new();
        while let Some(result) = self.poll() {
            results.push(result);
        }
        results
    }

    /// Block up to `timeout` for the next finished load
    pub fn wait(&mut self, timeout: Duration) -> Option<LoadResult> {
        match self.receiver.recv_timeout(timeout) {
            Ok(result) => {
                self.pending = self.pending.saturating_sub(1);
                Some(result)
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Requests submitted but not yet polled
    #[inline]
    pub fn pending(&self) -> usize {
        self.pending
    }

    fn resolve(&self, request: AssetRequest) -> AssetRequest {
        let join = |p: PathBuf| if p.is_absolute() { p } else { self.root.join(p) };
        match request {
            AssetRequest::Texture(p) => AssetRequest::Texture(join(p)),
            AssetRequest::TextureSet(ps) => AssetRequest::TextureSet(ps.into_iter().map(join).collect()),
            AssetRequest::Model(p) => AssetRequest::Model(join(p)),
        }
    }
}

fn load(request: &AssetRequest) -> LoadedAsset {
    match request {
        AssetRequest::Texture(path) => LoadedAsset::Texture(TextureData::from_file(path)),
        AssetRequest::TextureSet(paths) => {
            LoadedAsset::TextureSet(paths.iter().map(TextureData::from_file).collect())
        }
        AssetRequest::Model(path) => LoadedAsset::Model(ModelData::load(path)),
    }
}
