//! Background work: uploads, configuration service calls, asset loads.
//!
//! Every operation runs on a private tokio runtime and reports back through
//! a channel. Nothing here touches session state; results are applied by
//! the owner on its next poll, one merge per result.

use std::path::PathBuf;

use tokio::runtime::Runtime;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use shared::{ConfigurationPayload, PartId, SavedConfiguration};

use crate::assets::{loader, AssetResult, MeshAsset};
use crate::cloud::{Bucket, CloudClient, CloudError, CloudResult};
use crate::state::settings::CloudSettings;

/// Where an uploaded file ends up once stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadTarget {
    DeskModel,
    FrameModel,
    TopTexture,
    Element,
    AdminModel(PartId),
    AdminTexture(PartId),
}

impl UploadTarget {
    pub fn bucket(&self) -> Bucket {
        match self {
            UploadTarget::TopTexture | UploadTarget::AdminTexture(_) => Bucket::Textures,
            _ => Bucket::Models,
        }
    }
}

/// Outcome of a background operation
#[derive(Debug)]
pub enum TaskResult {
    Uploaded {
        target: UploadTarget,
        file_name: String,
        result: CloudResult<String>,
    },
    Saved {
        name: String,
        result: CloudResult<()>,
    },
    Listed(CloudResult<Vec<SavedConfiguration>>),
    AutoLoaded(CloudResult<Option<SavedConfiguration>>),
    AssetLoaded {
        url: String,
        result: AssetResult<MeshAsset>,
    },
}

/// Owns the runtime and the result channel
pub struct TaskRunner {
    runtime: Runtime,
    tx: UnboundedSender<TaskResult>,
    rx: UnboundedReceiver<TaskResult>,
    http: reqwest::Client,
    cloud: Option<CloudClient>,
    pending: usize,
}

impl TaskRunner {
    pub fn new() -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("desk-tasks")
            .enable_all()
            .build()?;
        let (tx, rx) = unbounded_channel();
        Ok(Self {
            runtime,
            tx,
            rx,
            http: reqwest::Client::new(),
            cloud: None,
            pending: 0,
        })
    }

    /// (Re)build the cloud client from settings
    pub fn configure(&mut self, settings: &CloudSettings) {
        self.cloud = if settings.is_configured() {
            match CloudClient::new(&settings.url, &settings.api_key, settings.timeout()) {
                Ok(client) => Some(client),
                Err(e) => {
                    tracing::warn!(error = %e, "Cloud client unavailable");
                    None
                }
            }
        } else {
            None
        };
    }

    pub fn cloud_configured(&self) -> bool {
        self.cloud.is_some()
    }

    /// Number of operations still in flight
    pub fn pending(&self) -> usize {
        self.pending
    }

    fn cloud(&self) -> CloudResult<CloudClient> {
        self.cloud.clone().ok_or(CloudError::NotConfigured)
    }

    fn spawn<F>(&mut self, fut: F)
    where
        F: std::future::Future<Output = TaskResult> + Send + 'static,
    {
        let tx = self.tx.clone();
        self.pending += 1;
        self.runtime.spawn(async move {
            let _ = tx.send(fut.await);
        });
    }

    /// Upload a local file for the given slot
    pub fn upload(&mut self, target: UploadTarget, path: PathBuf) -> CloudResult<()> {
        let client = self.cloud()?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!(?target, file = %file_name, "Spawning upload");
        self.spawn(async move {
            let result = client.store_file(target.bucket(), &path).await;
            TaskResult::Uploaded {
                target,
                file_name,
                result,
            }
        });
        Ok(())
    }

    pub fn save(&mut self, name: String, payload: ConfigurationPayload) -> CloudResult<()> {
        let client = self.cloud()?;
        if name.trim().is_empty() {
            return Err(CloudError::EmptyName);
        }
        self.spawn(async move {
            let result = client.save(&name, &payload).await;
            TaskResult::Saved { name, result }
        });
        Ok(())
    }

    pub fn list_recent(&mut self, limit: usize) -> CloudResult<()> {
        let client = self.cloud()?;
        self.spawn(async move { TaskResult::Listed(client.list_recent(limit).await) });
        Ok(())
    }

    /// Best-effort fetch of the newest stored configuration
    pub fn auto_load(&mut self) -> CloudResult<()> {
        let client = self.cloud()?;
        self.spawn(async move { TaskResult::AutoLoaded(client.latest().await) });
        Ok(())
    }

    pub fn load_asset(&mut self, url: String) {
        let http = self.http.clone();
        self.spawn(async move {
            let result = loader::load(&http, &url).await;
            TaskResult::AssetLoaded { url, result }
        });
    }

    /// Drain finished operations without blocking
    pub fn poll(&mut self) -> Vec<TaskResult> {
        let mut done = Vec::new();
        while let Ok(result) = self.rx.try_recv() {
            self.pending = self.pending.saturating_sub(1);
            done.push(result);
        }
        done
    }

    /// Block until at least one result arrives (for tests and shutdown)
    pub fn wait_one(&mut self) -> Option<TaskResult> {
        let result = self.runtime.block_on(self.rx.recv())?;
        self.pending = self.pending.saturating_sub(1);
        Some(result)
    }
}
