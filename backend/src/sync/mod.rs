//! # Merge pipeline
//!
//! Drains the cache into the external store, then fetches, transforms and
//! delivers each attraction's photo.
//!
//! ## Stages
//!
//! 1.  **Drain**: read every cached attraction while holding the cache session.
//! 2.  **Write**: bulk insert into the external store and clear the cache
//!     (see `store::external`). Storage faults here abort the run.
//! 3.  **Acquire** (`acquire`): records without an image url fail immediately;
//!     the rest are fetched on the worker pool.
//! 4.  **Transform** (`transform`): decode, resize to the target width, centre
//!     crop to the target aspect ratio.
//! 5.  **Deliver** (`sink`): one JPEG per record on disk, or one JSON batch of
//!     the original bytes posted to a remote endpoint.
//!
//! Stages 3 to 5 only see the snapshot read in stage 1. Per-record faults in
//! those stages are collected in a `FailureList` and never retried.

pub mod acquire;
pub mod sink;
pub mod transform;
pub mod transport;

use crate::config::{AppConfig, ImageConfig};
use crate::error::{Error, Result};
use crate::store::cache::CacheStore;
use crate::store::external;
use common::model::merge::{DeliveryMode, MergeSummary};
use image::DynamicImage;
use log::{info, warn};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use transport::ImageTransport;

/// A photo travelling through the acquire, transform and deliver stages.
pub struct Downloadable {
    pub id: String,
    pub source_url: String,
    /// Bytes as fetched. Kept after decoding because the remote sink sends them.
    pub raw_bytes: Vec<u8>,
    /// Set by the transform stage.
    pub image: Option<DynamicImage>,
}

impl Downloadable {
    pub fn new(id: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source_url: source_url.into(),
            raw_bytes: Vec::new(),
            image: None,
        }
    }
}

/// Ids of records that dropped out of the current run, in failure order.
#[derive(Debug, Default)]
pub struct FailureList {
    ids: Vec<String>,
}

impl FailureList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, id: &str, reason: impl fmt::Display) {
        warn!("Attraction {} dropped: {}", id, reason);
        self.ids.push(id.to_string());
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn into_ids(self) -> Vec<String> {
        self.ids
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    Draining,
    Writing,
    Acquiring,
    Transforming,
    Delivering,
}

impl SyncStage {
    /// Rough completion percentage reported when the stage starts.
    pub fn progress(self) -> u32 {
        match self {
            SyncStage::Draining => 5,
            SyncStage::Writing => 15,
            SyncStage::Acquiring => 30,
            SyncStage::Transforming => 60,
            SyncStage::Delivering => 85,
        }
    }
}

/// Everything a merge run needs, built once at startup.
#[derive(Clone)]
pub struct SyncContext {
    pub cache: CacheStore,
    pub transport: Arc<dyn ImageTransport>,
    pub output_dir: PathBuf,
    pub image: ImageConfig,
    pool: Arc<ThreadPool>,
}

impl SyncContext {
    pub fn new(
        cache: CacheStore,
        transport: Arc<dyn ImageTransport>,
        config: &AppConfig,
    ) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.fetch_workers)
            .thread_name(|i| format!("image-worker-{}", i))
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;
        Ok(Self {
            cache,
            transport,
            output_dir: config.output_dir.clone(),
            image: config.image,
            pool: Arc::new(pool),
        })
    }
}

/// Runs one full merge against the external store at `external_store`.
///
/// `on_stage` is called as each stage starts. Returns the delivery summary, or
/// the storage error that aborted the run.
pub fn run_merge(
    ctx: &SyncContext,
    external_store: &str,
    mode: &DeliveryMode,
    mut on_stage: impl FnMut(SyncStage),
) -> Result<MergeSummary> {
    on_stage(SyncStage::Draining);
    let records = {
        let session = ctx.cache.session();
        let records = session.read_all_attractions()?;
        info!("Merging {} cached attractions into {}", records.len(), external_store);

        on_stage(SyncStage::Writing);
        external::write_batch(external_store, &records, &session)?;
        records
    };

    let mut failures = FailureList::new();

    on_stage(SyncStage::Acquiring);
    let pending = acquire::collect_downloadables(&records, &mut failures);
    let fetched = acquire::download(pending, ctx.transport.as_ref(), &ctx.pool, &mut failures);
    info!("Fetched {} images, {} failed so far", fetched.len(), failures.len());

    on_stage(SyncStage::Transforming);
    let processed = transform::process(fetched, &ctx.image, &ctx.pool, &mut failures);

    on_stage(SyncStage::Delivering);
    let delivery = match mode {
        DeliveryMode::Local => sink::save_local(
            &processed,
            &ctx.output_dir,
            ctx.image.jpeg_quality,
            &mut failures,
        ),
        DeliveryMode::Remote { endpoint } => {
            sink::send_remote(&processed, endpoint, ctx.transport.as_ref())
        }
    };

    let summary = MergeSummary {
        mode: mode.clone(),
        total: records.len(),
        delivered: delivery.delivered,
        failed: failures.into_ids(),
        delivery_error: delivery.error,
    };
    info!(
        "Merge finished: {} of {} delivered, {} failed",
        summary.delivered,
        summary.total,
        summary.failed_count()
    );
    Ok(summary)
}
