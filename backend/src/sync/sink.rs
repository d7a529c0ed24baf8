//! Delivery of processed images.
//!
//! The two modes fail differently. Local delivery itemises every write failure
//! into the Failure List. Remote delivery is a single request: if it fails the
//! error is logged and reported in the summary, but no id is added to the
//! Failure List because the whole batch was attempted.

use super::transport::{EncodedImage, ImageTransport};
use super::{Downloadable, FailureList};
use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use log::{error, info};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct Delivery {
    pub delivered: usize,
    pub error: Option<String>,
}

/// Writes each processed image as `<dir>/<id>.jpg`.
pub fn save_local(
    items: &[Downloadable],
    dir: &Path,
    quality: u8,
    failures: &mut FailureList,
) -> Delivery {
    let mut delivery = Delivery::default();
    if items.is_empty() {
        return delivery;
    }
    if let Err(e) = fs::create_dir_all(dir) {
        for item in items {
            failures.record(&item.id, format!("cannot create {}: {}", dir.display(), e));
        }
        return delivery;
    }

    for item in items {
        match save_one(item, dir, quality) {
            Ok(path) => {
                info!("Saved {}", path.display());
                delivery.delivered += 1;
            }
            Err(e) => failures.record(&item.id, e),
        }
    }
    delivery
}

fn save_one(item: &Downloadable, dir: &Path, quality: u8) -> Result<PathBuf> {
    let image = item
        .image
        .as_ref()
        .ok_or_else(|| Error::Encode("image was never processed".into()))?;
    let path = output_path(dir, &item.id)?;

    let mut writer = BufWriter::new(File::create(&path)?);
    // JPEG has no alpha channel.
    let rgb = image.to_rgb8();
    JpegEncoder::new_with_quality(&mut writer, quality)
        .encode_image(&rgb)
        .map_err(|e| Error::Encode(e.to_string()))?;
    writer.flush()?;
    Ok(path)
}

/// Ids become file names, so anything that could escape `dir` is refused.
fn output_path(dir: &Path, id: &str) -> Result<PathBuf> {
    if id.is_empty() || id.starts_with('.') || id.contains(['/', '\\', '\0']) {
        return Err(Error::Encode(format!("id {:?} is not a usable file name", id)));
    }
    Ok(dir.join(format!("{}.jpg", id)))
}

/// Posts every item's original bytes, base64 encoded, as one batch.
pub fn send_remote(
    items: &[Downloadable],
    endpoint: &str,
    transport: &dyn ImageTransport,
) -> Delivery {
    let batch: Vec<EncodedImage> = items
        .iter()
        .map(|item| EncodedImage {
            id: item.id.clone(),
            image: BASE64.encode(&item.raw_bytes),
        })
        .collect();

    let error = match transport.post_batch(endpoint, &batch) {
        Ok(()) => {
            info!("Sent {} images to {}", batch.len(), endpoint);
            None
        }
        Err(e) => {
            error!("Failed to send images to {}: {}", endpoint, e);
            Some(e.to_string())
        }
    };
    Delivery {
        delivered: batch.len(),
        error,
    }
}
