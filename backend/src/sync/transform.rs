use super::{Downloadable, FailureList};
use crate::config::ImageConfig;
use crate::error::{Error, Result};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use rayon::prelude::*;
use rayon::ThreadPool;

/// Decodes and reshapes every fetched image on `pool`. Items that cannot be
/// decoded or cropped move to `failures`; survivors carry the processed image
/// and keep their raw bytes.
pub fn process(
    fetched: Vec<Downloadable>,
    config: &ImageConfig,
    pool: &ThreadPool,
    failures: &mut FailureList,
) -> Vec<Downloadable> {
    let results: Vec<std::result::Result<Downloadable, (String, Error)>> = pool.install(|| {
        fetched
            .into_par_iter()
            .map(|mut item| match transform(&item.raw_bytes, config) {
                Ok(image) => {
                    item.image = Some(image);
                    Ok(item)
                }
                Err(e) => Err((item.id, e)),
            })
            .collect()
    });

    let mut processed = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(item) => processed.push(item),
            Err((id, e)) => failures.record(&id, e),
        }
    }
    processed
}

/// Decode, scale to `target_width` keeping the aspect ratio, then centre crop to
/// `aspect_width:aspect_height`.
pub fn transform(bytes: &[u8], config: &ImageConfig) -> Result<DynamicImage> {
    let decoded = image::load_from_memory(bytes).map_err(|e| Error::Decode(e.to_string()))?;
    let resized = resize_to_width(&decoded, config.target_width)?;
    crop_to_ratio(&resized, config.aspect_width, config.aspect_height)
}

/// Bicubic (Catmull-Rom) scale to `width`, height following proportionally.
/// Upscales small images too.
pub fn resize_to_width(img: &DynamicImage, width: u32) -> Result<DynamicImage> {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Err(Error::Transform(format!("empty image {}x{}", w, h)));
    }
    let height = (u64::from(h) * u64::from(width) + u64::from(w) / 2) / u64::from(w);
    if height == 0 || height > u64::from(u32::MAX) {
        return Err(Error::Transform(format!(
            "{}x{} cannot be scaled to width {}",
            w, h, width
        )));
    }
    Ok(img.resize_exact(width, height as u32, FilterType::CatmullRom))
}

/// Largest centred region with the requested ratio.
pub fn crop_to_ratio(img: &DynamicImage, ratio_w: u32, ratio_h: u32) -> Result<DynamicImage> {
    let (w, h) = img.dimensions();
    let (rw, rh) = (u64::from(ratio_w), u64::from(ratio_h));
    let (cw, ch) = if u64::from(w) * rh > u64::from(h) * rw {
        // Too wide: keep the full height.
        (u64::from(h) * rw / rh, u64::from(h))
    } else {
        (u64::from(w), u64::from(w) * rh / rw)
    };
    if cw == 0 || ch == 0 {
        return Err(Error::Transform(format!(
            "{}x{} is too small for a {}:{} crop",
            w, h, ratio_w, ratio_h
        )));
    }
    let (cw, ch) = (cw as u32, ch as u32);
    Ok(img.crop_imm((w - cw) / 2, (h - ch) / 2, cw, ch))
}
