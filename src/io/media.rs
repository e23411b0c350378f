// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project thumbnail loading.
//!
//! This module fetches preview images over HTTP (or from disk) and decodes
//! them into RGBA pixels suitable for an egui texture.

use anyhow::{Context, Result};
use std::io::Read;
use std::sync::OnceLock;
use std::time::Duration;

/// Largest image body accepted from the network.
const MAX_IMAGE_BYTES: u64 = 16 * 1024 * 1024;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Decoded image ready for upload as a texture.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Load an image from an `http(s)://` URL, a `file://` URL or a plain path.
pub fn load_image(source: &str) -> Result<LoadedImage> {
    let bytes = if source.starts_with("http://") || source.starts_with("https://") {
        fetch_bytes(shared_agent(), source)?
    } else {
        let path = source.strip_prefix("file://").unwrap_or(source);
        std::fs::read(path).with_context(|| format!("cannot read {}", path))?
    };
    decode_image(&bytes)
}

/// Agent shared by every thumbnail download.
fn shared_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| image_agent(CONNECT_TIMEOUT, FETCH_TIMEOUT))
}

fn image_agent(connect: Duration, total: Duration) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout_connect(connect)
        .timeout(total)
        .build()
}

fn fetch_bytes(agent: &ureq::Agent, url: &str) -> Result<Vec<u8>> {
    let response = agent
        .get(url)
        .call()
        .map_err(|e| anyhow::anyhow!("request for {} failed: {}", url, e))?;
    let mut bytes = Vec::new();
    response
        .into_reader()
        .take(MAX_IMAGE_BYTES)
        .read_to_end(&mut bytes)
        .with_context(|| format!("reading {} failed", url))?;
    Ok(bytes)
}

/// Decode any format the `image` crate understands into RGBA8.
pub fn decode_image(bytes: &[u8]) -> Result<LoadedImage> {
    let rgba = image::load_from_memory(bytes)
        .context("unsupported or corrupt image")?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(LoadedImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let loaded = decode_image(&png_bytes()).unwrap();
        assert_eq!((loaded.width, loaded.height), (3, 2));
        assert_eq!(loaded.pixels.len(), 3 * 2 * 4);
        assert_eq!(&loaded.pixels[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_load_from_file_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thumb.png");
        std::fs::write(&path, png_bytes()).unwrap();

        let loaded = load_image(&format!("file://{}", path.display())).unwrap();
        assert_eq!(loaded.width, 3);
    }

    #[test]
    fn test_silent_host_times_out() {
        // Accepts the connection but never answers.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/thumb.png", listener.local_addr().unwrap());

        let agent = image_agent(Duration::from_millis(500), Duration::from_millis(300));
        let started = std::time::Instant::now();
        assert!(fetch_bytes(&agent, &url).is_err());
        assert!(started.elapsed() < Duration::from_secs(5));
        drop(listener);
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(decode_image(b"not an image").is_err());
    }
}
