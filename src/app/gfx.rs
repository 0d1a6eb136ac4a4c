// src/app/gfx.rs
use std::path::Path;

use eframe::egui::{self as eg, ColorImage, TextureHandle};
use image::{imageops::FilterType, DynamicImage, GenericImageView, RgbaImage};

/// Decode a fetched payload. Format is sniffed from the bytes.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, String> {
    image::load_from_memory(bytes).map_err(|e| format!("decode: {e}"))
}

/// Decode an image file from disk.
pub fn load_path(p: &Path) -> Result<DynamicImage, String> {
    image::ImageReader::open(p)
        .map_err(|e| format!("open image {}: {e}", p.display()))?
        .with_guessed_format()
        .map_err(|e| format!("guess format {}: {e}", p.display()))?
        .decode()
        .map_err(|e| format!("decode {}: {e}", p.display()))
}

/// Scale to exactly `width`, keeping aspect. Upscales too, so every cell in a
/// column lines up.
pub fn scale_to_width(img: &DynamicImage, width: u32) -> RgbaImage {
    let width = width.max(1);
    let (w, h) = img.dimensions();
    if w == width {
        return img.to_rgba8();
    }
    let new_h = ((h as f32) * (width as f32 / w.max(1) as f32))
        .round()
        .max(1.0) as u32;
    img.resize_exact(width, new_h, FilterType::CatmullRom)
        .to_rgba8()
}

/// Upload an RGBA image to a GPU texture. (UI thread only)
pub fn upload_rgba(ctx: &eg::Context, img: &RgbaImage, name: &str) -> TextureHandle {
    let size = [img.width() as usize, img.height() as usize];
    let color = ColorImage::from_rgba_unmultiplied(size, img.as_raw());
    ctx.load_texture(name.to_string(), color, eg::TextureOptions::LINEAR)
}

#[cfg(test)]
pub(crate) fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, image::Rgba([200, 40, 40, 255])));
    let mut out = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaling_keeps_aspect() {
        let img = decode(&png_bytes(100, 150)).unwrap();
        let scaled = scale_to_width(&img, 50);
        assert_eq!(scaled.dimensions(), (50, 75));

        let wide = DynamicImage::new_rgba8(1920, 1080);
        assert_eq!(scale_to_width(&wide, 118).dimensions(), (118, 66));
    }

    #[test]
    fn zero_width_is_clamped() {
        let img = DynamicImage::new_rgba8(10, 10);
        assert_eq!(scale_to_width(&img, 0).dimensions(), (1, 1));
    }

    #[test]
    fn garbage_does_not_decode() {
        assert!(decode(b"<html>not found</html>").is_err());
        assert!(decode(&[]).is_err());
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("poster.png");
        std::fs::write(&p, png_bytes(4, 6)).unwrap();
        let img = load_path(&p).unwrap();
        assert_eq!(img.dimensions(), (4, 6));
        assert!(load_path(&dir.path().join("missing.png")).is_err());
    }
}
