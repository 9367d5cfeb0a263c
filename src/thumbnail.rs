use anyhow::{Context, Result};
use bytes::Bytes;
use eframe::egui::ColorImage;

pub fn fetch_bytes(url: &str) -> Result<Bytes> {
    let response = reqwest::blocking::get(url)
        .with_context(|| format!("requesting thumbnail {}", url))?
        .error_for_status()?;
    Ok(response.bytes()?)
}

pub fn decode(data: &[u8]) -> Result<ColorImage> {
    let img = image::load_from_memory(data)
        .context("decoding thumbnail")?
        .to_rgba8();
    let size = [img.width() as usize, img.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, img.as_raw()))
}

/// Downloads and decodes the thumbnail reported for a finished download.
pub fn fetch_thumbnail(url: &str) -> Result<ColorImage> {
    let data = fetch_bytes(url)?;
    decode(&data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_png_into_color_image() {
        let mut png = Vec::new();
        let source = image::RgbaImage::from_pixel(3, 2, image::Rgba([255, 0, 0, 255]));
        source
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageOutputFormat::Png)
            .unwrap();

        let decoded = decode(&png).unwrap();
        assert_eq!(decoded.size, [3, 2]);
        assert_eq!(decoded.pixels[0], eframe::egui::Color32::from_rgb(255, 0, 0));
    }

    #[test]
    fn rejects_garbage() {
        assert!(decode(b"not an image").is_err());
    }
}
