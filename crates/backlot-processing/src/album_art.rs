//! Album art rendition rendering
//!
//! An uploaded cover image is resized into the two fixed-size JPEG
//! renditions the gallery layout expects. Both renditions share one
//! decode of the upload.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use uuid::Uuid;

const JPEG_QUALITY: u8 = 75;

/// The fixed rendition sizes written for every media entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenditionSize {
    Small,
    Medium,
}

impl RenditionSize {
    pub const ALL: [RenditionSize; 2] = [RenditionSize::Small, RenditionSize::Medium];

    pub const fn dimensions(self) -> (u32, u32) {
        match self {
            RenditionSize::Small => (162, 113),
            RenditionSize::Medium => (240, 168),
        }
    }

    const fn suffix(self) -> &'static str {
        match self {
            RenditionSize::Small => "s",
            RenditionSize::Medium => "m",
        }
    }

    /// File name of this rendition for a media entry, e.g. "<id>s.jpg".
    pub fn file_name(self, media_id: Uuid) -> String {
        format!("{}{}.jpg", media_id, self.suffix())
    }
}

/// Encoded JPEG bytes for both renditions
#[derive(Debug)]
pub struct AlbumArt {
    pub small: Vec<u8>,
    pub medium: Vec<u8>,
}

impl AlbumArt {
    pub fn bytes(&self, size: RenditionSize) -> &[u8] {
        match size {
            RenditionSize::Small => &self.small,
            RenditionSize::Medium => &self.medium,
        }
    }
}

/// Decode an uploaded image and render both album art renditions.
pub fn render(data: &[u8]) -> Result<AlbumArt, anyhow::Error> {
    let img = ImageReader::new(Cursor::new(data))
        .with_guessed_format()?
        .decode()?;

    Ok(AlbumArt {
        small: encode_rendition(&img, RenditionSize::Small)?,
        medium: encode_rendition(&img, RenditionSize::Medium)?,
    })
}

fn encode_rendition(img: &DynamicImage, size: RenditionSize) -> Result<Vec<u8>, anyhow::Error> {
    let (width, height) = size.dimensions();
    // Exact resize: the gallery renders fixed thumbnail boxes, so aspect
    // ratio is not preserved.
    let resized = img.resize_exact(width, height, FilterType::Lanczos3).to_rgb8();

    let mut cursor = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
    resized.write_with_encoder(encoder)?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;

    fn sample_png(width: u32, height: u32) -> Vec<u8> {
        let mut img = image::RgbaImage::new(width, height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = image::Rgba([(x % 256) as u8, (y % 256) as u8, 200, 255]);
        }
        let mut cursor = Cursor::new(Vec::new());
        img.write_to(&mut cursor, image::ImageFormat::Png).unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_render_produces_both_sizes() {
        let art = render(&sample_png(320, 240)).unwrap();

        let small = image::load_from_memory(&art.small).unwrap();
        assert_eq!(small.dimensions(), (162, 113));

        let medium = image::load_from_memory(&art.medium).unwrap();
        assert_eq!(medium.dimensions(), (240, 168));
    }

    #[test]
    fn test_renditions_are_jpeg() {
        let art = render(&sample_png(100, 100)).unwrap();
        for size in RenditionSize::ALL {
            let format = image::guess_format(art.bytes(size)).unwrap();
            assert_eq!(format, image::ImageFormat::Jpeg);
        }
    }

    #[test]
    fn test_render_upscales_small_input() {
        let art = render(&sample_png(40, 30)).unwrap();
        let small = image::load_from_memory(&art.small).unwrap();
        assert_eq!(small.dimensions(), (162, 113));
    }

    #[test]
    fn test_render_rejects_non_image_bytes() {
        assert!(render(b"definitely not an image").is_err());
    }

    #[test]
    fn test_rendition_file_names() {
        let id = Uuid::new_v4();
        assert_eq!(
            RenditionSize::Small.file_name(id),
            format!("{}s.jpg", id)
        );
        assert_eq!(
            RenditionSize::Medium.file_name(id),
            format!("{}m.jpg", id)
        );
    }
}
