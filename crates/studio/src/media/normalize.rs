//! Photo preparation before it is sent for composition.
//!
//! Photos are padded to a square so the model sees the whole subject, and
//! large camera shots are scaled down to keep request bodies small.

use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, ImageFormat, Rgba, RgbaImage};

use super::{DataUrl, MediaError};

/// Longest side sent to the model.
pub const MAX_PHOTO_SIDE: u32 = 1536;

const PADDING: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Pad an image to a `max(W, H)` square with the original centred.
///
/// Square inputs are returned as an unchanged copy.
#[must_use]
pub fn normalize_aspect_ratio(img: &DynamicImage) -> DynamicImage {
    let (width, height) = img.dimensions();
    if width == height {
        return img.clone();
    }

    let side = width.max(height);
    let mut canvas = RgbaImage::from_pixel(side, side, PADDING);
    let x = (side - width) / 2;
    let y = (side - height) / 2;
    imageops::overlay(&mut canvas, &img.to_rgba8(), i64::from(x), i64::from(y));
    DynamicImage::ImageRgba8(canvas)
}

/// Scale an image down so neither side exceeds `max_side`, keeping aspect.
#[must_use]
pub fn downscale_to_fit(img: &DynamicImage, max_side: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    if width <= max_side && height <= max_side {
        return img.clone();
    }
    img.resize(max_side, max_side, FilterType::Lanczos3)
}

/// Decode image bytes.
///
/// # Errors
///
/// Returns `MediaError::Decode` if the format is unknown or the data corrupt.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, MediaError> {
    image::load_from_memory(bytes).map_err(|e| MediaError::Decode(e.to_string()))
}

/// Encode an image as PNG bytes.
///
/// # Errors
///
/// Returns `MediaError::Encode` if encoding fails.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, MediaError> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| MediaError::Encode(e.to_string()))?;
    Ok(buf.into_inner())
}

/// Square and downscale a user photo.
///
/// Photos that are already square and small enough are passed through
/// untouched; anything else is re-encoded as PNG.
///
/// # Errors
///
/// Returns an error if the payload is not a decodable image.
pub fn prepare_photo(photo: &DataUrl) -> Result<DataUrl, MediaError> {
    let img = decode(&photo.decode()?)?;
    let (width, height) = img.dimensions();
    if width == height && width <= MAX_PHOTO_SIDE {
        return Ok(photo.clone());
    }

    let prepared = normalize_aspect_ratio(&downscale_to_fit(&img, MAX_PHOTO_SIDE));
    Ok(DataUrl::from_bytes("image/png", &encode_png(&prepared)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([200, 0, 0, 255]);

    fn solid(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, RED))
    }

    #[test]
    fn test_landscape_is_padded_vertically() {
        let out = normalize_aspect_ratio(&solid(40, 20)).to_rgba8();
        assert_eq!(out.dimensions(), (40, 40));
        // Padding above and below, image in the middle band.
        assert_eq!(*out.get_pixel(20, 0), PADDING);
        assert_eq!(*out.get_pixel(20, 39), PADDING);
        assert_eq!(*out.get_pixel(0, 10), RED);
        assert_eq!(*out.get_pixel(39, 29), RED);
    }

    #[test]
    fn test_portrait_is_padded_horizontally() {
        let out = normalize_aspect_ratio(&solid(10, 30)).to_rgba8();
        assert_eq!(out.dimensions(), (30, 30));
        assert_eq!(*out.get_pixel(9, 15), PADDING);
        assert_eq!(*out.get_pixel(10, 15), RED);
        assert_eq!(*out.get_pixel(19, 15), RED);
        assert_eq!(*out.get_pixel(20, 15), PADDING);
    }

    #[test]
    fn test_square_is_a_copy() {
        let img = solid(16, 16);
        let out = normalize_aspect_ratio(&img);
        assert_eq!(out.dimensions(), (16, 16));
        assert_eq!(out.to_rgba8().into_raw(), img.to_rgba8().into_raw());
    }

    #[test]
    fn test_downscale_keeps_aspect() {
        let out = downscale_to_fit(&solid(400, 200), 100);
        assert_eq!(out.dimensions(), (100, 50));
        let untouched = downscale_to_fit(&solid(50, 20), 100);
        assert_eq!(untouched.dimensions(), (50, 20));
    }

    #[test]
    fn test_prepare_photo_squares_and_reencodes() {
        let png = encode_png(&solid(30, 10)).expect("encode");
        let photo = DataUrl::from_bytes("image/png", &png);
        let prepared = prepare_photo(&photo).expect("prepare");
        let decoded = decode(&prepared.decode().expect("base64")).expect("decode");
        assert_eq!(decoded.dimensions(), (30, 30));
    }

    #[test]
    fn test_prepare_photo_passes_square_through() {
        let png = encode_png(&solid(12, 12)).expect("encode");
        let photo = DataUrl::from_bytes("image/png", &png);
        assert_eq!(prepare_photo(&photo).expect("prepare"), photo);
    }

    #[test]
    fn test_prepare_photo_rejects_garbage() {
        let photo = DataUrl::from_bytes("image/png", b"not an image");
        assert!(matches!(prepare_photo(&photo), Err(MediaError::Decode(_))));
    }
}
