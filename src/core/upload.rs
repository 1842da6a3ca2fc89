// CropCure - core/upload.rs
//
// Validation and preview decoding for user-selected images.
//
// The accepted container is detected from the file content signature; the
// file name extension is only consulted when the content is unrecognised.
// Only JPEG and PNG are accepted.

use crate::core::model::{ImageMime, PreviewImage};
use crate::util::constants::{ACCEPTED_MIME_TYPES, PREVIEW_MAX_DIMENSION};
use crate::util::error::SelectionError;
use image::ImageFormat;
use std::path::Path;

/// MIME string for a format the `image` crate recognises.
fn format_mime(format: ImageFormat) -> &'static str {
    format.to_mime_type()
}

/// Detect the container format of `bytes`, falling back to the extension of
/// `name` when the content signature is unknown.
pub fn detect_format(name: &str, bytes: &[u8]) -> Option<ImageFormat> {
    image::guess_format(bytes)
        .ok()
        .or_else(|| ImageFormat::from_path(Path::new(name)).ok())
}

/// Validate a candidate upload and return its MIME type.
///
/// Checks, in order: size limit (when `max_size` is set), then container
/// type. The image is not decoded here.
pub fn validate(
    name: &str,
    bytes: &[u8],
    max_size: Option<u64>,
) -> Result<ImageMime, SelectionError> {
    if let Some(max_size) = max_size {
        let size = bytes.len() as u64;
        if size > max_size {
            return Err(SelectionError::FileTooLarge {
                name: name.to_string(),
                size,
                max_size,
            });
        }
    }

    let Some(format) = detect_format(name, bytes) else {
        return Err(SelectionError::InvalidFileType {
            name: name.to_string(),
            detected: None,
        });
    };

    let mime = format_mime(format);
    ACCEPTED_MIME_TYPES
        .contains(&mime)
        .then(|| ImageMime::from_mime(mime))
        .flatten()
        .ok_or_else(|| SelectionError::InvalidFileType {
            name: name.to_string(),
            detected: Some(mime),
        })
}

/// Decode `bytes` and downscale to at most `PREVIEW_MAX_DIMENSION` pixels on
/// the longest side.
pub fn decode_preview(
    name: &str,
    bytes: &[u8],
    mime: ImageMime,
) -> Result<PreviewImage, SelectionError> {
    let format = match mime {
        ImageMime::Jpeg => ImageFormat::Jpeg,
        ImageMime::Png => ImageFormat::Png,
    };

    let img = image::load_from_memory_with_format(bytes, format).map_err(|e| {
        SelectionError::Decode {
            name: name.to_string(),
            source: e,
        }
    })?;

    let img = if img.width() > PREVIEW_MAX_DIMENSION || img.height() > PREVIEW_MAX_DIMENSION {
        img.thumbnail(PREVIEW_MAX_DIMENSION, PREVIEW_MAX_DIMENSION)
    } else {
        img
    };

    let rgba = img.into_rgba8();
    Ok(PreviewImage {
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            width,
            height,
            image::Rgb([34, 197, 94]),
        ));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_png_and_jpeg_are_accepted() {
        let png = encode(4, 4, ImageFormat::Png);
        let jpg = encode(4, 4, ImageFormat::Jpeg);
        assert_eq!(validate("a.png", &png, None).unwrap(), ImageMime::Png);
        assert_eq!(validate("b.jpg", &jpg, None).unwrap(), ImageMime::Jpeg);
    }

    #[test]
    fn test_content_wins_over_extension() {
        let png = encode(4, 4, ImageFormat::Png);
        assert_eq!(validate("mislabelled.jpg", &png, None).unwrap(), ImageMime::Png);
    }

    #[test]
    fn test_text_file_is_rejected() {
        let err = validate("notes.txt", b"hello, world", None).unwrap_err();
        assert!(matches!(
            err,
            SelectionError::InvalidFileType { detected: None, .. }
        ));
    }

    #[test]
    fn test_other_image_types_are_rejected_with_detected_mime() {
        // GIF signature.
        let gif = b"GIF89a\x01\x00\x01\x00\x00\x00\x00;";
        match validate("anim.gif", gif, None).unwrap_err() {
            SelectionError::InvalidFileType { detected, .. } => {
                assert_eq!(detected, Some("image/gif"));
            }
            other => panic!("expected InvalidFileType, got {other:?}"),
        }
    }

    #[test]
    fn test_every_accepted_mime_maps_to_an_upload_type() {
        for mime in ACCEPTED_MIME_TYPES {
            let parsed = ImageMime::from_mime(mime).unwrap();
            assert_eq!(parsed.as_str(), *mime);
        }
        assert_eq!(ImageMime::from_mime("image/gif"), None);
    }

    #[test]
    fn test_size_limit_is_enforced() {
        let png = encode(16, 16, ImageFormat::Png);
        let limit = png.len() as u64 - 1;
        assert!(matches!(
            validate("a.png", &png, Some(limit)),
            Err(SelectionError::FileTooLarge { .. })
        ));
        assert!(validate("a.png", &png, Some(png.len() as u64)).is_ok());
    }

    #[test]
    fn test_preview_is_downscaled() {
        let png = encode(PREVIEW_MAX_DIMENSION * 2, 100, ImageFormat::Png);
        let preview = decode_preview("wide.png", &png, ImageMime::Png).unwrap();
        assert_eq!(preview.width, PREVIEW_MAX_DIMENSION);
        assert!(preview.height <= 100);
        assert_eq!(
            preview.rgba.len(),
            (preview.width * preview.height * 4) as usize
        );
    }

    #[test]
    fn test_small_preview_keeps_size() {
        let png = encode(8, 6, ImageFormat::Png);
        let preview = decode_preview("small.png", &png, ImageMime::Png).unwrap();
        assert_eq!((preview.width, preview.height), (8, 6));
    }

    #[test]
    fn test_truncated_png_fails_to_decode() {
        let png = encode(8, 8, ImageFormat::Png);
        let truncated = &png[..png.len() / 2];
        assert!(matches!(
            decode_preview("broken.png", truncated, ImageMime::Png),
            Err(SelectionError::Decode { .. })
        ));
    }
}
