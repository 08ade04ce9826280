//! Perceptual signature computation for images.
//!
//! Uses the Blockhash algorithm, which produces a consistent 64-bit (8 byte)
//! signature robust against re-encoding, compression, and minor cropping.
//! Visually similar images yield signatures with a small Hamming distance.

use blockhash::{blockhash64, Blockhash64};
use image::DynamicImage;

use crate::error::{Result, RosterError};
use crate::signature::Signature;

/// Compute the perceptual signature of raw image bytes.
///
/// Supports JPEG, PNG, GIF, and WebP input.
pub fn compute_signature(image_data: &[u8]) -> Result<Signature> {
    let image = image::load_from_memory(image_data)
        .map_err(|e| RosterError::Hash(format!("Failed to decode image: {e}")))?;
    Ok(signature_of(&image))
}

/// Compute the perceptual signature of a decoded image.
pub fn signature_of(image: &DynamicImage) -> Signature {
    let hash: Blockhash64 = blockhash64(image);
    let bytes: [u8; 8] = hash.into();
    Signature::from_bytes(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::SIGNATURE_SIZE;

    fn solid_image(r: u8, g: u8, b: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(image::RgbImage::from_pixel(32, 32, image::Rgb([r, g, b])))
    }

    #[test]
    fn test_signature_has_standard_size() {
        let signature = signature_of(&solid_image(0, 0, 0));
        assert_eq!(signature.len(), SIGNATURE_SIZE);
    }

    #[test]
    fn test_signature_is_deterministic() {
        let a = signature_of(&solid_image(10, 20, 30));
        let b = signature_of(&solid_image(10, 20, 30));
        assert_eq!(a, b);
        assert_eq!(a.distance(&b).unwrap(), 0);
    }

    #[test]
    fn test_compute_signature_from_encoded_bytes() {
        let mut bytes = Vec::new();
        solid_image(200, 200, 200)
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageFormat::Png,
            )
            .unwrap();

        let from_bytes = compute_signature(&bytes).unwrap();
        let direct = signature_of(&solid_image(200, 200, 200));
        assert_eq!(from_bytes, direct);
    }

    #[test]
    fn test_compute_signature_rejects_non_image_data() {
        let err = compute_signature(b"definitely not an image").unwrap_err();
        assert!(matches!(err, RosterError::Hash(_)));
    }
}
