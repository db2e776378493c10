//! Image descriptors produced by the external image storage collaborator.

use serde::{Deserialize, Serialize};

use crate::domain::FieldErrors;

/// Largest accepted upload, in bytes (2 MiB).
pub const MAX_IMAGE_BYTES: u64 = 2 * 1024 * 1024;
/// Largest accepted height or width, in pixels.
pub const MAX_IMAGE_DIMENSION: u32 = 4096;

/// Metadata describing an already-stored image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    pub url: String,
    pub size_bytes: u64,
    pub width: u32,
    pub height: u32,
}

/// Check size and dimensions, recording every violation under `field`.
///
/// All three checks run so callers see every problem at once.
///
/// # Examples
/// ```
/// use tourlens::domain::{FieldErrors, ImageDescriptor, validate_image};
///
/// let mut errors = FieldErrors::new();
/// let image = ImageDescriptor { url: "a.png".into(), size_bytes: 3_000_000, width: 5000, height: 10 };
/// validate_image(&mut errors, "image", &image);
/// assert_eq!(errors.get("image").map(<[String]>::len), Some(2));
/// ```
pub fn validate_image(errors: &mut FieldErrors, field: &str, image: &ImageDescriptor) {
    if image.size_bytes > MAX_IMAGE_BYTES {
        errors.push(field, "Image size larger than 2MB!");
    }
    if image.height > MAX_IMAGE_DIMENSION {
        errors.push(field, "Image height larger than 4096px!");
    }
    if image.width > MAX_IMAGE_DIMENSION {
        errors.push(field, "Image width larger than 4096px!");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn image(size_bytes: u64, width: u32, height: u32) -> ImageDescriptor {
        ImageDescriptor {
            url: "https://img.example/p.jpg".to_owned(),
            size_bytes,
            width,
            height,
        }
    }

    #[rstest]
    #[case(image(MAX_IMAGE_BYTES, 4096, 4096), &[])]
    #[case(image(MAX_IMAGE_BYTES + 1, 10, 10), &["Image size larger than 2MB!"])]
    #[case(image(10, 10, 4097), &["Image height larger than 4096px!"])]
    #[case(image(10, 4097, 10), &["Image width larger than 4096px!"])]
    #[case(
        image(MAX_IMAGE_BYTES + 1, 4097, 4097),
        &[
            "Image size larger than 2MB!",
            "Image height larger than 4096px!",
            "Image width larger than 4096px!",
        ]
    )]
    fn reports_each_violation(#[case] image: ImageDescriptor, #[case] expected: &[&str]) {
        let mut errors = FieldErrors::new();
        validate_image(&mut errors, "image", &image);
        let actual: Vec<&str> = errors
            .get("image")
            .unwrap_or_default()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(actual, expected);
    }
}
