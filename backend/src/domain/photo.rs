//! Photo records and their form validation.

use chrono::{DateTime, Utc};

use crate::domain::validation::{optional_text, required_text};
use crate::domain::{FieldErrors, ImageDescriptor, PhotoId, PrincipalId, validate_image};

pub const TITLE_MAX: usize = 255;
pub const EQUIPMENT_MAX: usize = 100;
/// Stored when the photographer leaves camera or lens unset.
pub const UNSTATED: &str = "unstated";

/// A stored photo post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub id: PhotoId,
    pub owner: PrincipalId,
    pub title: String,
    pub description: String,
    pub camera_used: String,
    pub lense_used: String,
    pub image: Option<ImageDescriptor>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-supplied photo fields before validation.
#[derive(Debug, Clone, Default)]
pub struct PhotoForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub camera_used: Option<String>,
    pub lense_used: Option<String>,
    pub image: Option<ImageDescriptor>,
}

/// Validated mutable fields of a photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoDraft {
    pub title: String,
    pub description: String,
    pub camera_used: String,
    pub lense_used: String,
    pub image: Option<ImageDescriptor>,
}

impl PhotoForm {
    /// Validate every field, collecting all failures.
    pub fn validate(self) -> Result<PhotoDraft, FieldErrors> {
        let mut errors = FieldErrors::new();
        let title = required_text(&mut errors, "title", self.title, Some(TITLE_MAX));
        let description = optional_text(&mut errors, "description", self.description, None, "");
        let camera_used = optional_text(
            &mut errors,
            "camera_used",
            self.camera_used,
            Some(EQUIPMENT_MAX),
            UNSTATED,
        );
        let lense_used = optional_text(
            &mut errors,
            "lense_used",
            self.lense_used,
            Some(EQUIPMENT_MAX),
            UNSTATED,
        );
        if let Some(image) = &self.image {
            validate_image(&mut errors, "image", image);
        }
        errors.finish(PhotoDraft {
            title,
            description,
            camera_used,
            lense_used,
            image: self.image,
        })
    }
}
