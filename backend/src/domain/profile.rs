//! Profile records. One per principal, created alongside it.

use chrono::{DateTime, Utc};

use crate::domain::validation::optional_text;
use crate::domain::{FieldErrors, ImageDescriptor, PrincipalId, ProfileId, validate_image};

pub const NAME_MAX: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: ProfileId,
    pub owner: PrincipalId,
    pub name: String,
    pub description: String,
    pub image: Option<ImageDescriptor>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-supplied profile fields before validation.
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<ImageDescriptor>,
}

/// Validated replacement values for a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileChanges {
    pub name: String,
    pub description: String,
    pub image: Option<ImageDescriptor>,
}

impl ProfileForm {
    pub fn validate(self) -> Result<ProfileChanges, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = optional_text(&mut errors, "name", self.name, Some(NAME_MAX), "");
        let description = optional_text(&mut errors, "description", self.description, None, "");
        if let Some(image) = &self.image {
            validate_image(&mut errors, "image", image);
        }
        errors.finish(ProfileChanges {
            name,
            description,
            image: self.image,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, true)]
    #[case(Some(""), true)]
    #[case(Some("Ada"), true)]
    fn names_may_be_blank(#[case] name: Option<&str>, #[case] ok: bool) {
        let form = ProfileForm {
            name: name.map(str::to_owned),
            ..ProfileForm::default()
        };
        assert_eq!(form.validate().is_ok(), ok);
    }

    #[rstest]
    fn long_names_are_rejected() {
        let errors = ProfileForm {
            name: Some("n".repeat(NAME_MAX + 1)),
            ..ProfileForm::default()
        }
        .validate()
        .expect_err("name too long");
        assert!(errors.get("name").is_some());
    }
}
