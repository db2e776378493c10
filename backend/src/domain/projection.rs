//! Read models returned to clients.
//!
//! Each view is projected from a store entry and the requester. `is_owner`
//! and the viewer's own relationship ids are the only requester-dependent
//! fields; everything else is identical for every caller.

use chrono::{DateTime, NaiveDate, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::domain::ports::{CommentEntry, PhotoEntry, ProfileEntry, RelationshipEntry, TourEntry};
use crate::domain::{
    CommentId, ImageDescriptor, OwnerSummary, PhotoId, Price, PrincipalId, ProfileId,
    RelationshipId, RelationshipKind, Requester, TourId,
};

fn image_url(image: Option<&ImageDescriptor>) -> Option<String> {
    image.map(|image| image.url.clone())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileView {
    pub id: ProfileId,
    pub owner: String,
    pub name: String,
    pub description: String,
    pub image: Option<ImageDescriptor>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_owner: bool,
    pub following_id: Option<RelationshipId>,
    pub photos_count: u64,
    pub followers_count: u64,
    pub following_count: u64,
}

impl ProfileView {
    pub fn project(entry: ProfileEntry, requester: &Requester) -> Self {
        let ProfileEntry {
            profile,
            owner_username,
            photos_count,
            followers_count,
            following_count,
            viewer_follow_id,
        } = entry;
        Self {
            id: profile.id,
            owner: owner_username.into(),
            is_owner: requester.owns(&profile.owner),
            name: profile.name,
            description: profile.description,
            image: profile.image,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
            following_id: viewer_follow_id,
            photos_count,
            followers_count,
            following_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoView {
    pub id: PhotoId,
    pub owner: String,
    pub is_owner: bool,
    pub profile_id: ProfileId,
    pub profile_image: Option<String>,
    pub title: String,
    pub description: String,
    pub camera_used: String,
    pub lense_used: String,
    pub image: Option<ImageDescriptor>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub like_id: Option<RelationshipId>,
    pub likes_count: u64,
    pub comments_count: u64,
}

impl PhotoView {
    pub fn project(entry: PhotoEntry, requester: &Requester) -> Self {
        let PhotoEntry {
            photo,
            owner,
            likes_count,
            comments_count,
            viewer_like_id,
        } = entry;
        let OwnerSummary {
            principal_id,
            username,
            profile_id,
            profile_image,
        } = owner;
        Self {
            id: photo.id,
            owner: username.into(),
            is_owner: requester.owns(&principal_id),
            profile_id,
            profile_image: image_url(profile_image.as_ref()),
            title: photo.title,
            description: photo.description,
            camera_used: photo.camera_used,
            lense_used: photo.lense_used,
            image: photo.image,
            created_at: photo.created_at,
            updated_at: photo.updated_at,
            like_id: viewer_like_id,
            likes_count,
            comments_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TourView {
    pub id: TourId,
    pub owner: String,
    pub is_owner: bool,
    pub profile_id: ProfileId,
    pub title: String,
    pub description: String,
    pub country: String,
    pub city: String,
    pub price: Price,
    pub guide: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub booking_means: String,
    pub image: Option<ImageDescriptor>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub attendance_id: Option<RelationshipId>,
    pub attendance_count: u64,
}

impl TourView {
    pub fn project(entry: TourEntry, requester: &Requester) -> Self {
        let TourEntry {
            tour,
            owner,
            attendance_count,
            viewer_attendance_id,
        } = entry;
        Self {
            id: tour.id,
            owner: owner.username.into(),
            is_owner: requester.owns(&owner.principal_id),
            profile_id: owner.profile_id,
            title: tour.title,
            description: tour.description,
            country: tour.country,
            city: tour.city,
            price: tour.price,
            guide: tour.guide,
            start_date: tour.start_date,
            end_date: tour.end_date,
            booking_means: tour.booking_means,
            image: tour.image,
            created_at: tour.created_at,
            updated_at: tour.updated_at,
            attendance_id: viewer_attendance_id,
            attendance_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentView {
    pub id: CommentId,
    pub owner: String,
    pub is_owner: bool,
    pub profile_id: ProfileId,
    pub profile_image: Option<String>,
    pub photo: PhotoId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommentView {
    pub fn project(entry: CommentEntry, requester: &Requester) -> Self {
        let CommentEntry { comment, owner } = entry;
        Self {
            id: comment.id,
            is_owner: requester.owns(&owner.principal_id),
            owner: owner.username.into(),
            profile_id: owner.profile_id,
            profile_image: image_url(owner.profile_image.as_ref()),
            photo: comment.photo,
            content: comment.content,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

/// Like, follow or attendance as returned to clients.
///
/// The target is emitted under the kind's own field name, so a like reads
/// `{"id", "owner", "photo", "created_at"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipView<K: RelationshipKind> {
    pub id: RelationshipId,
    pub owner: String,
    pub target: K::Target,
    pub target_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl<K: RelationshipKind> RelationshipView<K> {
    pub fn project(entry: RelationshipEntry<K>) -> Self {
        let RelationshipEntry {
            relationship,
            owner_username,
            target_name,
        } = entry;
        Self {
            id: relationship.id,
            owner: owner_username.into(),
            target: relationship.target,
            target_name,
            created_at: relationship.created_at,
        }
    }
}

impl<K: RelationshipKind> Serialize for RelationshipView<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if K::TARGET_NAME_FIELD.is_some() { 5 } else { 4 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("owner", &self.owner)?;
        map.serialize_entry(K::TARGET_FIELD, &self.target)?;
        map.serialize_entry("created_at", &self.created_at)?;
        if let Some(field) = K::TARGET_NAME_FIELD {
            map.serialize_entry(field, &self.target_name)?;
        }
        map.end()
    }
}

/// The signed-in principal as reported by `GET /auth/user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUserView {
    pub id: PrincipalId,
    pub username: String,
    pub profile_id: ProfileId,
    pub profile_image: Option<String>,
    pub is_admin_user: bool,
}

impl CurrentUserView {
    pub fn project(summary: OwnerSummary, is_admin: bool) -> Self {
        Self {
            id: summary.principal_id,
            username: summary.username.into(),
            profile_id: summary.profile_id,
            profile_image: image_url(summary.profile_image.as_ref()),
            is_admin_user: is_admin,
        }
    }
}
