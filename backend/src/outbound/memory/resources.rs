//! Profile, photo, tour and comment ports over the in-memory tables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{InMemoryStore, Tables, count_where, newest_first, relationship_id_of};
use crate::domain::ports::{
    CommentEntry, CommentRepository, PhotoEntry, PhotoRepository, ProfileEntry,
    ProfileRepository, StoreError, TourEntry, TourRepository,
};
use crate::domain::{
    Comment, CommentId, NewComment, Photo, PhotoDraft, PhotoId, PrincipalId, Profile,
    ProfileChanges, ProfileId, Tour, TourDraft, TourId,
};

fn profile_entry(
    tables: &Tables,
    profile: &Profile,
    viewer: Option<PrincipalId>,
) -> Result<ProfileEntry, StoreError> {
    let owner = profile.owner;
    let username = tables
        .principals
        .get(&owner)
        .map(|row| row.principal.username.clone())
        .ok_or_else(|| StoreError::query(format!("profile {} has no owner", profile.id)))?;
    Ok(ProfileEntry {
        profile: profile.clone(),
        owner_username: username,
        photos_count: count_where(&tables.photos, |p| p.owner == owner),
        followers_count: count_where(&tables.follows, |f| f.target == owner),
        following_count: count_where(&tables.follows, |f| f.owner == owner),
        viewer_follow_id: viewer.and_then(|v| relationship_id_of(&tables.follows, v, owner)),
    })
}

fn photo_entry(
    tables: &Tables,
    photo: &Photo,
    viewer: Option<PrincipalId>,
) -> Result<PhotoEntry, StoreError> {
    let id = photo.id;
    Ok(PhotoEntry {
        photo: photo.clone(),
        owner: tables.owner_summary_or_err(photo.owner)?,
        likes_count: count_where(&tables.likes, |l| l.target == id),
        comments_count: count_where(&tables.comments, |c| c.photo == id),
        viewer_like_id: viewer.and_then(|v| relationship_id_of(&tables.likes, v, id)),
    })
}

fn tour_entry(
    tables: &Tables,
    tour: &Tour,
    viewer: Option<PrincipalId>,
) -> Result<TourEntry, StoreError> {
    let id = tour.id;
    Ok(TourEntry {
        tour: tour.clone(),
        owner: tables.owner_summary_or_err(tour.owner)?,
        attendance_count: count_where(&tables.attendances, |a| a.target == id),
        viewer_attendance_id: viewer.and_then(|v| relationship_id_of(&tables.attendances, v, id)),
    })
}

fn comment_entry(tables: &Tables, comment: &Comment) -> Result<CommentEntry, StoreError> {
    Ok(CommentEntry {
        comment: comment.clone(),
        owner: tables.owner_summary_or_err(comment.owner)?,
    })
}

#[async_trait]
impl ProfileRepository for InMemoryStore {
    async fn list(&self, viewer: Option<PrincipalId>) -> Result<Vec<ProfileEntry>, StoreError> {
        let tables = self.lock()?;
        let mut entries = tables
            .profiles
            .values()
            .map(|profile| profile_entry(&tables, profile, viewer))
            .collect::<Result<Vec<_>, _>>()?;
        newest_first(&mut entries, |e| (e.profile.created_at, e.profile.id.get()));
        Ok(entries)
    }

    async fn find(
        &self,
        id: ProfileId,
        viewer: Option<PrincipalId>,
    ) -> Result<Option<ProfileEntry>, StoreError> {
        let tables = self.lock()?;
        tables
            .profiles
            .get(id.get())
            .map(|profile| profile_entry(&tables, profile, viewer))
            .transpose()
    }

    async fn update(
        &self,
        id: ProfileId,
        changes: ProfileChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Profile>, StoreError> {
        let mut tables = self.lock()?;
        Ok(tables.profiles.get_mut(id.get()).map(|profile| {
            profile.name = changes.name;
            profile.description = changes.description;
            profile.image = changes.image;
            profile.updated_at = now;
            profile.clone()
        }))
    }

    async fn delete_with_owner(&self, id: ProfileId) -> Result<bool, StoreError> {
        let mut tables = self.lock()?;
        let Some(owner) = tables.profiles.get(id.get()).map(|p| p.owner) else {
            return Ok(false);
        };
        tables.delete_principal(owner);
        Ok(true)
    }
}

#[async_trait]
impl PhotoRepository for InMemoryStore {
    async fn list(&self, viewer: Option<PrincipalId>) -> Result<Vec<PhotoEntry>, StoreError> {
        let tables = self.lock()?;
        let mut entries = tables
            .photos
            .values()
            .map(|photo| photo_entry(&tables, photo, viewer))
            .collect::<Result<Vec<_>, _>>()?;
        newest_first(&mut entries, |e| (e.photo.created_at, e.photo.id.get()));
        Ok(entries)
    }

    async fn find(
        &self,
        id: PhotoId,
        viewer: Option<PrincipalId>,
    ) -> Result<Option<PhotoEntry>, StoreError> {
        let tables = self.lock()?;
        tables
            .photos
            .get(id.get())
            .map(|photo| photo_entry(&tables, photo, viewer))
            .transpose()
    }

    async fn create(
        &self,
        owner: PrincipalId,
        draft: PhotoDraft,
        now: DateTime<Utc>,
    ) -> Result<Photo, StoreError> {
        let mut tables = self.lock()?;
        if !tables.principals.contains_key(&owner) {
            return Err(StoreError::missing_reference("owner", owner.to_string()));
        }
        Ok(tables.photos.insert_with(|id| Photo {
            id: PhotoId::new(id),
            owner,
            title: draft.title,
            description: draft.description,
            camera_used: draft.camera_used,
            lense_used: draft.lense_used,
            image: draft.image,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn update(
        &self,
        id: PhotoId,
        draft: PhotoDraft,
        now: DateTime<Utc>,
    ) -> Result<Option<Photo>, StoreError> {
        let mut tables = self.lock()?;
        Ok(tables.photos.get_mut(id.get()).map(|photo| {
            photo.title = draft.title;
            photo.description = draft.description;
            photo.camera_used = draft.camera_used;
            photo.lense_used = draft.lense_used;
            photo.image = draft.image;
            photo.updated_at = now;
            photo.clone()
        }))
    }

    async fn delete(&self, id: PhotoId) -> Result<bool, StoreError> {
        let mut tables = self.lock()?;
        Ok(tables.delete_photo(id))
    }
}

#[async_trait]
impl TourRepository for InMemoryStore {
    async fn list(&self, viewer: Option<PrincipalId>) -> Result<Vec<TourEntry>, StoreError> {
        let tables = self.lock()?;
        let mut entries = tables
            .tours
            .values()
            .map(|tour| tour_entry(&tables, tour, viewer))
            .collect::<Result<Vec<_>, _>>()?;
        newest_first(&mut entries, |e| (e.tour.created_at, e.tour.id.get()));
        Ok(entries)
    }

    async fn find(
        &self,
        id: TourId,
        viewer: Option<PrincipalId>,
    ) -> Result<Option<TourEntry>, StoreError> {
        let tables = self.lock()?;
        tables
            .tours
            .get(id.get())
            .map(|tour| tour_entry(&tables, tour, viewer))
            .transpose()
    }

    async fn create(
        &self,
        owner: PrincipalId,
        draft: TourDraft,
        now: DateTime<Utc>,
    ) -> Result<Tour, StoreError> {
        let mut tables = self.lock()?;
        if !tables.principals.contains_key(&owner) {
            return Err(StoreError::missing_reference("owner", owner.to_string()));
        }
        Ok(tables.tours.insert_with(|id| Tour {
            id: TourId::new(id),
            owner,
            title: draft.title,
            description: draft.description,
            country: draft.country,
            city: draft.city,
            price: draft.price,
            guide: draft.guide,
            start_date: draft.start_date,
            end_date: draft.end_date,
            booking_means: draft.booking_means,
            image: draft.image,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn update(
        &self,
        id: TourId,
        draft: TourDraft,
        now: DateTime<Utc>,
    ) -> Result<Option<Tour>, StoreError> {
        let mut tables = self.lock()?;
        Ok(tables.tours.get_mut(id.get()).map(|tour| {
            tour.title = draft.title;
            tour.description = draft.description;
            tour.country = draft.country;
            tour.city = draft.city;
            tour.price = draft.price;
            tour.guide = draft.guide;
            tour.start_date = draft.start_date;
            tour.end_date = draft.end_date;
            tour.booking_means = draft.booking_means;
            tour.image = draft.image;
            tour.updated_at = now;
            tour.clone()
        }))
    }

    async fn delete(&self, id: TourId) -> Result<bool, StoreError> {
        let mut tables = self.lock()?;
        Ok(tables.delete_tour(id))
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn list(&self, photo: Option<PhotoId>) -> Result<Vec<CommentEntry>, StoreError> {
        let tables = self.lock()?;
        let mut entries = tables
            .comments
            .values()
            .filter(|c| photo.is_none_or(|photo| c.photo == photo))
            .map(|comment| comment_entry(&tables, comment))
            .collect::<Result<Vec<_>, _>>()?;
        newest_first(&mut entries, |e| (e.comment.created_at, e.comment.id.get()));
        Ok(entries)
    }

    async fn find(&self, id: CommentId) -> Result<Option<CommentEntry>, StoreError> {
        let tables = self.lock()?;
        tables
            .comments
            .get(id.get())
            .map(|comment| comment_entry(&tables, comment))
            .transpose()
    }

    async fn create(
        &self,
        owner: PrincipalId,
        comment: NewComment,
        now: DateTime<Utc>,
    ) -> Result<Comment, StoreError> {
        let mut tables = self.lock()?;
        if !tables.photos.contains(comment.photo.get()) {
            return Err(StoreError::missing_reference(
                "photo",
                comment.photo.to_string(),
            ));
        }
        Ok(tables.comments.insert_with(|id| Comment {
            id: CommentId::new(id),
            owner,
            photo: comment.photo,
            content: comment.content,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn update_content(
        &self,
        id: CommentId,
        content: String,
        now: DateTime<Utc>,
    ) -> Result<Option<Comment>, StoreError> {
        let mut tables = self.lock()?;
        Ok(tables.comments.get_mut(id.get()).map(|comment| {
            comment.content = content;
            comment.updated_at = now;
            comment.clone()
        }))
    }

    async fn delete(&self, id: CommentId) -> Result<bool, StoreError> {
        let mut tables = self.lock()?;
        Ok(tables.comments.remove(id.get()).is_some())
    }
}
