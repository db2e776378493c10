//! Diesel row structs and their conversions to domain records.
//!
//! Rows never leave the persistence layer. Conversions that can fail on
//! stored data report [`StoreError::Query`].

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::ports::StoreError;
use crate::domain::{
    Comment, CommentId, ImageDescriptor, PasswordDigest, Photo, PhotoId, Price, Principal,
    PrincipalId, Profile, ProfileId, Tour, TourId, Username,
};

use super::schema::{
    attendances, comments, followers, likes, photos, principals, profiles, tours,
};

pub(crate) fn image_to_json(image: Option<&ImageDescriptor>) -> Result<Option<Value>, StoreError> {
    image
        .map(serde_json::to_value)
        .transpose()
        .map_err(|err| StoreError::query(format!("encode image: {err}")))
}

pub(crate) fn image_from_json(value: Option<Value>) -> Result<Option<ImageDescriptor>, StoreError> {
    value
        .map(serde_json::from_value)
        .transpose()
        .map_err(|err| StoreError::query(format!("decode image: {err}")))
}

pub(crate) fn stored_username(raw: String) -> Result<Username, StoreError> {
    Username::new(raw).map_err(|err| StoreError::query(format!("stored username: {err}")))
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = principals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PrincipalRow {
    pub id: Uuid,
    pub username: String,
    pub password_digest: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl PrincipalRow {
    pub(crate) fn into_parts(self) -> Result<(Principal, PasswordDigest), StoreError> {
        let principal = Principal {
            id: PrincipalId::from_uuid(self.id),
            username: stored_username(self.username)?,
            is_admin: self.is_admin,
            created_at: self.created_at,
        };
        Ok((principal, PasswordDigest::from_stored(self.password_digest)))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = principals)]
pub(crate) struct NewPrincipalRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub password_digest: &'a str,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfileRow {
    pub id: i64,
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
    pub image: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = StoreError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ProfileId::new(row.id),
            owner: PrincipalId::from_uuid(row.owner_id),
            name: row.name,
            description: row.description,
            image: image_from_json(row.image)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = profiles)]
pub(crate) struct NewProfileRow {
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
    pub image: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = profiles)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ProfileUpdate<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub image: Option<Value>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = photos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PhotoRow {
    pub id: i64,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub camera_used: String,
    pub lense_used: String,
    pub image: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PhotoRow> for Photo {
    type Error = StoreError;

    fn try_from(row: PhotoRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PhotoId::new(row.id),
            owner: PrincipalId::from_uuid(row.owner_id),
            title: row.title,
            description: row.description,
            camera_used: row.camera_used,
            lense_used: row.lense_used,
            image: image_from_json(row.image)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = photos)]
pub(crate) struct NewPhotoRow<'a> {
    pub owner_id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub camera_used: &'a str,
    pub lense_used: &'a str,
    pub image: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = photos)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct PhotoUpdate<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub camera_used: &'a str,
    pub lense_used: &'a str,
    pub image: Option<Value>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tours)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TourRow {
    pub id: i64,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub country: String,
    pub city: String,
    pub price_cents: i32,
    pub guide: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub booking_means: String,
    pub image: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<TourRow> for Tour {
    type Error = StoreError;

    fn try_from(row: TourRow) -> Result<Self, Self::Error> {
        let cents = u32::try_from(row.price_cents)
            .map_err(|_| StoreError::query("price_cents is negative"))?;
        Ok(Self {
            id: TourId::new(row.id),
            owner: PrincipalId::from_uuid(row.owner_id),
            title: row.title,
            description: row.description,
            country: row.country,
            city: row.city,
            price: Price::from_cents(cents),
            guide: row.guide,
            start_date: row.start_date,
            end_date: row.end_date,
            booking_means: row.booking_means,
            image: image_from_json(row.image)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub(crate) fn price_to_column(price: Price) -> Result<i32, StoreError> {
    i32::try_from(price.cents()).map_err(|_| StoreError::query("price_cents overflow"))
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tours)]
pub(crate) struct NewTourRow<'a> {
    pub owner_id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub country: &'a str,
    pub city: &'a str,
    pub price_cents: i32,
    pub guide: &'a str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub booking_means: &'a str,
    pub image: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tours)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct TourUpdate<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub country: &'a str,
    pub city: &'a str,
    pub price_cents: i32,
    pub guide: &'a str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub booking_means: &'a str,
    pub image: Option<Value>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: i64,
    pub owner_id: Uuid,
    pub photo_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: CommentId::new(row.id),
            owner: PrincipalId::from_uuid(row.owner_id),
            photo: PhotoId::new(row.photo_id),
            content: row.content,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub(crate) struct NewCommentRow<'a> {
    pub owner_id: Uuid,
    pub photo_id: i64,
    pub content: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = likes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LikeRow {
    pub id: i64,
    pub owner_id: Uuid,
    pub photo_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = likes)]
pub(crate) struct NewLikeRow {
    pub owner_id: Uuid,
    pub photo_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = followers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FollowerRow {
    pub id: i64,
    pub owner_id: Uuid,
    pub followed_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = followers)]
pub(crate) struct NewFollowerRow {
    pub owner_id: Uuid,
    pub followed_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = attendances)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AttendanceRow {
    pub id: i64,
    pub owner_id: Uuid,
    pub tour_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = attendances)]
pub(crate) struct NewAttendanceRow {
    pub owner_id: Uuid,
    pub tour_id: i64,
    pub created_at: DateTime<Utc>,
}
