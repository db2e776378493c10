//! Diesel table definitions.
//!
//! Kept in step with `backend/migrations`; `diesel print-schema` against a
//! migrated database regenerates them.

diesel::table! {
    /// Accounts. `username` is unique.
    principals (id) {
        id -> Uuid,
        username -> Varchar,
        /// `sha256$<salt>$<hash>` credential digest.
        password_digest -> Text,
        is_admin -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per principal, created in the same transaction.
    profiles (id) {
        id -> Int8,
        owner_id -> Uuid,
        name -> Varchar,
        description -> Text,
        /// Serialized image descriptor.
        image -> Nullable<Jsonb>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    photos (id) {
        id -> Int8,
        owner_id -> Uuid,
        title -> Varchar,
        description -> Text,
        camera_used -> Varchar,
        lense_used -> Varchar,
        image -> Nullable<Jsonb>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    tours (id) {
        id -> Int8,
        owner_id -> Uuid,
        title -> Varchar,
        description -> Text,
        country -> Varchar,
        city -> Varchar,
        /// Price in hundredths.
        price_cents -> Int4,
        guide -> Varchar,
        start_date -> Date,
        end_date -> Date,
        booking_means -> Varchar,
        image -> Nullable<Jsonb>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    comments (id) {
        id -> Int8,
        owner_id -> Uuid,
        photo_id -> Int8,
        content -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Unique on `(owner_id, photo_id)`.
    likes (id) {
        id -> Int8,
        owner_id -> Uuid,
        photo_id -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Unique on `(owner_id, followed_id)`.
    followers (id) {
        id -> Int8,
        owner_id -> Uuid,
        followed_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Unique on `(owner_id, tour_id)`.
    attendances (id) {
        id -> Int8,
        owner_id -> Uuid,
        tour_id -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(profiles -> principals (owner_id));
diesel::joinable!(photos -> principals (owner_id));
diesel::joinable!(tours -> principals (owner_id));
diesel::joinable!(comments -> photos (photo_id));
diesel::joinable!(likes -> photos (photo_id));
diesel::joinable!(attendances -> tours (tour_id));

diesel::allow_tables_to_appear_in_same_query!(
    principals,
    profiles,
    photos,
    tours,
    comments,
    likes,
    followers,
    attendances,
);
