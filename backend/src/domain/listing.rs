//! Search, ordering and filter field names per listable resource.
//!
//! The query collaborator that applies these lives outside this service;
//! clients read the names from `GET /listing-fields`.

use serde::Serialize;

/// Field names one resource exposes to the query collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListingFields {
    pub resource: &'static str,
    pub search: &'static [&'static str],
    pub ordering: &'static [&'static str],
    pub filter: &'static [&'static str],
}

/// Every listable resource, in route order.
pub const LISTING_FIELDS: &[ListingFields] = &[
    ListingFields {
        resource: "profiles",
        search: &[],
        ordering: &[
            "photos_count",
            "followers_count",
            "following_count",
            "owner__following__created_at",
            "owner__followed__created_at",
        ],
        filter: &[
            "owner__following__followed__profile",
            "owner__followed__owner__profile",
        ],
    },
    ListingFields {
        resource: "photos",
        search: &["owner__username", "title"],
        ordering: &["likes_count", "comments_count", "likes__created_at"],
        filter: &[],
    },
    ListingFields {
        resource: "tours",
        search: &["title", "country", "city"],
        ordering: &["attendance_count", "attendances__created_at", "start_date"],
        filter: &["attendances__owner__profile"],
    },
    ListingFields {
        resource: "comments",
        search: &[],
        ordering: &[],
        filter: &["photo"],
    },
    ListingFields {
        resource: "likes",
        search: &[],
        ordering: &[],
        filter: &[],
    },
    ListingFields {
        resource: "followers",
        search: &[],
        ordering: &[],
        filter: &[],
    },
    ListingFields {
        resource: "attendances",
        search: &[],
        ordering: &[],
        filter: &[],
    },
];
