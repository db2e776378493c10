//! In-process store adapter.
//!
//! Every port operation takes the single table lock once, so uniqueness
//! checks, reference checks and cascades happen atomically with the write.
//! Used when no database URL is configured and throughout the test suite.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::ports::StoreError;
use crate::domain::{
    Attendances, Comment, Follows, Likes, OwnerSummary, PasswordDigest, Photo, PhotoId, Principal,
    PrincipalId, Profile, Relationship, RelationshipId, RelationshipKind, Tour, TourId,
};

mod principals;
mod relationships;
mod resources;

/// Rows keyed by a store-assigned id.
#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T: Clone> Table<T> {
    /// Allocate the next id and store the row built for it.
    fn insert_with(&mut self, build: impl FnOnce(i64) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }
}

impl<T> Table<T> {
    fn get(&self, id: i64) -> Option<&T> {
        self.rows.get(&id)
    }

    fn get_mut(&mut self, id: i64) -> Option<&mut T> {
        self.rows.get_mut(&id)
    }

    fn contains(&self, id: i64) -> bool {
        self.rows.contains_key(&id)
    }

    fn remove(&mut self, id: i64) -> Option<T> {
        self.rows.remove(&id)
    }

    fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        self.rows.retain(|_, row| keep(row));
    }
}

#[derive(Debug, Clone)]
struct PrincipalRow {
    principal: Principal,
    digest: PasswordDigest,
}

#[derive(Debug, Default)]
struct Tables {
    principals: BTreeMap<PrincipalId, PrincipalRow>,
    profiles: Table<Profile>,
    photos: Table<Photo>,
    tours: Table<Tour>,
    comments: Table<Comment>,
    likes: Table<Relationship<Likes>>,
    follows: Table<Relationship<Follows>>,
    attendances: Table<Relationship<Attendances>>,
}

impl Tables {
    fn owner_summary(&self, id: PrincipalId) -> Option<OwnerSummary> {
        let row = self.principals.get(&id)?;
        let profile = self.profiles.values().find(|p| p.owner == id)?;
        Some(OwnerSummary {
            principal_id: id,
            username: row.principal.username.clone(),
            profile_id: profile.id,
            profile_image: profile.image.clone(),
        })
    }

    fn owner_summary_or_err(&self, id: PrincipalId) -> Result<OwnerSummary, StoreError> {
        self.owner_summary(id)
            .ok_or_else(|| StoreError::query(format!("owner {id} has no profile")))
    }

    /// Remove a photo with its comments and likes.
    fn delete_photo(&mut self, id: PhotoId) -> bool {
        let removed = self.photos.remove(id.get()).is_some();
        if removed {
            self.comments.retain(|c| c.photo != id);
            self.likes.retain(|l| l.target != id);
        }
        removed
    }

    /// Remove a tour with its attendances.
    fn delete_tour(&mut self, id: TourId) -> bool {
        let removed = self.tours.remove(id.get()).is_some();
        if removed {
            self.attendances.retain(|a| a.target != id);
        }
        removed
    }

    /// Remove a principal and everything that depends on it.
    fn delete_principal(&mut self, id: PrincipalId) {
        let photos: Vec<PhotoId> = self
            .photos
            .values()
            .filter(|p| p.owner == id)
            .map(|p| p.id)
            .collect();
        for photo in photos {
            self.delete_photo(photo);
        }
        let tours: Vec<TourId> = self
            .tours
            .values()
            .filter(|t| t.owner == id)
            .map(|t| t.id)
            .collect();
        for tour in tours {
            self.delete_tour(tour);
        }
        self.comments.retain(|c| c.owner != id);
        self.likes.retain(|l| l.owner != id);
        self.follows.retain(|f| f.owner != id && f.target != id);
        self.attendances.retain(|a| a.owner != id);
        self.profiles.retain(|p| p.owner != id);
        self.principals.remove(&id);
    }
}

/// Mutex-guarded store implementing every port.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::connection("in-memory store lock poisoned"))
    }
}

/// Newest first, ties broken by id.
fn newest_first<T>(rows: &mut [T], key: impl Fn(&T) -> (chrono::DateTime<chrono::Utc>, i64)) {
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
}

fn relationship_id_of<K: RelationshipKind>(
    table: &Table<Relationship<K>>,
    owner: PrincipalId,
    target: K::Target,
) -> Option<RelationshipId> {
    table
        .values()
        .find(|r| r.owner == owner && r.target == target)
        .map(|r| r.id)
}

fn count_where<T>(table: &Table<T>, predicate: impl Fn(&T) -> bool) -> u64 {
    table.values().filter(|row| predicate(row)).count() as u64
}
