//! Shared fixtures for domain service tests.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, Utc};
use mockable::Clock;

use crate::domain::{ImageDescriptor, OwnerSummary, PrincipalId, ProfileId, Requester, Username};

pub(crate) struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

/// Midday on 1 June 2030.
pub(crate) fn fixture_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2030-06-01T12:00:00Z")
        .map(|dt| dt.with_timezone(&Utc))
        .expect("valid fixture timestamp")
}

pub(crate) fn fixture_today() -> NaiveDate {
    fixture_now().date_naive()
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_now(),
    })
}

pub(crate) fn member(id: PrincipalId) -> Requester {
    Requester::Authenticated {
        id,
        is_admin: false,
    }
}

pub(crate) fn admin(id: PrincipalId) -> Requester {
    Requester::Authenticated { id, is_admin: true }
}

pub(crate) fn owner_summary(principal_id: PrincipalId, username: &str) -> OwnerSummary {
    OwnerSummary {
        principal_id,
        username: Username::new(username).expect("valid fixture username"),
        profile_id: ProfileId::new(1),
        profile_image: Some(ImageDescriptor {
            url: format!("https://img.example/{username}.png"),
            size_bytes: 1024,
            width: 64,
            height: 64,
        }),
    }
}
