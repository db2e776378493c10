//! Tests for the tour service.

use std::sync::Arc;

use chrono::NaiveDate;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::MockTourRepository;
use crate::domain::test_support::{admin, fixture_clock, fixture_now, member, owner_summary};
use crate::domain::{ErrorCode, Price, PrincipalId, Tour, tour::START_TOO_EARLY};

#[fixture]
fn creator() -> PrincipalId {
    PrincipalId::random()
}

fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid fixture date")
}

fn entry(id: TourId, owner: PrincipalId, start: &str) -> TourEntry {
    let now = fixture_now();
    TourEntry {
        tour: Tour {
            id,
            owner,
            title: "Ribeira".into(),
            description: String::new(),
            country: "Portugal".into(),
            city: "Porto".into(),
            price: Price::default(),
            guide: "currently unknown".into(),
            start_date: date(start),
            end_date: date("2030-07-01"),
            booking_means: "email".into(),
            image: None,
            created_at: now,
            updated_at: now,
        },
        owner: owner_summary(owner, "guide"),
        attendance_count: 0,
        viewer_attendance_id: None,
    }
}

fn form(start: &str, end: &str) -> TourForm {
    TourForm {
        title: Some("Ribeira".into()),
        country: Some("Portugal".into()),
        city: Some("Porto".into()),
        booking_means: Some("email".into()),
        start_date: Some(start.into()),
        end_date: Some(end.into()),
        ..TourForm::default()
    }
}

fn service(repo: MockTourRepository) -> TourService {
    TourService::new(Arc::new(repo), fixture_clock())
}

#[rstest]
#[tokio::test]
async fn members_cannot_create_tours(creator: PrincipalId) {
    let mut repo = MockTourRepository::new();
    repo.expect_create().never();

    let err = service(repo)
        .create(&member(creator), form("2030-06-10", "2030-06-12"))
        .await
        .expect_err("members denied");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn admins_create_tours_with_validated_dates(creator: PrincipalId) {
    let mut repo = MockTourRepository::new();
    repo.expect_create()
        .withf(|_, draft, _| draft.start_date == date("2030-06-10"))
        .times(1)
        .returning(move |owner, _, _| Ok(entry(TourId::new(5), owner, "2030-06-10").tour));
    repo.expect_find()
        .returning(move |id, _| Ok(Some(entry(id, creator, "2030-06-10"))));

    let view = service(repo)
        .create(&admin(creator), form("2030-06-10", "2030-06-12"))
        .await
        .expect("admin create succeeds");

    assert_eq!(view.start_date, date("2030-06-10"));
    assert!(view.is_owner);
}

#[rstest]
#[tokio::test]
async fn create_rejects_start_today(creator: PrincipalId) {
    let mut repo = MockTourRepository::new();
    repo.expect_create().never();

    let err = service(repo)
        .create(&admin(creator), form("2030-06-01", "2030-06-12"))
        .await
        .expect_err("start today rejected");

    assert_eq!(
        err.details().and_then(|d| d["start_date"][0].as_str()),
        Some(START_TOO_EARLY)
    );
}

#[rstest]
#[tokio::test]
async fn owner_may_edit_a_tour_that_already_started(creator: PrincipalId) {
    let mut repo = MockTourRepository::new();
    repo.expect_find()
        .returning(move |id, _| Ok(Some(entry(id, creator, "2030-05-20"))));
    repo.expect_update()
        .times(1)
        .returning(move |id, _, _| Ok(Some(entry(id, creator, "2030-05-20").tour)));

    let view = service(repo)
        .update(&member(creator), TourId::new(5), form("2030-05-20", "2030-07-01"))
        .await
        .expect("unchanged start date accepted");

    assert_eq!(view.start_date, date("2030-05-20"));
}

#[rstest]
#[case::stranger(false, ErrorCode::Forbidden)]
#[case::other_admin(true, ErrorCode::NotFound)]
#[tokio::test]
async fn delete_is_limited_to_owner_or_admin(
    creator: PrincipalId,
    #[case] is_admin: bool,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockTourRepository::new();
    repo.expect_find()
        .returning(move |id, _| Ok(Some(entry(id, creator, "2030-06-10"))));
    // An admin gets through; the store then reports the row already gone.
    repo.expect_delete().returning(|_| Ok(false));

    let requester = Requester::Authenticated {
        id: PrincipalId::random(),
        is_admin,
    };
    let err = service(repo)
        .delete(&requester, TourId::new(5))
        .await
        .expect_err("delete fails");

    assert_eq!(err.code(), expected);
}
