//! Like, follower and attendance handlers.
//!
//! The three resources behave identically: anyone may read them, a signed-in
//! principal creates one for itself, and only its owner deletes it. The
//! handlers are generic over [`RelationshipKind`]; [`relationship_endpoints!`]
//! stamps out the routed, documented wrappers for each kind.
//!
//! ```text
//! POST /api/v1/likes {"photo":3}
//! POST /api/v1/followers {"followed":"3fa85f64-5717-4562-b3fc-2c963f66afa6"}
//! POST /api/v1/attendances {"tour":5}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Attendances, Error, FieldErrors, Follows, Likes, PhotoId, PrincipalId, RelationshipId,
    RelationshipKind, RelationshipView, TourId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::requester::CurrentRequester;
use crate::inbound::http::schemas::{AttendanceSchema, ErrorSchema, FollowerSchema, LikeSchema};
use crate::inbound::http::state::{HttpState, RelationshipServices};

/// A creation body naming the target of one relationship kind.
pub trait RelationshipRequest<K: RelationshipKind> {
    fn into_target(self) -> Option<K::Target>;
}

/// Body for `POST /likes`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LikeRequest {
    #[schema(value_type = Option<i64>)]
    pub photo: Option<PhotoId>,
}

impl RelationshipRequest<Likes> for LikeRequest {
    fn into_target(self) -> Option<PhotoId> {
        self.photo
    }
}

/// Body for `POST /followers`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct FollowerRequest {
    /// Principal id of the account to follow.
    #[schema(value_type = Option<String>, format = Uuid)]
    pub followed: Option<PrincipalId>,
}

impl RelationshipRequest<Follows> for FollowerRequest {
    fn into_target(self) -> Option<PrincipalId> {
        self.followed
    }
}

/// Body for `POST /attendances`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct AttendanceRequest {
    #[schema(value_type = Option<i64>)]
    pub tour: Option<TourId>,
}

impl RelationshipRequest<Attendances> for AttendanceRequest {
    fn into_target(self) -> Option<TourId> {
        self.tour
    }
}

fn service<K: RelationshipKind>(state: &HttpState) -> &crate::domain::RelationshipService<K>
where
    HttpState: RelationshipServices<K>,
{
    <HttpState as RelationshipServices<K>>::relationship_service(state)
}

async fn list<K: RelationshipKind>(
    state: &HttpState,
) -> ApiResult<web::Json<Vec<RelationshipView<K>>>>
where
    HttpState: RelationshipServices<K>,
{
    service::<K>(state).list().await.map(web::Json)
}

async fn create<K, R>(
    state: &HttpState,
    requester: &CurrentRequester,
    payload: R,
) -> ApiResult<HttpResponse>
where
    K: RelationshipKind,
    R: RelationshipRequest<K>,
    HttpState: RelationshipServices<K>,
{
    let Some(target) = payload.into_target() else {
        // Anonymous callers get 403 before any field check.
        if requester.get().principal_id().is_none() {
            return Err(Error::forbidden("Authentication credentials were not provided."));
        }
        let mut errors = FieldErrors::new();
        errors.push(K::TARGET_FIELD, "This field is required.");
        return Err(errors.into());
    };
    let view = service::<K>(state).create(requester.get(), target).await?;
    Ok(HttpResponse::Created().json(view))
}

async fn retrieve<K: RelationshipKind>(
    state: &HttpState,
    id: RelationshipId,
) -> ApiResult<web::Json<RelationshipView<K>>>
where
    HttpState: RelationshipServices<K>,
{
    service::<K>(state).retrieve(id).await.map(web::Json)
}

async fn remove<K: RelationshipKind>(
    state: &HttpState,
    requester: &CurrentRequester,
    id: RelationshipId,
) -> ApiResult<HttpResponse>
where
    HttpState: RelationshipServices<K>,
{
    service::<K>(state).delete(requester.get(), id).await?;
    Ok(HttpResponse::NoContent().finish())
}

macro_rules! relationship_endpoints {
    (
        $kind:ident {
            route: $route:tt,
            detail_route: $detail_route:tt,
            doc_path: $doc_path:tt,
            doc_detail_path: $doc_detail_path:tt,
            tag: $tag:tt,
            request: $request:ident,
            schema: $schema:ident,
            list: ($list:ident, $list_op:tt),
            create: ($create:ident, $create_op:tt),
            get: ($get:ident, $get_op:tt),
            delete: ($delete:ident, $delete_op:tt) $(,)?
        }
    ) => {
        #[utoipa::path(
            get,
            path = $doc_path,
            responses(
                (status = 200, description = "Records, newest first", body = [$schema]),
                (status = 500, description = "Internal server error", body = ErrorSchema)
            ),
            tags = [$tag],
            operation_id = $list_op
        )]
        #[get($route)]
        pub async fn $list(
            state: web::Data<HttpState>,
        ) -> ApiResult<web::Json<Vec<RelationshipView<$kind>>>> {
            list::<$kind>(&state).await
        }

        #[utoipa::path(
            post,
            path = $doc_path,
            request_body = $request,
            responses(
                (status = 201, description = "Record created", body = $schema),
                (status = 400, description = "Missing target, unknown target or possible duplicate", body = ErrorSchema),
                (status = 403, description = "Not signed in", body = ErrorSchema)
            ),
            tags = [$tag],
            operation_id = $create_op
        )]
        #[post($route)]
        pub async fn $create(
            state: web::Data<HttpState>,
            requester: CurrentRequester,
            payload: web::Json<$request>,
        ) -> ApiResult<HttpResponse> {
            create::<$kind, $request>(&state, &requester, payload.into_inner()).await
        }

        #[utoipa::path(
            get,
            path = $doc_detail_path,
            params(("id" = i64, Path, description = "Record id")),
            responses(
                (status = 200, description = "Record", body = $schema),
                (status = 404, description = "Not found", body = ErrorSchema)
            ),
            tags = [$tag],
            operation_id = $get_op
        )]
        #[get($detail_route)]
        pub async fn $get(
            state: web::Data<HttpState>,
            id: web::Path<RelationshipId>,
        ) -> ApiResult<web::Json<RelationshipView<$kind>>> {
            retrieve::<$kind>(&state, id.into_inner()).await
        }

        #[utoipa::path(
            delete,
            path = $doc_detail_path,
            params(("id" = i64, Path, description = "Record id")),
            responses(
                (status = 204, description = "Record deleted"),
                (status = 403, description = "Not the owner", body = ErrorSchema),
                (status = 404, description = "Not found", body = ErrorSchema)
            ),
            tags = [$tag],
            operation_id = $delete_op
        )]
        #[delete($detail_route)]
        pub async fn $delete(
            state: web::Data<HttpState>,
            requester: CurrentRequester,
            id: web::Path<RelationshipId>,
        ) -> ApiResult<HttpResponse> {
            remove::<$kind>(&state, &requester, id.into_inner()).await
        }
    };
}

relationship_endpoints!(Likes {
    route: "/likes",
    detail_route: "/likes/{id}",
    doc_path: "/api/v1/likes",
    doc_detail_path: "/api/v1/likes/{id}",
    tag: "likes",
    request: LikeRequest,
    schema: LikeSchema,
    list: (list_likes, "listLikes"),
    create: (create_like, "createLike"),
    get: (get_like, "getLike"),
    delete: (delete_like, "deleteLike"),
});

relationship_endpoints!(Follows {
    route: "/followers",
    detail_route: "/followers/{id}",
    doc_path: "/api/v1/followers",
    doc_detail_path: "/api/v1/followers/{id}",
    tag: "followers",
    request: FollowerRequest,
    schema: FollowerSchema,
    list: (list_followers, "listFollowers"),
    create: (create_follower, "createFollower"),
    get: (get_follower, "getFollower"),
    delete: (delete_follower, "deleteFollower"),
});

relationship_endpoints!(Attendances {
    route: "/attendances",
    detail_route: "/attendances/{id}",
    doc_path: "/api/v1/attendances",
    doc_detail_path: "/api/v1/attendances/{id}",
    tag: "attendances",
    request: AttendanceRequest,
    schema: AttendanceSchema,
    list: (list_attendances, "listAttendances"),
    create: (create_attendance, "createAttendance"),
    get: (get_attendance, "getAttendance"),
    delete: (delete_attendance, "deleteAttendance"),
});
