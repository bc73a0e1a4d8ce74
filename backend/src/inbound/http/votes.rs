//! Vote handlers.
//!
//! ```text
//! POST /api/v1/posts/{post_id}/votes {"vote":"up"}
//! POST /api/v1/comments/{comment_id}/votes {"vote":"down"}
//! ```
//!
//! Votes toggle: repeating a direction withdraws it. Clients must not
//! retry vote requests blindly.

use actix_web::{post, web};

use crate::domain::ports::VoteRequest;
use crate::domain::{SubjectRef, VoteDirection};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::subjects_dto::{VoteBody, VoteResultDto};
use crate::inbound::http::validation::{FieldName, comment_id, missing_field_error, post_id};

const VOTE: FieldName = FieldName::new("vote");

async fn cast(
    state: &HttpState,
    session: &SessionContext,
    subject: SubjectRef,
    body: VoteBody,
) -> ApiResult<web::Json<VoteResultDto>> {
    let actor = session.require_actor(state.users.as_ref()).await?;
    let direction = body
        .vote
        .ok_or_else(|| missing_field_error(VOTE))?
        .parse::<VoteDirection>()?;
    let response = state
        .votes
        .cast_vote(VoteRequest {
            subject,
            voter: actor.id,
            direction,
        })
        .await?;
    Ok(web::Json(response.into()))
}

/// Vote on a post.
#[utoipa::path(
    post,
    path = "/api/v1/posts/{post_id}/votes",
    params(("post_id" = i64, Path, description = "Voted post")),
    request_body = VoteBody,
    responses(
        (status = 200, description = "Counters after the vote", body = VoteResultDto),
        (status = 400, description = "Invalid vote", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Post not found", body = ErrorSchema)
    ),
    tags = ["votes"],
    operation_id = "votePost"
)]
#[post("/posts/{post_id}/votes")]
pub async fn vote_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<VoteBody>,
) -> ApiResult<web::Json<VoteResultDto>> {
    let subject = SubjectRef::Post(post_id(path.into_inner())?);
    cast(&state, &session, subject, payload.into_inner()).await
}

/// Vote on a comment.
#[utoipa::path(
    post,
    path = "/api/v1/comments/{comment_id}/votes",
    params(("comment_id" = i64, Path, description = "Voted comment")),
    request_body = VoteBody,
    responses(
        (status = 200, description = "Counters after the vote", body = VoteResultDto),
        (status = 400, description = "Invalid vote", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Comment not found", body = ErrorSchema)
    ),
    tags = ["votes"],
    operation_id = "voteComment"
)]
#[post("/comments/{comment_id}/votes")]
pub async fn vote_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<VoteBody>,
) -> ApiResult<web::Json<VoteResultDto>> {
    let subject = SubjectRef::Comment(comment_id(path.into_inner())?);
    cast(&state, &session, subject, payload.into_inner()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockUsersQuery, MockVoteCommand, VoteResponse};
    use crate::domain::{PostId, Role, User, UserId, Username, VoteTally};
    use crate::inbound::http::test_utils::{api_service, login};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use chrono::Utc;
    use rstest::rstest;
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn state_with(users: MockUsersQuery, votes: MockVoteCommand) -> HttpState {
        let (mut state, _store) = HttpState::in_memory();
        state.users = Arc::new(users);
        state.votes = Arc::new(votes);
        state
    }

    fn member_lookup(user: User) -> MockUsersQuery {
        let mut users = MockUsersQuery::new();
        users
            .expect_find_user()
            .returning(move |_| Ok(Some(user.clone())));
        users
    }

    #[rstest]
    #[actix_web::test]
    async fn forwards_the_session_voter_and_direction() {
        let voter = User::new(
            UserId::random(),
            Username::new("ada").expect("username"),
            Role::Regular,
            Utc::now(),
        );
        let voter_id = voter.id().clone();
        let mut votes = MockVoteCommand::new();
        votes
            .expect_cast_vote()
            .withf(move |request| {
                request.voter == voter_id
                    && request.direction == VoteDirection::Down
                    && request.subject == SubjectRef::Post(PostId::new(4).expect("id"))
            })
            .times(1)
            .returning(|request| {
                Ok(VoteResponse {
                    subject: request.subject,
                    tally: VoteTally::new(2, 1),
                    user_vote: Some(VoteDirection::Down),
                })
            });
        let app = api_service(state_with(member_lookup(voter.clone()), votes)).await;
        let cookie = login(&app, voter.id()).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/posts/4/votes")
            .cookie(cookie)
            .set_json(json!({"vote": "down"}))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(
            body,
            json!({
                "post_id": 4,
                "up_votes": 2,
                "down_votes": 1,
                "total_votes": 1,
                "user_vote": "down",
            })
        );
    }

    #[rstest]
    #[case(json!({}), "vote is required")]
    #[case(json!({"vote": "none"}), "Invalid vote type 'none': expected 'up' or 'down'")]
    #[actix_web::test]
    async fn rejects_unusable_directions(#[case] payload: Value, #[case] message: &str) {
        let voter = User::new(
            UserId::random(),
            Username::new("ada").expect("username"),
            Role::Regular,
            Utc::now(),
        );
        let mut votes = MockVoteCommand::new();
        votes.expect_cast_vote().never();
        let app = api_service(state_with(member_lookup(voter.clone()), votes)).await;
        let cookie = login(&app, voter.id()).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/comments/9/votes")
            .cookie(cookie)
            .set_json(payload)
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["message"], message);
    }

    #[rstest]
    #[actix_web::test]
    async fn anonymous_votes_are_unauthorised() {
        let mut votes = MockVoteCommand::new();
        votes.expect_cast_vote().never();
        let app = api_service(state_with(MockUsersQuery::new(), votes)).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/posts/1/votes")
            .set_json(json!({"vote": "up"}))
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
