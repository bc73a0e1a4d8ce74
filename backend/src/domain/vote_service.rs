//! Vote engine service implementing [`VoteCommand`].
//!
//! The repository performs the atomic ledger and counter update; this
//! service maps each repository failure to its own error kind instead of
//! collapsing them into one generic failure.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::Error;
use crate::domain::ports::{
    VoteCommand, VoteRepository, VoteRepositoryError, VoteRequest, VoteResponse,
};

/// Vote service backed by a [`VoteRepository`].
#[derive(Clone)]
pub struct VoteService<R> {
    repository: Arc<R>,
}

impl<R> VoteService<R> {
    /// Create a new service with the given repository.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

fn map_vote_error(request: &VoteRequest, error: VoteRepositoryError) -> Error {
    match error {
        VoteRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("vote repository unavailable: {message}"))
        }
        VoteRepositoryError::Query { message } => {
            Error::internal(format!("vote repository error: {message}"))
        }
        VoteRepositoryError::SubjectNotFound { .. } => request.subject.not_found(),
    }
}

#[async_trait]
impl<R> VoteCommand for VoteService<R>
where
    R: VoteRepository,
{
    async fn cast_vote(&self, request: VoteRequest) -> Result<VoteResponse, Error> {
        let outcome = self
            .repository
            .apply_vote(request.subject, &request.voter, request.direction)
            .await
            .map_err(|error| map_vote_error(&request, error))?;

        debug!(
            subject = %request.subject,
            voter = %request.voter,
            transition = ?outcome.transition,
            up = outcome.tally.up,
            down = outcome.tally.down,
            "vote applied"
        );

        Ok(VoteResponse {
            subject: request.subject,
            tally: outcome.tally,
            user_vote: outcome.transition.resulting_direction(),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for the vote service error mapping and response shape.

    use super::*;
    use crate::domain::ports::{MockVoteRepository, VoteOutcome};
    use crate::domain::{
        ErrorCode, PostId, SubjectRef, UserId, VoteDirection, VoteTally, VoteTransition,
    };
    use rstest::rstest;

    fn request(direction: VoteDirection) -> VoteRequest {
        VoteRequest {
            subject: SubjectRef::Post(PostId::new(7).expect("id")),
            voter: UserId::random(),
            direction,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn returns_refreshed_tally_and_ledger_state() {
        let mut repo = MockVoteRepository::new();
        let req = request(VoteDirection::Down);
        let voter = req.voter.clone();
        repo.expect_apply_vote()
            .withf(move |subject, candidate, direction| {
                *subject == SubjectRef::Post(PostId::new(7).expect("id"))
                    && *candidate == voter
                    && *direction == VoteDirection::Down
            })
            .times(1)
            .return_once(|_, _, _| {
                Ok(VoteOutcome {
                    transition: VoteTransition::Switch {
                        from: VoteDirection::Up,
                        to: VoteDirection::Down,
                    },
                    tally: VoteTally::new(3, 2),
                })
            });

        let service = VoteService::new(Arc::new(repo));
        let response = service.cast_vote(req).await.expect("vote succeeds");

        assert_eq!(response.tally, VoteTally::new(3, 2));
        assert_eq!(response.tally.total(), 1);
        assert_eq!(response.user_vote, Some(VoteDirection::Down));
    }

    #[rstest]
    #[tokio::test]
    async fn retraction_clears_user_vote() {
        let mut repo = MockVoteRepository::new();
        repo.expect_apply_vote().times(1).return_once(|_, _, _| {
            Ok(VoteOutcome {
                transition: VoteTransition::Retract(VoteDirection::Up),
                tally: VoteTally::default(),
            })
        });

        let service = VoteService::new(Arc::new(repo));
        let response = service
            .cast_vote(request(VoteDirection::Up))
            .await
            .expect("vote succeeds");
        assert_eq!(response.user_vote, None);
    }

    #[rstest]
    #[case(VoteRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(VoteRepositoryError::query("syntax"), ErrorCode::InternalError)]
    #[case(VoteRepositoryError::subject_not_found("Post 7"), ErrorCode::NotFound)]
    #[tokio::test]
    async fn maps_each_repository_error_distinctly(
        #[case] failure: VoteRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let mut repo = MockVoteRepository::new();
        repo.expect_apply_vote()
            .times(1)
            .return_once(move |_, _, _| Err(failure));

        let service = VoteService::new(Arc::new(repo));
        let error = service
            .cast_vote(request(VoteDirection::Up))
            .await
            .expect_err("vote fails");
        assert_eq!(error.code(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_subject_names_the_subject() {
        let mut repo = MockVoteRepository::new();
        repo.expect_apply_vote()
            .times(1)
            .return_once(|_, _, _| Err(VoteRepositoryError::subject_not_found("Post 7")));

        let service = VoteService::new(Arc::new(repo));
        let error = service
            .cast_vote(request(VoteDirection::Up))
            .await
            .expect_err("vote fails");
        assert_eq!(error.message(), "Post 7 not found");
    }
}
