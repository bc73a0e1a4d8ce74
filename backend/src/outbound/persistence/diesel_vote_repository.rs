//! PostgreSQL-backed vote engine adapter.
//!
//! Each vote runs in one transaction: the subject row is locked with
//! `SELECT ... FOR UPDATE`, the voter's ledger entry is read and changed, and
//! the counters are adjusted relative to their current values. Concurrent
//! votes on the same subject therefore serialise on the row lock.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{VoteOutcome, VoteRepository, VoteRepositoryError};
use crate::domain::{SubjectRef, UserId, VoteDirection, VoteTally, VoteTransition};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewCommentVoteRow, NewPostVoteRow, parse_direction};
use super::pool::{DbPool, PoolError};
use super::schema::{comment_votes, comments, post_votes, posts};

/// Diesel-backed implementation of the vote repository.
#[derive(Clone)]
pub struct DieselVoteRepository {
    pool: DbPool,
}

impl DieselVoteRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> VoteRepositoryError {
    map_basic_pool_error(error, VoteRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> VoteRepositoryError {
    map_basic_diesel_error(
        error,
        VoteRepositoryError::query,
        VoteRepositoryError::connection,
    )
}

/// Outcome decided inside the transaction before any write happens.
type Decision = Result<VoteOutcome, VoteRepositoryError>;

fn decide(
    subject: SubjectRef,
    counters: Option<(i32, i32)>,
    existing: Option<String>,
    direction: VoteDirection,
) -> Result<(VoteTransition, (i32, i32)), VoteRepositoryError> {
    let Some((up, down)) = counters else {
        return Err(VoteRepositoryError::subject_not_found(subject.to_string()));
    };
    let current = VoteTally::new(
        u32::try_from(up).map_err(|_| VoteRepositoryError::query("negative up counter"))?,
        u32::try_from(down).map_err(|_| VoteRepositoryError::query("negative down counter"))?,
    );
    let existing = existing
        .as_deref()
        .map(parse_direction)
        .transpose()
        .map_err(VoteRepositoryError::query)?;
    let transition = VoteTransition::resolve(existing, direction);
    let deltas = transition.counter_deltas();
    current
        .apply(deltas)
        .ok_or_else(|| VoteRepositoryError::query("vote counter would become negative"))?;
    Ok((transition, deltas))
}

fn outcome(transition: VoteTransition, (up, down): (i32, i32)) -> Decision {
    Ok(VoteOutcome {
        transition,
        tally: VoteTally::new(
            u32::try_from(up).map_err(|_| VoteRepositoryError::query("negative up counter"))?,
            u32::try_from(down).map_err(|_| VoteRepositoryError::query("negative down counter"))?,
        ),
    })
}

/// Applies one vote to a subject table and its ledger table.
///
/// Expands inside a transaction closure and evaluates to
/// `Result<Decision, diesel::result::Error>`.
macro_rules! apply_ledger_vote {
    (
        $conn:expr,
        subject: $subject:expr,
        table: $table:ident,
        ledger: $ledger:ident,
        ledger_key: $ledger_key:ident,
        row: $row:ident,
        id: $id:expr,
        voter: $voter:expr,
        direction: $direction:expr $(,)?
    ) => {{
        let counters = $table::table
            .find($id)
            .select(($table::up_votes, $table::down_votes))
            .for_update()
            .first::<(i32, i32)>($conn)
            .await
            .optional()?;
        let existing = $ledger::table
            .find(($id, $voter))
            .select($ledger::direction)
            .first::<String>($conn)
            .await
            .optional()?;

        match decide($subject, counters, existing, $direction) {
            Err(error) => Ok(Err(error)),
            Ok((transition, (delta_up, delta_down))) => {
                match transition {
                    VoteTransition::Cast(next) => {
                        diesel::insert_into($ledger::table)
                            .values($row {
                                $ledger_key: $id,
                                user_id: $voter,
                                direction: next.as_str(),
                            })
                            .execute($conn)
                            .await?;
                    }
                    VoteTransition::Retract(_) => {
                        diesel::delete($ledger::table.find(($id, $voter)))
                            .execute($conn)
                            .await?;
                    }
                    VoteTransition::Switch { to, .. } => {
                        diesel::update($ledger::table.find(($id, $voter)))
                            .set($ledger::direction.eq(to.as_str()))
                            .execute($conn)
                            .await?;
                    }
                }
                let refreshed = diesel::update($table::table.find($id))
                    .set((
                        $table::up_votes.eq($table::up_votes + delta_up),
                        $table::down_votes.eq($table::down_votes + delta_down),
                    ))
                    .returning(($table::up_votes, $table::down_votes))
                    .get_result::<(i32, i32)>($conn)
                    .await?;
                Ok(outcome(transition, refreshed))
            }
        }
    }};
}

#[async_trait]
impl VoteRepository for DieselVoteRepository {
    async fn apply_vote(
        &self,
        subject: SubjectRef,
        voter: &UserId,
        direction: VoteDirection,
    ) -> Result<VoteOutcome, VoteRepositoryError> {
        let voter: Uuid = *voter.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn
            .transaction::<Decision, diesel::result::Error, _>(|conn| {
                async move {
                    match subject {
                        SubjectRef::Post(id) => apply_ledger_vote!(
                            conn,
                            subject: subject,
                            table: posts,
                            ledger: post_votes,
                            ledger_key: post_id,
                            row: NewPostVoteRow,
                            id: id.get(),
                            voter: voter,
                            direction: direction,
                        ),
                        SubjectRef::Comment(id) => apply_ledger_vote!(
                            conn,
                            subject: subject,
                            table: comments,
                            ledger: comment_votes,
                            ledger_key: comment_id,
                            row: NewCommentVoteRow,
                            id: id.get(),
                            voter: voter,
                            direction: direction,
                        ),
                    }
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PostId;
    use rstest::rstest;

    fn post() -> SubjectRef {
        SubjectRef::Post(PostId::new(4).expect("id"))
    }

    #[rstest]
    fn missing_subject_is_reported_by_name() {
        let error = decide(post(), None, None, VoteDirection::Up).expect_err("missing");
        assert_eq!(error, VoteRepositoryError::subject_not_found("Post 4"));
    }

    #[rstest]
    #[case(None, VoteDirection::Up, (1, 0))]
    #[case(Some("up"), VoteDirection::Up, (-1, 0))]
    #[case(Some("up"), VoteDirection::Down, (-1, 1))]
    #[case(Some("down"), VoteDirection::Down, (0, -1))]
    fn decisions_follow_the_toggle_rules(
        #[case] existing: Option<&str>,
        #[case] requested: VoteDirection,
        #[case] deltas: (i32, i32),
    ) {
        let (_, decided) = decide(
            post(),
            Some((1, 1)),
            existing.map(str::to_owned),
            requested,
        )
        .expect("decision");
        assert_eq!(decided, deltas);
    }

    #[rstest]
    fn underflow_is_refused_before_writing() {
        let error = decide(post(), Some((0, 0)), Some("up".to_owned()), VoteDirection::Up)
            .expect_err("underflow");
        assert!(matches!(error, VoteRepositoryError::Query { .. }));
    }

    #[rstest]
    fn corrupt_ledger_entries_are_query_errors() {
        let error = decide(post(), Some((1, 0)), Some("meh".to_owned()), VoteDirection::Up)
            .expect_err("corrupt");
        assert!(matches!(error, VoteRepositoryError::Query { .. }));
    }

    #[rstest]
    fn pool_errors_are_connection_errors() {
        let error = map_pool_error(PoolError::checkout("timeout"));
        assert!(matches!(error, VoteRepositoryError::Connection { .. }));
    }
}
