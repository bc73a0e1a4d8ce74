//! Process-local store implementing every driven port.
//!
//! Used when no database is configured and by the HTTP integration tests.
//! A single async mutex serialises mutations, so each vote decision and its
//! counter adjustment happen as one step, the same guarantee the PostgreSQL
//! adapters get from row locks.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::ports::{
    Created, ExampleDataSeedRepository, ExampleDataSeedRepositoryError, ExampleDataSeedRequest,
    FeedRepository, FeedRepositoryError, NewCommentRecord, NewPostRecord, SeedVoteTarget,
    SeedingResult, SubjectRepository, SubjectRepositoryError, UserPersistenceError,
    UserRepository, VoteOutcome, VoteRepository, VoteRepositoryError,
};
use crate::domain::{
    AuthorSummary, Comment, CommentId, CommentPatch, CommentView, ListingWindow, Post, PostId,
    PostPatch, PostView, SubjectRef, User, UserId, VoteDirection, VoteTally, VoteTransition,
};

type Ledger<K> = HashMap<(K, UserId), VoteDirection>;

#[derive(Default)]
struct MemoryState {
    users: HashMap<UserId, User>,
    posts: BTreeMap<PostId, Post>,
    comments: BTreeMap<CommentId, Comment>,
    post_votes: Ledger<PostId>,
    comment_votes: Ledger<CommentId>,
    last_post_id: i64,
    last_comment_id: i64,
    seed_runs: HashSet<String>,
}

impl MemoryState {
    fn next_post_id(&mut self) -> Result<PostId, String> {
        self.last_post_id += 1;
        PostId::new(self.last_post_id).map_err(|err| err.to_string())
    }

    fn next_comment_id(&mut self) -> Result<CommentId, String> {
        self.last_comment_id += 1;
        CommentId::new(self.last_comment_id).map_err(|err| err.to_string())
    }

    fn author(&self, id: &UserId) -> Option<AuthorSummary> {
        self.users.get(id).map(|user| AuthorSummary {
            user_id: user.id().clone(),
            username: user.username().clone(),
        })
    }

    fn post_view(&self, post: &Post, voter: Option<&UserId>) -> Option<PostView> {
        Some(PostView {
            post: post.clone(),
            author: self.author(&post.author_id)?,
            user_vote: voter.and_then(|v| self.post_votes.get(&(post.id, v.clone())).copied()),
            comments: Vec::new(),
        })
    }

    fn comment_view(&self, comment: &Comment, voter: Option<&UserId>) -> Option<CommentView> {
        Some(CommentView {
            comment: comment.clone(),
            author: self.author(&comment.author_id)?,
            user_vote: voter
                .and_then(|v| self.comment_votes.get(&(comment.id, v.clone())).copied()),
        })
    }

    fn remove_comment(&mut self, id: CommentId) -> Option<Comment> {
        let removed = self.comments.remove(&id)?;
        self.comment_votes.retain(|(comment, _), _| *comment != id);
        Some(removed)
    }
}

fn window_slice<T>(items: Vec<T>, window: &ListingWindow) -> Vec<T> {
    let offset = usize::try_from(window.offset).unwrap_or(usize::MAX);
    let limit = usize::try_from(window.limit).unwrap_or(usize::MAX);
    items.into_iter().skip(offset).take(limit).collect()
}

fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

fn cast<K>(
    ledger: &mut Ledger<K>,
    key: (K, UserId),
    tally: &mut VoteTally,
    direction: VoteDirection,
) -> Result<VoteOutcome, VoteRepositoryError>
where
    K: std::hash::Hash + Eq,
{
    let transition = VoteTransition::resolve(ledger.get(&key).copied(), direction);
    let updated = tally
        .apply(transition.counter_deltas())
        .ok_or_else(|| VoteRepositoryError::query("vote counter would become negative"))?;
    match transition.resulting_direction() {
        Some(next) => ledger.insert(key, next),
        None => ledger.remove(&key),
    };
    *tally = updated;
    Ok(VoteOutcome {
        transition,
        tally: updated,
    })
}

/// In-memory implementation of the driven ports.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<MemoryState>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn upsert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut state = self.state.lock().await;
        state.users.insert(user.id().clone(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.state.lock().await.users.get(id).cloned())
    }
}

#[async_trait]
impl VoteRepository for InMemoryStore {
    async fn apply_vote(
        &self,
        subject: SubjectRef,
        voter: &UserId,
        direction: VoteDirection,
    ) -> Result<VoteOutcome, VoteRepositoryError> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        match subject {
            SubjectRef::Post(id) => {
                let post = state
                    .posts
                    .get_mut(&id)
                    .ok_or_else(|| VoteRepositoryError::subject_not_found(subject.to_string()))?;
                cast(
                    &mut state.post_votes,
                    (id, voter.clone()),
                    &mut post.tally,
                    direction,
                )
            }
            SubjectRef::Comment(id) => {
                let comment = state
                    .comments
                    .get_mut(&id)
                    .ok_or_else(|| VoteRepositoryError::subject_not_found(subject.to_string()))?;
                cast(
                    &mut state.comment_votes,
                    (id, voter.clone()),
                    &mut comment.tally,
                    direction,
                )
            }
        }
    }
}

#[async_trait]
impl FeedRepository for InMemoryStore {
    async fn list_posts(&self, window: &ListingWindow) -> Result<Vec<PostView>, FeedRepositoryError> {
        let state = self.state.lock().await;
        let mut posts: Vec<&Post> = state.posts.values().collect();
        posts.sort_by(|a, b| window.order.apply(window.sort.compare_posts(a, b)));
        let views = posts
            .into_iter()
            .filter_map(|post| state.post_view(post, window.voter.as_ref()))
            .collect();
        Ok(window_slice(views, window))
    }

    async fn count_posts(&self) -> Result<u64, FeedRepositoryError> {
        Ok(count(self.state.lock().await.posts.len()))
    }

    async fn comments_for_posts(
        &self,
        posts: &[PostId],
        voter: Option<UserId>,
    ) -> Result<Vec<CommentView>, FeedRepositoryError> {
        let state = self.state.lock().await;
        let wanted: HashSet<PostId> = posts.iter().copied().collect();
        let mut comments: Vec<&Comment> = state
            .comments
            .values()
            .filter(|comment| wanted.contains(&comment.post_id))
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(comments
            .into_iter()
            .filter_map(|comment| state.comment_view(comment, voter.as_ref()))
            .collect())
    }

    async fn list_comments(
        &self,
        post: PostId,
        window: &ListingWindow,
    ) -> Result<Vec<CommentView>, FeedRepositoryError> {
        let state = self.state.lock().await;
        let mut comments: Vec<&Comment> = state
            .comments
            .values()
            .filter(|comment| comment.post_id == post)
            .collect();
        comments.sort_by(|a, b| window.order.apply(window.sort.compare_comments(a, b)));
        let views = comments
            .into_iter()
            .filter_map(|comment| state.comment_view(comment, window.voter.as_ref()))
            .collect();
        Ok(window_slice(views, window))
    }

    async fn count_comments(&self, post: PostId) -> Result<u64, FeedRepositoryError> {
        let state = self.state.lock().await;
        Ok(count(
            state
                .comments
                .values()
                .filter(|comment| comment.post_id == post)
                .count(),
        ))
    }

    async fn post_exists(&self, post: PostId) -> Result<bool, FeedRepositoryError> {
        Ok(self.state.lock().await.posts.contains_key(&post))
    }
}

#[async_trait]
impl SubjectRepository for InMemoryStore {
    async fn create_post(
        &self,
        record: NewPostRecord,
    ) -> Result<Created<Post>, SubjectRepositoryError> {
        let mut state = self.state.lock().await;
        if let Some(existing) = state.posts.values().find(|post| {
            post.author_id == record.author_id && post.client_token == record.draft.client_token
        }) {
            return Ok(Created {
                subject: existing.clone(),
                replayed: true,
            });
        }
        let id = state.next_post_id().map_err(SubjectRepositoryError::query)?;
        let post = Post {
            id,
            author_id: record.author_id,
            title: record.draft.title,
            content: record.draft.content,
            tally: VoteTally::default(),
            client_token: record.draft.client_token,
            created_at: record.now,
            updated_at: record.now,
        };
        state.posts.insert(id, post.clone());
        Ok(Created {
            subject: post,
            replayed: false,
        })
    }

    async fn create_comment(
        &self,
        record: NewCommentRecord,
    ) -> Result<Created<Comment>, SubjectRepositoryError> {
        let mut state = self.state.lock().await;
        if !state.posts.contains_key(&record.post_id) {
            return Err(SubjectRepositoryError::post_not_found(record.post_id.get()));
        }
        if let Some(existing) = state.comments.values().find(|comment| {
            comment.author_id == record.author_id
                && comment.client_token == record.draft.client_token
        }) {
            return Ok(Created {
                subject: existing.clone(),
                replayed: true,
            });
        }
        let id = state
            .next_comment_id()
            .map_err(SubjectRepositoryError::query)?;
        let comment = Comment {
            id,
            post_id: record.post_id,
            author_id: record.author_id,
            content: record.draft.content,
            tally: VoteTally::default(),
            client_token: record.draft.client_token,
            created_at: record.now,
            updated_at: record.now,
        };
        state.comments.insert(id, comment.clone());
        Ok(Created {
            subject: comment,
            replayed: false,
        })
    }

    async fn find_post(&self, id: PostId) -> Result<Option<Post>, SubjectRepositoryError> {
        Ok(self.state.lock().await.posts.get(&id).cloned())
    }

    async fn find_comment(&self, id: CommentId) -> Result<Option<Comment>, SubjectRepositoryError> {
        Ok(self.state.lock().await.comments.get(&id).cloned())
    }

    async fn update_post(
        &self,
        id: PostId,
        patch: &PostPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Post>, SubjectRepositoryError> {
        let mut state = self.state.lock().await;
        Ok(state.posts.get_mut(&id).map(|post| {
            patch.apply_to(post, now);
            post.clone()
        }))
    }

    async fn update_comment(
        &self,
        id: CommentId,
        patch: &CommentPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Comment>, SubjectRepositoryError> {
        let mut state = self.state.lock().await;
        Ok(state.comments.get_mut(&id).map(|comment| {
            patch.apply_to(comment, now);
            comment.clone()
        }))
    }

    async fn delete_post(&self, id: PostId) -> Result<Option<Post>, SubjectRepositoryError> {
        let mut state = self.state.lock().await;
        let Some(removed) = state.posts.remove(&id) else {
            return Ok(None);
        };
        let children: Vec<CommentId> = state
            .comments
            .values()
            .filter(|comment| comment.post_id == id)
            .map(|comment| comment.id)
            .collect();
        for child in children {
            state.remove_comment(child);
        }
        state.post_votes.retain(|(post, _), _| *post != id);
        Ok(Some(removed))
    }

    async fn delete_comment(
        &self,
        id: CommentId,
    ) -> Result<Option<Comment>, SubjectRepositoryError> {
        Ok(self.state.lock().await.remove_comment(id))
    }
}

#[async_trait]
impl ExampleDataSeedRepository for InMemoryStore {
    async fn seed_example_data(
        &self,
        request: ExampleDataSeedRequest,
    ) -> Result<SeedingResult, ExampleDataSeedRepositoryError> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        if state.seed_runs.contains(&request.seed_key) {
            return Ok(SeedingResult::AlreadySeeded);
        }
        check_seed_references(&request)?;

        let mut post_ids = Vec::with_capacity(request.posts.len());
        for seed in request.posts {
            let id = state
                .next_post_id()
                .map_err(ExampleDataSeedRepositoryError::query)?;
            state.posts.insert(
                id,
                Post {
                    id,
                    author_id: seed.author_id,
                    title: seed.draft.title,
                    content: seed.draft.content,
                    tally: seed.tally,
                    client_token: seed.draft.client_token,
                    created_at: seed.created_at,
                    updated_at: seed.created_at,
                },
            );
            post_ids.push(id);
        }

        let mut comment_ids = Vec::with_capacity(request.comments.len());
        for seed in request.comments {
            let post_id = *post_ids.get(seed.post_index).ok_or_else(|| {
                ExampleDataSeedRepositoryError::query(format!(
                    "comment references unknown post index {}",
                    seed.post_index
                ))
            })?;
            let id = state
                .next_comment_id()
                .map_err(ExampleDataSeedRepositoryError::query)?;
            state.comments.insert(
                id,
                Comment {
                    id,
                    post_id,
                    author_id: seed.author_id,
                    content: seed.draft.content,
                    tally: seed.tally,
                    client_token: seed.draft.client_token,
                    created_at: seed.created_at,
                    updated_at: seed.created_at,
                },
            );
            comment_ids.push(id);
        }

        for vote in request.votes {
            let missing = || ExampleDataSeedRepositoryError::query("vote references unknown subject");
            match vote.target {
                SeedVoteTarget::Post(index) => {
                    let id = *post_ids.get(index).ok_or_else(missing)?;
                    state.post_votes.insert((id, vote.voter_id), vote.direction);
                }
                SeedVoteTarget::Comment(index) => {
                    let id = *comment_ids.get(index).ok_or_else(missing)?;
                    state
                        .comment_votes
                        .insert((id, vote.voter_id), vote.direction);
                }
            }
        }

        for user in request.users {
            state.users.insert(user.id().clone(), user);
        }
        state.seed_runs.insert(request.seed_key);
        Ok(SeedingResult::Applied)
    }
}

/// Rejects dangling comment and vote indices before anything is stored.
fn check_seed_references(
    request: &ExampleDataSeedRequest,
) -> Result<(), ExampleDataSeedRepositoryError> {
    let posts = request.posts.len();
    let comments = request.comments.len();
    if let Some(seed) = request.comments.iter().find(|seed| seed.post_index >= posts) {
        return Err(ExampleDataSeedRepositoryError::query(format!(
            "comment references unknown post index {}",
            seed.post_index
        )));
    }
    let dangling_vote = request.votes.iter().any(|vote| match &vote.target {
        SeedVoteTarget::Post(index) => *index >= posts,
        SeedVoteTarget::Comment(index) => *index >= comments,
    });
    if dangling_vote {
        return Err(ExampleDataSeedRepositoryError::query(
            "vote references unknown subject",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
