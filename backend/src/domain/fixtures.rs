//! Shared record builders for domain unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    AuthorSummary, ClientToken, Comment, CommentId, CommentView, Post, PostId, PostView, UserId,
    Username, VoteDirection, VoteTally,
};

pub(crate) fn fixture_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
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

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_time(),
    })
}

pub(crate) fn post(id: i64, author: &UserId) -> Post {
    Post {
        id: PostId::new(id).expect("positive id"),
        author_id: author.clone(),
        title: format!("Post {id}"),
        content: format!("Body of post {id}"),
        tally: VoteTally::default(),
        client_token: ClientToken::new(format!("post-{id}")).expect("token"),
        created_at: fixture_time(),
        updated_at: fixture_time(),
    }
}

pub(crate) fn comment(id: i64, post_id: i64, author: &UserId) -> Comment {
    Comment {
        id: CommentId::new(id).expect("positive id"),
        post_id: PostId::new(post_id).expect("positive id"),
        author_id: author.clone(),
        content: format!("Comment {id}"),
        tally: VoteTally::default(),
        client_token: ClientToken::new(format!("comment-{id}")).expect("token"),
        created_at: fixture_time(),
        updated_at: fixture_time(),
    }
}

pub(crate) fn author(id: &UserId) -> AuthorSummary {
    AuthorSummary {
        user_id: id.clone(),
        username: Username::new("fixture_author").expect("username"),
    }
}

pub(crate) fn post_view(id: i64, tally: VoteTally, user_vote: Option<VoteDirection>) -> PostView {
    let author_id = UserId::random();
    let mut post = post(id, &author_id);
    post.tally = tally;
    PostView {
        post,
        author: author(&author_id),
        user_vote,
        comments: Vec::new(),
    }
}

pub(crate) fn comment_view(id: i64, post_id: i64, user_vote: Option<VoteDirection>) -> CommentView {
    let author_id = UserId::random();
    CommentView {
        comment: comment(id, post_id, &author_id),
        author: author(&author_id),
        user_vote,
    }
}
