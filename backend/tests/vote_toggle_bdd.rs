//! Behaviour tests for the vote toggle state machine over the in-memory
//! store.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

// Shared helpers include ones only other suites call.
#[allow(dead_code)]
mod support;

use pagination::PageRequest;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use social_backend::domain::ports::{
    FeedReader, SubjectRepository, VoteCommand, VoteRequest, VoteResponse,
};
use social_backend::domain::{
    CommentId, FeedQuery, PostId, Role, SortField, SortOrder, SubjectRef, VoteDirection,
};

use support::community::Community;

#[derive(Default, ScenarioState)]
struct VoteWorld {
    community: Slot<Community>,
    post: Slot<i64>,
    comment: Slot<i64>,
    post_result: Slot<VoteResponse>,
    comment_result: Slot<VoteResponse>,
}

impl VoteWorld {
    fn community(&self) -> Community {
        self.community.get().expect("community should exist")
    }

    fn post_ref(&self) -> SubjectRef {
        let id = self.post.get().expect("post should be published");
        SubjectRef::Post(PostId::new(id).expect("post id"))
    }

    fn comment_ref(&self) -> SubjectRef {
        let id = self.comment.get().expect("comment should be written");
        SubjectRef::Comment(CommentId::new(id).expect("comment id"))
    }

    fn cast(&self, voter: &str, direction: &str, subject: SubjectRef) -> VoteResponse {
        let community = self.community();
        let voter = community.join(voter, Role::Regular).id().clone();
        let direction: VoteDirection = direction.parse().expect("vote direction");
        community
            .block_on(community.votes().cast_vote(VoteRequest {
                subject,
                voter,
                direction,
            }))
            .expect("cast vote")
    }
}

#[fixture]
fn world() -> VoteWorld {
    let world = VoteWorld::default();
    world.community.set(Community::new());
    world
}

#[given("{author} has published a post")]
fn published_post(world: &VoteWorld, author: String) {
    world.post.set(world.community().publish(&author, "Vote on me"));
}

#[given("{author} has commented on the post")]
fn commented(world: &VoteWorld, author: String) {
    let post = world.post.get().expect("post should be published");
    world.comment.set(world.community().comment(&author, post));
}

#[when("{voter} votes {direction} on the post")]
fn votes_on_post(world: &VoteWorld, voter: String, direction: String) {
    let response = world.cast(&voter, &direction, world.post_ref());
    world.post_result.set(response);
}

#[when("{voter} votes {direction} on the comment")]
fn votes_on_comment(world: &VoteWorld, voter: String, direction: String) {
    let response = world.cast(&voter, &direction, world.comment_ref());
    world.comment_result.set(response);
}

fn post_tally(world: &VoteWorld) -> (u32, u32) {
    let community = world.community();
    let id = PostId::new(world.post.get().expect("post should be published")).expect("post id");
    let post = community
        .block_on(community.store().find_post(id))
        .expect("load post")
        .expect("post exists");
    (post.tally.up, post.tally.down)
}

/// The post's vote as annotated in `voter`'s feed.
fn feed_vote(world: &VoteWorld, voter: &str) -> Option<VoteDirection> {
    let community = world.community();
    let voter = community.member(voter).id().clone();
    let query = FeedQuery::new(
        SortField::Id,
        SortOrder::Asc,
        PageRequest::new(1, 20),
        false,
        Some(voter),
    )
    .expect("feed query");
    let page = community
        .block_on(community.feed().list_posts(query))
        .expect("list posts");
    let post = world.post.get().expect("post should be published");
    page.items
        .into_iter()
        .find(|view| view.post.id.get() == post)
        .expect("post in feed")
        .user_vote
}

#[then("the post has {up:u32} up and {down:u32} down votes")]
fn post_counts(world: &VoteWorld, up: u32, down: u32) {
    assert_eq!(post_tally(world), (up, down));
}

#[then("the comment has {up:u32} up and {down:u32} down votes")]
fn comment_counts(world: &VoteWorld, up: u32, down: u32) {
    let tally = world.comment_result.get().expect("comment vote").tally;
    assert_eq!((tally.up, tally.down), (up, down));
}

#[then("the post's vote total is {total:i64}")]
fn post_total(world: &VoteWorld, total: i64) {
    let tally = world.post_result.get().expect("post vote").tally;
    assert_eq!(tally.total(), total);
}

#[then("{voter}'s vote on the post is {direction}")]
fn voter_direction(world: &VoteWorld, voter: String, direction: String) {
    let expected: VoteDirection = direction.parse().expect("vote direction");
    assert_eq!(feed_vote(world, &voter), Some(expected));
    assert_eq!(
        world.post_result.get().expect("post vote").user_vote,
        Some(expected)
    );
}

#[then("{voter} has no vote on the post")]
fn voter_has_none(world: &VoteWorld, voter: String) {
    assert_eq!(feed_vote(world, &voter), None);
    assert_eq!(world.post_result.get().expect("post vote").user_vote, None);
}

#[scenario(path = "tests/features/vote_toggle.feature", name = "A first up vote counts once")]
fn first_up_vote_counts_once(world: VoteWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/vote_toggle.feature", name = "Repeating a vote withdraws it")]
fn repeating_a_vote_withdraws_it(world: VoteWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/vote_toggle.feature",
    name = "Switching direction moves the vote"
)]
fn switching_direction_moves_the_vote(world: VoteWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/vote_toggle.feature",
    name = "Votes from several members accumulate"
)]
fn votes_from_several_members_accumulate(world: VoteWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/vote_toggle.feature",
    name = "Comment votes are counted separately"
)]
fn comment_votes_are_counted_separately(world: VoteWorld) {
    let _ = world;
}
