//! Behaviour tests for the author and superuser rules on post and comment
//! mutations.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

// Shared helpers include ones only other suites call.
#[allow(dead_code)]
mod support;

use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use social_backend::domain::ports::{CommentCommand, PostCommand, SubjectRepository};
use social_backend::domain::{CommentId, ErrorCode, PostId, PostPatch, Role};

use support::community::Community;

/// What a mutation attempt came back with.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Outcome {
    Accepted,
    Missing,
    Refused(ErrorCode, String),
}

#[derive(Default, ScenarioState)]
struct GuardWorld {
    community: Slot<Community>,
    post: Slot<i64>,
    comment: Slot<i64>,
    outcome: Slot<Outcome>,
}

impl GuardWorld {
    fn community(&self) -> Community {
        self.community.get().expect("community should exist")
    }

    fn post_id(&self) -> PostId {
        PostId::new(self.post.get().expect("post should be published")).expect("post id")
    }

    fn comment_id(&self) -> CommentId {
        CommentId::new(self.comment.get().expect("comment should be written")).expect("comment id")
    }

    fn record<T>(&self, result: Result<Option<T>, social_backend::domain::Error>) {
        let outcome = match result {
            Ok(Some(_)) => Outcome::Accepted,
            Ok(None) => Outcome::Missing,
            Err(err) => Outcome::Refused(err.code(), err.message().to_owned()),
        };
        self.outcome.set(outcome);
    }
}

#[fixture]
fn world() -> GuardWorld {
    let world = GuardWorld::default();
    world.community.set(Community::new());
    world
}

fn join(world: &GuardWorld, name: &str, role: &str) {
    world
        .community()
        .join(name, role.parse::<Role>().expect("known role"));
}

#[given("a regular member {name}")]
fn regular_member(world: &GuardWorld, name: String) {
    join(world, &name, "regular");
}

#[given("an admin member {name}")]
fn admin_member(world: &GuardWorld, name: String) {
    join(world, &name, "admin");
}

#[given("a superuser member {name}")]
fn superuser_member(world: &GuardWorld, name: String) {
    join(world, &name, "superuser");
}

#[given("{author} has published a post")]
fn published(world: &GuardWorld, author: String) {
    world.post.set(world.community().publish(&author, "Guarded"));
}

#[given("{author} has commented on the post")]
fn commented(world: &GuardWorld, author: String) {
    let post = world.post.get().expect("post should be published");
    world.comment.set(world.community().comment(&author, post));
}

#[when("{name} edits the post")]
fn edits_post(world: &GuardWorld, name: String) {
    let community = world.community();
    let patch = PostPatch::new(Some("Edited".to_owned()), None).expect("patch");
    let result = community.block_on(community.subjects().update_post(
        &community.actor(&name),
        world.post_id(),
        patch,
    ));
    world.record(result);
}

#[when("{name} deletes the post")]
fn deletes_post(world: &GuardWorld, name: String) {
    let community = world.community();
    let result = community.block_on(
        community
            .subjects()
            .delete_post(&community.actor(&name), world.post_id()),
    );
    world.record(result);
}

#[when("{name} deletes the comment")]
fn deletes_comment(world: &GuardWorld, name: String) {
    let community = world.community();
    let result = community.block_on(
        community
            .subjects()
            .delete_comment(&community.actor(&name), world.comment_id()),
    );
    world.record(result);
}

#[then("the change is accepted")]
fn accepted(world: &GuardWorld) {
    assert_eq!(world.outcome.get(), Some(Outcome::Accepted));
}

#[then("the change is refused as unauthorized")]
fn refused(world: &GuardWorld) {
    match world.outcome.get().expect("an attempt was made") {
        Outcome::Refused(code, message) => {
            assert_eq!(code, ErrorCode::Unauthorized);
            assert!(
                message.ends_with("does not have permission to this resource"),
                "{message}"
            );
        }
        other => panic!("expected a refusal, got {other:?}"),
    }
}

#[then("nothing was found")]
fn nothing_found(world: &GuardWorld) {
    assert_eq!(world.outcome.get(), Some(Outcome::Missing));
}

#[then("the post is gone")]
fn post_gone(world: &GuardWorld) {
    let community = world.community();
    let found = community
        .block_on(community.store().find_post(world.post_id()))
        .expect("lookup");
    assert!(found.is_none());
}

#[scenario(
    path = "tests/features/ownership_guard.feature",
    name = "The author edits their own post"
)]
fn author_edits_own_post(world: GuardWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/ownership_guard.feature",
    name = "Another member cannot edit the post"
)]
fn another_member_cannot_edit(world: GuardWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/ownership_guard.feature",
    name = "A superuser cannot edit someone else's post"
)]
fn superuser_cannot_edit_others_post(world: GuardWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/ownership_guard.feature", name = "A superuser removes any post")]
fn superuser_removes_any_post(world: GuardWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/ownership_guard.feature",
    name = "Admins have no moderation override"
)]
fn admins_have_no_override(world: GuardWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/ownership_guard.feature",
    name = "Deleting a missing post reports nothing to delete"
)]
fn deleting_a_missing_post(world: GuardWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/ownership_guard.feature",
    name = "The author removes their comment"
)]
fn author_removes_their_comment(world: GuardWorld) {
    let _ = world;
}
