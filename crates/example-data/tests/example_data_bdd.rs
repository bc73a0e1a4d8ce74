//! Behavioural tests for example-data crate.
//!
//! These tests validate the crate's behaviour against Gherkin scenarios
//! covering registry parsing, deterministic generation, and ledger
//! consistency.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use std::collections::HashMap;

use example_data::{
    ExampleCommunity, RegistryError, RoleSeed, SeedDefinition, SeedRegistry, VoteDirectionSeed,
    VoteTargetSeed, generate_example_community, is_valid_username,
};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};

/// Base valid registry JSON used by multiple Given steps.
const VALID_REGISTRY_JSON: &str = r#"{
    "version": 1,
    "seeds": [
        {
            "name": "test-seed",
            "seed": 42,
            "userCount": 6,
            "postsPerUser": 3,
            "commentsPerPost": 2,
            "votePercent": 60
        }
    ]
}"#;

/// Test world holding the parsed registry and generated communities.
#[derive(Default, ScenarioState)]
struct World {
    json_input: Slot<String>,
    registry_result: Slot<Result<SeedRegistry, RegistryError>>,
    seed_def: Slot<SeedDefinition>,
    community: Slot<ExampleCommunity>,
    second_community: Slot<ExampleCommunity>,
}

impl World {
    fn registry(&self) -> SeedRegistry {
        self.registry_result
            .get()
            .expect("registry should be set")
            .expect("registry should be valid")
    }

    fn seed_def(&self) -> SeedDefinition {
        self.seed_def.get().expect("seed definition should be set")
    }

    fn registry_result(&self) -> Result<SeedRegistry, RegistryError> {
        self.registry_result
            .get()
            .expect("registry result should be set")
    }

    fn community(&self) -> ExampleCommunity {
        self.community.get().expect("community should be generated")
    }
}

#[fixture]
fn world() -> World {
    World::default()
}

// Given steps

#[given("a valid seed registry JSON")]
fn a_valid_seed_registry_json(world: &World) {
    world.json_input.set(VALID_REGISTRY_JSON.to_owned());
}

#[given("a valid seed registry")]
fn a_valid_seed_registry(world: &World) {
    let registry = SeedRegistry::from_json(VALID_REGISTRY_JSON).expect("valid test registry");
    world.registry_result.set(Ok(registry));
}

#[given("a seed definition with seed {seed:u64}")]
fn a_seed_definition_with_seed(world: &World, seed: u64) {
    let registry = world.registry();
    let seed_def = registry.find_seed("test-seed").expect("seed exists");
    assert_eq!(seed_def.seed(), seed, "seed value mismatch");
    world.seed_def.set(seed_def.clone());
}

#[given("a seed definition")]
fn a_seed_definition(world: &World) {
    let registry = world.registry();
    let seed_def = registry.find_seed("test-seed").expect("seed exists");
    world.seed_def.set(seed_def.clone());
}

#[given("malformed JSON")]
fn malformed_json(world: &World) {
    world.json_input.set("not valid json".to_owned());
}

#[given("registry JSON with empty seeds array")]
fn registry_json_with_empty_seeds_array(world: &World) {
    world
        .json_input
        .set(r#"{"version": 1, "seeds": []}"#.to_owned());
}

#[given("registry JSON with a vote percentage of {percent:u32}")]
fn registry_json_with_vote_percentage(world: &World, percent: u32) {
    let json = format!(
        r#"{{"version": 1, "seeds": [{{"name": "loud", "seed": 1, "userCount": 2, "votePercent": {percent}}}]}}"#
    );
    world.json_input.set(json);
}

// When steps

#[when("the registry is parsed")]
fn the_registry_is_parsed(world: &World) {
    let json = world.json_input.get().expect("JSON input should be set");
    world.registry_result.set(SeedRegistry::from_json(&json));
}

#[when("the community is generated")]
fn the_community_is_generated(world: &World) {
    let community = generate_example_community(&world.seed_def()).expect("generation succeeds");
    world.community.set(community);
}

#[when("the community is generated twice")]
fn the_community_is_generated_twice(world: &World) {
    let seed_def = world.seed_def();
    let first = generate_example_community(&seed_def).expect("first generation");
    let second = generate_example_community(&seed_def).expect("second generation");
    world.community.set(first);
    world.second_community.set(second);
}

// Then steps

#[then("parsing succeeds")]
fn parsing_succeeds(world: &World) {
    let result = world.registry_result();
    assert!(result.is_ok(), "Expected parsing to succeed: {result:?}");
}

#[then("the registry contains the expected seed definitions")]
fn the_registry_contains_the_expected_seed_definitions(world: &World) {
    let registry = world.registry();
    assert_eq!(registry.seeds().len(), 1);
    let seed = registry.find_seed("test-seed").expect("seed should exist");
    assert_eq!(seed.seed(), 42);
    assert_eq!(seed.user_count(), 6);
    assert_eq!(seed.posts_per_user(), 3);
    assert_eq!(seed.comments_per_post(), 2);
    assert_eq!(seed.vote_percent(), 60);
}

#[then("both generations produce identical communities")]
fn both_generations_produce_identical_communities(world: &World) {
    let second = world
        .second_community
        .get()
        .expect("second generation should be set");
    assert_eq!(world.community(), second, "generation should be deterministic");
}

#[then("all usernames satisfy backend constraints")]
fn all_usernames_satisfy_backend_constraints(world: &World) {
    for user in world.community().users {
        assert!(
            is_valid_username(&user.username),
            "invalid username: {}",
            user.username
        );
    }
}

#[then("exactly {count:usize} generated user is a superuser")]
fn generated_superusers(world: &World, count: usize) {
    let superusers = world
        .community()
        .users
        .iter()
        .filter(|user| user.role == RoleSeed::Superuser)
        .count();
    assert_eq!(superusers, count);
}

#[then("each author wrote {per_author:usize} posts")]
fn posts_per_author(world: &World, per_author: usize) {
    let community = world.community();
    let mut counts: HashMap<_, usize> = HashMap::new();
    for post in &community.posts {
        *counts.entry(post.author_id).or_default() += 1;
    }
    assert_eq!(counts.len(), community.users.len());
    assert!(counts.values().all(|count| *count == per_author));
}

#[then("every counter matches the vote ledger")]
fn every_counter_matches_the_vote_ledger(world: &World) {
    let community = world.community();
    let mut tallies: HashMap<VoteTargetSeed, (u32, u32)> = HashMap::new();
    for vote in &community.votes {
        let entry = tallies.entry(vote.target).or_default();
        match vote.direction {
            VoteDirectionSeed::Up => entry.0 += 1,
            VoteDirectionSeed::Down => entry.1 += 1,
        }
    }
    for (index, post) in community.posts.iter().enumerate() {
        let expected = tallies
            .get(&VoteTargetSeed::Post(index))
            .copied()
            .unwrap_or_default();
        assert_eq!((post.up_votes, post.down_votes), expected, "post {index}");
    }
    for (index, comment) in community.comments.iter().enumerate() {
        let expected = tallies
            .get(&VoteTargetSeed::Comment(index))
            .copied()
            .unwrap_or_default();
        assert_eq!(
            (comment.up_votes, comment.down_votes),
            expected,
            "comment {index}"
        );
    }
}

#[then("parsing fails with a parse error")]
fn parsing_fails_with_a_parse_error(world: &World) {
    match world.registry_result() {
        Err(RegistryError::ParseError { .. }) => {}
        other => panic!("Expected ParseError, got: {other:?}"),
    }
}

#[then("parsing fails with empty seeds error")]
fn parsing_fails_with_empty_seeds_error(world: &World) {
    match world.registry_result() {
        Err(RegistryError::EmptySeeds) => {}
        other => panic!("Expected EmptySeeds, got: {other:?}"),
    }
}

#[then("parsing fails with invalid vote percentage error")]
fn parsing_fails_with_invalid_vote_percentage_error(world: &World) {
    match world.registry_result() {
        Err(RegistryError::InvalidVotePercent { .. }) => {}
        other => panic!("Expected InvalidVotePercent, got: {other:?}"),
    }
}

// Scenario bindings

#[scenario(
    path = "tests/features/example_data.feature",
    name = "Valid registry parses successfully"
)]
fn valid_registry_parses_successfully(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/example_data.feature",
    name = "Deterministic generation produces identical communities"
)]
fn deterministic_generation_produces_identical_communities(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/example_data.feature",
    name = "Generated usernames are valid"
)]
fn generated_usernames_are_valid(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/example_data.feature",
    name = "Vote counters agree with the ledger"
)]
fn vote_counters_agree_with_the_ledger(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/example_data.feature",
    name = "Invalid JSON fails parsing"
)]
fn invalid_json_fails_parsing(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/example_data.feature",
    name = "Empty seeds array fails parsing"
)]
fn empty_seeds_array_fails_parsing(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/example_data.feature",
    name = "Vote percentage above one hundred fails parsing"
)]
fn vote_percentage_above_one_hundred_fails_parsing(world: World) {
    let _ = world;
}
