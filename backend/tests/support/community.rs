//! An in-memory community of named members driven through the domain
//! services, for behaviour scenarios whose steps run synchronously.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use mockable::DefaultClock;
use social_backend::domain::ports::{
    CommentCommand, FeedReader, PostCommand, UserRepository, VoteCommand,
};
use social_backend::domain::{
    Actor, ClientToken, FeedService, NewCommentDraft, NewPostDraft, Role, SubjectService, User,
    UserId, Username, VoteService,
};
use social_backend::outbound::memory::InMemoryStore;
use tokio::runtime::Runtime;

/// Members, services, and the runtime that drives them.
#[derive(Clone)]
pub struct Community {
    runtime: Arc<Runtime>,
    store: Arc<InMemoryStore>,
    members: Arc<Mutex<HashMap<String, User>>>,
    tokens: Arc<Mutex<u32>>,
}

impl Community {
    pub fn new() -> Self {
        Self {
            runtime: Arc::new(Runtime::new().expect("create runtime")),
            store: Arc::new(InMemoryStore::new()),
            members: Arc::default(),
            tokens: Arc::default(),
        }
    }

    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    pub fn store(&self) -> Arc<InMemoryStore> {
        self.store.clone()
    }

    pub fn votes(&self) -> impl VoteCommand {
        VoteService::new(self.store.clone())
    }

    pub fn subjects(&self) -> impl PostCommand + CommentCommand {
        SubjectService::new(self.store.clone(), Arc::new(DefaultClock))
    }

    pub fn feed(&self) -> impl FeedReader {
        FeedService::new(self.store.clone())
    }

    /// Register `name`, or return the existing member.
    pub fn join(&self, name: &str, role: Role) -> User {
        if let Some(user) = self.members.lock().expect("members lock").get(name) {
            return user.clone();
        }
        let user = User::new(
            UserId::random(),
            Username::new(name).expect("valid username"),
            role,
            Utc::now(),
        );
        self.block_on(self.store.upsert(&user)).expect("store member");
        self.members
            .lock()
            .expect("members lock")
            .insert(name.to_owned(), user.clone());
        user
    }

    pub fn member(&self, name: &str) -> User {
        self.members
            .lock()
            .expect("members lock")
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("{name} has not joined"))
    }

    pub fn actor(&self, name: &str) -> Actor {
        self.member(name).as_actor()
    }

    fn next_token(&self) -> ClientToken {
        let mut counter = self.tokens.lock().expect("token lock");
        *counter += 1;
        ClientToken::new(format!("token-{counter}")).expect("valid token")
    }

    /// Publish a post as `author` and return its identifier.
    pub fn publish(&self, author: &str, title: &str) -> i64 {
        let actor = self.join(author, Role::Regular).as_actor();
        let draft = NewPostDraft::new(title, "Body text", self.next_token()).expect("draft");
        let created = self
            .block_on(self.subjects().create_post(&actor, draft))
            .expect("create post");
        created.subject.id.get()
    }

    /// Comment on `post` as `author` and return the comment identifier.
    pub fn comment(&self, author: &str, post: i64) -> i64 {
        let actor = self.join(author, Role::Regular).as_actor();
        let draft = NewCommentDraft::new("A reply", self.next_token()).expect("draft");
        let post = social_backend::domain::PostId::new(post).expect("post id");
        let created = self
            .block_on(self.subjects().create_comment(&actor, post, draft))
            .expect("create comment");
        created.subject.id.get()
    }
}
