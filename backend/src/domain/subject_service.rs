//! Post and comment mutations behind the ownership guard.
//!
//! The service loads the subject first so the guard sees its author, then
//! delegates the write to the [`SubjectRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    COMMENT_DELETED_MESSAGE, CommentCommand, Created, Deleted, NewCommentRecord, NewPostRecord,
    POST_DELETED_MESSAGE, PostCommand, SubjectRepository, SubjectRepositoryError,
};
use crate::domain::{
    Actor, Comment, CommentId, CommentPatch, Error, NewCommentDraft, NewPostDraft, Post, PostId,
    PostPatch, SubjectRef, authorize_author, authorize_mutation,
};

/// Subject service backed by a [`SubjectRepository`].
#[derive(Clone)]
pub struct SubjectService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> SubjectService<R> {
    /// Create a new service with the given repository and clock.
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }
}

fn map_subject_error(error: SubjectRepositoryError) -> Error {
    match error {
        SubjectRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("subject repository unavailable: {message}"))
        }
        SubjectRepositoryError::Query { message } => {
            Error::internal(format!("subject repository error: {message}"))
        }
        SubjectRepositoryError::PostNotFound { post_id } => match PostId::new(post_id) {
            Ok(id) => SubjectRef::Post(id).not_found(),
            Err(_) => Error::not_found(format!("Post {post_id} not found")),
        },
    }
}

#[async_trait]
impl<R> PostCommand for SubjectService<R>
where
    R: SubjectRepository,
{
    async fn create_post(&self, actor: &Actor, draft: NewPostDraft) -> Result<Created<Post>, Error> {
        let record = NewPostRecord {
            author_id: actor.id.clone(),
            draft,
            now: self.clock.utc(),
        };
        let created = self
            .repository
            .create_post(record)
            .await
            .map_err(map_subject_error)?;
        info!(
            post_id = created.subject.id.get(),
            author = %actor.id,
            replayed = created.replayed,
            "post created"
        );
        Ok(created)
    }

    async fn update_post(
        &self,
        actor: &Actor,
        id: PostId,
        patch: PostPatch,
    ) -> Result<Option<Post>, Error> {
        let Some(existing) = self
            .repository
            .find_post(id)
            .await
            .map_err(map_subject_error)?
        else {
            return Ok(None);
        };
        authorize_author(actor, &existing.author_id)?;
        self.repository
            .update_post(id, &patch, self.clock.utc())
            .await
            .map_err(map_subject_error)
    }

    async fn delete_post(&self, actor: &Actor, id: PostId) -> Result<Option<Deleted<Post>>, Error> {
        let Some(existing) = self
            .repository
            .find_post(id)
            .await
            .map_err(map_subject_error)?
        else {
            return Ok(None);
        };
        authorize_mutation(actor, &existing.author_id)?;
        let removed = self
            .repository
            .delete_post(id)
            .await
            .map_err(map_subject_error)?;
        if removed.is_some() {
            info!(post_id = id.get(), actor = %actor.id, "post deleted");
        }
        Ok(removed.map(|subject| Deleted {
            subject,
            message: POST_DELETED_MESSAGE,
        }))
    }
}

#[async_trait]
impl<R> CommentCommand for SubjectService<R>
where
    R: SubjectRepository,
{
    async fn create_comment(
        &self,
        actor: &Actor,
        post: PostId,
        draft: NewCommentDraft,
    ) -> Result<Created<Comment>, Error> {
        let record = NewCommentRecord {
            post_id: post,
            author_id: actor.id.clone(),
            draft,
            now: self.clock.utc(),
        };
        let created = self
            .repository
            .create_comment(record)
            .await
            .map_err(map_subject_error)?;
        info!(
            comment_id = created.subject.id.get(),
            post_id = post.get(),
            replayed = created.replayed,
            "comment created"
        );
        Ok(created)
    }

    async fn update_comment(
        &self,
        actor: &Actor,
        id: CommentId,
        patch: CommentPatch,
    ) -> Result<Option<Comment>, Error> {
        let Some(existing) = self
            .repository
            .find_comment(id)
            .await
            .map_err(map_subject_error)?
        else {
            return Ok(None);
        };
        authorize_author(actor, &existing.author_id)?;
        self.repository
            .update_comment(id, &patch, self.clock.utc())
            .await
            .map_err(map_subject_error)
    }

    async fn delete_comment(
        &self,
        actor: &Actor,
        id: CommentId,
    ) -> Result<Option<Deleted<Comment>>, Error> {
        let Some(existing) = self
            .repository
            .find_comment(id)
            .await
            .map_err(map_subject_error)?
        else {
            return Ok(None);
        };
        authorize_mutation(actor, &existing.author_id)?;
        let removed = self
            .repository
            .delete_comment(id)
            .await
            .map_err(map_subject_error)?;
        Ok(removed.map(|subject| Deleted {
            subject,
            message: COMMENT_DELETED_MESSAGE,
        }))
    }
}

#[cfg(test)]
#[path = "subject_service_tests.rs"]
mod tests;
