//! Ownership checks gating updates and deletions of posts and comments.

use serde_json::json;

use super::{Actor, Error, UserId};

/// Allow the subject's author or any superuser.
///
/// Deletions go through this guard.
///
/// # Examples
/// ```
/// use social_backend::domain::{Actor, Role, UserId, authorize_mutation};
///
/// let author = UserId::random();
/// let moderator = Actor::new(UserId::random(), Role::Superuser);
/// assert!(authorize_mutation(&moderator, &author).is_ok());
///
/// let stranger = Actor::new(UserId::random(), Role::Regular);
/// assert!(authorize_mutation(&stranger, &author).is_err());
/// ```
pub fn authorize_mutation(actor: &Actor, author_id: &UserId) -> Result<(), Error> {
    if actor.is_superuser() || actor.id == *author_id {
        Ok(())
    } else {
        Err(denied(actor))
    }
}

/// Allow the subject's author only. Superusers are not exempt.
///
/// Updates go through this guard.
pub fn authorize_author(actor: &Actor, author_id: &UserId) -> Result<(), Error> {
    if actor.id == *author_id {
        Ok(())
    } else {
        Err(denied(actor))
    }
}

fn denied(actor: &Actor) -> Error {
    Error::unauthorized(format!(
        "User with id {} does not have permission to this resource",
        actor.id
    ))
    .with_details(json!({ "actorId": actor.id.as_ref() }))
}
