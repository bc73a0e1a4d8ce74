//! Community members, their roles, and the authenticated actor.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by the user constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// The identifier was empty.
    EmptyId,
    /// The identifier was not a UUID.
    InvalidId,
    /// The username was empty once trimmed.
    EmptyUsername,
    /// The username was shorter than [`USERNAME_MIN`].
    UsernameTooShort {
        /// Minimum length.
        min: usize,
    },
    /// The username was longer than [`USERNAME_MAX`].
    UsernameTooLong {
        /// Maximum length.
        max: usize,
    },
    /// The username contained characters outside `[A-Za-z0-9_]`.
    UsernameInvalidCharacters,
    /// The role token was not recognised.
    UnknownRole(String),
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooShort { min } => {
                write!(f, "username must be at least {min} characters")
            }
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::UsernameInvalidCharacters => write!(
                f,
                "username may only contain letters, numbers, or underscores",
            ),
            Self::UnknownRole(role) => write!(f, "unknown role: {role}"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
///
/// The original string form is kept so display and session storage never
/// re-format the identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wrap an already parsed UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Minimum allowed length for a username.
pub const USERNAME_MIN: usize = 3;
/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 32;

/// Unique handle shown next to a member's posts and comments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    ///
    /// # Examples
    /// ```
    /// use social_backend::domain::Username;
    ///
    /// assert!(Username::new("ada_lovelace").is_ok());
    /// assert!(Username::new("ab").is_err());
    /// ```
    pub fn new(username: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(username.into())
    }

    fn from_owned(username: String) -> Result<Self, UserValidationError> {
        if username.trim().is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }

        let length = username.chars().count();
        if length < USERNAME_MIN {
            return Err(UserValidationError::UsernameTooShort { min: USERNAME_MIN });
        }
        if length > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }

        Ok(Self(username))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Account role.
///
/// Only [`Role::Superuser`] may delete content written by someone else.
/// [`Role::Admin`] carries no mutation privileges beyond a regular member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Ordinary member.
    #[default]
    Regular,
    /// Staff account without moderation rights over content.
    Admin,
    /// Moderator allowed to delete any post or comment.
    Superuser,
}

impl Role {
    /// Storage and wire token for the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Admin => "admin",
            Self::Superuser => "superuser",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "regular" => Ok(Self::Regular),
            "admin" => Ok(Self::Admin),
            "superuser" => Ok(Self::Superuser),
            other => Err(UserValidationError::UnknownRole(other.to_owned())),
        }
    }
}

/// The authenticated caller of a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Caller's identifier.
    pub id: UserId,
    /// Caller's role.
    pub role: Role,
}

impl Actor {
    /// Build an actor from its parts.
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    /// Whether the actor may moderate other members' content.
    pub fn is_superuser(&self) -> bool {
        self.role == Role::Superuser
    }
}

/// Application user.
///
/// ## Invariants
/// - `id` is a valid UUID.
/// - `username` satisfies the [`Username`] rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: Username,
    role: Role,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Build a new [`User`] from validated components, stamped at `now`.
    pub fn new(id: UserId, username: Username, role: Role, now: DateTime<Utc>) -> Self {
        Self {
            id,
            username,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    /// Override the stored timestamps, used when rehydrating from storage.
    #[must_use]
    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    /// Fallible constructor from raw strings.
    pub fn try_from_strings(
        id: impl AsRef<str>,
        username: impl Into<String>,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<Self, UserValidationError> {
        Ok(Self::new(UserId::new(id)?, Username::new(username)?, role, now))
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Unique handle.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Account role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Creation instant.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last modification instant.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// The actor this user acts as once authenticated.
    pub fn as_actor(&self) -> Actor {
        Actor::new(self.id.clone(), self.role)
    }
}
