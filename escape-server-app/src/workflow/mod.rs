use thiserror::Error;

use crate::domain::{
    RepoCreateError, RepoError, RepoRetrieveError, RepoUpdateError, UserId, game::Game,
};

pub mod game;
pub mod notify;
pub mod recommendation;
pub mod review;
pub mod room;
pub mod user;

#[cfg(test)]
mod scenarios;
#[cfg(test)]
pub(crate) mod testing;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resource {
    Room,
    User,
    Game,
    Review,
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resource::Room => write!(f, "room"),
            Resource::User => write!(f, "user"),
            Resource::Game => write!(f, "game"),
            Resource::Review => write!(f, "review"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConflictKind {
    GameExists,
    ReviewExists,
    EmailTaken,
}

impl std::fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictKind::GameExists => write!(f, "room already played by this user"),
            ConflictKind::ReviewExists => write!(f, "room already reviewed by this user"),
            ConflictKind::EmailTaken => write!(f, "email already registered"),
        }
    }
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("{0} not found")]
    NotFound(Resource),
    #[error("conflict: {0}")]
    Conflict(ConflictKind),
    #[error("{0} belongs to another user")]
    Forbidden(Resource),
    #[error("invalid payload: {0}")]
    Validation(String),
    #[error("storage failure: {0}")]
    Storage(String),
}

fn storage_failure(e: String) -> WorkflowError {
    log::error!("Storage failure: {}", e);
    WorkflowError::Storage(e)
}

impl WorkflowError {
    pub fn retrieve(resource: Resource) -> impl FnOnce(RepoRetrieveError) -> WorkflowError {
        move |e| match e {
            RepoRetrieveError::NotFound => WorkflowError::NotFound(resource),
            RepoRetrieveError::StorageError(e) => storage_failure(e),
        }
    }

    pub fn update(resource: Resource) -> impl FnOnce(RepoUpdateError) -> WorkflowError {
        move |e| match e {
            RepoUpdateError::NotFound => WorkflowError::NotFound(resource),
            RepoUpdateError::StorageError(e) => storage_failure(e),
        }
    }

    pub fn create(conflict: ConflictKind) -> impl FnOnce(RepoCreateError) -> WorkflowError {
        move |e| match e {
            RepoCreateError::Conflict => WorkflowError::Conflict(conflict),
            RepoCreateError::StorageError(e) => storage_failure(e),
        }
    }
}

impl From<RepoError> for WorkflowError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::StorageError(e) => storage_failure(e),
        }
    }
}

impl From<validator::ValidationErrors> for WorkflowError {
    fn from(e: validator::ValidationErrors) -> Self {
        WorkflowError::Validation(e.to_string())
    }
}

pub(crate) fn require_actor(actor: Option<UserId>) -> Result<UserId, WorkflowError> {
    actor.ok_or(WorkflowError::Unauthenticated)
}

/// Reviews are owned through their game, so both resources share this check.
pub(crate) fn ensure_owner(
    game: &Game,
    actor: UserId,
    resource: Resource,
) -> Result<(), WorkflowError> {
    if game.user_id != actor {
        return Err(WorkflowError::Forbidden(resource));
    }
    Ok(())
}
