//! Service error taxonomy shared by query and mutation services.

use crate::model::collection::{CollectionId, CollectionRef, Membership};
use crate::model::company::CompanyId;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Caller-facing failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    /// Deployment/configuration defect rather than a bad request.
    PreconditionFailed,
    InvalidInput,
    Internal,
}

impl ErrorKind {
    pub fn status_code(self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::PreconditionFailed => 412,
            Self::InvalidInput => 400,
            Self::Internal => 500,
        }
    }
}

#[derive(Debug)]
pub enum ServiceError {
    CollectionNotFound(CollectionRef),
    CompanyNotFound(CompanyId),
    MembershipNotFound(Membership),
    DuplicateMembership(Membership),
    /// Collection exists but has no members (unpaged listing only).
    CollectionEmpty(CollectionId),
    /// The reserved liked collection could not be resolved.
    MissingDefaultCollection(String),
    InvalidPage(String),
    Repo(RepoError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CollectionNotFound(_)
            | Self::CompanyNotFound(_)
            | Self::MembershipNotFound(_)
            | Self::CollectionEmpty(_) => ErrorKind::NotFound,
            Self::DuplicateMembership(_) => ErrorKind::Conflict,
            Self::MissingDefaultCollection(_) => ErrorKind::PreconditionFailed,
            Self::InvalidPage(_) => ErrorKind::InvalidInput,
            Self::Repo(_) => ErrorKind::Internal,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CollectionNotFound(reference) => {
                write!(f, "target collection not found ({reference})")
            }
            Self::CompanyNotFound(id) => write!(f, "company not found: {id}"),
            Self::MembershipNotFound(membership) => write!(
                f,
                "company {} is not in collection {}",
                membership.company_id, membership.collection_id
            ),
            Self::DuplicateMembership(membership) => write!(
                f,
                "company {} already in collection {}",
                membership.company_id, membership.collection_id
            ),
            Self::CollectionEmpty(id) => write!(f, "no companies found for collection {id}"),
            Self::MissingDefaultCollection(name) => {
                write!(f, "reserved collection `{name}` is missing")
            }
            Self::InvalidPage(message) => write!(f, "invalid page request: {message}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::CollectionNotFound(id) => Self::CollectionNotFound(CollectionRef::Id(id)),
            RepoError::CompanyNotFound(id) => Self::CompanyNotFound(id),
            RepoError::MembershipNotFound(membership) => Self::MembershipNotFound(membership),
            RepoError::DuplicateMembership(membership) => Self::DuplicateMembership(membership),
            other => Self::Repo(other),
        }
    }
}
