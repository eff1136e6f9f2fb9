//! Project metadata returned by `GET /project/{id}`.
//!
//! The board only consumes [`Project::owner_id`] (task creation is
//! restricted to the owner); the rest is carried for display.

use serde::{Deserialize, Serialize};

/// Owner summary embedded in a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectOwner {
    /// Owner's email address.
    pub email: String,
}

/// A user invited to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// User identifier.
    pub id: String,
    /// User email.
    pub email: String,
    /// Whether the invite has been accepted.
    #[serde(default)]
    pub is_member: bool,
}

/// A project as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Project identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Identifier of the owning user.
    pub owner_id: String,
    /// Owner summary, absent on some backend versions.
    #[serde(default)]
    pub owner: Option<ProjectOwner>,
    /// Invited members.
    #[serde(default)]
    pub members: Vec<Member>,
}
