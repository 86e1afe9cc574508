//! Ownership-based access control.
//!
//! A caller may act on a resource when they own it or hold the admin role. Projects carry
//! their owner directly; tasks have no owner of their own and are resolved through their
//! parent project (task → project → owner). Listing applies the same rule as a filter over
//! the caller's owned project ids.

use std::collections::HashSet;

use uuid::Uuid;

use crate::auth::identity::Identity;
use crate::error::AppError;
use crate::models::{Project, Task};

/// Outcome of a single authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Turns a denial into the one client-visible outcome it is allowed to have: 403.
    pub fn require(self) -> Result<(), AppError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny => Err(AppError::Forbidden("Forbidden".into())),
        }
    }
}

/// Allow iff the caller is an admin or is the owner.
pub fn authorize(identity: &Identity, owner_id: Uuid) -> Decision {
    if identity.is_admin() || identity.id == owner_id {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

pub fn authorize_project(identity: &Identity, project: &Project) -> Decision {
    authorize(identity, project.owner_id)
}

/// Decides access to `task` through its parent project.
///
/// `parent` must be the project the task belongs to; anything else is denied. A task whose
/// parent cannot be found has no resolvable owner, so only admins pass.
pub fn authorize_task(identity: &Identity, task: &Task, parent: Option<&Project>) -> Decision {
    match parent {
        Some(project) if project.id == task.project_id => authorize_project(identity, project),
        Some(_) => Decision::Deny,
        None if identity.is_admin() => Decision::Allow,
        None => Decision::Deny,
    }
}

/// Filters `tasks` down to the ones `identity` may see.
///
/// Admins see everything. Everyone else sees the tasks whose project is in the set of
/// projects they own, which yields exactly the tasks `authorize_task` would allow.
pub fn visible_tasks(identity: &Identity, tasks: Vec<Task>, owned_projects: &[Project]) -> Vec<Task> {
    if identity.is_admin() {
        return tasks;
    }

    let owned: HashSet<Uuid> = owned_projects
        .iter()
        .filter(|project| project.owner_id == identity.id)
        .map(|project| project.id)
        .collect();

    tasks
        .into_iter()
        .filter(|task| owned.contains(&task.project_id))
        .collect()
}
