//! Category row and the usage-count view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{CategoryId, OwnerId};

/// One row in the categories collection.
///
/// `name` is intended unique per owner (not globally). Tasks reference a
/// category purely by name equality within the same owner scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub owner: OwnerId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Category plus the number of tasks currently labeled with it.
///
/// Read-only view produced by the usage counter from a single snapshot of
/// both collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryUsage {
    #[serde(flatten)]
    pub category: Category,
    pub task_count: usize,
}

impl CategoryUsage {
    pub fn name(&self) -> &str {
        &self.category.name
    }
}
