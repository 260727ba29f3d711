//! Domain model (IDs, rows, patches, errors).

pub mod category;
pub mod errors;
pub mod ids;
pub mod task;

pub use category::{Category, CategoryUsage};
pub use errors::{KadaiError, KadaiResult};
pub use ids::{CategoryId, OwnerId, TaskId};
pub use task::{Field, Priority, Task, TaskDraft, TaskPatch};
