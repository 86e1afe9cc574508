pub mod project;
pub mod task;
pub mod user;

pub use project::{Project, ProjectInput};
pub use task::{Task, TaskInput, TaskPriority, TaskStatus};
pub use user::{NewUser, Role, User};
