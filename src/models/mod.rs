pub mod task;
pub mod user;

pub use task::{CategoryUpdate, TaskInput};
pub use user::{UserExists, UserInput};
