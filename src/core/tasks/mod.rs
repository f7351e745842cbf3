pub mod handle;
pub mod manager;
pub mod types;

pub use handle::TaskHandle;
pub use manager::TaskManager;
pub use types::{
    PollEnd,
    TaskError,
    TaskResult,
};
