pub mod engine;
pub mod recorder;
pub mod state;

pub use engine::WebAgent;
pub use recorder::RunRecorder;
pub use state::{Step, TaskResult};
