mod lock;
mod mutex;
mod state;

pub use lock::*;
pub(crate) use mutex::*;
pub use state::Checkpoint;
pub(crate) use state::State;
