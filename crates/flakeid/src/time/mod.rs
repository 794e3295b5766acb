mod interface;
mod mono_clock;
mod resolution;

pub use interface::*;
pub use mono_clock::*;
pub use resolution::*;
