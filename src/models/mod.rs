pub mod section;
pub mod summary_cache;

pub use section::*;
pub use summary_cache::*;
