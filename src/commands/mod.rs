mod discover;
mod synthesize;

pub use discover::run_discover;
pub use synthesize::run_synthesize;
