pub mod claims;
pub mod config;
pub mod evidence;
pub mod extraction;
pub mod verdict;
pub mod verification;

pub use claims::*;
pub use config::{Config, PipelineConfig, SourceFilterConfig};
pub use evidence::*;
pub use verdict::*;
pub use verification::*;
