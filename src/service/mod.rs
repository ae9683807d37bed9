pub mod aggregation;
pub mod cache;
pub mod cache_keys;
pub mod classifier;
pub mod decomposer;
pub mod evidence;
pub mod extractor;
pub mod factcheck;
pub mod guardrails;
pub mod oracle;
pub mod reliability;
pub mod search;
pub mod verification;

#[cfg(test)]
pub mod testing;

pub use cache::{MemoryCacheStore, RedisCacheStore, VerificationCache};
pub use factcheck::GoogleFactCheckClient;
pub use oracle::OpenAiOracle;
pub use search::BraveSearchClient;
pub use verification::{VerificationError, VerificationService};
