pub mod cache_policy;
pub mod context;
pub mod generators;
pub mod ranking;
pub mod recommendations;

pub use generators::{BaselineScoring, CandidateGenerators, CategoryMappings, ScoringPolicy};
pub use recommendations::RecommendationService;
