//! Lexical and semantic resume scoring

pub mod line_scorer;
pub mod scanner;
pub mod semantic;

pub use line_scorer::{LineScore, LineScorer};
pub use scanner::{scan_resume, ScanOutcome, SectionBonus};
pub use semantic::{cosine_similarity, SemanticMatcher};
