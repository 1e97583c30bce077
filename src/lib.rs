pub mod config;
pub mod errors;
pub mod metrics;
pub mod results;
pub mod search;

pub use config::SearchConfig;
pub use errors::{SearchError, SearchResult};
pub use results::{Algorithm, SearchResult as SearchOutput};
pub use search::aho_corasick::{AhoCorasick, AhoCorasickBuilder};
pub use search::boyer_moore::BoyerMooreSearcher;
pub use search::kmp::KmpSearcher;
