// src/collect/providers/mod.rs
pub mod arxiv;
pub mod github;
pub mod hacker_news;
pub mod stub;

pub use arxiv::ArxivSource;
pub use github::GithubTrendingSource;
pub use hacker_news::HackerNewsSource;
pub use stub::PlaceholderFeed;
