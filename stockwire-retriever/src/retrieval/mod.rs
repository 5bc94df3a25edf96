pub mod chunking_strategy;
pub mod document;
pub mod indexer;
pub mod news_index;
pub mod retriever;
