pub mod api;
pub mod config;
pub mod data_models;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod pipeline;
pub mod search;
pub mod summarizer;
