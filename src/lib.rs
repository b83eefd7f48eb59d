pub mod adapter;
pub mod config;
pub mod data;
pub mod diagnostics;
pub mod estimate;
pub mod feed;
pub mod logging;
pub mod merge;
pub mod modal;
pub mod pipeline;
pub mod pivot;
pub mod query;
pub mod seed;
pub mod sort_key;
pub mod timeline;
pub mod types;
pub mod units;
