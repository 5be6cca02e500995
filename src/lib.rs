// Library exports for the Tron search engine
// The match runner and the experiment tool both build on these modules

pub mod actions;
pub mod arena;
pub mod config;
pub mod evaluation;
pub mod search;
pub mod simple_profiler;
pub mod state;
pub mod territory;
pub mod types;
