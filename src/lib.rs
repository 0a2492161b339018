pub mod analysis;
pub mod cli;
pub mod error;
pub mod files;
pub mod git;
pub mod model;
pub mod report;
