// Benchmark runner library

pub mod models;
pub mod report;
pub mod runner;
