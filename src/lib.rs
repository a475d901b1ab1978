pub mod combinatorics;
pub mod config;
pub mod error;
pub mod lineup;
pub mod network;
pub mod optimizer;
pub mod progress;
pub mod simulation;
pub mod stats;
