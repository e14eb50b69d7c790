// Plan commands
pub mod install;
pub mod purge;

// Configuration inspection
pub mod config;
