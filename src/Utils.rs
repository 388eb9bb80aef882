//! different utility modules used throughout the project
/// terminal and file logging set up once at start-up
pub mod logger;
