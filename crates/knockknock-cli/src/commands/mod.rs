pub mod callers;
pub mod version;
