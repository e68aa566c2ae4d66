pub mod engine;
pub mod formula;
pub mod store;
pub mod types;
