/// The canvas engine.
pub mod engine;
/// Engine configuration.
pub mod opts;
