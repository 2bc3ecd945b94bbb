/// Colors.
pub mod color;
/// Sizes, locales and geometry re-exports.
pub mod core;
/// Error taxonomy.
pub mod error;
pub(crate) mod math;
/// Non-fatal host notices.
pub mod notice;
