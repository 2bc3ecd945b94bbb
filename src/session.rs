/// Assistant contract, requests and replies.
pub mod assistant;
/// Stage gate and conversation log.
pub mod controller;
/// Canvas, gate and assistant tied together.
pub mod drawing;
/// Localized prompts and fallback messages.
pub mod messages;
/// Non-blocking assistant dispatch.
pub mod worker;
