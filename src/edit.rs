/// Brush settings and recent colors.
pub mod brush;
/// Edit-log undo/redo.
pub mod history;
/// Pointer events and display/document mapping.
pub mod input;
/// Freehand strokes.
pub mod stroke;
/// Text annotations.
pub mod text;
/// Tool state machine.
pub mod tools;
