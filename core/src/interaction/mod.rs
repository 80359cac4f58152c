pub mod controller;
pub mod event;
pub mod prompt;
pub mod state;

pub use controller::InteractionController;
pub use event::{InputEvent, Outcome, PointerButton};
pub use prompt::{FixedPrompts, Prompts};
pub use state::{AppState, VisibilityFlag, VisibilityState};
