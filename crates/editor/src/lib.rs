// Library crate: the headless edit-session core, its JSON command protocol and
// the test harness. Hosts (the CLI binary, the wasm binding) drive it through
// `SceneEditor`.

pub mod animation;
pub mod clock;
pub mod command;
pub mod entity;
pub mod fixtures;
pub mod harness;
pub mod persistence;
pub mod placement;
pub mod shortcuts;
pub mod state;
pub mod transform;
pub mod validation;
pub mod viewport;

pub use entity::{Entity, Highlight, VisualState};
pub use state::{EditorObserver, SceneEditor};
