pub mod history;
pub mod registry;
pub mod scene;
pub mod selection;
pub mod settings;

pub use history::{HistoryManager, SceneSnapshot};
pub use registry::ObjectRegistry;
pub use scene::{AddOutcome, EditorObserver, SceneEditor};
pub use selection::{SelectionChange, SelectionManager, SelectionPhase};
pub use settings::EditorSettings;
