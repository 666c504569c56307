pub mod interaction;
pub mod panels;
pub mod session;
pub mod settings;
pub mod viewport;

pub use interaction::InteractionState;
pub use panels::{PanelConfig, PanelEdge, PanelId, PanelState, ViewportPanelManager};
pub use session::GraphSession;
pub use settings::{GraphDisplaySettings, SettingsError, WorkbenchSettings};
pub use viewport::Viewport;
