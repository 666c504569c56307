pub mod connection;
pub mod export;
pub mod kinds;
pub mod layout;
pub mod model;
pub mod selection;

pub use connection::{ConnectOptions, ConnectionController, ConnectionPolicy, PendingConnection};
pub use export::{ExportError, export_csv};
pub use kinds::{Color, DoubleClickAction, KindCapabilities, NodeStyle, capabilities};
pub use layout::{
    GridLayouter, LayeredLayouter, LayoutController, LayoutParams, LayoutStrategy, Layouter,
    Orientation, PresetLayouter, RadialLayouter,
};
pub use model::GraphModel;
pub use selection::{HighlightSet, SelectionController, SelectionState};
