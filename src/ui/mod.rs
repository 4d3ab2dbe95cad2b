/// Rendering: side/top panels, charts and card widgets.
pub mod panels;
pub mod plot;
pub mod widgets;
