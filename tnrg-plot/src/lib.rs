//! Figures of scaling dimensions against their best-known values.
//!
//! [`Figure`] lays the data out (positions, emphasis, reference lines,
//! annotations) without touching any GUI code, and [`PlotApp`] renders a
//! figure in an egui window.

mod app;
mod figure;

pub use app::PlotApp;
pub use eframe::Error as WindowError;
pub use figure::{
    Annotation, Emphasis, Figure, Marker, Panel, ReferenceLine, StepErrors, relative_error,
};
