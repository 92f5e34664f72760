// Library exports for gramfacet

pub mod aes;
pub mod canvas;
pub mod diagnostics;
pub mod error;
pub mod interval;
pub mod palette;
pub mod scale;
pub mod style;
pub mod ticks;
pub mod trans;

// Plot assembly and rendering
pub mod backend;
pub mod geom;
pub mod guide;
pub mod panel;
pub mod plot;
pub mod render;

// Data input
pub mod csv_reader;
pub mod partition;

pub use aes::Aes;
pub use interval::Interval;
pub use plot::Plot;
pub use scale::{Scale, ScaleType};
