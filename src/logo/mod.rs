//! Logo selection and rendering
//!
//! The catalog is embedded at build time and parsed once into a
//! [`LogoRegistry`]. Callers own the registry and pass it where it's needed.

pub mod palette;
pub mod registry;

pub use palette::ColorPalette;
pub use registry::{LogoEntry, LogoRegistry};

/// The built-in logo catalog
pub const CATALOG: &str = include_str!("catalog.sh");
