//! Export functionality for generated meshes

mod stl;

pub use stl::export_stl;
