//! Rendering module
//!
//! The scene renderer draws through the [`DrawSurface`] trait; [`MeshSurface`]
//! is the built-in backend that tessellates into vertex triangles.

pub mod mesh;
pub mod scene;
pub mod shapes;
pub mod surface;
pub mod vertex;

pub use mesh::{BitmapQuad, MeshSurface, TextLabel};
pub use scene::{overlay_message, render};
pub use surface::{BitmapId, Color, DrawSurface, TileArt};
pub use vertex::Vertex;
