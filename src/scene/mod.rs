pub mod builder;
pub mod camera;
pub mod pick;
pub mod render;

pub use builder::CellEntity;
pub use camera::{Camera, Orientation};
