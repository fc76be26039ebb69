pub mod color;
pub mod picking;
