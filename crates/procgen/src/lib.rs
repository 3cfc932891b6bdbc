//! Procedural generation of the ambient instance tables (stars, rain, steam, dust).

pub mod ambient;

pub use ambient::*;
