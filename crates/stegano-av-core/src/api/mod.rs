//! Builder style API working on files, see [`hide::prepare`], [`unveil::prepare`]
//! and [`unveil_raw::prepare`].

pub mod hide;
mod shared;
pub mod unveil;
pub mod unveil_raw;

pub use shared::*;
