mod cipher;
mod frame;
mod header;

pub use cipher::*;
pub use frame::*;
pub use header::*;
