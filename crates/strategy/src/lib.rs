pub mod cross;
pub mod indicators;

pub use cross::crossed;
pub use indicators::SmaIndicator;
