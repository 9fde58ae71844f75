pub mod derived;
pub mod params;
pub mod side;

pub use derived::*;
pub use params::*;
pub use side::*;
