pub mod mock_kernel;
pub mod primitives;
pub mod tessellation;
pub mod traits;
pub mod truck_kernel;
pub mod types;
pub mod workplane;

pub use mock_kernel::MockKernel;
pub use traits::*;
pub use truck_kernel::TruckKernel;
pub use types::*;
pub use workplane::{cut_blind, FaceSelector, Workplane, CUT_OVERSHOOT};
