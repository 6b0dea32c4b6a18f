pub mod bounds;
pub mod camera;
pub mod constants;
pub mod placement;
pub mod rig;
pub mod signal;

pub use bounds::*;
pub use camera::*;
pub use constants::*;
pub use placement::*;
pub use rig::*;
pub use signal::*;
