// ── Domain model ──

pub mod device;
pub mod values;

pub use device::Device;
pub use values::{Color, Direction, Program, Speed};
