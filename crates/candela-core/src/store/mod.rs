// ── Device registry store ──
//
// Last-known-good device list plus fetch health, each published through
// a `watch` channel so collaborators can render from snapshots or await
// changes.

mod registry;

pub use registry::{DeviceRegistry, RegistryStatus};
