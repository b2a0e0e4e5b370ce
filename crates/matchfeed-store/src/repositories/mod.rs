//! Stateless repositories — every method takes `&Connection`.

mod game;
mod snapshot;
mod window;

pub use game::GameRepo;
pub use snapshot::SnapshotRepo;
pub use window::WindowRepo;
