mod clock;
pub mod directory;
mod snapshot;
mod store;

pub use directory::{Directory, LoadError};
pub use snapshot::Snapshot;
pub use store::{CustomerRemoval, Store};
