pub mod providers;
pub mod loader;
pub mod sources;

pub use providers::*;
pub use loader::*;
pub use sources::*;
