pub mod market;
pub mod matrix;
pub mod portfolio;
pub mod metrics;
pub mod errors;

pub use market::*;
pub use matrix::*;
pub use portfolio::*;
pub use metrics::*;
pub use errors::*;
