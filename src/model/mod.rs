pub mod alert;
pub mod common;
pub mod detection;

pub use alert::Alert;
pub use common::{GeoPoint, Severity};
pub use detection::Detection;
