pub mod content;

pub use content::{classify_image_content, Verdict};
