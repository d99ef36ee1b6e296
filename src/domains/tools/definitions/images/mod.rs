pub mod convert_webp;

pub use convert_webp::{ConvertWebpParams, ConvertWebpTool};
