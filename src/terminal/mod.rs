pub mod emoji;
pub mod interactive;
mod json;
pub mod message;
pub mod styles;

pub use json::to_display_string;
