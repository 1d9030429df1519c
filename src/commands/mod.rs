pub mod json;
pub mod new;
pub mod render;
