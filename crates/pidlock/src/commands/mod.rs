pub mod demo;
pub mod hold;
