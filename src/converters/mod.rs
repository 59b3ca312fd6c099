pub mod cascade;
pub mod color;
pub mod constants;
pub mod css;
pub mod document;
pub mod fitting;
pub mod typography;
pub mod variables;
