//! Serde models for the decoded layout document (inputs) and the resolved styles (outputs).

pub mod colors;
pub mod document;
pub mod effective;
pub mod frame;
pub mod styles;
pub mod variables;
