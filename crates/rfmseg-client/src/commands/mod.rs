pub mod common;
pub mod filters;
pub mod rfm;
pub mod segments;
