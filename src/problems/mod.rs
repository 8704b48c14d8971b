// src/problems/mod.rs

//! The demonstration problems.

pub mod coloring;
pub mod isbn;
pub mod random;

pub use coloring::GraphColoring;
pub use isbn::IsbnSearch;
pub use random::{random_bit, random_number};
