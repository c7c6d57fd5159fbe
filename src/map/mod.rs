pub mod builder;
pub mod direction;
pub mod graph;
pub mod parser;
