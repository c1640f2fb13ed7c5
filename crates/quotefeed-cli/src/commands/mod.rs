pub mod collect;
pub mod symbols;
