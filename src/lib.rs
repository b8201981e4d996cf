//! Order classes so that every class comes after the classes it depends on,
//! while keeping the original order wherever the dependencies allow it.

pub mod classes;
pub mod components;
pub mod cycles;
pub mod declaration;
mod error;
pub mod graph;
pub mod sort;

pub use self::{
    components::{ComponentId, Components},
    cycles::{find_cycles, Cycle},
    declaration::{ClassDir, DeclarationSource, MemorySource},
    error::Error,
    graph::ClassGraph,
    sort::sort,
};

pub type Result<T> = std::result::Result<T, Error>;
