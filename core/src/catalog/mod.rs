pub mod circuit;
pub mod table;

pub use circuit::CircuitIdentity;
pub use table::{Catalog, CIRCUITS};
