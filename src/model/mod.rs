mod edge;
mod node;
mod persona;
mod rule;

pub use edge::*;
pub use node::*;
pub use persona::*;
pub use rule::*;
