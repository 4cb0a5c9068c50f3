pub mod error;
pub mod item;
pub mod op_types;
pub mod operation;
pub mod snapshot;

pub use error::*;
pub use item::*;
pub use operation::*;
pub use snapshot::*;
