pub mod machine;
pub mod runtime;
pub mod spaces;
pub mod storage;
pub mod value;

pub use machine::Machine;
pub use runtime::{Exit, Runtime};
pub use spaces::{Spaces, PORT_INDEX, QUEUE_INDEX, SPACE_COUNT};
pub use storage::{BinaryOp, Storage, StorageKind};
pub use value::Value;
