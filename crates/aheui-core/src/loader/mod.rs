pub mod loader;
pub mod writer;

pub use loader::{ProgramLoader, SourceKind};
pub use writer::ProgramWriter;
