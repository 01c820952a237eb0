pub mod naming;
pub mod output;
pub mod render;
pub mod templates;

pub use output::{finalize, normalize, write_atomic};
pub use render::CodeGenerator;
