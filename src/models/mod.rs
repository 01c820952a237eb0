pub mod api_docs;

pub use api_docs::*;
