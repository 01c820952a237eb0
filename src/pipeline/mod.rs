pub mod doc_pipeline;

pub use doc_pipeline::{DocPipeline, Outcome};
