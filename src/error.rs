use std::path::PathBuf;

use thiserror::Error;

/// A volatile-content marker was not where the sanitizer expects it.
#[derive(Debug, Error)]
pub enum SanitizeError {
    #[error("sanitizer stage '{stage}' could not find marker {marker:?}; the page layout has changed")]
    MissingMarker {
        stage: &'static str,
        marker: &'static str,
    },
}

/// The documentation page no longer has the shape the extractor walks.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("could not find the table of contents anchor #{anchor}")]
    MissingTableOfContents { anchor: &'static str },

    #[error("table of contents entry #{index} is malformed: {reason}")]
    MalformedTocEntry { index: usize, reason: String },

    #[error("category '{category}': no description follows the <h2> heading")]
    MissingCategoryDescription { category: String },

    #[error("category '{category}' appears twice in the table of contents")]
    DuplicateCategory { category: String },

    #[error("expected exactly one <{tag}> heading for '{link}', found {found}")]
    HeadingCount {
        tag: &'static str,
        link: String,
        found: usize,
    },

    #[error("category '{category}': endpoint link #{index} is malformed: {reason}")]
    MalformedEndpointLink {
        category: String,
        index: usize,
        reason: String,
    },

    #[error("category '{category}': endpoint '{endpoint}' is listed twice")]
    DuplicateEndpoint { category: String, endpoint: String },

    #[error("endpoint '{endpoint}': {expected} not found before {stopped_at}")]
    MissingBoundary {
        endpoint: String,
        expected: &'static str,
        stopped_at: String,
    },

    #[error("endpoint '{endpoint}': parameter block has no Required/Optional marker: {html}")]
    MissingRequirednessMarker { endpoint: String, html: String },

    #[error("endpoint '{endpoint}': parameter block has no <code> name: {html}")]
    MissingParameterName { endpoint: String, html: String },

    #[error("endpoint '{endpoint}': first parameter is '{found}' (required: {required}), expected the required 'function' parameter")]
    UnexpectedFunctionParameter {
        endpoint: String,
        found: String,
        required: bool,
    },

    #[error("endpoint '{endpoint}': no function code in {description:?}")]
    MissingFunctionCode { endpoint: String, description: String },
}

/// Rendering, normalizing or persisting the generated artifact failed.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("generated code is not valid Rust: {0}")]
    InvalidSyntax(#[from] syn::Error),

    #[error("endpoints '{first}' and '{second}' both generate the identifier {ident}")]
    IdentifierCollision {
        ident: String,
        first: String,
        second: String,
    },

    #[error("categories '{first}' and '{second}' both generate the module {module}")]
    ModuleCollision {
        module: String,
        first: String,
        second: String,
    },

    #[error("endpoint '{endpoint}': parameters '{first}' and '{second}' both generate the field {field}")]
    FieldCollision {
        endpoint: String,
        field: String,
        first: String,
        second: String,
    },

    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ApiGenError {
    #[error("failed to fetch documentation from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error(transparent)]
    Sanitize(#[from] SanitizeError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = ApiGenError> = std::result::Result<T, E>;
