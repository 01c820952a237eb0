use std::collections::HashMap;

use serde::Serialize;
use tera::{Context, Tera};
use tracing::{debug, info};

use super::naming::{field_ident, optional_field_ident, snake_case, type_ident};
use super::output::{finalize, normalize};
use super::templates::{self, CATEGORY, ENDPOINT, HEADER};
use crate::config::GeneratorConfig;
use crate::error::GenerateError;
use crate::models::{AccessRecord, CategoryEntry, Endpoint, EndpointCatalog, Parameter};

/// Listed under two categories on the documentation page; emitted once.
pub const DUPLICATE_ENDPOINT_LINK: &str = "market-status";
/// Category the duplicate endpoint is emitted under when it is listed there.
pub const DUPLICATE_PRIMARY_CATEGORY: &str = "time-series-data";

#[derive(Debug, Serialize)]
struct HeaderView {
    documentation_url: String,
    accessed_at: String,
    category_count: usize,
    endpoint_count: usize,
}

#[derive(Debug, Serialize)]
struct CategoryView {
    module: String,
    readable_name: String,
    description_lines: Vec<String>,
    has_endpoints: bool,
    endpoints: String,
}

#[derive(Debug, Serialize)]
struct EndpointView {
    ident: String,
    function_literal: String,
    doc_lines: Vec<String>,
    arguments: Vec<ArgumentView>,
}

#[derive(Debug, Serialize)]
struct ArgumentView {
    name_literal: String,
    field: String,
    setter: String,
    required: bool,
    doc: Vec<String>,
}

/// Renders an [`EndpointCatalog`] into the source text of the bindings.
pub struct CodeGenerator<'a> {
    config: &'a GeneratorConfig,
    tera: Tera,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Result<Self, GenerateError> {
        Ok(Self {
            config,
            tera: templates::templates()?,
        })
    }

    /// Full artifact text: formatted bindings followed by the checksum footer.
    pub fn generate(
        &self,
        catalog: &EndpointCatalog,
        record: &AccessRecord,
    ) -> Result<String, GenerateError> {
        let body = self.render(catalog, record)?;
        let formatted = normalize(&body)?;
        let text = finalize(&formatted, &record.digest)?;
        info!(
            categories = catalog.len(),
            endpoints = catalog.endpoint_count(),
            bytes = text.len(),
            "Generated bindings"
        );
        Ok(text)
    }

    /// Unformatted template output, categories sorted by link name.
    pub fn render(
        &self,
        catalog: &EndpointCatalog,
        record: &AccessRecord,
    ) -> Result<String, GenerateError> {
        let sorted = catalog.sorted();
        let duplicate_home = duplicate_home(&sorted);

        let mut out = self.tera.render(
            HEADER,
            &Context::from_serialize(HeaderView {
                documentation_url: self.config.documentation_url.clone(),
                accessed_at: record.accessed_at.to_rfc3339(),
                category_count: catalog.len(),
                endpoint_count: catalog.endpoint_count(),
            })?,
        )?;

        let mut seen_modules: HashMap<String, String> = HashMap::new();
        for entry in sorted {
            let module = field_ident(&entry.category.link_name);
            if let Some(first) =
                seen_modules.insert(module.clone(), entry.category.link_name.clone())
            {
                return Err(GenerateError::ModuleCollision {
                    module,
                    first,
                    second: entry.category.link_name.clone(),
                });
            }

            // each category is its own module, so struct names only clash within one
            let mut seen_idents: HashMap<String, String> = HashMap::new();
            let mut endpoints = String::new();
            let mut emitted = 0;
            for endpoint in &entry.endpoints {
                if endpoint.link_name == DUPLICATE_ENDPOINT_LINK
                    && duplicate_home != Some(entry.category.link_name.as_str())
                {
                    debug!(
                        endpoint = %endpoint.link_name,
                        category = %entry.category.link_name,
                        "Skipping duplicate endpoint"
                    );
                    continue;
                }

                let ident = type_ident(&endpoint.function_code);
                if let Some(first) = seen_idents.insert(ident.clone(), endpoint.link_name.clone()) {
                    return Err(GenerateError::IdentifierCollision {
                        ident,
                        first,
                        second: endpoint.link_name.clone(),
                    });
                }

                endpoints.push_str(&self.render_endpoint(endpoint, ident)?);
                emitted += 1;
            }

            let view = CategoryView {
                module,
                readable_name: collapse_whitespace(&entry.category.readable_name),
                description_lines: self.wrap(&entry.category.description),
                has_endpoints: emitted > 0,
                endpoints,
            };
            out.push_str(&self.tera.render(CATEGORY, &Context::from_serialize(view)?)?);
        }

        Ok(out)
    }

    fn render_endpoint(&self, endpoint: &Endpoint, ident: String) -> Result<String, GenerateError> {
        let mut arguments: Vec<ArgumentView> = Vec::new();
        let mut seen_fields: HashMap<String, &str> = HashMap::new();
        for param in endpoint.arguments() {
            let arg = self.argument(param);
            if let Some(first) = seen_fields.insert(arg.field.clone(), &param.name) {
                return Err(GenerateError::FieldCollision {
                    endpoint: endpoint.link_name.clone(),
                    field: arg.field,
                    first: first.to_string(),
                    second: param.name.clone(),
                });
            }
            arguments.push(arg);
        }

        let mut doc_lines = Vec::new();
        if endpoint.premium {
            doc_lines.push("**Premium**".to_string());
            doc_lines.push(String::new());
        }
        doc_lines.push(collapse_whitespace(&endpoint.readable_name));
        let description = self.wrap(&endpoint.description);
        if !description.is_empty() {
            doc_lines.push(String::new());
            doc_lines.extend(description);
        }
        doc_lines.push(String::new());
        doc_lines.push(format!("<{}>", self.config.anchor_url(&endpoint.link_name)));
        if !arguments.is_empty() {
            doc_lines.push(String::new());
            for arg in &arguments {
                let marker = if arg.required { "required" } else { "optional" };
                doc_lines.push(format!("* `{}` ({marker})", arg.field));
            }
        }

        let view = EndpointView {
            ident,
            function_literal: format!("{:?}", endpoint.function_code),
            doc_lines,
            arguments,
        };
        Ok(self.tera.render(ENDPOINT, &Context::from_serialize(view)?)?)
    }

    fn argument(&self, param: &Parameter) -> ArgumentView {
        let field = if param.required {
            field_ident(&param.name)
        } else {
            optional_field_ident(&param.name)
        };
        ArgumentView {
            name_literal: format!("{:?}", param.name),
            field,
            setter: format!("with_{}", snake_case(&param.name)),
            required: param.required,
            doc: self.wrap(&param.description),
        }
    }

    fn wrap(&self, text: &str) -> Vec<String> {
        let collapsed = collapse_whitespace(text);
        if collapsed.is_empty() {
            return Vec::new();
        }
        textwrap::wrap(&collapsed, self.config.wrap_width)
            .into_iter()
            .map(|line| line.into_owned())
            .collect()
    }
}

/// Category the known duplicate endpoint is emitted under.
fn duplicate_home<'c>(sorted: &[&'c CategoryEntry]) -> Option<&'c str> {
    let lists_duplicate = |entry: &&CategoryEntry| {
        entry
            .endpoints
            .iter()
            .any(|e| e.link_name == DUPLICATE_ENDPOINT_LINK)
    };
    sorted
        .iter()
        .copied()
        .filter(lists_duplicate)
        .find(|entry| entry.category.link_name == DUPLICATE_PRIMARY_CATEGORY)
        .or_else(|| sorted.iter().copied().find(lists_duplicate))
        .map(|entry| entry.category.link_name.as_str())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
