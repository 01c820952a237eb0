//! Templates for the generated bindings.
//!
//! The rendered text does not need to be pretty, only syntactically valid:
//! it goes through `syn` and `prettyplease` before it is written.

use tera::Tera;

use crate::error::GenerateError;

pub const HEADER: &str = "header";
pub const CATEGORY: &str = "category";
pub const ENDPOINT: &str = "endpoint";

const HEADER_TEMPLATE: &str = r#"//! Alpha Vantage API bindings.
//!
//! Generated from <{{ documentation_url }}>, retrieved {{ accessed_at }}.
//! {{ category_count }} categories, {{ endpoint_count }} endpoints.

/// Ordered `(name, value)` query pairs for one request. The client appends
/// the `apikey` parameter.
pub type Query = Vec<(&'static str, String)>;
"#;

const CATEGORY_TEMPLATE: &str = r#"
pub mod {{ module }} {
    //! {{ readable_name }}
{% if description_lines %}    //!
{% for line in description_lines %}    //! {{ line }}
{% endfor %}{% endif %}
{% if has_endpoints %}    use super::Query;
{% endif %}
{{ endpoints }}
}
"#;

const ENDPOINT_TEMPLATE: &str = r#"
{% for line in doc_lines %}/// {{ line }}
{% endfor %}#[derive(Debug, Clone, PartialEq, Eq)]
pub struct {{ ident }} {
{% for arg in arguments %}{% for line in arg.doc %}    /// {{ line }}
{% endfor %}    pub {{ arg.field }}: {% if arg.required %}String{% else %}Option<String>{% endif %},
{% endfor %}}

impl {{ ident }} {
    pub const FUNCTION: &'static str = {{ function_literal }};

    pub fn new({% for arg in arguments %}{% if arg.required %}{{ arg.field }}: impl Into<String>, {% endif %}{% endfor %}) -> Self {
        Self {
{% for arg in arguments %}            {{ arg.field }}: {% if arg.required %}{{ arg.field }}.into(){% else %}None{% endif %},
{% endfor %}        }
    }
{% for arg in arguments %}{% if not arg.required %}
    pub fn {{ arg.setter }}(mut self, value: impl Into<String>) -> Self {
        self.{{ arg.field }} = Some(value.into());
        self
    }
{% endif %}{% endfor %}
    pub fn query(&self) -> Query {
        let {% if arguments %}mut {% endif %}query: Query = vec![("function", Self::FUNCTION.to_string())];
{% for arg in arguments %}{% if arg.required %}        query.push(({{ arg.name_literal }}, self.{{ arg.field }}.clone()));
{% else %}        if let Some(value) = &self.{{ arg.field }} {
            query.push(({{ arg.name_literal }}, value.clone()));
        }
{% endif %}{% endfor %}        query
    }
}
"#;

/// Builds the template registry. Autoescaping is off: the output is Rust.
pub fn templates() -> Result<Tera, GenerateError> {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    tera.add_raw_templates(vec![
        (HEADER, HEADER_TEMPLATE),
        (CATEGORY, CATEGORY_TEMPLATE),
        (ENDPOINT, ENDPOINT_TEMPLATE),
    ])?;
    Ok(tera)
}
