use serde::{Deserialize, Serialize};

/// Name of the parameter that selects the API function.
pub const FUNCTION_PARAM: &str = "function";
/// Name of the parameter carrying the caller's API key.
pub const APIKEY_PARAM: &str = "apikey";

/// When, and against which canonical page, a generation run succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRecord {
    pub accessed_at: chrono::DateTime<chrono::Utc>,
    pub digest: [u8; 32],
}

impl AccessRecord {
    pub fn new(digest: [u8; 32]) -> Self {
        Self {
            accessed_at: chrono::Utc::now(),
            digest,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub link_name: String,
    pub readable_name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub link_name: String,
    pub readable_name: String,
    pub description: String,
    pub function_code: String,
    pub premium: bool,
    pub parameters: Vec<Parameter>,
}

impl Endpoint {
    /// Parameters a caller supplies, in documentation order. The function
    /// selector and the API key are filled in by the client.
    pub fn arguments(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters
            .iter()
            .filter(|param| !param.is_selector())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub required: bool,
    pub name: String,
    pub description: String,
}

impl Parameter {
    pub fn is_selector(&self) -> bool {
        self.name == FUNCTION_PARAM || self.name == APIKEY_PARAM
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub category: Category,
    pub endpoints: Vec<Endpoint>,
}

/// Categories with their endpoints, in the order they were extracted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointCatalog {
    entries: Vec<CategoryEntry>,
}

impl EndpointCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a category. Returns the rejected category back if its link name
    /// is already present.
    pub fn insert(&mut self, category: Category, endpoints: Vec<Endpoint>) -> Result<(), Category> {
        if self.get(&category.link_name).is_some() {
            return Err(category);
        }
        self.entries.push(CategoryEntry { category, endpoints });
        Ok(())
    }

    pub fn get(&self, link_name: &str) -> Option<&CategoryEntry> {
        self.entries
            .iter()
            .find(|entry| entry.category.link_name == link_name)
    }

    pub fn entries(&self) -> &[CategoryEntry] {
        &self.entries
    }

    /// Entries ordered by category link name, independent of page order.
    pub fn sorted(&self) -> Vec<&CategoryEntry> {
        let mut sorted: Vec<&CategoryEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| a.category.link_name.cmp(&b.category.link_name));
        sorted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn endpoint_count(&self) -> usize {
        self.entries.iter().map(|entry| entry.endpoints.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(link_name: &str) -> Category {
        Category {
            link_name: link_name.to_string(),
            readable_name: link_name.to_uppercase(),
            description: String::new(),
        }
    }

    fn param(name: &str, required: bool) -> Parameter {
        Parameter {
            required,
            name: name.to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn sorted_orders_by_link_name() {
        let mut catalog = EndpointCatalog::new();
        catalog.insert(category("zeta"), vec![]).unwrap();
        catalog.insert(category("alpha"), vec![]).unwrap();
        catalog.insert(category("mid"), vec![]).unwrap();

        let names: Vec<&str> = catalog
            .sorted()
            .iter()
            .map(|entry| entry.category.link_name.as_str())
            .collect();
        assert_eq!(names, ["alpha", "mid", "zeta"]);

        // insertion order is kept for the raw entries
        assert_eq!(catalog.entries()[0].category.link_name, "zeta");
    }

    #[test]
    fn insert_rejects_duplicate_category() {
        let mut catalog = EndpointCatalog::new();
        catalog.insert(category("fx"), vec![]).unwrap();
        let rejected = catalog.insert(category("fx"), vec![]).unwrap_err();
        assert_eq!(rejected.link_name, "fx");
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn arguments_skip_function_and_apikey() {
        let endpoint = Endpoint {
            link_name: "intraday".to_string(),
            readable_name: "Intraday".to_string(),
            description: String::new(),
            function_code: "TIME_SERIES_INTRADAY".to_string(),
            premium: false,
            parameters: vec![
                param("function", true),
                param("symbol", true),
                param("adjusted", false),
                param("apikey", true),
            ],
        };

        let names: Vec<&str> = endpoint.arguments().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["symbol", "adjusted"]);
    }
}
