use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};
use tracing::{debug, info, warn};

use super::dom::{
    child_elements, elements_with_id, find_descendant, first_child_element, has_class, is_tag,
    next_element, tag_name, text_before_child, text_of,
};
use crate::error::ExtractError;
use crate::models::{APIKEY_PARAM, Category, Endpoint, EndpointCatalog, FUNCTION_PARAM, Parameter};

/// Id of the element the category list items follow.
pub const TOC_ANCHOR: &str = "table-of-contents";

/// The quote endpoint's function parameter never names its function code.
pub const FUNCTION_CODE_FALLBACK_LINK: &str = "latestprice";
pub const FUNCTION_CODE_FALLBACK: &str = "GLOBAL_QUOTE";

const PREMIUM_CLASS: &str = "premium-label";

static FUNCTION_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<code>\s*function=([A-Za-z0-9_]+)").expect("function code pattern is valid")
});

/// Parses canonical page bytes and extracts the endpoint catalog.
pub fn extract_from_bytes(canonical: &[u8]) -> Result<EndpointCatalog, ExtractError> {
    let document = Html::parse_document(&String::from_utf8_lossy(canonical));
    extract(&document)
}

pub fn extract(document: &Html) -> Result<EndpointCatalog, ExtractError> {
    let root = document.root_element();
    let toc = find_descendant(root, |el| el.value().id() == Some(TOC_ANCHOR))
        .ok_or(ExtractError::MissingTableOfContents { anchor: TOC_ANCHOR })?;

    let mut catalog = EndpointCatalog::new();

    let mut cursor = next_element(toc);
    let mut index = 0;
    while let Some(category_li) = cursor {
        let category = read_category(root, category_li, index)?;
        let endpoints = read_category_endpoints(root, category_li, &category.link_name)?;

        info!(
            category = %category.link_name,
            endpoints = endpoints.len(),
            "Category done: {}",
            category.readable_name
        );

        catalog
            .insert(category, endpoints)
            .map_err(|dup| ExtractError::DuplicateCategory {
                category: dup.link_name,
            })?;

        cursor = next_element(category_li);
        index += 1;
    }

    Ok(catalog)
}

// <li><a href="#time-series-data">Core Stock APIs</a><ul>...</ul></li>
fn read_category(
    root: ElementRef<'_>,
    category_li: ElementRef<'_>,
    index: usize,
) -> Result<Category, ExtractError> {
    let malformed = |reason: String| ExtractError::MalformedTocEntry { index, reason };

    let link = first_child_element(category_li)
        .ok_or_else(|| malformed("no child element".to_string()))?;
    if !is_tag(&link, "a") {
        return Err(malformed(format!("first child is <{}>, not <a>", tag_name(&link))));
    }
    let href = link
        .value()
        .attr("href")
        .ok_or_else(|| malformed("link has no href".to_string()))?;
    let link_name = anchor_id(href).ok_or_else(|| malformed(format!("href {href:?} is not an anchor")))?;

    let heading = unique_heading(root, "h2", link_name)?;
    let readable_name = text_of(&heading).trim().to_string();
    let description = next_element(heading)
        .map(|p| text_of(&p).trim().to_string())
        .ok_or_else(|| ExtractError::MissingCategoryDescription {
            category: link_name.to_string(),
        })?;

    Ok(Category {
        link_name: link_name.to_string(),
        readable_name,
        description,
    })
}

fn read_category_endpoints(
    root: ElementRef<'_>,
    category_li: ElementRef<'_>,
    category: &str,
) -> Result<Vec<Endpoint>, ExtractError> {
    let links = child_elements(category_li)
        .filter(|el| is_tag(el, "ul"))
        .flat_map(|ul| child_elements(ul))
        .filter(|el| is_tag(el, "li"))
        .flat_map(|li| child_elements(li))
        .filter(|el| is_tag(el, "a"));

    let mut endpoints: Vec<Endpoint> = Vec::new();
    for (index, link) in links.enumerate() {
        // <a href="#fx-intraday">Intraday <span class="premium-label">Premium</span></a>
        let link_name = link
            .value()
            .attr("href")
            .and_then(anchor_id)
            .ok_or_else(|| ExtractError::MalformedEndpointLink {
                category: category.to_string(),
                index,
                reason: format!("missing or empty anchor in {:?}", link.html()),
            })?;

        if endpoints.iter().any(|e| e.link_name == link_name) {
            return Err(ExtractError::DuplicateEndpoint {
                category: category.to_string(),
                endpoint: link_name.to_string(),
            });
        }

        let endpoint = read_endpoint(root, link_name)?;
        debug!(
            category,
            endpoint = %endpoint.link_name,
            function = %endpoint.function_code,
            params = endpoint.parameters.len(),
            "Endpoint extracted"
        );
        endpoints.push(endpoint);
    }

    Ok(endpoints)
}

// <h4 id="company-overview">Company Overview</h4>
// <p>This API returns the company information ...</p>
// <br>
// <h6><b>API Parameters</b></h6>
// <p><b>❚ Required: <code>function</code></b></p>
// <p>The function of your choice. In this case, <code>function=OVERVIEW</code></p>
// <p><b>❚ Required: <code>symbol</code></b></p>
// <p>The symbol of the token of your choice. For example: <code>symbol=IBM</code>.</p>
// <p><b>❚ Required: <code>apikey</code></b></p>
// <p>Your API key. ...</p>
// <br>
fn read_endpoint(root: ElementRef<'_>, link_name: &str) -> Result<Endpoint, ExtractError> {
    let heading = unique_heading(root, "h4", link_name)?;

    let premium = find_descendant(heading, |el| has_class(el, PREMIUM_CLASS)).is_some();
    let readable_name = text_before_child(heading, "span").trim().to_string();

    let (description, params_heading) = read_description(heading, link_name)?;

    let function_block = next_element(params_heading).ok_or_else(|| ExtractError::MissingBoundary {
        endpoint: link_name.to_string(),
        expected: "function parameter",
        stopped_at: "end of document".to_string(),
    })?;
    let function_param = read_parameter(function_block, link_name)?;
    if function_param.name != FUNCTION_PARAM || !function_param.required {
        return Err(ExtractError::UnexpectedFunctionParameter {
            endpoint: link_name.to_string(),
            found: function_param.name,
            required: function_param.required,
        });
    }
    let function_code = function_code(&function_param.description, link_name)?;

    let mut parameters = vec![function_param];
    let mut cursor = next_element(function_block);
    loop {
        let block = seek_parameter(cursor, link_name)?;
        let param = read_parameter(block, link_name)?;
        let is_last = param.name == APIKEY_PARAM;
        parameters.push(param);
        if is_last {
            break;
        }
        cursor = next_element(block);
    }

    Ok(Endpoint {
        link_name: link_name.to_string(),
        readable_name,
        description,
        function_code,
        premium,
        parameters,
    })
}

/// Joins the paragraphs between the endpoint heading and the parameter
/// sub-heading. Returns the sub-heading so parameter parsing can start there.
fn read_description<'a>(
    heading: ElementRef<'a>,
    link_name: &str,
) -> Result<(String, ElementRef<'a>), ExtractError> {
    let mut paragraphs = Vec::new();
    let mut cursor = next_element(heading);
    while let Some(el) = cursor {
        if is_tag(&el, "h6") {
            return Ok((paragraphs.join("\n").trim().to_string(), el));
        }
        if is_section_heading(&el) {
            return Err(missing_boundary(link_name, "parameter sub-heading <h6>", Some(el)));
        }
        if is_tag(&el, "p") {
            paragraphs.push(el.inner_html());
        }
        cursor = next_element(el);
    }
    Err(missing_boundary(link_name, "parameter sub-heading <h6>", None))
}

/// Steps forward until an element announces a Required or Optional parameter.
fn seek_parameter<'a>(
    mut cursor: Option<ElementRef<'a>>,
    link_name: &str,
) -> Result<ElementRef<'a>, ExtractError> {
    while let Some(el) = cursor {
        if is_section_heading(&el) {
            return Err(missing_boundary(link_name, "apikey parameter", Some(el)));
        }
        if mentions_requiredness(&text_of(&el)) {
            return Ok(el);
        }
        cursor = next_element(el);
    }
    Err(missing_boundary(link_name, "apikey parameter", None))
}

// <p><b>❚ Required: <code>from_symbol</code></b></p>
// <p>DESCRIPTION</p>
//
// or, with the <b> missing:
//
// <p>❚ Optional: <code>datatype</code></p>
// <p>DESCRIPTION</p>
fn read_parameter(block: ElementRef<'_>, link_name: &str) -> Result<Parameter, ExtractError> {
    let html = block.inner_html();
    let required = if html.contains("Required") {
        true
    } else if html.contains("Optional") {
        false
    } else {
        return Err(ExtractError::MissingRequirednessMarker {
            endpoint: link_name.to_string(),
            html,
        });
    };

    let name = find_descendant(block, |el| is_tag(el, "code"))
        .map(|code| text_of(&code).trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ExtractError::MissingParameterName {
            endpoint: link_name.to_string(),
            html: html.clone(),
        })?;

    let mut parts = Vec::new();
    let mut cursor = next_element(block);
    loop {
        let Some(el) = cursor else {
            return Err(missing_boundary(link_name, "end of parameter description", None));
        };
        if is_tag(&el, "br") || mentions_requiredness(&text_of(&el)) {
            break;
        }
        if is_section_heading(&el) {
            return Err(missing_boundary(link_name, "end of parameter description", Some(el)));
        }
        parts.push(el.inner_html());
        cursor = next_element(el);
    }

    Ok(Parameter {
        required,
        name,
        description: parts.join("\n").trim().to_string(),
    })
}

fn function_code(description: &str, link_name: &str) -> Result<String, ExtractError> {
    if let Some(caps) = FUNCTION_CODE.captures(description) {
        return Ok(caps[1].to_string());
    }
    if link_name == FUNCTION_CODE_FALLBACK_LINK {
        warn!(
            endpoint = link_name,
            fallback = FUNCTION_CODE_FALLBACK,
            "No function code in documentation, using fallback"
        );
        return Ok(FUNCTION_CODE_FALLBACK.to_string());
    }
    Err(ExtractError::MissingFunctionCode {
        endpoint: link_name.to_string(),
        description: description.to_string(),
    })
}

fn unique_heading<'a>(
    root: ElementRef<'a>,
    tag: &'static str,
    link_name: &str,
) -> Result<ElementRef<'a>, ExtractError> {
    let mut found = elements_with_id(root, tag, link_name);
    if found.len() != 1 {
        return Err(ExtractError::HeadingCount {
            tag,
            link: link_name.to_string(),
            found: found.len(),
        });
    }
    Ok(found.remove(0))
}

fn anchor_id(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

fn mentions_requiredness(text: &str) -> bool {
    text.contains("Required") || text.contains("Optional")
}

fn is_section_heading(el: &ElementRef<'_>) -> bool {
    matches!(tag_name(el), "h1" | "h2" | "h3" | "h4")
}

fn missing_boundary(link_name: &str, expected: &'static str, stopped_at: Option<ElementRef<'_>>) -> ExtractError {
    let stopped_at = match stopped_at {
        Some(el) => match el.value().id() {
            Some(id) => format!("<{} id=\"{id}\">", tag_name(&el)),
            None => format!("<{}>", tag_name(&el)),
        },
        None => "end of document".to_string(),
    };
    ExtractError::MissingBoundary {
        endpoint: link_name.to_string(),
        expected,
        stopped_at,
    }
}
