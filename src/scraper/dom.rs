//! Element-level navigation over the parsed page.
//!
//! The documentation is flat: headings, paragraphs and line breaks are all
//! siblings under one container. Everything the extractor does is "step to
//! the next element sibling and look at it", so the helpers here only ever
//! hand back an `Option`, and running off the end of the sibling list is
//! something the caller has to deal with.

use ego_tree::NodeRef;
use scraper::{ElementRef, Node};

/// The next sibling that is an element, skipping text and comments.
pub fn next_element<'a>(element: ElementRef<'a>) -> Option<ElementRef<'a>> {
    let node: NodeRef<'a, Node> = *element;
    node.next_siblings().find_map(ElementRef::wrap)
}

/// Element children only.
pub fn child_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

pub fn first_child_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    child_elements(element).next()
}

pub fn tag_name<'a>(element: &ElementRef<'a>) -> &'a str {
    element.value().name()
}

pub fn is_tag(element: &ElementRef<'_>, tag: &str) -> bool {
    tag_name(element) == tag
}

pub fn has_class(element: &ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

pub fn text_of(element: &ElementRef<'_>) -> String {
    element.text().collect()
}

/// Every descendant `tag` element whose id is `id`.
pub fn elements_with_id<'a>(root: ElementRef<'a>, tag: &str, id: &str) -> Vec<ElementRef<'a>> {
    root.descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| is_tag(el, tag) && el.value().id() == Some(id))
        .collect()
}

/// First descendant (not including `root` itself) matching `predicate`.
pub fn find_descendant<'a>(
    root: ElementRef<'a>,
    predicate: impl Fn(&ElementRef<'a>) -> bool,
) -> Option<ElementRef<'a>> {
    root.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|el| predicate(el))
}

/// Text of `element` up to, but not including, its first child `stop_tag`.
pub fn text_before_child(element: ElementRef<'_>, stop_tag: &str) -> String {
    let mut text = String::new();
    for child in element.children() {
        match child.value() {
            Node::Text(t) => text.push_str(t),
            Node::Element(el) if el.name() == stop_tag => break,
            Node::Element(_) => {
                if let Some(el) = ElementRef::wrap(child) {
                    text.extend(el.text());
                }
            }
            _ => {}
        }
    }
    text
}
