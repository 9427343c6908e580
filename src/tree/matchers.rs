//! Node predicates and navigation helpers

use super::DocNode;
use scraper::Node;

/// Returns true if the node is an element with the given tag name
pub fn is_tag(node: &DocNode<'_>, tag: &str) -> bool {
    node.value()
        .as_element()
        .map(|el| el.name().eq_ignore_ascii_case(tag))
        .unwrap_or(false)
}

/// Returns true if the node is an element carrying the attribute `name`
pub fn has_attr(node: &DocNode<'_>, name: &str) -> bool {
    attr(node, name).is_some()
}

/// Returns true if the node is a text node whose trimmed content equals `text`
pub fn is_text(node: &DocNode<'_>, text: &str) -> bool {
    match node.value() {
        Node::Text(t) => t.trim() == text,
        _ => false,
    }
}

/// Returns the value of an element attribute
pub fn attr<'a>(node: &DocNode<'a>, name: &str) -> Option<&'a str> {
    node.value().as_element().and_then(|el| el.attr(name))
}

/// Returns the parent node, if any
pub fn parent<'a>(node: &DocNode<'a>) -> Option<DocNode<'a>> {
    node.parent()
}

/// Returns the first child that is an element or non-blank text
///
/// Indentation and comments before the content are skipped.
pub fn first_content_child<'a>(node: &DocNode<'a>) -> Option<DocNode<'a>> {
    node.children().find(|child| match child.value() {
        Node::Text(t) => !t.trim().is_empty(),
        Node::Element(_) => true,
        _ => false,
    })
}

/// Returns the next sibling that is an element
///
/// Whitespace and comments between elements are skipped.
pub fn next_element_sibling<'a>(node: &DocNode<'a>) -> Option<DocNode<'a>> {
    node.next_siblings().find(|sibling| sibling.value().is_element())
}

/// Returns the concatenated text of a node and its descendants
pub fn text_content(node: &DocNode<'_>) -> String {
    node.descendants()
        .filter_map(|n| match n.value() {
            Node::Text(t) => Some(&**t),
            _ => None,
        })
        .collect()
}
