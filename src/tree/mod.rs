//! Depth-first search over parsed HTML documents
//!
//! Both searches walk the tree in document order (pre-order) and never
//! mutate it. Extractors and image discovery go through these functions and
//! the helpers in [`matchers`] instead of touching tree internals.

pub mod matchers;

use ego_tree::NodeRef;
use scraper::{Html, Node};

pub use matchers::{
    attr, first_content_child, has_attr, is_tag, is_text, next_element_sibling, parent,
    text_content,
};

/// A handle to one node of a parsed document
pub type DocNode<'a> = NodeRef<'a, Node>;

/// Returns the document node at the top of a parsed tree
pub fn document_root(html: &Html) -> DocNode<'_> {
    html.tree.root()
}

/// Returns the first node, in document order, that satisfies `predicate`
///
/// The search includes `root` itself.
pub fn find_first<'a, P>(root: DocNode<'a>, mut predicate: P) -> Option<DocNode<'a>>
where
    P: FnMut(&DocNode<'a>) -> bool,
{
    root.descendants().find(|node| predicate(node))
}

/// Yields every element below `root` whose tag name matches `tag`
///
/// `root` itself is never yielded. The iterator is lazy; call again for a
/// fresh pass.
pub fn find_all<'a>(root: DocNode<'a>, tag: &str) -> impl Iterator<Item = DocNode<'a>> {
    let tag = tag.to_ascii_lowercase();
    root.descendants()
        .skip(1)
        .filter(move |node| is_tag(node, &tag))
}
