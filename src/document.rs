//! The co-deployed page template and its fixed element identifiers.

use html5ever::{
    parse_document, parse_fragment,
    serialize::{serialize, SerializeOpts, TraversalScope},
    tendril::{StrTendril, TendrilSink},
    QualName,
};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};
use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet, HashMap},
    io,
    rc::Rc,
};
use thiserror::Error;

pub mod ids {
    pub const CALENDAR: &str = crate::calendar::CALENDAR_ELEMENT_ID;
    pub const STAT_REPOS: &str = "stat-repos";
    pub const STAT_FOLLOWERS: &str = "stat-followers";
    pub const STAT_FOLLOWING: &str = "stat-following";
    pub const STAT_GISTS: &str = "stat-gists";
    pub const REPOS_GRID: &str = "repos-grid";
    pub const ACTIVITY_LIST: &str = "activity-list";
    pub const NAV: &str = "main-nav";
    pub const NAV_LINKS: &str = "nav-links";
    pub const NAV_TOGGLE: &str = "nav-toggle";
}

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("element `#{0}` not found in document")]
    MissingElement(String),

    #[error("failed to serialize document")]
    Serialize(#[from] io::Error),
}

#[derive(Clone, Debug)]
enum Content {
    Text(String),
    Html(String),
}

/// Page template with pending content replacements.
///
/// The template is parsed as HTML when rendered, so the output is the
/// serialized document tree rather than the template bytes.
#[derive(Clone, Debug)]
pub struct Document {
    source: String,
    patches: BTreeMap<String, Content>,
    required: BTreeSet<String>,
    trailer: Vec<String>,
}

impl Document {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            patches: BTreeMap::new(),
            required: BTreeSet::new(),
            trailer: Vec::new(),
        }
    }

    /// Makes rendering fail when the element is not in the template.
    pub fn require(&mut self, id: &str) {
        self.required.insert(id.to_owned());
    }

    /// Replaces the element's content with `text`.
    pub fn set_text(&mut self, id: &str, text: &str) {
        self.patches.insert(id.to_owned(), Content::Text(text.to_owned()));
    }

    /// Replaces the element's content with markup.
    pub fn set_inner_html(&mut self, id: &str, html: impl Into<String>) {
        self.patches.insert(id.to_owned(), Content::Html(html.into()));
    }

    /// Appends markup at the end of `<body>`.
    pub fn inject_before_body_end(&mut self, html: impl Into<String>) {
        self.trailer.push(html.into());
    }

    /// Applies the pending patches.
    ///
    /// Fails when a patched or required element is not in the template.
    /// When patched elements nest, the outer patch wins.
    pub fn render(&self) -> Result<String, DocumentError> {
        let dom = parse_document(RcDom::default(), Default::default()).one(self.source.as_str());

        let mut elements = HashMap::new();
        index_by_id(&dom.document, &mut elements);

        if let Some(id) = self.required.iter().find(|x| !elements.contains_key(x.as_str())) {
            return Err(DocumentError::MissingElement(id.clone()));
        }

        for (id, content) in &self.patches {
            let element = elements
                .get(id.as_str())
                .ok_or_else(|| DocumentError::MissingElement(id.clone()))?;
            let children = match content {
                Content::Text(text) => vec![Node::new(NodeData::Text {
                    contents: RefCell::new(StrTendril::from_slice(text)),
                })],
                Content::Html(html) => parse_children(element, html),
            };
            replace_children(element, children);
        }

        if !self.trailer.is_empty() {
            if let Some(body) = find_element(&dom.document, "body") {
                let mut children = body.children.take();
                children.extend(parse_children(&body, &self.trailer.concat()));
                replace_children(&body, children);
            }
        }

        let mut bytes = Vec::with_capacity(self.source.len());
        let document: SerializableHandle = dom.document.clone().into();
        let opts = SerializeOpts {
            traversal_scope: TraversalScope::ChildrenOnly(None),
            ..Default::default()
        };
        serialize(&mut bytes, &document, opts)?;
        let page = String::from_utf8(bytes)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        Ok(page)
    }
}

/// First element carrying each id, in document order.
fn index_by_id(handle: &Handle, index: &mut HashMap<String, Handle>) {
    if let NodeData::Element { attrs, .. } = &handle.data {
        if let Some(id) = attrs.borrow().iter().find(|x| &*x.name.local == "id") {
            index.entry(String::from(&*id.value)).or_insert_with(|| handle.clone());
        }
    }
    for child in handle.children.borrow().iter() {
        index_by_id(child, index);
    }
}

fn find_element(handle: &Handle, tag: &str) -> Option<Handle> {
    if let NodeData::Element { name, .. } = &handle.data {
        if &*name.local == tag {
            return Some(handle.clone());
        }
    }
    handle.children.borrow().iter().find_map(|x| find_element(x, tag))
}

fn element_name(handle: &Handle) -> Option<QualName> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(name.clone()),
        _ => None,
    }
}

/// Parses `html` as the content of `context`.
fn parse_children(context: &Handle, html: &str) -> Vec<Handle> {
    let Some(name) = element_name(context) else {
        return Vec::new();
    };
    let fragment = parse_fragment(RcDom::default(), Default::default(), name, Vec::new()).one(html);
    // the fragment parser wraps its output in a single root element
    let root = fragment.document.children.borrow().first().cloned();
    root.map(|x| x.children.take()).unwrap_or_default()
}

fn replace_children(parent: &Handle, children: Vec<Handle>) {
    for child in &children {
        child.parent.set(Some(Rc::downgrade(parent)));
    }
    parent.children.replace(children);
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"<html><head></head><body>
<nav id="main-nav"><div id="nav-links"><a class="nav-link" href="#home">Home</a></div></nav>
<div class="stats"><span id="stat-repos">0</span><span id='stat-followers'>-</span></div>
<div id="repos-grid"><div class="loading">Loading...</div></div>
<ul data-id="activity-list"></ul><ul id="activity-list"></ul>
</body></html>"##;

    #[test]
    fn test_set_text() {
        let mut doc = Document::new(PAGE);
        doc.set_text(ids::STAT_REPOS, "42");
        doc.set_text(ids::STAT_FOLLOWERS, "<7>");
        let out = doc.render().unwrap();
        assert!(out.contains(r#"<span id="stat-repos">42</span>"#));
        assert!(out.contains(r#"<span id="stat-followers">&lt;7&gt;</span>"#));
    }

    #[test]
    fn test_set_inner_html_replaces_nested_content() {
        let mut doc = Document::new(PAGE);
        doc.set_inner_html(ids::REPOS_GRID, "<a>card</a>");
        let out = doc.render().unwrap();
        assert!(out.contains(r#"<div id="repos-grid"><a>card</a></div>"#));
        assert!(!out.contains("Loading..."));
    }

    #[test]
    fn test_attribute_suffix_is_not_an_id() {
        let mut doc = Document::new(PAGE);
        doc.set_inner_html(ids::ACTIVITY_LIST, "<li>x</li>");
        let out = doc.render().unwrap();
        assert!(out.contains(
            r#"<ul data-id="activity-list"></ul><ul id="activity-list"><li>x</li></ul>"#
        ));
    }

    #[test]
    fn test_angle_bracket_in_attribute() {
        let mut doc = Document::new(r#"<div id="repos-grid" title="a > b">Loading</div>"#);
        doc.set_inner_html(ids::REPOS_GRID, "<a>card</a>");
        let out = doc.render().unwrap();
        assert!(out.contains(r#"<div id="repos-grid" title="a > b"><a>card</a></div>"#));
    }

    #[test]
    fn test_commented_out_element_is_skipped() {
        let mut doc = Document::new(
            r#"<body><!-- <div id="repos-grid"> --><div id="repos-grid">old</div></body>"#,
        );
        doc.set_inner_html(ids::REPOS_GRID, "new");
        let out = doc.render().unwrap();
        assert!(out.contains(r#"<!-- <div id="repos-grid"> --><div id="repos-grid">new</div>"#));
    }

    #[test]
    fn test_unclosed_element_is_closed_by_the_parser() {
        let mut doc = Document::new(r#"<div id="repos-grid"><div></div>"#);
        doc.set_inner_html(ids::REPOS_GRID, "x");
        let out = doc.render().unwrap();
        assert!(out.contains(r#"<div id="repos-grid">x</div>"#));
    }

    #[test]
    fn test_missing_element() {
        let mut doc = Document::new(PAGE);
        doc.set_text(ids::STAT_GISTS, "1");
        let err = doc.render().unwrap_err();
        assert!(matches!(&err, DocumentError::MissingElement(id) if id == "stat-gists"));
        assert_eq!(err.to_string(), "element `#stat-gists` not found in document");
    }

    #[test]
    fn test_required_element() {
        let mut doc = Document::new(PAGE);
        doc.require(ids::NAV);
        assert!(doc.render().is_ok());

        doc.require(ids::CALENDAR);
        let err = doc.render().unwrap_err();
        assert!(matches!(&err, DocumentError::MissingElement(id) if id == "github-calendar"));
    }

    #[test]
    fn test_untouched_document_renders_as_is() {
        let page = "<!DOCTYPE html><html><head><title>folio</title></head><body><p>x</p></body></html>";
        let doc = Document::new(page);
        assert_eq!(doc.render().unwrap(), page);
    }

    #[test]
    fn test_inject_before_body_end() {
        let mut doc = Document::new(PAGE);
        doc.inject_before_body_end("<script>if (a < b && c) {}</script>\n");
        let out = doc.render().unwrap();
        assert!(out.ends_with("<script>if (a < b && c) {}</script>\n</body></html>"));

        let mut doc = Document::new("<p>no body</p>");
        doc.inject_before_body_end("<script>1</script>");
        assert_eq!(
            doc.render().unwrap(),
            "<html><head></head><body><p>no body</p><script>1</script></body></html>"
        );
    }
}
