//! Minimal HTML tree produced by the renderers.
//!
//! Renderers build [`Node`] values rather than strings so the page renderer
//! can wrap and annotate blocks, and tests can inspect structure. All text and
//! attribute values are escaped on serialization.

use std::fmt::Write;

const VOID_TAGS: [&str; 6] = ["br", "hr", "img", "meta", "link", "source"];

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Fragment(Vec<Node>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: &'static str,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Element {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Sets an attribute, replacing an existing value.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn attr_if(self, condition: bool, name: impl Into<String>, value: impl Into<String>) -> Self {
        if condition {
            self.attr(name, value)
        } else {
            self
        }
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    /// Appends class names to the `class` attribute.
    pub fn class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn add_class(&mut self, class: &str) {
        let class = class.trim();
        if class.is_empty() {
            return;
        }
        let merged = match self.get_attr("class") {
            Some(existing) if !existing.is_empty() => format!("{} {}", existing, class),
            _ => class.to_string(),
        };
        self.set_attr("class", merged);
    }

    /// Appends declarations to the inline `style` attribute.
    pub fn add_style(&mut self, declarations: &str) {
        let declarations = declarations.trim().trim_end_matches(';');
        if declarations.is_empty() {
            return;
        }
        let merged = match self.get_attr("style") {
            Some(existing) if !existing.is_empty() => {
                format!("{}; {}", existing.trim_end_matches(';'), declarations)
            }
            _ => declarations.to_string(),
        };
        self.set_attr("style", merged);
    }

    pub fn style(mut self, declarations: &str) -> Self {
        self.add_style(declarations);
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I, N>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .map(|c| c.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    fn is_void(&self) -> bool {
        VOID_TAGS.contains(&self.tag)
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Depth-first search, including this node.
    pub fn find<P>(&self, predicate: P) -> Option<&Element>
    where
        P: Fn(&Element) -> bool + Copy,
    {
        match self {
            Node::Element(el) => {
                if predicate(el) {
                    return Some(el);
                }
                el.children.iter().find_map(|c| c.find(predicate))
            }
            Node::Fragment(nodes) => nodes.iter().find_map(|c| c.find(predicate)),
            Node::Text(_) => None,
        }
    }

    pub fn find_all<P>(&self, predicate: P) -> Vec<&Element>
    where
        P: Fn(&Element) -> bool + Copy,
    {
        let mut found = Vec::new();
        self.collect(predicate, &mut found);
        found
    }

    fn collect<'a, P>(&'a self, predicate: P, found: &mut Vec<&'a Element>)
    where
        P: Fn(&Element) -> bool + Copy,
    {
        match self {
            Node::Element(el) => {
                if predicate(el) {
                    found.push(el);
                }
                for child in &el.children {
                    child.collect(predicate, found);
                }
            }
            Node::Fragment(nodes) => {
                for child in nodes {
                    child.collect(predicate, found);
                }
            }
            Node::Text(_) => {}
        }
    }

    pub fn find_tag(&self, tag: &str) -> Option<&Element> {
        self.find(|el| el.tag == tag)
    }

    /// Concatenated text of this subtree, unescaped.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    fn push_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => el.children.iter().for_each(|c| c.push_text(out)),
            Node::Fragment(nodes) => nodes.iter().for_each(|c| c.push_text(out)),
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    pub fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(&html_escape::encode_text(text)),
            Node::Fragment(nodes) => nodes.iter().for_each(|n| n.write_html(out)),
            Node::Element(el) => {
                out.push('<');
                out.push_str(el.tag);
                for (name, value) in &el.attrs {
                    let _ = write!(
                        out,
                        " {}=\"{}\"",
                        name,
                        html_escape::encode_double_quoted_attribute(value)
                    );
                }
                out.push('>');
                if el.is_void() {
                    return;
                }
                for child in &el.children {
                    child.write_html(out);
                }
                let _ = write!(out, "</{}>", el.tag);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_escapes_text_and_attributes() {
        let node: Node = Element::new("p")
            .attr("title", "say \"hi\"")
            .text("<script>alert(1)</script> & more")
            .into();

        assert_eq!(
            node.to_html(),
            "<p title=\"say &quot;hi&quot;\">&lt;script&gt;alert(1)&lt;/script&gt; &amp; more</p>"
        );
    }

    #[test]
    fn test_void_elements_have_no_closing_tag() {
        let node: Node = Element::new("div")
            .child(Element::new("img").attr("src", "/a.png"))
            .child(Element::new("br"))
            .into();
        assert_eq!(node.to_html(), "<div><img src=\"/a.png\"><br></div>");
    }

    #[test]
    fn test_class_and_style_merge() {
        let mut el = Element::new("div").class("a").class("b ");
        el.add_style("color: red;");
        el.add_style("margin: 0");
        assert_eq!(el.get_attr("class"), Some("a b"));
        assert_eq!(el.get_attr("style"), Some("color: red; margin: 0"));
        assert!(el.has_class("b"));
        assert!(!el.has_class("c"));
    }

    #[test]
    fn test_find_and_text_content() {
        let node = Node::Fragment(vec![
            Element::new("section")
                .child(Element::new("h3").text("Title"))
                .child(Element::new("p").text("Body"))
                .into(),
            Node::text("!"),
        ]);

        assert_eq!(node.find_tag("h3").map(|el| el.tag), Some("h3"));
        assert!(node.find_tag("h1").is_none());
        assert_eq!(node.text_content(), "TitleBody!");
        assert_eq!(node.find_all(|el| el.tag != "section").len(), 2);
    }
}
