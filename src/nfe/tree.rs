use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use regex::Regex;
use std::sync::LazyLock;

use crate::core::AuditError;

/// Namespace declarations (`xmlns="…"`, `xmlns:p="…"`).
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static XMLNS_DECL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\sxmlns(:\w+)?="[^"]+""#).expect("valid regex"));

/// Deepest element nesting [`parse_tree`] accepts. NF-e documents stay
/// below 15 levels.
pub const MAX_DEPTH: usize = 1024;

/// An owned XML element.
///
/// `text` holds the character data before the first child element, the
/// same slice a DOM exposes as an element's text. Text after child
/// elements is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Tag name as written, including any prefix.
    pub name: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    /// Leading character data, `None` when the element has none.
    pub text: Option<String>,
    /// Child elements in document order.
    pub children: Vec<Element>,
}

impl Element {
    /// Tag name without namespace prefix.
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Leading text, or `""`.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Attribute value by local name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| local_name(k) == name)
            .map(|(_, v)| v.as_str())
    }

    /// Pre-order walk over this element and everything below it.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// First element strictly below this one with the given local name.
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.descendants()
            .skip(1)
            .find(|el| el.local_name() == name)
    }

    /// All elements strictly below this one with the given local name.
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.descendants()
            .skip(1)
            .filter(move |el| el.local_name() == name)
    }

    /// First direct child with the given local name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|el| el.local_name() == name)
    }
}

/// Iterator returned by [`Element::descendants`].
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<&'a Element> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Strip everything up to the last `}` or `:` from a tag name.
pub fn local_name(name: &str) -> &str {
    match name.rfind(['}', ':']) {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

/// Remove all namespace declaration attributes from raw XML text.
pub fn strip_namespaces(xml: &str) -> String {
    XMLNS_DECL.replace_all(xml, "").into_owned()
}

/// Decode raw bytes (invalid UTF-8 is replaced), drop namespace
/// declarations and parse into a tree.
pub fn parse_document(content: &[u8]) -> Result<Element, AuditError> {
    let decoded = String::from_utf8_lossy(content);
    let xml = strip_namespaces(decoded.trim_start_matches('\u{feff}'));
    parse_tree(&xml)
}

/// Parse an XML string into an owned element tree.
///
/// Fails on malformed markup, mismatched or unclosed tags, undefined
/// entities, content outside the root element, empty input, and nesting
/// deeper than [`MAX_DEPTH`].
pub fn parse_tree(xml: &str) -> Result<Element, AuditError> {
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                ensure_single_root(&root)?;
                if stack.len() >= MAX_DEPTH {
                    return Err(AuditError::Xml(format!(
                        "elements nested deeper than {MAX_DEPTH} levels"
                    )));
                }
                stack.push(open_element(e)?);
            }
            Ok(Event::Empty(ref e)) => {
                ensure_single_root(&root)?;
                let element = open_element(e)?;
                attach(&mut stack, &mut root, element);
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| AuditError::Xml("unexpected closing tag".into()))?;
                attach(&mut stack, &mut root, element);
            }
            Ok(Event::Text(ref e)) => {
                let text = e
                    .unescape()
                    .map_err(|e| AuditError::Xml(format!("invalid text: {e}")))?;
                push_text(&mut stack, &text)?;
            }
            Ok(Event::CData(e)) => {
                let raw = e.into_inner();
                push_text(&mut stack, &String::from_utf8_lossy(&raw))?;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(AuditError::Xml(format!("XML parse error: {e}")));
            }
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(AuditError::Xml(format!("unclosed element <{}>", open.name)));
    }
    root.ok_or_else(|| AuditError::Xml("document has no root element".into()))
}

fn open_element(e: &BytesStart<'_>) -> Result<Element, AuditError> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr =
            attr.map_err(|e| AuditError::Xml(format!("invalid attribute in <{name}>: {e}")))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| AuditError::Xml(format!("invalid attribute value in <{name}>: {e}")))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(Element {
        name,
        attributes,
        text: None,
        children: Vec::new(),
    })
}

fn ensure_single_root(root: &Option<Element>) -> Result<(), AuditError> {
    if root.is_some() {
        return Err(AuditError::Xml("content after the root element".into()));
    }
    Ok(())
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn push_text(stack: &mut [Element], text: &str) -> Result<(), AuditError> {
    match stack.last_mut() {
        Some(current) => {
            if current.children.is_empty() {
                current.text.get_or_insert_with(String::new).push_str(text);
            }
        }
        None if text.trim().is_empty() => {}
        None => return Err(AuditError::Xml("text outside the root element".into())),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements() {
        let root = parse_tree(r#"<a x="1"><b>one</b><c/><b>two</b></a>"#).unwrap();
        assert_eq!(root.name, "a");
        assert_eq!(root.attribute("x"), Some("1"));
        assert_eq!(root.children.len(), 3);
        assert_eq!(root.children[0].text(), "one");
        assert_eq!(root.children[1].text, None);
        assert_eq!(root.find_all("b").count(), 2);
    }

    #[test]
    fn text_is_leading_character_data_only() {
        let root = parse_tree("<a>head<b>x</b>tail</a>").unwrap();
        assert_eq!(root.text(), "head");
    }

    #[test]
    fn entities_and_cdata_are_decoded() {
        let root = parse_tree("<a><b>A &amp; B</b><c><![CDATA[1<2]]></c></a>").unwrap();
        assert_eq!(root.child("b").unwrap().text(), "A & B");
        assert_eq!(root.child("c").unwrap().text(), "1<2");
    }

    #[test]
    fn declaration_and_comments_are_ignored() {
        let root = parse_tree("<?xml version=\"1.0\"?>\n<!-- c -->\n<a>1</a>\n").unwrap();
        assert_eq!(root.text(), "1");
    }

    #[test]
    fn malformed_documents_fail() {
        assert!(parse_tree("").is_err());
        assert!(parse_tree("   ").is_err());
        assert!(parse_tree("<a><b></a>").is_err());
        assert!(parse_tree("<a>").is_err());
        assert!(parse_tree("<a/><b/>").is_err());
        assert!(parse_tree("junk<a/>").is_err());
        assert!(parse_tree("<a>&bogus;</a>").is_err());
    }

    #[test]
    fn nesting_is_capped() {
        let at_cap = format!("{}{}", "<a>".repeat(MAX_DEPTH), "</a>".repeat(MAX_DEPTH));
        assert!(parse_tree(&at_cap).is_ok());

        let n = MAX_DEPTH + 1;
        let too_deep = format!("{}{}", "<a>".repeat(n), "</a>".repeat(n));
        assert!(matches!(parse_tree(&too_deep), Err(AuditError::Xml(_))));
    }

    #[test]
    fn very_deep_nesting_fails_without_overflowing() {
        let n = 100_000;
        let xml = format!("{}{}", "<a>".repeat(n), "</a>".repeat(n));
        assert!(parse_tree(&xml).is_err());
    }

    #[test]
    fn local_name_strips_prefixes() {
        assert_eq!(local_name("nfe:infNFe"), "infNFe");
        assert_eq!(local_name("{http://www.portalfiscal.inf.br/nfe}infNFe"), "infNFe");
        assert_eq!(local_name("infNFe"), "infNFe");
    }

    #[test]
    fn strip_namespaces_removes_declarations() {
        let xml = r#"<nfeProc xmlns="http://www.portalfiscal.inf.br/nfe" xmlns:ds="http://www.w3.org/2000/09/xmldsig#" versao="4.00"/>"#;
        assert_eq!(strip_namespaces(xml), r#"<nfeProc versao="4.00"/>"#);
    }

    #[test]
    fn parse_document_tolerates_invalid_utf8_and_bom() {
        let mut bytes = "\u{feff}<a><b>".as_bytes().to_vec();
        bytes.push(0xFF);
        bytes.extend_from_slice(b"</b></a>");
        let root = parse_document(&bytes).unwrap();
        assert_eq!(root.child("b").unwrap().text(), "\u{fffd}");
    }

    #[test]
    fn descendants_are_pre_order() {
        let root = parse_tree("<a><b><c/></b><d/></a>").unwrap();
        let names: Vec<&str> = root.descendants().map(|e| e.local_name()).collect();
        assert_eq!(names, ["a", "b", "c", "d"]);
    }
}
