//! Namespace-agnostic element lookup over a parsed XML tree.
//!
//! Queries come in two scopes: the whole subtree below a node
//! ([`descendants_named`], [`first_text`]) and direct children only
//! ([`child_named`], [`children_named`], [`child_text`]).

use roxmltree::Node;

/// Local tag name, without any namespace.
///
/// ```
/// use roxmltree::Document;
/// use gnre_batch::nfe::resolver::local_name;
///
/// let doc = Document::parse(r#"<n:NFe xmlns:n="http://www.portalfiscal.inf.br/nfe"/>"#).unwrap();
/// assert_eq!(local_name(doc.root_element()), "NFe");
/// ```
pub fn local_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

fn is_named(node: &Node<'_, '_>, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

/// All elements named `name` in the subtree rooted at `node`, in document
/// (depth-first) order. `node` itself is included when it matches.
///
/// ```
/// use roxmltree::Document;
/// use gnre_batch::nfe::resolver::descendants_named;
///
/// let xml = r#"<NFe xmlns="http://www.portalfiscal.inf.br/nfe"><det/><x><det/></x></NFe>"#;
/// let doc = Document::parse(xml).unwrap();
/// assert_eq!(descendants_named(doc.root(), "det").count(), 2);
/// ```
pub fn descendants_named<'a, 'input>(
    node: Node<'a, 'input>,
    name: &str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.descendants().filter(move |n| is_named(n, name))
}

/// Direct element children of `node` named `name`.
pub fn children_named<'a, 'input>(
    node: Node<'a, 'input>,
    name: &str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(move |n| is_named(n, name))
}

/// First direct element child of `node` named `name`.
pub fn child_named<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    children_named(node, name).next()
}

/// Trimmed text of an element; blank or missing text counts as absent.
pub fn element_text<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.text().map(str::trim).filter(|t| !t.is_empty())
}

/// Text of the first element named `name` anywhere below `node`.
///
/// Only the first match is considered: if it is empty, the result is
/// `None` even when a later match has text.
pub fn first_text<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    descendants_named(node, name).next().and_then(element_text)
}

/// Text of the first direct child of `node` named `name`.
pub fn child_text<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    child_named(node, name).and_then(element_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    const MIXED_NS: &str = r#"<nfeProc xmlns="http://www.portalfiscal.inf.br/nfe">
        <NFe>
            <infNFe>
                <emit><CNPJ>12345678000195</CNPJ><xNome>Emitente</xNome></emit>
                <dest xmlns:n="urn:other"><n:CNPJ>11222333000181</n:CNPJ><xNome> </xNome></dest>
            </infNFe>
        </NFe>
        <protNFe><infProt><chNFe>35240612345678000195550010000012341000012345</chNFe></infProt></protNFe>
    </nfeProc>"#;

    #[test]
    fn first_text_ignores_namespaces() {
        let doc = Document::parse(MIXED_NS).unwrap();
        assert_eq!(first_text(doc.root(), "CNPJ"), Some("12345678000195"));
        assert_eq!(
            first_text(doc.root(), "chNFe"),
            Some("35240612345678000195550010000012341000012345")
        );
        assert_eq!(first_text(doc.root(), "CPF"), None);
    }

    #[test]
    fn prefixed_child_matches_by_local_name() {
        let doc = Document::parse(MIXED_NS).unwrap();
        let dest = descendants_named(doc.root(), "dest").next().unwrap();
        assert_eq!(child_text(dest, "CNPJ"), Some("11222333000181"));
    }

    #[test]
    fn blank_text_is_absent() {
        let doc = Document::parse(MIXED_NS).unwrap();
        let dest = descendants_named(doc.root(), "dest").next().unwrap();
        assert!(child_named(dest, "xNome").is_some());
        assert_eq!(child_text(dest, "xNome"), None);
    }

    #[test]
    fn children_scope_excludes_grandchildren() {
        let doc = Document::parse(MIXED_NS).unwrap();
        let inf = descendants_named(doc.root(), "infNFe").next().unwrap();
        assert_eq!(children_named(inf, "CNPJ").count(), 0);
        assert_eq!(descendants_named(inf, "CNPJ").count(), 2);
        assert_eq!(children_named(inf, "emit").count(), 1);
    }

    #[test]
    fn first_match_wins_even_if_empty() {
        let doc = Document::parse("<r><a/><a>late</a></r>").unwrap();
        assert_eq!(first_text(doc.root(), "a"), None);
    }
}
