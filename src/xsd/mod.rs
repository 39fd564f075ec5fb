//! XSD Schema Loader.
//!
//! Parsed XML Schema (XSD) Dateien zu flachen Deklarations-Records
//! (`XsdSchema`), die der Tree Builder konsumiert.
//!
//! # Scope
//!
//! - Top-level Elemente, Complex Types, Simple Types, Attribute
//! - `xs:sequence` Content-Models, inline anonyme Typen
//! - `xs:complexContent` / `xs:simpleContent` mit Extension/Restriction
//! - `minOccurs` / `maxOccurs` (kollabiert zu einem List-Flag)
//!
//! # Out of Scope
//!
//! - Namespace-aware Auflösung (Prefixe werden später nur gestrippt)
//! - `xs:group`, `xs:choice`, `xs:all`, Substitution Groups, Facets
//! - `use="required"` / `use="restricted"` auf Attributen
//!
//! Unbekannte Konstrukte werden übersprungen, nicht abgelehnt: das Tool
//! bevorzugt Best-Effort-Generierung gegenüber hartem Scheitern.
//!
//! **Hinweis:** `xs:import`/`xs:include` werden über [`load_schemas()`]
//! verfolgt.

mod imports;

pub use imports::load_schemas;

use roxmltree::{Document, Node, ParsingOptions};

use crate::error::{Error, Result};

/// XML Schema Namespace.
const XS_NS: &str = "http://www.w3.org/2001/XMLSchema";

/// Maximale Größe eines XSD-Dokuments (16 MiB).
///
/// DoS-Schutz durch Eingabegrößenbeschränkung. Dieser Wert ist ausreichend
/// für praktisch alle realen XSD-Dateien.
const MAX_XSD_SIZE: usize = 16 * 1024 * 1024;

// ============================================================================
// Deklarations-Records
// ============================================================================

/// Ein geparstes Schema-Dokument: die Top-Level-Deklarationen in
/// Dokumentreihenfolge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XsdSchema {
    /// `targetNamespace` des Schemas (leer wenn nicht gesetzt).
    pub target_ns: String,
    /// Top-level Element-Deklarationen (die Wurzeln des Output-Baums).
    pub elements: Vec<XsdElement>,
    /// Benannte Complex Types.
    pub complex_types: Vec<XsdComplexType>,
    /// Benannte Simple Types.
    pub simple_types: Vec<XsdSimpleType>,
}

/// Eine Element-Deklaration (top-level oder lokal in einer Sequence).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XsdElement {
    pub name: String,
    /// Typ-Referenz (`type="..."`), None bei Inline-Typ oder leerem Element.
    pub typ: Option<String>,
    /// True wenn `maxOccurs` Wiederholung erlaubt (> 1 oder `unbounded`).
    pub is_list: bool,
    /// Inline anonymer Complex Type.
    pub complex_type: Option<Box<XsdComplexType>>,
    /// Inline anonymer Simple Type.
    pub simple_type: Option<Box<XsdSimpleType>>,
}

impl XsdElement {
    /// Trägt das Element eine Inline-Typdefinition statt einer Referenz?
    pub fn has_inline_type(&self) -> bool {
        self.complex_type.is_some() || self.simple_type.is_some()
    }
}

/// Eine Complex-Type-Definition (XSD 1.0 Part 1 §3.4).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XsdComplexType {
    /// Name (leer bei anonymen Inline-Typen).
    pub name: String,
    /// Kind-Elemente der `xs:sequence`, in Deklarationsreihenfolge.
    pub sequence: Vec<XsdElement>,
    /// Attribut-Deklarationen, in Deklarationsreihenfolge.
    pub attributes: Vec<XsdAttribute>,
    pub complex_content: Option<XsdComplexContent>,
    pub simple_content: Option<XsdSimpleContent>,
}

/// `xs:complexContent`: Ableitung eines Complex Types von einem anderen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XsdComplexContent {
    pub extension: Option<XsdExtension>,
}

/// `xs:simpleContent`: Text-Content mit Attributen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XsdSimpleContent {
    pub extension: Option<XsdExtension>,
    pub restriction: Option<XsdRestriction>,
}

/// `xs:extension`: Base-Typ plus eigene Sequence/Attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XsdExtension {
    pub base: String,
    pub sequence: Vec<XsdElement>,
    pub attributes: Vec<XsdAttribute>,
}

/// `xs:restriction`: nur der Base-Typ interessiert (keine Facets).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XsdRestriction {
    pub base: String,
}

/// Eine Simple-Type-Definition: Restriction eines Base-Typs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XsdSimpleType {
    /// Name (leer bei anonymen Inline-Typen).
    pub name: String,
    pub restriction: XsdRestriction,
}

/// Eine Attribut-Deklaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XsdAttribute {
    pub name: String,
    pub typ: String,
}

// ============================================================================
// Parsing
// ============================================================================

/// Parsed ein einzelnes XSD-Dokument zu [`XsdSchema`].
///
/// # Größenbeschränkung
///
/// XSD-Dokumente größer als 16 MiB werden abgelehnt (DoS-Schutz).
///
/// # Beispiel
///
/// ```
/// use rxsd::xsd::parse_schema;
///
/// let xsd = r#"
///     <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
///                targetNamespace="http://example.org">
///         <xs:element name="book" type="xs:string"/>
///     </xs:schema>
/// "#;
///
/// let schema = parse_schema(xsd).unwrap();
/// assert_eq!(schema.elements.len(), 1);
/// ```
pub fn parse_schema(xsd_content: &str) -> Result<XsdSchema> {
    if xsd_content.len() > MAX_XSD_SIZE {
        return Err(Error::XsdParseError(format!(
            "XSD document too large: {} bytes (max {} bytes)",
            xsd_content.len(),
            MAX_XSD_SIZE
        )));
    }

    let xml_opts = ParsingOptions { allow_dtd: true, ..Default::default() };
    let doc = Document::parse_with_options(xsd_content, xml_opts)
        .map_err(|e| Error::XsdParseError(format!("XML: {e}")))?;

    let root = doc.root_element();

    // Prüfe ob root ein xs:schema Element ist (Name UND Namespace)
    if root.tag_name().name() != "schema" || root.tag_name().namespace() != Some(XS_NS) {
        return Err(Error::XsdParseError(
            "Root element must be xs:schema".to_string(),
        ));
    }

    parse_schema_element(&root)
}

/// Parsed die Top-Level-Deklarationen eines `xs:schema` Elements.
fn parse_schema_element(root: &Node) -> Result<XsdSchema> {
    let mut schema = XsdSchema {
        target_ns: root.attribute("targetNamespace").unwrap_or("").to_string(),
        ..Default::default()
    };

    for child in xs_children(root) {
        match child.tag_name().name() {
            "element" => schema.elements.push(parse_element(&child)?),
            "complexType" => schema.complex_types.push(parse_complex_type(&child)?),
            "simpleType" => schema.simple_types.push(parse_simple_type(&child)?),
            // import/include werden vom Loader verfolgt, alles andere
            // (annotation, group, attributeGroup, ...) wird übersprungen.
            _ => {}
        }
    }

    Ok(schema)
}

/// Iteriert die Element-Kinder im XSD-Namespace.
fn xs_children<'a, 'input>(node: &Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(|n| n.is_element() && n.tag_name().namespace() == Some(XS_NS))
}

fn parse_element(node: &Node) -> Result<XsdElement> {
    let name = node
        .attribute("name")
        .ok_or_else(|| Error::XsdParseError("element missing name".to_string()))?;

    let mut elem = XsdElement {
        name: name.to_string(),
        typ: node.attribute("type").map(|t| t.to_string()),
        is_list: is_list_occurs(node.attribute("maxOccurs")),
        ..Default::default()
    };

    for child in xs_children(node) {
        match child.tag_name().name() {
            "complexType" => elem.complex_type = Some(Box::new(parse_complex_type(&child)?)),
            "simpleType" => elem.simple_type = Some(Box::new(parse_simple_type(&child)?)),
            _ => {}
        }
    }

    Ok(elem)
}

/// Kollabiert `maxOccurs` zum List-Flag: `unbounded` oder > 1.
///
/// Unparsebare Werte zählen nicht als Liste (Best-Effort).
fn is_list_occurs(max_occurs: Option<&str>) -> bool {
    match max_occurs {
        Some("unbounded") => true,
        Some(n) => n.parse::<u64>().map(|n| n > 1).unwrap_or(false),
        None => false,
    }
}

fn parse_complex_type(node: &Node) -> Result<XsdComplexType> {
    let mut ct = XsdComplexType {
        name: node.attribute("name").unwrap_or("").to_string(),
        ..Default::default()
    };

    for child in xs_children(node) {
        match child.tag_name().name() {
            "sequence" => ct.sequence = parse_sequence(&child)?,
            "attribute" => ct.attributes.push(parse_attribute(&child)),
            "complexContent" => ct.complex_content = Some(parse_complex_content(&child)?),
            "simpleContent" => ct.simple_content = Some(parse_simple_content(&child)?),
            _ => {}
        }
    }

    Ok(ct)
}

fn parse_sequence(node: &Node) -> Result<Vec<XsdElement>> {
    let mut elements = Vec::new();
    for child in xs_children(node) {
        if child.tag_name().name() == "element" {
            elements.push(parse_element(&child)?);
        }
    }
    Ok(elements)
}

fn parse_complex_content(node: &Node) -> Result<XsdComplexContent> {
    let mut cc = XsdComplexContent::default();
    for child in xs_children(node) {
        if child.tag_name().name() == "extension" {
            cc.extension = Some(parse_extension(&child)?);
        }
    }
    Ok(cc)
}

fn parse_simple_content(node: &Node) -> Result<XsdSimpleContent> {
    let mut sc = XsdSimpleContent::default();
    for child in xs_children(node) {
        match child.tag_name().name() {
            "extension" => sc.extension = Some(parse_extension(&child)?),
            "restriction" => sc.restriction = Some(parse_restriction(&child)),
            _ => {}
        }
    }
    Ok(sc)
}

fn parse_extension(node: &Node) -> Result<XsdExtension> {
    let mut ext = XsdExtension {
        base: node.attribute("base").unwrap_or("").to_string(),
        ..Default::default()
    };

    for child in xs_children(node) {
        match child.tag_name().name() {
            "sequence" => ext.sequence = parse_sequence(&child)?,
            "attribute" => ext.attributes.push(parse_attribute(&child)),
            _ => {}
        }
    }

    Ok(ext)
}

fn parse_restriction(node: &Node) -> XsdRestriction {
    XsdRestriction {
        base: node.attribute("base").unwrap_or("").to_string(),
    }
}

fn parse_simple_type(node: &Node) -> Result<XsdSimpleType> {
    let mut st = XsdSimpleType {
        name: node.attribute("name").unwrap_or("").to_string(),
        ..Default::default()
    };

    for child in xs_children(node) {
        if child.tag_name().name() == "restriction" {
            st.restriction = parse_restriction(&child);
        }
    }

    Ok(st)
}

fn parse_attribute(node: &Node) -> XsdAttribute {
    XsdAttribute {
        name: node.attribute("name").unwrap_or("").to_string(),
        typ: node.attribute("type").unwrap_or("").to_string(),
    }
}
