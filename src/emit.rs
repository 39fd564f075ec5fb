//! Go-Struct-Emission: serialisiert den Output-Baum zu Go-Quelltext.
//!
//! Pro Struktur-Knoten wird ein `type ... struct` mit `encoding/xml`-Tags
//! emittiert, tiefenorientiert (Parent vor Kindern). Blatt-Skalare werden
//! zu Feldern im Parent-Struct; sie erzeugen kein eigenes Struct.
//!
//! Raw durchgereichte Typnamen landen unverändert im Output — das Tool
//! bevorzugt Best-Effort-Generierung, Korrektheit prüft der Go-Compiler.

use std::io::Write;

use crate::FastHashSet;
use crate::error::Result;
use crate::tree::XmlElement;

/// Schreibt die Go-Structs für alle Wurzel-Bäume.
///
/// Doppelte Struct-Namen über Bäume hinweg werden nur einmal emittiert
/// (erste Definition gewinnt).
///
/// # Beispiel
///
/// ```
/// use rxsd::tree::XmlElement;
/// use rxsd::write_go;
///
/// let root = XmlElement {
///     name: "point".to_string(),
///     typ: "point".to_string(),
///     children: vec![XmlElement {
///         name: "x".to_string(),
///         typ: "int".to_string(),
///         ..Default::default()
///     }],
///     ..Default::default()
/// };
///
/// let mut out = Vec::new();
/// write_go(&mut out, std::slice::from_ref(&root)).unwrap();
/// assert!(String::from_utf8(out).unwrap().contains("type Point struct"));
/// ```
pub fn write_go(w: &mut impl Write, roots: &[XmlElement]) -> Result<()> {
    let mut emitted = FastHashSet::default();
    for root in roots {
        write_node(w, root, &mut emitted)?;
    }
    Ok(())
}

fn write_node(
    w: &mut impl Write,
    node: &XmlElement,
    emitted: &mut FastHashSet<String>,
) -> Result<()> {
    if !node.is_structural() {
        return Ok(());
    }

    let struct_name = exported(&node.name);
    if !emitted.insert(struct_name.clone()) {
        return Ok(());
    }

    writeln!(w, "type {struct_name} struct {{")?;

    for attr in &node.attributes {
        writeln!(
            w,
            "\t{} {} `xml:\"{},attr\"`",
            exported(&attr.name),
            attr.typ,
            attr.name
        )?;
    }

    for child in &node.children {
        let field = exported(&child.name);
        if child.is_cdata {
            writeln!(w, "\t{field} {} `xml:\",chardata\"`", child.typ)?;
        } else if child.is_structural() {
            let list = if child.is_list { "[]" } else { "" };
            writeln!(
                w,
                "\t{field} {list}{} `xml:\"{}\"`",
                exported(&child.name),
                child.name
            )?;
        } else {
            let list = if child.is_list { "[]" } else { "" };
            writeln!(w, "\t{field} {list}{} `xml:\"{}\"`", child.typ, child.name)?;
        }
    }

    writeln!(w, "}}")?;
    writeln!(w)?;

    for child in &node.children {
        write_node(w, child, emitted)?;
    }

    Ok(())
}

/// Macht einen XML-Namen zu einem exportierten Go-Bezeichner.
///
/// `zip-code` → `ZipCode`. Separatoren werden entfernt, das Folgezeichen
/// großgeschrieben.
fn exported(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = true;
    for c in name.chars() {
        if matches!(c, '-' | '_' | '.' | ':') {
            upper_next = true;
            continue;
        }
        if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TypeRegistry;
    use crate::tree::TreeBuilder;
    use crate::xsd::parse_schema;

    fn generate(xsd: &str) -> String {
        let schema = parse_schema(xsd).expect("parse schema");
        let registry = TypeRegistry::from_schemas(std::slice::from_ref(&schema));
        let roots = TreeBuilder::new(&registry)
            .build(&schema.elements)
            .expect("build tree");
        let mut out = Vec::new();
        write_go(&mut out, &roots).expect("write go");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn exported_capitalizes_and_strips_separators() {
        assert_eq!(exported("street"), "Street");
        assert_eq!(exported("zip-code"), "ZipCode");
        assert_eq!(exported("snake_case"), "SnakeCase");
        assert_eq!(exported("Already"), "Already");
    }

    #[test]
    fn leaf_scalar_root_emits_nothing() {
        let out = generate(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:element name="flag" type="xs:boolean"/>
               </xs:schema>"#,
        );
        assert!(out.is_empty(), "{out}");
    }

    #[test]
    fn structural_node_emits_struct_with_fields() {
        let out = generate(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:element name="address" type="Address"/>
                 <xs:complexType name="Address">
                   <xs:sequence>
                     <xs:element name="street" type="xs:token"/>
                     <xs:element name="number" type="xs:int"/>
                   </xs:sequence>
                   <xs:attribute name="country" type="xs:Name"/>
                 </xs:complexType>
               </xs:schema>"#,
        );
        assert!(out.contains("type Address struct {"), "{out}");
        assert!(out.contains("\tCountry string `xml:\"country,attr\"`"), "{out}");
        assert!(out.contains("\tStreet string `xml:\"street\"`"), "{out}");
        assert!(out.contains("\tNumber int `xml:\"number\"`"), "{out}");
    }

    #[test]
    fn nested_structs_are_emitted_parent_first() {
        let out = generate(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:element name="order" type="Order"/>
                 <xs:complexType name="Item">
                   <xs:sequence>
                     <xs:element name="sku" type="xs:token"/>
                   </xs:sequence>
                 </xs:complexType>
                 <xs:complexType name="Order">
                   <xs:sequence>
                     <xs:element name="item" type="Item" maxOccurs="unbounded"/>
                   </xs:sequence>
                 </xs:complexType>
               </xs:schema>"#,
        );
        let order = out.find("type Order struct").expect("order struct");
        let item = out.find("type Item struct").expect("item struct");
        assert!(order < item, "{out}");
        assert!(out.contains("\tItem []Item `xml:\"item\"`"), "{out}");
    }

    #[test]
    fn cdata_child_becomes_chardata_field() {
        let out = generate(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:element name="measure" type="Measure"/>
                 <xs:complexType name="Measure">
                   <xs:simpleContent>
                     <xs:extension base="xs:string">
                       <xs:attribute name="unit" type="xs:token"/>
                     </xs:extension>
                   </xs:simpleContent>
                 </xs:complexType>
               </xs:schema>"#,
        );
        assert!(out.contains("\tUnit string `xml:\"unit,attr\"`"), "{out}");
        assert!(out.contains("\tMeasure string `xml:\",chardata\"`"), "{out}");
    }

    #[test]
    fn duplicate_struct_names_are_emitted_once() {
        let out = generate(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:element name="a" type="Shared"/>
                 <xs:element name="b" type="Wrapper"/>
                 <xs:complexType name="Shared">
                   <xs:sequence><xs:element name="v" type="xs:int"/></xs:sequence>
                 </xs:complexType>
                 <xs:complexType name="Wrapper">
                   <xs:sequence><xs:element name="a" type="Shared"/></xs:sequence>
                 </xs:complexType>
               </xs:schema>"#,
        );
        assert_eq!(out.matches("type A struct").count(), 1, "{out}");
    }

    #[test]
    fn raw_types_pass_through_to_output() {
        let out = generate(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:element name="x" type="Holder"/>
                 <xs:complexType name="Holder">
                   <xs:sequence>
                     <xs:element name="odd" type="UndeclaredType"/>
                   </xs:sequence>
                 </xs:complexType>
               </xs:schema>"#,
        );
        assert!(out.contains("\tOdd UndeclaredType `xml:\"odd\"`"), "{out}");
    }
}
