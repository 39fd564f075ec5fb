//! Tree Builder: löst Element-Deklarationen rekursiv zu einem Baum
//! typisierter XML-Knoten auf.
//!
//! Die Konstruktion ist eine reine, tiefenorientierte Rekursion über das
//! bereits vollständig geladene, unveränderliche Deklarations-Set: kein IO,
//! kein Shared Mutable State. Knoten werden bottom-up vollständig befüllt
//! und nach dem Einhängen in den Parent nie mehr mutiert.
//!
//! Zyklische Typgraphen (ein Complex Type, der sich direkt oder transitiv
//! selbst expandiert) werden über ein pro Pfad mitgeführtes Visited-Set
//! erkannt und als [`Error::RecursiveType`] gemeldet statt den Call-Stack
//! zu erschöpfen.

use crate::FastHashSet;
use crate::error::{Error, Result};
use crate::registry::{ResolvedType, TypeRegistry, scalar_type, strip_namespace};
use crate::xsd::{
    XsdAttribute, XsdComplexContent, XsdComplexType, XsdElement, XsdSimpleContent, XsdSimpleType,
};

/// Ein Knoten des Output-Baums.
///
/// Entweder ein Blatt-Skalar (`typ` = Skalartyp, keine Kinder) oder ein
/// Struktur-Knoten (Kinder und/oder Attribute, `typ` = eigener Name als
/// nominaler Marker für das generierte Struct).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    pub name: String,
    /// Aufgelöster Skalartyp, oder der eigene Name bei Struktur-Knoten.
    pub typ: String,
    /// True wenn die Deklaration Wiederholung erlaubt.
    pub is_list: bool,
    /// True wenn dieser Knoten Text-Content statt Struktur repräsentiert.
    pub is_cdata: bool,
    /// Attribute in Deklarationsreihenfolge.
    pub attributes: Vec<XmlAttribute>,
    /// Kinder in Deklarationsreihenfolge, exklusiv vom Parent besessen.
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// True wenn der Knoten Kinder oder Attribute trägt.
    pub fn is_structural(&self) -> bool {
        !self.children.is_empty() || !self.attributes.is_empty()
    }
}

/// Ein Attribut-Eintrag eines Output-Knotens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlAttribute {
    pub name: String,
    pub typ: String,
}

/// Baut aus Wurzel-Element-Deklarationen den Output-Baum.
///
/// Konsumiert die [`TypeRegistry`] nur lesend; eine Builder-Instanz pro
/// Generierungslauf.
pub struct TreeBuilder<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry }
    }

    /// Baut einen Baum pro Wurzel-Element, in Deklarationsreihenfolge.
    pub fn build(&self, roots: &[XsdElement]) -> Result<Vec<XmlElement>> {
        roots
            .iter()
            .map(|e| {
                let mut visiting = FastHashSet::default();
                self.build_from_element(e, &mut visiting)
            })
            .collect()
    }

    /// Die zentrale rekursive Operation: Element-Deklaration → Knoten.
    fn build_from_element(
        &self,
        elem: &XsdElement,
        visiting: &mut FastHashSet<String>,
    ) -> Result<XmlElement> {
        let mut node = XmlElement {
            name: elem.name.clone(),
            typ: elem.name.clone(),
            is_list: elem.is_list,
            ..Default::default()
        };

        if !elem.has_inline_type() {
            if let Some(ref typ) = elem.typ {
                match self.registry.resolve(typ) {
                    ResolvedType::Complex(ct) => {
                        self.build_from_complex_type(&mut node, ct, visiting)?
                    }
                    ResolvedType::Simple(st) => build_from_simple_type(&mut node, st),
                    ResolvedType::Builtin(s) | ResolvedType::Opaque(s) => node.typ = s.to_string(),
                }
            }
            // Weder Referenz noch Inline-Typ: leerer Platzhalter-Knoten,
            // kein Fehler.
            return Ok(node);
        }

        if let Some(ref ct) = elem.complex_type {
            self.build_from_complex_type(&mut node, ct, visiting)?;
            return Ok(node);
        }

        if let Some(ref st) = elem.simple_type {
            build_from_simple_type(&mut node, st);
        }

        Ok(node)
    }

    /// Reichert einen Knoten aus einem Complex Type an.
    ///
    /// Benannte Typen werden für die Dauer ihres Teilbaums ins Visited-Set
    /// eingetragen; ein Wiedereintritt auf demselben Pfad bedeutet
    /// unbegrenzte Expansion.
    fn build_from_complex_type(
        &self,
        node: &mut XmlElement,
        ct: &XsdComplexType,
        visiting: &mut FastHashSet<String>,
    ) -> Result<()> {
        let guarded = !ct.name.is_empty();
        if guarded && !visiting.insert(ct.name.clone()) {
            return Err(Error::RecursiveType(ct.name.clone()));
        }

        let result = self.fill_from_complex_type(node, ct, visiting);

        if guarded {
            visiting.remove(&ct.name);
        }
        result
    }

    fn fill_from_complex_type(
        &self,
        node: &mut XmlElement,
        ct: &XsdComplexType,
        visiting: &mut FastHashSet<String>,
    ) -> Result<()> {
        for child in &ct.sequence {
            node.children.push(self.build_from_element(child, visiting)?);
        }

        self.build_from_attributes(node, &ct.attributes)?;

        if let Some(ref cc) = ct.complex_content {
            self.build_from_complex_content(node, cc, visiting)?;
        }

        if let Some(ref sc) = ct.simple_content {
            self.build_from_simple_content(node, sc, visiting)?;
        }

        Ok(())
    }

    /// Extension als Flattening: Base-Struktur zuerst in den Knoten mergen,
    /// dann die eigene Sequence anhängen (geerbte Felder vor eigenen).
    fn build_from_complex_content(
        &self,
        node: &mut XmlElement,
        cc: &XsdComplexContent,
        visiting: &mut FastHashSet<String>,
    ) -> Result<()> {
        if let Some(ref ext) = cc.extension {
            if let ResolvedType::Complex(base) = self.registry.resolve(&ext.base) {
                self.build_from_complex_type(node, base, visiting)?;
            }
            for child in &ext.sequence {
                node.children.push(self.build_from_element(child, visiting)?);
            }
        }
        Ok(())
    }

    /// Simple Content: text-tragende Elemente mit Attributen.
    ///
    /// Die Extension-Form modelliert "Attribute plus ein Textwert" als
    /// Struktur-Knoten mit genau einem CDATA-Kind, nicht als Blatt — der
    /// Knoten behält seine Attribute neben dem Text-Payload.
    fn build_from_simple_content(
        &self,
        node: &mut XmlElement,
        sc: &XsdSimpleContent,
        visiting: &mut FastHashSet<String>,
    ) -> Result<()> {
        if let Some(ref ext) = sc.extension {
            self.build_from_attributes(node, &ext.attributes)?;

            match self.registry.resolve(&ext.base) {
                ResolvedType::Complex(ct) => self.build_from_complex_type(node, ct, visiting)?,
                ResolvedType::Simple(st) => {
                    let mut child = XmlElement {
                        name: node.name.clone(),
                        is_cdata: true,
                        ..Default::default()
                    };
                    build_from_simple_type(&mut child, st);
                    node.children = vec![child];
                }
                ResolvedType::Builtin(s) | ResolvedType::Opaque(s) => {
                    let child = XmlElement {
                        name: node.name.clone(),
                        typ: scalar_type(s).to_string(),
                        is_cdata: true,
                        ..Default::default()
                    };
                    node.children = vec![child];
                }
            }
        }

        if let Some(ref restriction) = sc.restriction {
            // Restriction führt anders als Extension keine Attribute ein:
            // der Base-Typ wird direkt in den Knoten gefaltet.
            match self.registry.resolve(&restriction.base) {
                ResolvedType::Complex(ct) => self.build_from_complex_type(node, ct, visiting)?,
                ResolvedType::Simple(st) => build_from_simple_type(node, st),
                ResolvedType::Builtin(s) | ResolvedType::Opaque(s) => {
                    node.typ = scalar_type(s).to_string();
                }
            }
        }

        Ok(())
    }

    /// Löst Attribut-Typen auf und hängt sie in Deklarationsreihenfolge an.
    ///
    /// Attribut-Typen sind immer skalar: ein Simple Type wird eine Ebene
    /// tiefer über seine Restriction-Base und die built-in Tabelle
    /// aufgelöst; ein Complex Type ist eine Schema-Invarianten-Verletzung.
    fn build_from_attributes(
        &self,
        node: &mut XmlElement,
        attrs: &[XsdAttribute],
    ) -> Result<()> {
        for attr in attrs {
            let typ = match self.registry.resolve(&attr.typ) {
                ResolvedType::Simple(st) => {
                    scalar_type(strip_namespace(&st.restriction.base)).to_string()
                }
                ResolvedType::Complex(ct) => {
                    return Err(Error::AttributeComplexType {
                        attribute: attr.name.clone(),
                        type_name: ct.name.clone(),
                    });
                }
                ResolvedType::Builtin(s) | ResolvedType::Opaque(s) => s.to_string(),
            };
            node.attributes.push(XmlAttribute {
                name: attr.name.clone(),
                typ,
            });
        }
        Ok(())
    }
}

/// Simple Type: `typ` = primitive Mapping der Restriction-Base.
///
/// Genau ein Mapping-Schritt, kein Registry-Wiedereintritt — ein Simple
/// Type, der einen anderen benannten Simple Type einschränkt, liefert
/// dessen Namen verbatim. Führt nie Kinder oder Attribute ein.
fn build_from_simple_type(node: &mut XmlElement, st: &XsdSimpleType) {
    node.typ = scalar_type(strip_namespace(&st.restriction.base)).to_string();
}
