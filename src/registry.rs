//! Typ-Registry: indiziert alle benannten Typ-Deklarationen für O(1)-Lookup.
//!
//! Wird einmal aus allen geladenen Schema-Dokumenten gebaut, danach
//! unveränderlich. Lookups sind reine Funktionen des fixen Inhalts —
//! die Registry kann gefahrlos geteilt werden.

use log::warn;

use crate::FastHashMap;
use crate::xsd::{XsdComplexType, XsdSchema, XsdSimpleType};

/// Ergebnis einer Typnamen-Auflösung.
///
/// Genau vier Fälle; es gibt bewusst keinen Fehlerfall. Unbekannte Namen
/// degradieren zu [`ResolvedType::Opaque`] — der Aufrufer bekommt immer
/// etwas, das als Typname verwendbar ist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedType<'a> {
    /// Ein registrierter Complex Type.
    Complex(&'a XsdComplexType),
    /// Ein registrierter Simple Type.
    Simple(&'a XsdSimpleType),
    /// Ein XSD built-in Typ, gemappt auf den Go-Skalartyp.
    Builtin(&'static str),
    /// Unbekannter Name, unverändert durchgereicht (Best-Effort).
    Opaque(&'a str),
}

impl<'a> ResolvedType<'a> {
    /// Der Skalar-Typname für Builtin/Opaque, None für strukturierte Typen.
    pub fn scalar_name(&self) -> Option<&'a str> {
        match self {
            Self::Builtin(s) => Some(s),
            Self::Opaque(s) => Some(s),
            Self::Complex(_) | Self::Simple(_) => None,
        }
    }
}

/// Name → Deklaration Index über alle geladenen Schema-Dokumente.
///
/// Doppelte Namen über Dokumentgrenzen: der zuletzt registrierte gewinnt
/// (Import merged in einen Namensraum). Das ist dokumentiertes Verhalten,
/// kein Fehler.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    complex_types: FastHashMap<String, XsdComplexType>,
    simple_types: FastHashMap<String, XsdSimpleType>,
}

impl TypeRegistry {
    /// Baut die Registry aus allen Schema-Dokumenten eines Laufs.
    pub fn from_schemas(schemas: &[XsdSchema]) -> Self {
        let mut registry = Self::default();
        for schema in schemas {
            registry.register(schema);
        }
        registry
    }

    fn register(&mut self, schema: &XsdSchema) {
        for ct in &schema.complex_types {
            if self
                .complex_types
                .insert(ct.name.clone(), ct.clone())
                .is_some()
            {
                warn!("complex type '{}' redeclared, later wins", ct.name);
            }
        }
        for st in &schema.simple_types {
            if self
                .simple_types
                .insert(st.name.clone(), st.clone())
                .is_some()
            {
                warn!("simple type '{}' redeclared, later wins", st.name);
            }
        }
    }

    /// Löst einen Typnamen auf.
    ///
    /// Reihenfolge: Namespace-Prefix strippen, dann Complex Types, dann
    /// Simple Types, dann die built-in Tabelle, sonst Opaque-Durchreichung.
    pub fn resolve<'a>(&'a self, name: &'a str) -> ResolvedType<'a> {
        let name = strip_namespace(name);
        if let Some(ct) = self.complex_types.get(name) {
            return ResolvedType::Complex(ct);
        }
        if let Some(st) = self.simple_types.get(name) {
            return ResolvedType::Simple(st);
        }
        match builtin_scalar(name) {
            Some(scalar) => ResolvedType::Builtin(scalar),
            None => ResolvedType::Opaque(name),
        }
    }

    /// Anzahl registrierter Typen (Complex + Simple).
    pub fn len(&self) -> usize {
        self.complex_types.len() + self.simple_types.len()
    }

    /// True wenn keine Typen registriert sind.
    pub fn is_empty(&self) -> bool {
        self.complex_types.is_empty() && self.simple_types.is_empty()
    }
}

/// Strippt einen Namespace-Prefix (`xs:string` → `string`).
///
/// Namespaces werden darüber hinaus nicht unterschieden (Non-Goal).
pub fn strip_namespace(name: &str) -> &str {
    match name.rsplit_once(':') {
        Some((_, local)) => local,
        None => name,
    }
}

/// Die fixe XSD-built-in → Go Tabelle.
fn builtin_scalar(name: &str) -> Option<&'static str> {
    match name {
        "boolean" => Some("bool"),
        "language" | "dateTime" | "Name" | "token" => Some("string"),
        "long" | "short" | "integer" | "int" => Some("int"),
        "decimal" => Some("float64"),
        _ => None,
    }
}

/// Mappt einen XSD-Typnamen auf seinen Go-Skalartyp.
///
/// Nicht gelistete Namen werden unverändert durchgereicht — `string`
/// bleibt `string`, und auch völlig unbekannte Namen sind kein Fehler.
pub fn scalar_type(name: &str) -> &str {
    builtin_scalar(name).unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xsd::parse_schema;

    fn registry_from(xsd: &str) -> TypeRegistry {
        let schema = parse_schema(xsd).expect("parse schema");
        TypeRegistry::from_schemas(std::slice::from_ref(&schema))
    }

    #[test]
    fn strip_namespace_removes_prefix() {
        assert_eq!(strip_namespace("xs:string"), "string");
        assert_eq!(strip_namespace("string"), "string");
        assert_eq!(strip_namespace(""), "");
    }

    #[test]
    fn strip_namespace_is_a_fixed_point() {
        let stripped = strip_namespace("ns:foo");
        assert_eq!(strip_namespace(stripped), stripped);
    }

    /// Die vollständige built-in Tabelle plus Durchreichung.
    #[test]
    fn scalar_type_table() {
        assert_eq!(scalar_type("boolean"), "bool");
        assert_eq!(scalar_type("language"), "string");
        assert_eq!(scalar_type("dateTime"), "string");
        assert_eq!(scalar_type("Name"), "string");
        assert_eq!(scalar_type("token"), "string");
        assert_eq!(scalar_type("long"), "int");
        assert_eq!(scalar_type("short"), "int");
        assert_eq!(scalar_type("integer"), "int");
        assert_eq!(scalar_type("int"), "int");
        assert_eq!(scalar_type("decimal"), "float64");
        // nicht gelistet → verbatim
        assert_eq!(scalar_type("string"), "string");
        assert_eq!(scalar_type("anyURI"), "anyURI");
        assert_eq!(scalar_type("MadeUpType"), "MadeUpType");
    }

    #[test]
    fn resolve_matches_scalar_type_for_builtins() {
        let registry = TypeRegistry::default();
        for name in [
            "boolean", "language", "dateTime", "Name", "token", "long", "short", "integer",
            "int", "decimal",
        ] {
            let resolved = registry.resolve(name);
            assert_eq!(resolved.scalar_name(), Some(scalar_type(name)), "{name}");
        }
    }

    #[test]
    fn resolve_unknown_name_is_opaque_passthrough() {
        let registry = TypeRegistry::default();
        assert_eq!(registry.resolve("Mystery"), ResolvedType::Opaque("Mystery"));
    }

    #[test]
    fn resolve_strips_namespace_prefix() {
        let registry = registry_from(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:complexType name="Address"/>
               </xs:schema>"#,
        );
        assert_eq!(registry.resolve("tns:Address"), registry.resolve("Address"));
        assert!(matches!(registry.resolve("tns:Address"), ResolvedType::Complex(_)));
    }

    #[test]
    fn complex_types_shadow_builtins_and_simple_types() {
        let registry = registry_from(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:complexType name="token"/>
                 <xs:simpleType name="token">
                   <xs:restriction base="xs:string"/>
                 </xs:simpleType>
               </xs:schema>"#,
        );
        assert!(matches!(registry.resolve("token"), ResolvedType::Complex(_)));
    }

    #[test]
    fn later_registration_wins() {
        let a = parse_schema(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:complexType name="Dup">
                   <xs:sequence><xs:element name="first" type="xs:int"/></xs:sequence>
                 </xs:complexType>
               </xs:schema>"#,
        )
        .unwrap();
        let b = parse_schema(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:complexType name="Dup">
                   <xs:sequence><xs:element name="second" type="xs:int"/></xs:sequence>
                 </xs:complexType>
               </xs:schema>"#,
        )
        .unwrap();

        let registry = TypeRegistry::from_schemas(&[a, b]);
        assert_eq!(registry.len(), 1);
        match registry.resolve("Dup") {
            ResolvedType::Complex(ct) => assert_eq!(ct.sequence[0].name, "second"),
            other => panic!("expected complex type, got {other:?}"),
        }
    }

    #[test]
    fn resolve_simple_type() {
        let registry = registry_from(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:simpleType name="ZipCode">
                   <xs:restriction base="xs:token"/>
                 </xs:simpleType>
               </xs:schema>"#,
        );
        match registry.resolve("ZipCode") {
            ResolvedType::Simple(st) => assert_eq!(st.restriction.base, "xs:token"),
            other => panic!("expected simple type, got {other:?}"),
        }
    }

    #[test]
    fn empty_registry_reports_empty() {
        let registry = TypeRegistry::default();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }
}
