//! rxsd – generiert XML-Decoding Go-Structs aus XSD-Schemas.
//!
//! # Beispiel
//!
//! ```
//! use rxsd::xsd::parse_schema;
//! use rxsd::registry::TypeRegistry;
//! use rxsd::tree::TreeBuilder;
//!
//! let xsd = r#"
//!     <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
//!         <xs:element name="book" type="xs:token"/>
//!     </xs:schema>
//! "#;
//!
//! let schema = parse_schema(xsd).unwrap();
//! let registry = TypeRegistry::from_schemas(std::slice::from_ref(&schema));
//! let roots = TreeBuilder::new(&registry).build(&schema.elements).unwrap();
//! assert_eq!(roots[0].typ, "string");
//! ```

pub mod emit;
pub mod error;
pub mod registry;
pub mod tree;
pub mod xsd;

pub use error::{Error, Result};

/// HashMap mit ahash (schneller, nicht DoS-resistent — für interne Datenstrukturen).
pub(crate) type FastHashMap<K, V> = hashbrown::HashMap<K, V, ahash::RandomState>;

/// HashSet mit ahash.
pub(crate) type FastHashSet<K> = hashbrown::HashSet<K, ahash::RandomState>;

// Public API: Schema-Loader
pub use xsd::{load_schemas, parse_schema};

// Public API: Registry + Tree Builder
pub use registry::{ResolvedType, TypeRegistry, scalar_type, strip_namespace};
pub use tree::{TreeBuilder, XmlAttribute, XmlElement};

// Public API: Go-Emission
pub use emit::write_go;
