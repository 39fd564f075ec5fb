//! Verfolgt `xs:import`/`xs:include` zu einer flachen Schema-Liste.
//!
//! Relative Pfade in `schemaLocation` werden vom Verzeichnis des
//! importierenden Schemas aufgelöst. Zirkuläre Imports werden erkannt und
//! übersprungen.

use std::path::{Path, PathBuf};

use roxmltree::{Document, ParsingOptions};

use crate::FastHashSet;
use crate::error::{Error, Result};

use super::{MAX_XSD_SIZE, XS_NS, XsdSchema, parse_schema_element};

/// Lädt ein XSD-Dokument und alle transitiv referenzierten Schemas.
///
/// Liefert die Dokumente in Besuchsreihenfolge (Haupt-Schema zuerst);
/// die Deklarationsreihenfolge der Wurzel-Elemente über alle Dokumente
/// bleibt damit erhalten.
///
/// # Beispiel
///
/// ```no_run
/// use std::path::Path;
/// use rxsd::xsd::load_schemas;
///
/// let schemas = load_schemas(Path::new("schema.xsd")).unwrap();
/// ```
pub fn load_schemas(xsd_path: &Path) -> Result<Vec<XsdSchema>> {
    let mut loader = SchemaLoader::default();
    loader.load_recursive(xsd_path)?;
    Ok(loader.schemas)
}

/// Import/Include-Deklaration aus einem Schema.
#[derive(Debug, Clone)]
struct SchemaRef {
    /// Namespace des importierten Schemas (None bei `xs:include`).
    namespace: Option<String>,
    /// Relativer Pfad zur Schema-Datei.
    schema_location: String,
}

#[derive(Default)]
struct SchemaLoader {
    /// Bereits besuchte Schemas (kanonische Pfade).
    loaded: FastHashSet<PathBuf>,
    /// Geparste Dokumente in Besuchsreihenfolge.
    schemas: Vec<XsdSchema>,
}

impl SchemaLoader {
    fn load_recursive(&mut self, schema_path: &Path) -> Result<()> {
        let canonical = schema_path.canonicalize().map_err(|e| {
            Error::XsdParseError(format!(
                "Cannot resolve schema path '{}': {}",
                schema_path.display(),
                e
            ))
        })?;

        // Bereits besucht? → Skip (verhindert Endlosschleifen)
        if !self.loaded.insert(canonical.clone()) {
            return Ok(());
        }

        let content = std::fs::read_to_string(&canonical).map_err(|e| {
            Error::XsdParseError(format!(
                "Cannot read schema '{}': {}",
                schema_path.display(),
                e
            ))
        })?;

        // DoS-Schutz
        if content.len() > MAX_XSD_SIZE {
            return Err(Error::XsdParseError(format!(
                "XSD document too large: {} bytes (max {} bytes)",
                content.len(),
                MAX_XSD_SIZE
            )));
        }

        let xml_opts = ParsingOptions { allow_dtd: true, ..Default::default() };
        let doc = Document::parse_with_options(&content, xml_opts)
            .map_err(|e| Error::XsdParseError(format!("XML: {e}")))?;
        let root = doc.root_element();

        if root.tag_name().name() != "schema" || root.tag_name().namespace() != Some(XS_NS) {
            return Err(Error::XsdParseError(
                "Root element must be xs:schema".to_string(),
            ));
        }

        let refs = collect_schema_refs(&root);
        self.schemas.push(parse_schema_element(&root)?);

        let schema_dir = canonical.parent().unwrap_or(Path::new(".")).to_path_buf();
        for schema_ref in refs {
            // Bekannte Namespaces überspringen — deren Typen sind built-in
            if let Some(ref ns) = schema_ref.namespace
                && (ns == "http://www.w3.org/XML/1998/namespace" || ns == XS_NS)
            {
                continue;
            }

            let ref_path = schema_dir.join(&schema_ref.schema_location);
            if !ref_path.exists() {
                return Err(Error::XsdParseError(format!(
                    "Referenced schema not found: '{}'",
                    schema_ref.schema_location
                )));
            }
            self.load_recursive(&ref_path)?;
        }

        Ok(())
    }
}

/// Sammelt alle `xs:import`/`xs:include` Elemente eines Schemas.
fn collect_schema_refs(root: &roxmltree::Node) -> Vec<SchemaRef> {
    root.children()
        .filter(|n| {
            n.is_element()
                && n.tag_name().namespace() == Some(XS_NS)
                && matches!(n.tag_name().name(), "import" | "include")
        })
        .filter_map(|node| {
            // schemaLocation ist bei xs:import optional, aber ohne sie
            // gibt es nichts zu laden
            let schema_location = node.attribute("schemaLocation")?;
            Some(SchemaRef {
                namespace: node.attribute("namespace").map(|s| s.to_string()),
                schema_location: schema_location.to_string(),
            })
        })
        .collect()
}
