//! Central error types for the XSD → Go-struct generator.
//!
//! Die Auflösungs-Engine hat bewusst fast keine Fehlerpfade: unbekannte
//! Typnamen degradieren zu Raw-Namen, doppelte Deklarationen überschreiben
//! still. Nur Schema-Invarianten-Verletzungen sind fatal.

use core::fmt;

/// All fatal error conditions of the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// XSD parsing failed.
    XsdParseError(String),
    /// An attribute's type resolved to a complex type (XSD 1.0 Part 1 §3.2:
    /// attributes carry simple content only).
    AttributeComplexType {
        /// Name des Attributs.
        attribute: String,
        /// Name des Complex Types auf den der Attribut-Typ aufgelöst wurde.
        type_name: String,
    },
    /// A complex type expands through itself (XSD 1.0 Part 1 §3.4.6 derivation
    /// cycle or a self-referential content model).
    ///
    /// Ohne diesen Guard würde der Tree Builder endlos rekursieren.
    RecursiveType(String),
    /// Ein IO-Fehler beim Lesen/Schreiben.
    IoError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::XsdParseError(msg) => write!(f, "XSD parse error: {msg}"),
            Self::AttributeComplexType { attribute, type_name } => write!(
                f,
                "attribute '{attribute}' resolves to complex type '{type_name}' (XSD 1.0 §3.2: attributes are simple-typed)"
            ),
            Self::RecursiveType(name) => write!(
                f,
                "complex type '{name}' expands through itself (XSD 1.0 §3.4.6)"
            ),
            Self::IoError(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e.to_string())
    }
}

/// A convenience `Result` type alias using [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
