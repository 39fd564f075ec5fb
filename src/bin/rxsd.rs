//! rxsd CLI — XSD → Go-Struct-Generierung.

use clap::Parser;
use rxsd::registry::TypeRegistry;
use rxsd::tree::TreeBuilder;
use rxsd::xsd::load_schemas;
use rxsd::write_go;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::process;

#[derive(Parser)]
#[command(name = "rxsd", about = "Generates XML decoding Go structs from an XSD schema")]
struct Cli {
    /// Path to a valid XSD file; import/include statements are followed
    xsd: String,

    /// Output file (optional; default stdout)
    #[arg(short, long)]
    output: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Fehler: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let schemas = load_schemas(Path::new(&cli.xsd)).map_err(|e| e.to_string())?;

    let registry = TypeRegistry::from_schemas(&schemas);
    let builder = TreeBuilder::new(&registry);

    // Wurzeln in Deklarationsreihenfolge über alle (gemergten) Dokumente
    let mut trees = Vec::new();
    for schema in &schemas {
        trees.extend(builder.build(&schema.elements).map_err(|e| e.to_string())?);
    }

    let mut writer: BufWriter<Box<dyn Write>> = match cli.output.as_deref() {
        Some(path) => {
            let file = std::fs::File::create(path)
                .map_err(|e| format!("Cannot create output '{path}': {e}"))?;
            BufWriter::new(Box::new(file))
        }
        None => BufWriter::new(Box::new(std::io::stdout())),
    };

    write_go(&mut writer, &trees).map_err(|e| e.to_string())?;
    writer.flush().map_err(|e| e.to_string())?;

    Ok(())
}
