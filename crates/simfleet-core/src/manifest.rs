//! Compose manifest rendering.
//!
//! The manifest is modeled as the ordered service topology and rendered
//! to text only at this boundary, so nesting and escaping are checked
//! independently of any one run. Rendering is pure: identical topology
//! and template always produce byte-identical output, which keeps runs
//! reproducible and diffable.

use crate::error::{Error, Result};
use crate::topology::ServiceDescriptor;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Compose file format version emitted at the head of every manifest.
const COMPOSE_VERSION: &str = "3.8";

/// Read the base template, creating an empty one if it does not exist.
///
/// First-run bootstrapping must stay unattended, so absence is healed
/// rather than reported. Any other read failure is a `TemplateIo` error.
pub fn load_or_create_template(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            fs::write(path, "").map_err(|source| Error::TemplateIo {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(String::new())
        }
        Err(source) => Err(Error::TemplateIo {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Render the topology merged with the base template into one document.
///
/// Layout: version header, template text verbatim, then one `services:`
/// block per descriptor in topology order. Each block references the
/// shared defaults anchor only when the template actually defines it;
/// an alias into an empty template would not parse.
pub fn render(services: &[ServiceDescriptor], template: &str, defaults_anchor: &str) -> String {
    let has_defaults = template.contains(&format!("&{defaults_anchor}"));

    let mut doc = String::new();
    doc.push_str(&format!("version: '{COMPOSE_VERSION}'\n"));
    if !template.is_empty() {
        doc.push_str(template);
        if !template.ends_with('\n') {
            doc.push('\n');
        }
    }
    doc.push_str("services:\n");

    for service in services {
        doc.push_str(&format!("  {}:\n", service.service_name));
        if has_defaults {
            doc.push_str(&format!("    <<: *{defaults_anchor}\n"));
        }
        doc.push_str(&format!("    container_name: {}\n", service.container_name));
        doc.push_str(&format!("    image: {}\n", service.image));
        doc.push_str(&format!(
            "    command: {}\n",
            yaml_quote(&shell_invocation(&service.command))
        ));
        if let Some(entrypoint) = &service.entrypoint {
            let items: Vec<String> = entrypoint.iter().map(|s| yaml_quote(s)).collect();
            doc.push_str(&format!("    entrypoint: [{}]\n", items.join(", ")));
        }
    }

    doc
}

/// Write the rendered document, replacing any previous manifest at `path`.
pub fn write_manifest(path: &Path, document: &str) -> Result<()> {
    fs::write(path, document).map_err(|source| Error::ManifestWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// SHA-256 hex digest of a rendered document.
pub fn manifest_digest(document: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(document.as_bytes());
    hex::encode(hasher.finalize())
}

/// Collapse the launch statements into a single shell invocation so a
/// multi-statement sequence executes as one command.
fn shell_invocation(statements: &[String]) -> String {
    format!("bash -c '{}'", statements.join(" && "))
}

/// Quote a value as a YAML double-quoted scalar.
fn yaml_quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}
