use anyhow::Context;
use forge_model::Component;
use serde::Deserialize;
use std::path::Path;

/// The on-disk constructor document shape (spec §6): `{components: [Component]}`. Deserialized
/// separately from the C1 runtime types it wraps so a malformed document never reaches the
/// engine as anything other than a plain `Vec<Component>`.
#[derive(Debug, Deserialize)]
struct ConstructorDocument {
    components: Vec<Component>,
}

pub fn load_constructor_document(path: &Path) -> anyhow::Result<Vec<Component>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading constructor document {}", path.display()))?;
    let document: ConstructorDocument = serde_yaml::from_str(&contents)
        .with_context(|| format!("parsing constructor document {}", path.display()))?;
    Ok(document.components)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::assert;
    use std::io::Write;

    #[test]
    fn loads_a_minimal_constructor_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
components:
  - name: example.com/demo
    version: v1.0.0
    provider:
      name: acme
"#
        )
        .unwrap();

        let components = load_constructor_document(file.path()).unwrap();
        assert!(components.len() == 1);
        assert!(components[0].meta.name == "example.com/demo");
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = load_constructor_document(Path::new("/does/not/exist.yaml"));
        assert!(result.is_err());
    }
}
