//! Lab catalog types and compose file lookup

use crate::error::CatalogError;
use crate::product::ProductConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the catalog file inside the labs directory
pub const CATALOG_FILE: &str = "labs.yaml";

/// Extension of per-lab compose files (`<labs dir>/<name>.yaml`)
const COMPOSE_EXTENSION: &str = "yaml";

/// One entry of `labs.yaml`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Lab {
    /// Lab name, also the stem of its compose file
    pub name: String,

    /// Address the lab's target machine is reachable at
    #[serde(default)]
    pub ip: String,

    /// What the lab is about
    #[serde(default)]
    pub description: String,
}

/// The labs available on this machine
#[derive(Debug, Clone)]
pub struct LabCatalog {
    dir: PathBuf,
    labs: Vec<Lab>,
}

impl LabCatalog {
    /// Read `labs.yaml` from `dir`
    pub fn load(dir: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(CatalogError::DirectoryNotFound(dir));
        }

        let path = dir.join(CATALOG_FILE);
        let content = std::fs::read_to_string(&path).map_err(|source| CatalogError::Read {
            path: path.clone(),
            source,
        })?;
        // An empty file is an empty catalog
        let labs = if content.trim().is_empty() {
            Vec::new()
        } else {
            serde_yaml::from_str(&content).map_err(|source| CatalogError::Parse { path, source })?
        };

        Ok(Self { dir, labs })
    }

    pub fn labs(&self) -> &[Lab] {
        &self.labs
    }

    pub fn is_empty(&self) -> bool {
        self.labs.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&Lab> {
        self.labs.iter().find(|lab| lab.name == name)
    }

    /// Compose file of a lab listed in the catalog
    pub fn compose_file(&self, name: &str) -> Result<PathBuf, CatalogError> {
        validate_lab_name(name)?;
        if self.find(name).is_none() {
            return Err(CatalogError::UnknownLab(name.to_string()));
        }
        compose_file(&self.dir, name)
    }
}

/// Reject names that could escape the labs directory
pub fn validate_lab_name(name: &str) -> Result<(), CatalogError> {
    let invalid = name.trim().is_empty()
        || name == "."
        || name.contains("..")
        || name.contains(['/', '\\'])
        || name.chars().any(char::is_control);
    if invalid {
        return Err(CatalogError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Path of the compose file for `name`; it must exist and cannot be the catalog
pub fn compose_file(dir: &Path, name: &str) -> Result<PathBuf, CatalogError> {
    validate_lab_name(name)?;
    let file_name = format!("{}.{}", name, COMPOSE_EXTENSION);
    if file_name == CATALOG_FILE {
        return Err(CatalogError::InvalidName(name.to_string()));
    }

    let path = dir.join(file_name);
    if path.is_file() {
        Ok(path)
    } else {
        Err(CatalogError::ComposeFileNotFound {
            lab: name.to_string(),
            path,
        })
    }
}

/// Pick the labs directory: explicit override, then the product's env var,
/// then `labs/` beside the executable, then `./labs`
pub fn resolve_labs_dir<C: ProductConfig>(config: &C, explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }

    if let Some(dir) = std::env::var_os(config.labs_dir_env()).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }

    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("labs")))
        .filter(|dir| dir.is_dir());

    beside_exe.unwrap_or_else(|| PathBuf::from("labs"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::tests::TestProduct;

    fn write_catalog(dir: &Path, content: &str) {
        std::fs::write(dir.join(CATALOG_FILE), content).unwrap();
    }

    #[test]
    fn test_load_catalog() {
        let tmp = tempfile::tempdir().unwrap();
        write_catalog(
            tmp.path(),
            "- name: intro\n  ip: 10.10.0.2\n  description: First steps\n- name: sqli\n",
        );

        let catalog = LabCatalog::load(tmp.path()).unwrap();
        assert_eq!(catalog.labs().len(), 2);
        assert_eq!(catalog.find("intro").unwrap().ip, "10.10.0.2");
        assert_eq!(catalog.find("sqli").unwrap().description, "");
        assert!(catalog.find("missing").is_none());
    }

    #[test]
    fn test_empty_catalog_file() {
        let tmp = tempfile::tempdir().unwrap();
        write_catalog(tmp.path(), "");
        assert!(LabCatalog::load(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let err = LabCatalog::load(tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, CatalogError::DirectoryNotFound(_)));
    }

    #[test]
    fn test_missing_catalog_file() {
        let tmp = tempfile::tempdir().unwrap();
        let err = LabCatalog::load(tmp.path()).unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }

    #[test]
    fn test_malformed_catalog() {
        let tmp = tempfile::tempdir().unwrap();
        write_catalog(tmp.path(), "name: [unclosed");
        let err = LabCatalog::load(tmp.path()).unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
    }

    #[test]
    fn test_compose_file_lookup() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("intro.yaml"), "services: {}\n").unwrap();

        let path = compose_file(tmp.path(), "intro").unwrap();
        assert_eq!(path, tmp.path().join("intro.yaml"));

        let err = compose_file(tmp.path(), "other").unwrap_err();
        assert!(err.to_string().contains("Docker Compose file not found"));
    }

    #[test]
    fn test_catalog_file_is_not_a_lab() {
        let tmp = tempfile::tempdir().unwrap();
        write_catalog(tmp.path(), "- name: intro\n");

        let err = compose_file(tmp.path(), "labs").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidName(_)));

        let catalog = LabCatalog::load(tmp.path()).unwrap();
        assert!(catalog.compose_file("labs").is_err());
    }

    #[test]
    fn test_catalog_compose_file_requires_listed_lab() {
        let tmp = tempfile::tempdir().unwrap();
        write_catalog(tmp.path(), "- name: intro\n");
        std::fs::write(tmp.path().join("intro.yaml"), "services: {}\n").unwrap();
        std::fs::write(tmp.path().join("stray.yaml"), "services: {}\n").unwrap();

        let catalog = LabCatalog::load(tmp.path()).unwrap();
        assert_eq!(
            catalog.compose_file("intro").unwrap(),
            tmp.path().join("intro.yaml")
        );
        let err = catalog.compose_file("stray").unwrap_err();
        assert!(matches!(err, CatalogError::UnknownLab(ref name) if name == "stray"));
    }

    #[test]
    fn test_lab_names_cannot_escape_directory() {
        for name in ["", " ", ".", "..", "../etc/passwd", "a/b", "a\\b"] {
            assert!(validate_lab_name(name).is_err(), "accepted {:?}", name);
        }
        assert!(validate_lab_name("web-101").is_ok());
    }

    #[test]
    fn test_explicit_labs_dir_wins() {
        let dir = resolve_labs_dir(&TestProduct, Some(Path::new("/srv/labs")));
        assert_eq!(dir, PathBuf::from("/srv/labs"));
    }
}
