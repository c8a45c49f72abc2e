//! Graph serialization and export files
//!
//! Formats: Turtle (`.ttl`), N-Triples (`.nt`) and RDF/XML (`.rdf`).
//! An export writes one file per format to `<base_dir>/<parent>/<name>.<ext>`.

mod ntriples;
mod rdfxml;
mod turtle;

use crate::graph::Graph;
use crate::schema::one_or_many;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

/// Errors from writing export files
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unknown export format: {0}")]
    UnknownFormat(String),

    #[error("IO error writing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Supported RDF syntaxes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RdfFormat {
    Turtle,
    NTriples,
    RdfXml,
}

impl RdfFormat {
    pub fn extension(self) -> &'static str {
        match self {
            RdfFormat::Turtle => "ttl",
            RdfFormat::NTriples => "nt",
            RdfFormat::RdfXml => "rdf",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RdfFormat::Turtle => "turtle",
            RdfFormat::NTriples => "ntriples",
            RdfFormat::RdfXml => "xml",
        }
    }
}

impl fmt::Display for RdfFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RdfFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "turtle" | "ttl" => Ok(RdfFormat::Turtle),
            "ntriples" | "n-triples" | "nt" => Ok(RdfFormat::NTriples),
            "xml" | "rdf" | "rdfxml" | "rdf/xml" | "pretty-xml" => Ok(RdfFormat::RdfXml),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

/// The `export` section of a schema
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Output directory, relative to the schema directory
    pub parent: String,
    /// File stem
    pub name: String,
    #[serde(deserialize_with = "one_or_many")]
    pub formats: Vec<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            parent: "./".to_string(),
            name: "export".to_string(),
            formats: vec![RdfFormat::RdfXml.name().to_string()],
        }
    }
}

impl ExportConfig {
    /// Parsed formats; an empty list means RDF/XML.
    pub fn formats(&self) -> Result<Vec<RdfFormat>, ExportError> {
        if self.formats.is_empty() {
            return Ok(vec![RdfFormat::RdfXml]);
        }
        self.formats.iter().map(|f| f.parse()).collect()
    }

    pub fn path_for(&self, base_dir: &Path, format: RdfFormat) -> PathBuf {
        base_dir
            .join(&self.parent)
            .join(format!("{}.{}", self.name, format.extension()))
    }
}

/// Render a graph in one format
pub fn serialize(graph: &Graph, format: RdfFormat) -> String {
    match format {
        RdfFormat::Turtle => turtle::write(graph),
        RdfFormat::NTriples => ntriples::write(graph),
        RdfFormat::RdfXml => rdfxml::write(graph),
    }
}

/// Write one file per configured format; returns the written paths.
pub fn save(graph: &Graph, config: &ExportConfig, base_dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
    let formats = config.formats()?;
    let mut written = Vec::with_capacity(formats.len());
    for format in formats {
        let path = config.path_for(base_dir, format);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| ExportError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, serialize(graph, format)).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), %format, triples = graph.len(), "export written");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Iri, Literal, Triple};
    use serde_json::json;
    use tempfile::TempDir;

    fn sample() -> Graph {
        let mut graph = Graph::new();
        graph.bind("ex", "http://example.org/");
        graph.add(Triple::new(
            Iri::new("http://example.org/a"),
            Iri::new("http://example.org/name"),
            Literal::plain("A"),
        ));
        graph
    }

    #[test]
    fn format_names_and_aliases() {
        assert_eq!("turtle".parse::<RdfFormat>().unwrap(), RdfFormat::Turtle);
        assert_eq!("NT".parse::<RdfFormat>().unwrap(), RdfFormat::NTriples);
        assert_eq!("xml".parse::<RdfFormat>().unwrap(), RdfFormat::RdfXml);
        assert!(matches!(
            "jsonld".parse::<RdfFormat>(),
            Err(ExportError::UnknownFormat(f)) if f == "jsonld"
        ));
    }

    #[test]
    fn config_defaults() {
        let config: ExportConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config, ExportConfig::default());
        assert_eq!(config.formats().unwrap(), vec![RdfFormat::RdfXml]);
        assert_eq!(
            config.path_for(Path::new("/data"), RdfFormat::RdfXml),
            Path::new("/data/./export.rdf")
        );
    }

    #[test]
    fn config_accepts_single_format() {
        let config: ExportConfig = serde_json::from_value(json!({"formats": "turtle"})).unwrap();
        assert_eq!(config.formats().unwrap(), vec![RdfFormat::Turtle]);
    }

    #[test]
    fn save_writes_every_format() {
        let dir = TempDir::new().unwrap();
        let config = ExportConfig {
            parent: "out/rdf".to_string(),
            name: "people".to_string(),
            formats: vec!["turtle".to_string(), "nt".to_string(), "xml".to_string()],
        };
        let written = save(&sample(), &config, dir.path()).unwrap();
        assert_eq!(written.len(), 3);
        for (path, ext) in written.iter().zip(["ttl", "nt", "rdf"]) {
            assert!(path.exists());
            assert_eq!(path.extension().unwrap(), ext);
            assert!(path.starts_with(dir.path().join("out/rdf")));
        }
        let nt = fs::read_to_string(&written[1]).unwrap();
        assert_eq!(nt, "<http://example.org/a> <http://example.org/name> \"A\" .\n");
    }

    #[test]
    fn unknown_format_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let config = ExportConfig {
            formats: vec!["turtle".to_string(), "bogus".to_string()],
            ..Default::default()
        };
        assert!(save(&sample(), &config, dir.path()).is_err());
        assert!(!dir.path().join("export.ttl").exists());
    }
}
