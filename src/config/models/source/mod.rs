use crate::{
    config::Configuration,
    error::{Error, Result},
};
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

/// A configuration source
#[derive(Clone, Debug)]
pub enum Source {
    /// A YAML configuration file
    File(PathBuf),
    /// YAML content which was already read, e.g. from stdin. The path is used for reporting and
    /// for resolving the deployment directory.
    Inline { path: PathBuf, content: String },
}

impl Source {
    /// Load the configuration from the source.
    ///
    /// Returns the parsed configuration, as well as the path to the configuration. No defaults
    /// are applied and nothing is validated.
    pub fn load(self) -> Result<(Configuration, PathBuf)> {
        match self {
            Self::File(path) => {
                let content = read(&path)?;
                let cfg = parse(&path, &content)?;
                tracing::debug!("loaded deployment config from {}", path.display());
                Ok((cfg, path))
            }
            Self::Inline { path, content } => {
                let cfg = parse(&path, &content)?;
                Ok((cfg, path))
            }
        }
    }
}

fn read(path: &Path) -> Result<String> {
    match std::fs::metadata(path) {
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(Error::ConfigFileMissing {
                path: path.to_path_buf(),
            });
        }
        // anything else will show up again when reading
        _ => {}
    }

    let bytes = std::fs::read(path).map_err(|source| Error::ConfigFileUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    String::from_utf8(bytes).map_err(|source| Error::ConfigNotValidYaml {
        path: path.to_path_buf(),
        source: source.into(),
    })
}

/// Parse a YAML document into the configuration model.
///
/// Syntax errors are reported apart from documents that are valid YAML, but don't have the
/// expected structure.
fn parse(path: &Path, content: &str) -> Result<Configuration> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|source| Error::ConfigNotValidYaml {
            path: path.to_path_buf(),
            source: source.into(),
        })?;

    if value.is_null() {
        // an empty document
        return Ok(Configuration::default());
    }

    // deserialize from the text, so unquoted scalars (`value: 8080`) still fill string fields
    serde_yaml::from_str(content).map_err(|source| Error::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}
