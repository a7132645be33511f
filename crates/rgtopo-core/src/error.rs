use std::fmt;
use std::io;
use std::path::PathBuf;

/// Machine-readable error codes for scripting around the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    ListParseError,
    ModelParseError,
    MalformedInput,
    UnknownNode,
    InvalidNodeId,
    ListIoFailed,
    ModelIoFailed,
    ConfigIoFailed,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::ListParseError => "E1002",
            Self::ModelParseError => "E1003",
            Self::MalformedInput => "E2001",
            Self::UnknownNode => "E2002",
            Self::InvalidNodeId => "E2003",
            Self::ListIoFailed => "E5001",
            Self::ModelIoFailed => "E5002",
            Self::ConfigIoFailed => "E5003",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::ListParseError => "Malformed node or edge list",
            Self::ModelParseError => "Metabolic model parse error",
            Self::MalformedInput => "Edge references an unknown node",
            Self::UnknownNode => "Node not found in graph",
            Self::InvalidNodeId => "Node id cannot be stored in a list file",
            Self::ListIoFailed => "Node or edge list I/O failed",
            Self::ModelIoFailed => "Metabolic model could not be read",
            Self::ConfigIoFailed => "Config file could not be read",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in rgtopo.toml and retry."),
            Self::ListParseError => {
                Some("Edge lines must be `source<TAB>target`; node lines one id each.")
            }
            Self::ModelParseError => Some("Export the model as COBRA JSON and retry."),
            Self::MalformedInput => {
                Some("Regenerate node.list and edge.list together with `rgtopo build`.")
            }
            Self::UnknownNode => None,
            Self::InvalidNodeId => {
                Some("Ids must be non-empty, without tabs, newlines or surrounding spaces.")
            }
            Self::ListIoFailed | Self::ModelIoFailed | Self::ConfigIoFailed => {
                Some("Check that the path exists and is readable.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised while constructing or querying a frozen graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// An edge endpoint is absent from the node list.
    #[error("edge {from} -> {to} references unknown node {missing}")]
    MalformedInput {
        from: String,
        to: String,
        missing: String,
    },

    /// A lookup named a node that is not in the graph.
    #[error("node {0} is not in the graph")]
    UnknownNode(String),

    /// A node id that would not read back unchanged from `node.list`.
    #[error("invalid node id {0:?}")]
    InvalidNodeId(String),
}

impl GraphError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::MalformedInput { .. } => ErrorCode::MalformedInput,
            Self::UnknownNode(_) => ErrorCode::UnknownNode,
            Self::InvalidNodeId(_) => ErrorCode::InvalidNodeId,
        }
    }
}

/// Errors reading or writing `node.list` / `edge.list` files.
#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("list I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A line that does not split into exactly two non-empty fields.
    #[error("{}:{line}: expected `source<TAB>target`, got {content:?}", .path.display())]
    MalformedEdge {
        path: PathBuf,
        line: usize,
        content: String,
    },
}

impl ListError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Io { .. } => ErrorCode::ListIoFailed,
            Self::MalformedEdge { .. } => ErrorCode::ListParseError,
        }
    }
}

/// Errors loading a metabolic model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to read model {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse model {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Two reactions share one id.
    #[error("duplicate reaction id {0}")]
    DuplicateReaction(String),
}

impl ModelError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Io { .. } => ErrorCode::ModelIoFailed,
            Self::Parse { .. } | Self::DuplicateReaction(_) => ErrorCode::ModelParseError,
        }
    }
}

/// Errors loading `rgtopo.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Io { .. } => ErrorCode::ConfigIoFailed,
            Self::Parse { .. } => ErrorCode::ConfigParseError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const ALL: [ErrorCode; 9] = [
        ErrorCode::ConfigParseError,
        ErrorCode::ListParseError,
        ErrorCode::ModelParseError,
        ErrorCode::MalformedInput,
        ErrorCode::UnknownNode,
        ErrorCode::InvalidNodeId,
        ErrorCode::ListIoFailed,
        ErrorCode::ModelIoFailed,
        ErrorCode::ConfigIoFailed,
    ];

    #[test]
    fn all_codes_are_unique() {
        let mut seen = HashSet::new();
        for code in ALL {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        for code in ALL {
            let s = code.code();
            assert_eq!(s.len(), 5);
            assert!(s.starts_with('E'));
            assert!(s[1..].chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn malformed_input_names_the_missing_node() {
        let err = GraphError::MalformedInput {
            from: "R1".to_string(),
            to: "R9".to_string(),
            missing: "R9".to_string(),
        };
        assert_eq!(err.to_string(), "edge R1 -> R9 references unknown node R9");
        assert_eq!(err.code(), ErrorCode::MalformedInput);
    }
}
