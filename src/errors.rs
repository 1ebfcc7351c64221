use thiserror::Error;

/// Severity of a diagnostic surfaced through the driver's `report` sink (§6).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Severity {
    Error,
}

/// Every error the core raises is fatal to the current run (§7). The one
/// exception is [`AssemblyError::UndefinedReferences`], which batches every
/// unresolved fixup from the second pass into a single report.
#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("{file}:{line}: syntax error: {source}")]
    Syntax {
        file: String,
        line: usize,
        #[source]
        source: Box<pest::error::Error<crate::parser::Rule>>,
    },

    #[error("{file}:{line}: {reason}")]
    Lexical {
        file: String,
        line: usize,
        reason: String,
    },

    #[error("{file}:{line}: {reason}")]
    Structural {
        file: String,
        line: usize,
        reason: String,
    },

    #[error("{file}:{line}: {reason}")]
    Semantic {
        file: String,
        line: usize,
        reason: String,
    },

    #[error("{reason}")]
    SemanticNoLine { reason: String },

    #[error("{file}:{line}: recursive include of \"{path}\"")]
    RecursiveInclude {
        file: String,
        line: usize,
        path: String,
    },

    #[error("failed to read \"{path}\": {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("assembly failed with {} unresolved reference(s):\n{}", .0.len(), .0.iter().map(|e| format!("  - {e}")).collect::<Vec<_>>().join("\n"))]
    UndefinedReferences(Vec<AssemblyError>),
}

impl AssemblyError {
    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}
