use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for manifest operations (boxed to keep it small on the stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Source content and filename shared by every error raised for one manifest.
#[derive(Debug, Clone)]
pub struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    /// Wrap a toml error, keeping its span when it has one.
    pub fn parse_error(&self, source: toml::de::Error) -> Box<Error> {
        let span = source.span().map(SourceSpan::from);
        Box::new(Error::Parse {
            src: self.named_source(),
            span,
            source,
        })
    }

    pub fn validation_error(
        &self,
        message: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::Validation {
            src: self.named_source(),
            span,
            message: message.into(),
        })
    }

    pub fn unknown_transform_error(&self, name: &str, span: Option<SourceSpan>) -> Box<Error> {
        Box::new(Error::UnknownTransform {
            src: self.named_source(),
            span,
            name: name.to_string(),
        })
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(help("create a litgen.toml or pass its location with --config"))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse litgen.toml")]
    #[diagnostic(code(litgen::parse_error))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("{message}")]
    #[diagnostic(code(litgen::validation_error))]
    Validation {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },

    #[error("unknown transform '{name}'")]
    #[diagnostic(
        code(litgen::unknown_transform),
        help("valid transforms are: upper, lower, trim, pascal, class_name, enum_key, quote")
    )]
    UnknownTransform {
        #[source_code]
        src: NamedSource<String>,
        #[label("unknown transform")]
        span: Option<SourceSpan>,
        name: String,
    },

    #[error("{context} could not be built")]
    #[diagnostic(code(litgen::build_error))]
    Build {
        context: String,
        #[source]
        source: litgen_codegen::Error,
    },
}
