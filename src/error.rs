use miette::Diagnostic;
use thiserror::Error;

/// Main error type for template assembly.
#[derive(Error, Diagnostic, Debug)]
pub enum AssemblerError {
    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(assembler::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(assembler::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Build error: {message}")]
    #[diagnostic(code(assembler::build))]
    Build {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Config error: {message}")]
    #[diagnostic(code(assembler::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// A placed rectangle or a group's bounding box leaves the canvas.
    #[error("Geometry error: {message}")]
    #[diagnostic(code(assembler::geometry))]
    Geometry {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("'{entry}' priority {value} out of acceptable range")]
    #[diagnostic(
        code(assembler::priority),
        help("priority must be an integer between 1 and 10")
    )]
    Priority { entry: String, value: i64 },

    /// Every candidate image source for an entry failed to load.
    #[error("Unable to load any images for '{entry}'")]
    #[diagnostic(code(assembler::source))]
    MissingSource {
        entry: String,
        #[help]
        help: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, AssemblerError>;
