use std::fmt;
use thiserror::Error;

/// The part of a message that names what a command failed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    /// `cd: foo`
    Plain { cmd: &'static str, target: String },
    /// `mkdir: cannot create directory 'foo'`
    Action {
        cmd: &'static str,
        action: &'static str,
        target: String,
    },
}

impl Subject {
    pub fn plain(cmd: &'static str, target: &str) -> Self {
        Subject::Plain {
            cmd,
            target: target.into(),
        }
    }
    pub fn action(cmd: &'static str, action: &'static str, target: &str) -> Self {
        Subject::Action {
            cmd,
            action,
            target: target.into(),
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Plain { cmd, target } => write!(f, "{}: {}", cmd, target),
            Subject::Action {
                cmd,
                action,
                target,
            } => write!(f, "{}: {} '{}'", cmd, action, target),
        }
    }
}

/// Domain errors a command reports. `Display` is the text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    #[error("{0}: missing operand")]
    MissingOperand(&'static str),

    #[error("{0}: missing package name")]
    MissingPackage(&'static str),

    #[error("{0}: No such file or directory")]
    NotFound(Subject),

    #[error("{0}: Not a directory")]
    NotADirectory(Subject),

    #[error("{0}: Is a directory")]
    IsADirectory(Subject),

    #[error("{0}: File exists")]
    AlreadyExists(Subject),

    #[error("{0}: Permission denied")]
    PermissionDenied(Subject),

    #[error("{0}: command not found")]
    CommandNotFound(String),
}

/// Failure to import a filesystem snapshot from JSON.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("snapshot root is not a directory")]
    RootNotDirectory,

    #[error("invalid entry name in snapshot: '{0}'")]
    InvalidName(String),
}
