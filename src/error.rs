use std::{error, fmt, io, path::PathBuf};

#[derive(Debug)]
pub enum Error {
    /// An eligible dependency declaration could not be read.
    Declaration {
        class: String,
        path: PathBuf,
        source: io::Error,
    },
    /// A class list file could not be read or written.
    ClassList { path: PathBuf, source: io::Error },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Declaration { class, path, .. } => write!(
                f,
                "Could not read dependencies of class {class} from {}",
                path.display()
            ),
            Self::ClassList { path, .. } => {
                write!(f, "Could not access class list {}", path.display())
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Declaration { source, .. } | Self::ClassList { source, .. } => Some(source),
        }
    }
}
