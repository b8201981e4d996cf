//! Dependency declarations and where to find them.
//!
//! A declaration is a list of lines. Everything from a `#` or `;` to the end of
//! a line is a comment, and whatever remains is split on whitespace into class
//! names. There is no way for a line to be malformed: in the worst case it
//! names no classes at all.

use std::{
    collections::HashMap,
    fs, io,
    path::PathBuf,
};

use log::{debug, trace};

use crate::Error;

const COMMENT_CHARS: [char; 2] = ['#', ';'];

/// The class names on a single declaration line, in order.
pub fn parse_line(line: &str) -> impl Iterator<Item = &str> {
    let content = match line.find(COMMENT_CHARS) {
        Some(i) => &line[..i],
        None => line,
    };
    content.split_whitespace()
}

/// The class names of a whole declaration, in order of appearance.
///
/// Duplicates are kept, the graph ignores them anyway.
pub fn parse_declaration<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut names = vec![];
    for line in lines {
        names.extend(parse_line(line.as_ref()).map(|name| name.to_string()));
    }
    names
}

/// Somewhere to look up the dependency declaration of a class.
pub trait DeclarationSource {
    /// The dependencies declared for `class`.
    ///
    /// Returns `Ok(None)` if there is no eligible declaration, which means the
    /// class has no dependencies.
    fn declaration(&self, class: &str) -> crate::Result<Option<Vec<String>>>;
}

/// Declarations held in memory, keyed by class name.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    declarations: HashMap<String, Vec<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the raw text of a declaration, replacing any previous one.
    pub fn insert(&mut self, class: impl Into<String>, text: &str) {
        let lines = text.lines().map(|l| l.to_string()).collect();
        self.declarations.insert(class.into(), lines);
    }

    pub fn with(mut self, class: impl Into<String>, text: &str) -> Self {
        self.insert(class, text);
        self
    }
}

impl DeclarationSource for MemorySource {
    fn declaration(&self, class: &str) -> crate::Result<Option<Vec<String>>> {
        Ok(self
            .declarations
            .get(class)
            .map(|lines| parse_declaration(lines)))
    }
}

/// A directory containing one `<class>.<extension>` file per declaration.
///
/// Only regular files count. On Unix, files with any execute bit set are
/// ignored too, since those are scripts that happen to share the name.
#[derive(Debug, Clone)]
pub struct ClassDir {
    dir: PathBuf,
    extension: String,
}

impl ClassDir {
    pub const DEFAULT_EXTENSION: &'static str = "deps";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_extension(dir, Self::DEFAULT_EXTENSION)
    }

    pub fn with_extension(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    pub fn path_of(&self, class: &str) -> PathBuf {
        self.dir.join(format!("{class}.{}", self.extension))
    }

    fn is_eligible(metadata: &fs::Metadata) -> bool {
        if !metadata.is_file() {
            return false;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if metadata.permissions().mode() & 0o111 != 0 {
                return false;
            }
        }

        true
    }
}

impl DeclarationSource for ClassDir {
    fn declaration(&self, class: &str) -> crate::Result<Option<Vec<String>>> {
        let path = self.path_of(class);
        let error = |source| Error::Declaration {
            class: class.to_string(),
            path: path.clone(),
            source,
        };

        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                trace!("No declaration for {class} at {}", path.display());
                return Ok(None);
            }
            Err(e) => return Err(error(e)),
        };

        if !Self::is_eligible(&metadata) {
            debug!("Ignoring ineligible declaration {}", path.display());
            return Ok(None);
        }

        // Bytes from other encodings, usually in comments, are replaced
        // rather than rejected.
        let bytes = fs::read(&path).map_err(error)?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(Some(parse_declaration(text.lines())))
    }
}
