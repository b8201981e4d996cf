//! Class list files, one class name per line.

use std::{fs, path::Path};

use log::debug;

use crate::Error;

/// Parse the contents of a class list file.
///
/// Lines are trimmed and blank lines skipped. Duplicates are kept, they are
/// dropped when the graph is built.
pub fn parse(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect()
}

/// Format a class list with one class per line and a trailing newline.
pub fn format<S: AsRef<str>>(classes: &[S]) -> String {
    let mut text = String::new();
    for class in classes {
        text.push_str(class.as_ref());
        text.push('\n');
    }
    text
}

pub fn read(path: &Path) -> crate::Result<Vec<String>> {
    let text = fs::read_to_string(path).map_err(|source| Error::ClassList {
        path: path.to_path_buf(),
        source,
    })?;
    let classes = parse(&text);
    debug!("Read {} classes from {}", classes.len(), path.display());
    Ok(classes)
}

pub fn write<S: AsRef<str>>(path: &Path, classes: &[S]) -> crate::Result<()> {
    fs::write(path, format(classes)).map_err(|source| Error::ClassList {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Wrote {} classes to {}", classes.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_skips_blank_lines() {
        let text = "DEFAULT\n  LINUX \n\n\nDEFAULT\nlast";
        assert_eq!(parse(text), vec!["DEFAULT", "LINUX", "DEFAULT", "last"]);
        assert!(parse("").is_empty());
        assert!(parse("\n\n").is_empty());
    }

    #[test]
    fn format_terminates_every_line() {
        assert_eq!(format(&["A", "B"]), "A\nB\n");
        assert_eq!(format::<&str>(&[]), "");
    }
}
