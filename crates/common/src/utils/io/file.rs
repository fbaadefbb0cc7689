use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

use eyre::Result;

/// Write contents to a file on the disc
///
/// ```no_run
/// use kiln_common::utils::io::file::write_file;
///
/// let path = "/tmp/test.txt";
/// let contents = "Hello, World!";
/// let result = write_file(path, contents);
/// ```
pub fn write_file(path_str: &str, contents: &str) -> Result<()> {
    let path = Path::new(path_str);

    // Create the directory if it doesn't exist
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    file.write_all(contents.as_bytes())?;

    Ok(())
}

/// Read contents from a file on the disc
///
/// ```no_run
/// use kiln_common::utils::io::file::read_file;
///
/// let path = "/tmp/test.txt";
/// let contents = read_file(path);
/// ```
pub fn read_file(path: &str) -> Result<String> {
    let path = Path::new(path);
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Delete a file from the disc, returning whether anything was removed.
pub fn delete_path(path: &str) -> bool {
    let path = Path::new(path);
    if path.is_dir() {
        std::fs::remove_dir_all(path).is_ok()
    } else {
        std::fs::remove_file(path).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read_file() {
        let path = std::env::temp_dir().join("kiln-common-file-test").join("contents.txt");
        let path = path.to_str().expect("temp path is valid utf-8");

        write_file(path, "Hello, World!").expect("unable to write file");
        assert_eq!(read_file(path).expect("unable to read file"), "Hello, World!");
        assert!(delete_path(path));
    }

    #[test]
    fn test_read_file_failure() {
        let path = "/nonexistent/test2.txt";
        let result = read_file(path);
        assert!(result.is_err());
    }

    #[test]
    fn test_delete_path_missing() {
        assert!(!delete_path("/nonexistent/kiln_dir"));
    }
}
