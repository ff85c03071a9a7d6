//! Utility functions for input and output handling

use std::io::{Read, Write};
use std::path::Path;

use url::Url;

/// Path argument standing for standard input or output
pub const STDIO: &str = "-";

/// Read the whole of `source`, or standard input for `-`
pub fn read_source(source: &str) -> std::io::Result<String> {
    if source == STDIO {
        let mut content = String::new();
        std::io::stdin().lock().read_to_string(&mut content)?;
        Ok(content)
    } else {
        std::fs::read_to_string(source)
    }
}

/// Write `content` to `destination`, or standard output for `-`
pub fn write_destination(destination: &str, content: &str) -> std::io::Result<()> {
    if destination == STDIO {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(content.as_bytes())?;
        stdout.flush()
    } else {
        std::fs::write(destination, content)
    }
}

/// Location relative references in `source` are resolved against.
///
/// This is the source file itself, or the working directory when reading from
/// standard input.
pub fn base_url(source: &str) -> std::io::Result<Url> {
    if source == STDIO {
        let cwd = std::env::current_dir()?;
        return Url::from_directory_path(&cwd).map_err(|_| invalid_path(&cwd));
    }

    let path = Path::new(source).canonicalize()?;
    Url::from_file_path(&path).map_err(|_| invalid_path(&path))
}

fn invalid_path(path: &Path) -> std::io::Error {
    std::io::Error::new(
        std::io::ErrorKind::InvalidInput,
        format!("cannot express {} as a URL", path.display()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_base_url_for_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("crd.yaml");
        std::fs::write(&path, "kind: CustomResourceDefinition\n").unwrap();

        let base = base_url(path.to_str().unwrap()).unwrap();

        assert_eq!(base.scheme(), "file");
        assert!(base.path().ends_with("/crd.yaml"));
        assert!(base.join("common.yaml").unwrap().path().ends_with("/common.yaml"));
    }

    #[test]
    fn test_base_url_for_stdin() {
        let base = base_url(STDIO).unwrap();
        assert_eq!(base.scheme(), "file");
        assert!(base.path().ends_with('/'));
    }

    #[test]
    fn test_missing_source() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.yaml");

        assert!(read_source(missing.to_str().unwrap()).is_err());
        assert!(base_url(missing.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_write_and_read_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.yaml");
        let path = path.to_str().unwrap();

        write_destination(path, "kind: CustomResourceDefinition\n").unwrap();

        assert_eq!(read_source(path).unwrap(), "kind: CustomResourceDefinition\n");
    }
}
