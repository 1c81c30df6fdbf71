use std::path::Path;

use super::error::ConversionError;

/// Extensions accepted as conversion sources (compared case-insensitively).
pub const ACCEPTED_EXTENSIONS: &[&str] = &["xlsx", "xls", "xlsm", "csv"];

/// Reject a source file before it enters the pipeline.
///
/// Checks, in order: the file exists, its extension is one of
/// [`ACCEPTED_EXTENSIONS`], and it is not empty.
pub fn validate_source_file(path: &Path) -> Result<(), ConversionError> {
    let meta = match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => meta,
        _ => {
            return Err(ConversionError::Validation(format!(
                "file does not exist: {}",
                path.display()
            )));
        }
    };

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ConversionError::Validation(format!(
            "unsupported format: '.{extension}' (expected one of {})",
            ACCEPTED_EXTENSIONS.join(", ")
        )));
    }

    if meta.len() == 0 {
        return Err(ConversionError::Validation(format!(
            "file is empty: {}",
            path.display()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch(name: &str, content: &[u8]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("compta-validation-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn missing_file() {
        let err = validate_source_file(Path::new("/definitely/not/here.xlsx")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn unsupported_extension() {
        let path = scratch("export.pdf", b"x");
        let err = validate_source_file(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported format"));
    }

    #[test]
    fn empty_file() {
        let path = scratch("empty.csv", b"");
        let err = validate_source_file(&path).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn extension_is_case_insensitive() {
        let path = scratch("EXPORT.XLSX", b"PK");
        validate_source_file(&path).unwrap();
    }

    #[test]
    fn directory_is_not_a_file() {
        let err = validate_source_file(&std::env::temp_dir()).unwrap_err();
        assert!(matches!(err, ConversionError::Validation(_)));
    }
}
