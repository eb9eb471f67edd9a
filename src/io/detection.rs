// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Format detection using magic numbers and file extensions.
//!
//! # Supported Formats
//!
//! - **WPILOG**: identified by the `WPILOG` magic and a v1.0 version field
//! - **JSON topic export**: identified by a leading `{` or the `.json`
//!   extension
//!
//! # Example
//!
//! ```rust,no_run
//! use wpilog_codec::io::detection::{detect_format, FileFormat};
//!
//! let format = detect_format("match_12.wpilog")?;
//! assert_eq!(format, FileFormat::Wpilog);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::io::formats::wpilog::{is_valid, FILE_HEADER_SIZE, WPILOG_MAGIC};
use crate::CodecError;

/// Formats the crate can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// WPILOG binary log
    Wpilog,
    /// JSON topic tree export
    Json,
    /// Anything else
    Unknown,
}

/// Detect the format of a file.
///
/// Reads the file header first and falls back to the extension when the
/// header is inconclusive or the file cannot be read.
pub fn detect_format<P: AsRef<Path>>(path: P) -> Result<FileFormat, CodecError> {
    let path_ref = path.as_ref();

    match detect_from_magic(path_ref) {
        Ok(FileFormat::Unknown) | Err(_) => {}
        Ok(format) => return Ok(format),
    }

    Ok(detect_from_extension(path_ref))
}

/// Classify a header buffer.
pub fn detect_from_header(header: &[u8]) -> FileFormat {
    if is_valid(header) {
        return FileFormat::Wpilog;
    }
    let first = header.iter().find(|b| !b.is_ascii_whitespace());
    if first == Some(&b'{') {
        return FileFormat::Json;
    }
    FileFormat::Unknown
}

fn detect_from_magic(path: &Path) -> Result<FileFormat, CodecError> {
    let mut file = File::open(path).map_err(|e| {
        CodecError::io("FormatDetection", format!("Failed to open file: {e}"))
    })?;

    let mut header = [0u8; 64];
    let n = file.read(&mut header).map_err(|e| {
        CodecError::io("FormatDetection", format!("Failed to read header: {e}"))
    })?;

    Ok(detect_from_header(&header[..n]))
}

fn detect_from_extension(path: &Path) -> FileFormat {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| match ext.to_lowercase().as_str() {
            "wpilog" => FileFormat::Wpilog,
            "json" => FileFormat::Json,
            _ => FileFormat::Unknown,
        })
        .unwrap_or(FileFormat::Unknown)
}

/// Check if a file starts with a supported WPILOG header.
///
/// Unlike [`detect_format`] this never trusts the extension.
pub fn is_wpilog_file<P: AsRef<Path>>(path: P) -> bool {
    let Ok(mut file) = File::open(path) else {
        return false;
    };
    let mut header = [0u8; FILE_HEADER_SIZE];
    file.read_exact(&mut header).is_ok() && header.starts_with(WPILOG_MAGIC) && is_valid(&header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn create_temp_file(name: &str, ext: &str, data: &[u8]) -> String {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "wpilog_test_detect_{}_{}.{}",
            std::process::id(),
            name,
            ext
        ));
        {
            let mut temp_file = File::create(&path).unwrap();
            temp_file.write_all(data).unwrap();
            temp_file.flush().unwrap();
        }
        path.to_str().unwrap().to_string()
    }

    const EMPTY_LOG: &[u8] = b"WPILOG\x00\x01\x00\x00\x00\x00";

    #[test]
    fn test_detect_from_magic_wpilog() {
        let path = create_temp_file("magic", "bin", EMPTY_LOG);

        assert_eq!(detect_format(&path).unwrap(), FileFormat::Wpilog);
        assert!(is_wpilog_file(&path));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_wrong_version_not_wpilog() {
        let path = create_temp_file("version", "bin", b"WPILOG\x00\x02\x00\x00\x00\x00");

        assert_eq!(detect_format(&path).unwrap(), FileFormat::Unknown);
        assert!(!is_wpilog_file(&path));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_detect_from_extension() {
        let path = create_temp_file("ext", "wpilog", b"dummy content");

        assert_eq!(detect_format(&path).unwrap(), FileFormat::Wpilog);
        // content check ignores the extension
        assert!(!is_wpilog_file(&path));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_detect_json() {
        let path = create_temp_file("json", "txt", b"  {\"children\": {}}");
        assert_eq!(detect_format(&path).unwrap(), FileFormat::Json);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_unknown_format() {
        let path = create_temp_file("unknown", "xyz", b"unknown content");

        assert_eq!(detect_format(&path).unwrap(), FileFormat::Unknown);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file() {
        assert_eq!(
            detect_format("/nonexistent/match.wpilog").unwrap(),
            FileFormat::Wpilog
        );
        assert!(!is_wpilog_file("/nonexistent/match.wpilog"));
    }
}
