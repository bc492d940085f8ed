use anyhow::Context;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Extension used when the uploaded file name has none we can read
pub const DEFAULT_EXTENSION: &str = "xlsx";

/// File name prefix of every staged upload
pub const STAGING_PREFIX: &str = "rack-upload-";

const SUPPORTED_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// An uploaded workbook written to its own temporary file
///
/// The file lives exactly as long as this value: dropping it closes the
/// handle and deletes the file, whichever way the request ends.
pub struct StagedUpload {
    file: NamedTempFile,
}

impl StagedUpload {
    /// Stage in the system temp directory
    pub fn write(bytes: &[u8], extension: &str) -> anyhow::Result<StagedUpload> {
        Self::write_in(&std::env::temp_dir(), bytes, extension)
    }

    pub fn write_in(dir: &Path, bytes: &[u8], extension: &str) -> anyhow::Result<StagedUpload> {
        let mut file = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(&format!(".{extension}"))
            .tempfile_in(dir)
            .context("Cannot create staging file")?;

        file.write_all(bytes)
            .and_then(|_| file.flush())
            .context("Cannot write staging file")?;

        Ok(StagedUpload { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Pick the staging extension from the client's file name
///
/// The workbook reader is chosen by extension, so unknown or missing
/// extensions fall back to xlsx.
pub fn staging_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .filter(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}
