//! Archive Module
//!
//! 複数の成果物を1つのZIPアーカイブにまとめる。

use std::io::{Cursor, Write};

use tracing::debug;
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

use crate::api::ArchiveCompression;
use crate::error::Base64ZeroError;
use crate::security::validate_zip_path;
use crate::types::ExportArtifact;

/// 成果物をZIPアーカイブにまとめる
///
/// エントリは渡された順に書き込まれます。
///
/// # エラー
///
/// * `Base64ZeroError::NoArtifactsToBundle` - 成果物が1つもない場合
/// * `Base64ZeroError::SecurityViolation` - エントリ名が安全でない場合
/// * `Base64ZeroError::Zip` - アーカイブの書き込みに失敗した場合
pub fn bundle_archive(
    artifacts: &[ExportArtifact],
    compression: ArchiveCompression,
) -> Result<Vec<u8>, Base64ZeroError> {
    if artifacts.is_empty() {
        return Err(Base64ZeroError::NoArtifactsToBundle);
    }

    let method = match compression {
        ArchiveCompression::Stored => CompressionMethod::Stored,
        ArchiveCompression::Deflated => CompressionMethod::Deflated,
    };
    let options = FileOptions::default().compression_method(method);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for artifact in artifacts {
        validate_zip_path(&artifact.name).map_err(Base64ZeroError::SecurityViolation)?;
        zip.start_file(artifact.name.as_str(), options)?;
        zip.write_all(&artifact.bytes)?;
    }
    let buffer = zip.finish()?.into_inner();

    debug!(entries = artifacts.len(), size = buffer.len(), "Bundled archive");
    Ok(buffer)
}
