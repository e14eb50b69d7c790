//! Archive extraction.
//!
//! Every entry is written below the destination directory, replacing
//! files that already exist. Entry paths are sanitized before use: leading
//! components are stripped as requested, and absolute paths or `..`
//! components are rejected. Symlinks may only point below their own
//! directory, and nothing is ever written through a symlinked directory.

use crate::error::{Error, Result};
use crate::types::{ArchiveFormat, ExtractOptions, ExtractSummary};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

/// Extract `archive` into `dest`.
///
/// The format comes from `options.format`, else the file name, else the
/// leading magic bytes. `dest` is created if missing.
pub fn extract(archive: &Path, dest: &Path, options: &ExtractOptions) -> Result<ExtractSummary> {
    let format = match options.format {
        Some(format) => format,
        None => detect_format(archive)?,
    };
    log::debug!(
        "Extracting {} ({}) into {}",
        archive.display(),
        format,
        dest.display()
    );

    fs::create_dir_all(dest).map_err(|e| Error::io(dest, e))?;
    let file = File::open(archive).map_err(|e| Error::io(archive, e))?;

    let mut summary = match format {
        ArchiveFormat::Zip => extract_zip(file, dest, options.strip_components)?,
        ArchiveFormat::TarGz => {
            let decoder = flate2::read::GzDecoder::new(file);
            extract_tar(decoder, dest, options.strip_components)?
        }
        ArchiveFormat::TarZst => {
            let decoder = zstd::Decoder::new(file)
                .map_err(|e| Error::ExtractionFailed(format!("invalid zstd stream: {}", e)))?;
            extract_tar(decoder, dest, options.strip_components)?
        }
    };
    summary.format = Some(format);

    log::debug!(
        "Extracted {} files, {} directories ({} skipped)",
        summary.files,
        summary.directories,
        summary.skipped
    );
    Ok(summary)
}

/// Determine the format of an archive on disk.
pub fn detect_format(archive: &Path) -> Result<ArchiveFormat> {
    if let Some(format) = ArchiveFormat::from_path(archive) {
        return Ok(format);
    }

    let mut magic = [0u8; 4];
    let mut file = File::open(archive).map_err(|e| Error::io(archive, e))?;
    let read = file.read(&mut magic).map_err(|e| Error::io(archive, e))?;

    ArchiveFormat::from_magic(&magic[..read])
        .ok_or_else(|| Error::UnsupportedFormat(archive.to_path_buf()))
}

/// Turn an archive entry path into a relative path below the destination.
///
/// Returns `Ok(None)` when nothing is left after stripping.
fn sanitize_entry(raw: &Path, strip: usize) -> Result<Option<PathBuf>> {
    let mut relative = PathBuf::new();
    let mut seen = 0usize;

    for component in raw.components() {
        match component {
            Component::Normal(part) => {
                seen += 1;
                if seen > strip {
                    relative.push(part);
                }
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(Error::UnsafeEntry(raw.display().to_string()));
            }
        }
    }

    if relative.as_os_str().is_empty() {
        Ok(None)
    } else {
        Ok(Some(relative))
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    Ok(())
}

/// Fail if a directory between `dest` and the entry is a symlink.
fn check_parents(dest: &Path, relative: &Path) -> Result<()> {
    let Some(parents) = relative.parent() else {
        return Ok(());
    };
    let mut current = dest.to_path_buf();
    for component in parents.components() {
        current.push(component);
        if fs::symlink_metadata(&current).is_ok_and(|meta| meta.file_type().is_symlink()) {
            return Err(Error::UnsafeEntry(format!(
                "{} (through symlink {})",
                relative.display(),
                current.display()
            )));
        }
    }
    Ok(())
}

/// Symlink targets must be relative and free of `..`.
fn check_link_target(raw: &Path, link: &Path) -> Result<()> {
    let escapes = link.components().any(|component| {
        matches!(
            component,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(Error::UnsafeEntry(format!(
            "{} -> {}",
            raw.display(),
            link.display()
        )));
    }
    Ok(())
}

/// Remove a file or symlink left by a previous extraction.
///
/// Read-only files cannot be reopened for writing, but they can be unlinked.
fn remove_existing(target: &Path) -> Result<()> {
    match fs::symlink_metadata(target) {
        Ok(meta) if !meta.is_dir() => fs::remove_file(target).map_err(|e| Error::io(target, e)),
        _ => Ok(()),
    }
}

fn extract_zip(file: File, dest: &Path, strip: usize) -> Result<ExtractSummary> {
    let mut archive = zip::ZipArchive::new(file)?;
    let mut summary = ExtractSummary::default();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let name = entry.name().to_string();

        // Zip names always use forward slashes; backslashes show up in
        // archives produced by some Windows tools.
        let raw = PathBuf::from(name.replace('\\', "/"));
        let Some(relative) = sanitize_entry(&raw, strip)? else {
            summary.skipped += 1;
            continue;
        };
        check_parents(dest, &relative)?;
        let target = dest.join(&relative);

        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
            summary.directories += 1;
            continue;
        }

        ensure_parent(&target)?;
        remove_existing(&target)?;
        let mut out = File::create(&target).map_err(|e| Error::io(&target, e))?;
        let written = io::copy(&mut entry, &mut out).map_err(|e| Error::io(&target, e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                fs::set_permissions(&target, fs::Permissions::from_mode(mode & 0o777))
                    .map_err(|e| Error::io(&target, e))?;
            }
        }

        summary.files += 1;
        summary.bytes += written;
    }

    Ok(summary)
}

fn extract_tar<R: Read>(reader: R, dest: &Path, strip: usize) -> Result<ExtractSummary> {
    let mut archive = tar::Archive::new(reader);
    archive.set_overwrite(true);
    let mut summary = ExtractSummary::default();

    let entries = archive
        .entries()
        .map_err(|e| Error::ExtractionFailed(e.to_string()))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| Error::ExtractionFailed(e.to_string()))?;
        let raw = entry
            .path()
            .map_err(|e| Error::ExtractionFailed(e.to_string()))?
            .into_owned();

        let Some(relative) = sanitize_entry(&raw, strip)? else {
            summary.skipped += 1;
            continue;
        };
        check_parents(dest, &relative)?;
        let target = dest.join(&relative);
        let entry_type = entry.header().entry_type();

        if entry_type.is_dir() {
            fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
            summary.directories += 1;
        } else if entry_type.is_file() || entry_type.is_symlink() {
            if entry_type.is_symlink() {
                let link = entry
                    .link_name()
                    .map_err(|e| Error::ExtractionFailed(e.to_string()))?
                    .ok_or_else(|| {
                        Error::ExtractionFailed(format!("symlink {} has no target", raw.display()))
                    })?;
                check_link_target(&raw, &link)?;
            }
            ensure_parent(&target)?;
            remove_existing(&target)?;
            let size = entry.size();
            entry.unpack(&target).map_err(|e| Error::io(&target, e))?;
            if entry_type.is_file() {
                summary.files += 1;
                summary.bytes += size;
            }
        } else {
            log::debug!("Skipping unsupported tar entry {}", raw.display());
            summary.skipped += 1;
        }
    }

    Ok(summary)
}
