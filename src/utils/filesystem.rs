use crate::utils::{Error, Result};
use std::path::{Path, PathBuf};
use uuid::Uuid;
use walkdir::WalkDir;

const VIDEO_EXTENSIONS: &[&str] = &["mkv", "mp4", "m4v", "mov", "avi", "webm", "ts", "m2ts"];

/// Expands an input path into the video files to slim. A file is taken as-is;
/// a directory is walked recursively and sorted.
pub fn find_video_files<P: AsRef<Path>>(path: P) -> Result<Vec<PathBuf>> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(Error::validation(format!(
            "Path does not exist: {}",
            path.display()
        )));
    }

    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut video_files: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && is_video_file(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    if video_files.is_empty() {
        return Err(Error::validation(format!(
            "No supported video files found in directory: {}",
            path.display()
        )));
    }

    video_files.sort();
    Ok(video_files)
}

pub fn is_video_file<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| VIDEO_EXTENSIONS.contains(&extension.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// `<stem>_<uuid>.<ext>` next to the input, or inside `output_dir`.
pub fn generate_uuid_filename<P: AsRef<Path>, Q: AsRef<Path>>(
    input_path: P,
    output_dir: Option<Q>,
) -> PathBuf {
    let input_path = input_path.as_ref();

    let file_stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let extension = input_path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("mkv");

    let filename = format!("{}_{}.{}", file_stem, Uuid::new_v4(), extension);

    match output_dir {
        Some(output_dir) => output_dir.as_ref().join(filename),
        None => input_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(filename),
    }
}

/// Output path for `input`, found under the batch root `root`.
///
/// `output` is a directory when slimming a batch or when it already is one.
/// Batch outputs keep their path relative to `root`, so files with the same
/// name in different subdirectories never collide.
pub fn output_path_for(
    input: &Path,
    root: &Path,
    output: Option<&Path>,
    batch: bool,
) -> PathBuf {
    match output {
        Some(output) if batch => match input.strip_prefix(root) {
            Ok(relative) if relative.file_name().is_some() => output.join(relative),
            _ => output_in_dir(input, output),
        },
        Some(output) if output.is_dir() => output_in_dir(input, output),
        Some(output) => output.to_path_buf(),
        None => generate_uuid_filename(input, None::<&Path>),
    }
}

fn output_in_dir(input: &Path, output_dir: &Path) -> PathBuf {
    match input.file_name() {
        Some(name) => output_dir.join(name),
        None => generate_uuid_filename(input, Some(output_dir)),
    }
}

pub fn ensure_output_dir<P: AsRef<Path>>(path: P) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

pub fn get_file_size<P: AsRef<Path>>(path: P) -> Result<u64> {
    Ok(std::fs::metadata(path)?.len())
}

pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let size = bytes as f64;
    let unit_index = (size.log(THRESHOLD) as usize).min(UNITS.len() - 1);
    let size_in_unit = size / THRESHOLD.powi(unit_index as i32);

    format!("{:.2} {}", size_in_unit, UNITS[unit_index])
}
