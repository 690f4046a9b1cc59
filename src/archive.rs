use crate::error::{ForgeError, Result};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Zip every image file sitting directly in `source_dir` into a deflate
/// archive at `archive_path`, creating missing parent directories for the
/// archive. With `sorted` set (the pipeline default), entries are ordered
/// lexicographically by filename so `creative_01.png … creative_NN.png`
/// always appear in sequence. Entry names carry no directory components.
/// Source files are left in place.
pub fn package_creatives(source_dir: &Path, archive_path: &Path, sorted: bool) -> Result<PathBuf> {
    if !source_dir.is_dir() {
        return Err(ForgeError::NotFound(format!(
            "Folder does not exist: {}",
            source_dir.display()
        )));
    }

    let mut files = collect_image_files(source_dir)?;
    if sorted {
        files.sort_by(|a, b| a.0.cmp(&b.0));
    }

    if let Some(parent) = archive_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let archive = File::create(archive_path)?;
    let mut writer = ZipWriter::new(archive);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, path) in &files {
        writer
            .start_file(name.as_str(), options)
            .map_err(|e| ForgeError::Packaging(format!("Failed to add {}: {}", name, e)))?;
        let mut source = File::open(path)?;
        io::copy(&mut source, &mut writer)?;
    }

    writer
        .finish()
        .map_err(|e| ForgeError::Packaging(format!("Failed to finalize archive: {}", e)))?;

    log::info!(
        "Packaged {} creatives into {}",
        files.len(),
        archive_path.display()
    );

    Ok(archive_path.to_path_buf())
}

/// PNG/JPG/JPEG files directly inside the directory, extensions matched
/// case-insensitively, no recursion.
fn collect_image_files(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let path = entry.path();
        let is_image = path
            .extension()
            .and_then(|e| e.to_str())
            .map_or(false, |ext| {
                IMAGE_EXTENSIONS.iter().any(|m| ext.eq_ignore_ascii_case(m))
            });
        if !is_image {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        files.push((name, path));
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zip::ZipArchive;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"pixels").unwrap();
    }

    fn entry_names(archive_path: &Path) -> Vec<String> {
        let mut archive = ZipArchive::new(File::open(archive_path).unwrap()).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn entries_are_sorted_by_filename() {
        let tmp = tempfile::TempDir::new().unwrap();
        touch(tmp.path(), "b.png");
        touch(tmp.path(), "a.jpg");
        touch(tmp.path(), "c.PNG");

        let archive_path = tmp.path().join("out.zip");
        package_creatives(tmp.path(), &archive_path, true).unwrap();

        assert_eq!(entry_names(&archive_path), vec!["a.jpg", "b.png", "c.PNG"]);
    }

    #[test]
    fn missing_source_dir_is_not_found() {
        let tmp = tempfile::TempDir::new().unwrap();
        let result = package_creatives(
            &tmp.path().join("nope"),
            &tmp.path().join("out.zip"),
            true,
        );
        assert!(matches!(result, Err(ForgeError::NotFound(_))));
    }

    #[test]
    fn file_as_source_is_not_found() {
        let tmp = tempfile::TempDir::new().unwrap();
        touch(tmp.path(), "file.png");
        let result = package_creatives(
            &tmp.path().join("file.png"),
            &tmp.path().join("out.zip"),
            true,
        );
        assert!(matches!(result, Err(ForgeError::NotFound(_))));
    }

    #[test]
    fn empty_dir_builds_a_valid_empty_archive() {
        let tmp = tempfile::TempDir::new().unwrap();
        let archive_path = tmp.path().join("out.zip");
        package_creatives(tmp.path(), &archive_path, true).unwrap();

        assert!(entry_names(&archive_path).is_empty());
    }

    #[test]
    fn non_images_and_subdirectories_are_skipped() {
        let tmp = tempfile::TempDir::new().unwrap();
        touch(tmp.path(), "keep.png");
        touch(tmp.path(), "notes.txt");
        touch(tmp.path(), "noext");
        std::fs::create_dir(tmp.path().join("nested")).unwrap();
        touch(&tmp.path().join("nested"), "skip.png");

        let archive_path = tmp.path().join("out.zip");
        package_creatives(tmp.path(), &archive_path, true).unwrap();

        assert_eq!(entry_names(&archive_path), vec!["keep.png"]);
    }

    #[test]
    fn mixed_case_extensions_are_accepted() {
        let tmp = tempfile::TempDir::new().unwrap();
        touch(tmp.path(), "a.JpEg");
        touch(tmp.path(), "b.Png");

        let archive_path = tmp.path().join("out.zip");
        package_creatives(tmp.path(), &archive_path, true).unwrap();

        assert_eq!(entry_names(&archive_path), vec!["a.JpEg", "b.Png"]);
    }

    #[test]
    fn archive_parent_dirs_are_created_and_sources_kept() {
        let tmp = tempfile::TempDir::new().unwrap();
        touch(tmp.path(), "a.png");

        let archive_path = tmp.path().join("deep").join("nested").join("out.zip");
        let returned = package_creatives(tmp.path(), &archive_path, true).unwrap();

        assert_eq!(returned, archive_path);
        assert!(archive_path.is_file());
        assert!(tmp.path().join("a.png").is_file());
    }
}
