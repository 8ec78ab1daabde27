use crate::error::{PpiFilterError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 入力JSONLファイル
#[derive(Debug, Clone)]
pub struct InputFile {
    pub path: PathBuf,
    pub file_name: String,
}

/// 入力フォルダ直下のファイルを列挙（隠しファイルは除外）
pub fn scan_folder(folder: &Path) -> Result<Vec<InputFile>> {
    if !folder.is_dir() {
        return Err(PpiFilterError::FolderNotFound(folder.display().to_string()));
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().to_string();
        if file_name.starts_with('.') {
            continue;
        }

        files.push(InputFile {
            path: path.to_path_buf(),
            file_name,
        });
    }

    // ファイル名でソート
    files.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_scan_folder_not_found() {
        let result = scan_folder(Path::new("/nonexistent/folder"));
        assert!(matches!(result, Err(PpiFilterError::FolderNotFound(_))));
    }

    #[test]
    fn test_scan_folder_empty() {
        let dir = tempfile::tempdir().unwrap();
        let result = scan_folder(dir.path()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_files_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.jsonl"), "{}\n").unwrap();
        fs::write(dir.path().join("a.jsonl"), "{}\n").unwrap();
        fs::write(dir.path().join(".hidden"), "").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("c.jsonl"), "{}\n").unwrap();

        let result = scan_folder(dir.path()).unwrap();
        let names: Vec<&str> = result.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.jsonl", "b.jsonl"]);
    }
}
