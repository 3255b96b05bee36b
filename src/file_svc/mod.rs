use std::{collections::HashSet, io::ErrorKind, path::Path};

///
/// Names of the directories directly under `output_root`. A missing root
/// yields an empty set.
///
pub async fn existing_backup_dirs(output_root: &Path) -> std::io::Result<HashSet<String>> {
    let mut dirs = HashSet::new();
    let mut entries = match tokio::fs::read_dir(output_root).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(dirs),
        Err(e) => return Err(e),
    };

    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_dir() {
            continue;
        }
        // non UTF-8 names can never match a composite key
        if let Some(name) = entry.file_name().to_str() {
            dirs.insert(name.to_string());
        }
    }

    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lists_only_directories() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("com.a_1.0")).unwrap();
        std::fs::write(root.path().join("existed_list.txt"), "").unwrap();

        let dirs = existing_backup_dirs(root.path()).await.unwrap();
        assert_eq!(dirs, HashSet::from(["com.a_1.0".to_string()]));
    }

    #[tokio::test]
    async fn test_missing_root_is_empty() {
        let root = tempfile::tempdir().unwrap();
        let dirs = existing_backup_dirs(&root.path().join("absent")).await.unwrap();
        assert!(dirs.is_empty());
    }
}
