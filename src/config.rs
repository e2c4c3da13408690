//! Resolved runtime paths.

use std::path::PathBuf;

use crate::storage::FileStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the persisted board.
    pub data_dir: PathBuf,
    /// Directory exports are written to.
    pub export_dir: PathBuf,
    /// Log file for the interactive board.
    pub log_file: PathBuf,
}

impl Config {
    pub fn new(
        data_dir: PathBuf,
        export_dir: Option<PathBuf>,
        log_file: Option<PathBuf>,
    ) -> Self {
        Self {
            export_dir: export_dir.unwrap_or_else(|| data_dir.clone()),
            log_file: log_file.unwrap_or_else(|| data_dir.join("kanban.log")),
            data_dir,
        }
    }

    pub fn store(&self) -> FileStore {
        FileStore::new(&self.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_follow_data_dir() {
        let config = Config::new(PathBuf::from("/tmp/board"), None, None);
        assert_eq!(config.export_dir, PathBuf::from("/tmp/board"));
        assert_eq!(config.log_file, PathBuf::from("/tmp/board/kanban.log"));
        assert_eq!(config.store().dir(), config.data_dir.as_path());
    }

    #[rstest]
    fn explicit_paths_win() {
        let config = Config::new(
            PathBuf::from("data"),
            Some(PathBuf::from("out")),
            Some(PathBuf::from("k.log")),
        );
        assert_eq!(config.export_dir, PathBuf::from("out"));
        assert_eq!(config.log_file, PathBuf::from("k.log"));
    }
}
