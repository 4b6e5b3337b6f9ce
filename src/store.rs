//! JSONファイルによるキーバリューストア
//!
//! ブラウザの localStorage と同じキー・同じ値（JSON文字列）を
//! 1つのJSONオブジェクトとして保存する。
//! 書き込みは一時ファイルに書いてから置き換える。

use boardcheck_common::{KeyValueStore, StorageError};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let file = File::open(&self.path).map_err(|e| StorageError::Unavailable(e.to_string()))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| StorageError::Backend(e.to_string()))
    }

    fn save(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::Unavailable(e.to_string()))?;
        }

        let tmp_path = self.sibling("tmp");
        let file = File::create(&tmp_path).map_err(|e| StorageError::Unavailable(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, items).map_err(|e| StorageError::Backend(e.to_string()))?;
        writer
            .flush()
            .and_then(|_| writer.get_ref().sync_all())
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        drop(writer);

        std::fs::rename(&tmp_path, &self.path).map_err(|e| StorageError::Unavailable(e.to_string()))
    }

    /// 壊れたファイルを退避して空から始める
    fn quarantine(&self, err: &StorageError) -> Result<BTreeMap<String, String>, StorageError> {
        let backup = self.backup_path();
        tracing::warn!(
            path = %self.path.display(),
            backup = %backup.display(),
            error = %err,
            "Store file is unreadable, moving it aside"
        );
        std::fs::rename(&self.path, &backup).map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(BTreeMap::new())
    }

    /// store.json → store.json.<suffix>
    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".");
        name.push(suffix);
        PathBuf::from(name)
    }

    /// 退避済みの壊れたファイル
    pub fn backup_path(&self) -> PathBuf {
        self.sibling("corrupt")
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = match self.load() {
            Ok(items) => items,
            Err(err @ StorageError::Backend(_)) => self.quarantine(&err)?,
            Err(err) => return Err(err),
        };
        items.insert(key.to_string(), value.to_string());
        self.save(&items)
    }
}
