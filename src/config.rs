use crate::error::{Result, TraitToolsError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 照合結果の区切り文字（既定）
pub const DEFAULT_SEPARATOR: &str = "; ";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// `Similarity results` 列の区切り文字
    pub separator: String,
    /// 出力先ディレクトリ（未指定時はカレント）
    pub output_dir: Option<PathBuf>,
    /// 進捗バーを表示する
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.into(),
            output_dir: None,
            show_progress: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// 指定パスから読み込み（無ければ既定値）
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| TraitToolsError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("gwas-trait-tools").join("config.json"))
    }

    /// 出力ファイル名を出力先ディレクトリで解決
    pub fn resolve_output(&self, file_name: &str) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        }
    }
}
