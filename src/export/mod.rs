pub mod match_csv;
pub mod reported_traits;

pub use match_csv::{write_match_csv, write_match_file, MATCH_HEADERS};
pub use reported_traits::{write_reported_trait_file, write_reported_traits, REPORTED_TRAIT_FILE};

use crate::error::{Result, TraitToolsError};
use chrono::NaiveDate;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// 日付入りのファイル名 `{prefix}_{dd-mm-YYYY}.{ext}`
pub fn dated_file_name(prefix: &str, date: NaiveDate, extension: &str) -> String {
    format!("{}_{}.{}", prefix, date.format("%d-%m-%Y"), extension)
}

/// 今日の日付入りファイル名
pub fn dated_file_name_today(prefix: &str, extension: &str) -> String {
    dated_file_name(prefix, chrono::Local::now().date_naive(), extension)
}

/// 出力先がディレクトリならその中に既定名で、ファイルならそのまま
pub fn output_path_for(output: &Path, default_name: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(default_name)
    } else {
        output.to_path_buf()
    }
}

/// 同じディレクトリの一時ファイルに書いてから置き換える
///
/// `write` が失敗した場合や途中で落ちた場合、既存ファイルは元のまま残る。
/// 既存ファイルがあればそのパーミッションを引き継ぐ。
pub(crate) fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent)?;

    let mut tmp = tempfile::NamedTempFile::new_in(&parent)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;

    if let Ok(meta) = std::fs::metadata(path) {
        std::fs::set_permissions(tmp.path(), meta.permissions())?;
    }
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
