//! リンク表（`STUDY_EFO_TRAIT` のCSVダンプ）
//!
//! 書き戻し時はヘッダーと他の列をそのまま保持する。

use crate::error::{Result, TraitToolsError};
use crate::export::write_atomically;
use crate::source::{ensure_exists, require_column};
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LinkTable {
    headers: csv::StringRecord,
    rows: Vec<(i64, i64, csv::StringRecord)>,
}

impl LinkTable {
    /// `STUDY_ID,EFO_TRAIT_ID` を含むCSVから読み込み
    pub fn load(path: &Path) -> Result<Self> {
        ensure_exists(path)?;
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)?;
        let headers = rdr.headers()?.clone();
        let study_col = require_column(&headers, &["STUDY_ID"], path)?;
        let efo_col = require_column(&headers, &["EFO_TRAIT_ID"], path)?;

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let study_id = parse_id(&record, study_col, path)?;
            let efo_trait_id = parse_id(&record, efo_col, path)?;
            rows.push((study_id, efo_trait_id, record));
        }

        Ok(Self { headers, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, study_id: i64, efo_trait_id: i64) -> bool {
        self.rows
            .iter()
            .any(|(s, e, _)| *s == study_id && *e == efo_trait_id)
    }

    /// 指定ペアの行を取り除き、実際に存在したペアの数を返す
    pub fn remove_pairs(&mut self, pairs: &HashSet<(i64, i64)>) -> usize {
        let present: HashSet<(i64, i64)> = self
            .rows
            .iter()
            .map(|(s, e, _)| (*s, *e))
            .filter(|pair| pairs.contains(pair))
            .collect();
        self.rows.retain(|(s, e, _)| !pairs.contains(&(*s, *e)));
        present.len()
    }

    /// 一時ファイル経由で書き戻す（失敗時は元のファイルのまま）
    pub fn save(&self, path: &Path) -> Result<()> {
        write_atomically(path, |w| self.write_csv(w))
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.headers)?;
        for (_, _, record) in &self.rows {
            wtr.write_record(record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

fn parse_id(record: &csv::StringRecord, col: usize, path: &Path) -> Result<i64> {
    let raw = record.get(col).unwrap_or_default();
    raw.parse().map_err(|_| {
        TraitToolsError::InvalidInput(format!(
            "{}: IDが数値ではありません: {:?}",
            path.display(),
            raw
        ))
    })
}
