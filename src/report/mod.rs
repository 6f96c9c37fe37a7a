//! キュレーション用レポート
//!
//! カタログDBのテーブルダンプ（CSV、1テーブル1ファイル）から、キュレーター向けの
//! 一覧CSVを作る。
//!
//! - `curation_queue`: 未公開研究のキュー一覧 `data_queue_{YYYY-MM-DD}.csv`
//! - `review`: PubMed ID単位のレビューシート `{pmid}_{user}_{YYYY-MM-DD-HH-MM}.csv`

pub mod curation_queue;
pub mod review;
pub mod tables;

pub use curation_queue::{build_curation_queue, queue_file_name, write_curation_queue, write_curation_queue_file, QueueRow};
pub use review::{build_review, render_table, review_file_name, write_review, write_review_file, ReviewRow};
pub use tables::CatalogTables;

use chrono::{NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%d-%b-%y %I.%M.%S%.f %p"];
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d-%m-%Y", "%d-%b-%y"];

/// ダンプの日付・日時を `format` で整形する
///
/// 解釈できない値はそのまま、空欄は空文字列。
pub fn format_date(raw: Option<&str>, format: &str) -> String {
    let raw = match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return String::new(),
    };

    let date = DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok().map(|dt| dt.date()))
        .or_else(|| DATE_FORMATS.iter().find_map(|f| NaiveDate::parse_from_str(raw, f).ok()));

    match date {
        Some(d) => d.format(format).to_string(),
        None => raw.to_string(),
    }
}
