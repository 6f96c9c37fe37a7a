//! 照合結果CSV
//!
//! 2列: `Reported Trait`, `Similarity results`。候補の入力順に1行ずつ。
//! 結果列は `label -- 0.87` を区切り文字で連結したもの。

use super::write_atomically;
use crate::error::Result;
use gwas_trait_common::MatchReport;
use std::io::Write;
use std::path::Path;

pub const MATCH_HEADERS: [&str; 2] = ["Reported Trait", "Similarity results"];

pub fn write_match_csv<W: Write>(report: &MatchReport, writer: W, separator: &str) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(MATCH_HEADERS)?;

    for (candidate, matches) in report.iter() {
        let joined = matches
            .iter()
            .map(|m| m.display_entry())
            .collect::<Vec<_>>()
            .join(separator);
        wtr.write_record([candidate, joined.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_match_file(report: &MatchReport, path: &Path, separator: &str) -> Result<()> {
    write_atomically(path, |w| write_match_csv(report, w, separator))
}
