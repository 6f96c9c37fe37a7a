//! PubMed ID単位のレビューシート
//!
//! 論文に属する研究を研究ID順に出力する。列名 `STUDY_ACCCESSION` の綴りは
//! 既存のレビューシートと揃えている。

use super::tables::CatalogTables;
use crate::error::{Result, TraitToolsError};
use crate::export::write_atomically;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

pub const REVIEW_HEADERS: [&str; 8] = [
    "STUDY_ID",
    "STUDY_ACCCESSION",
    "DUP_TAG",
    "REPORTED_TRAIT",
    "EFO_TRAIT",
    "MAPPED_TRAIT",
    "PUBMED_ID",
    "FIRST_AUTHOR",
];

pub const NOT_YET_ASSIGNED: &str = "Not yet assigned";
pub const NONE: &str = "None";
pub const DEFAULT_USERNAME: &str = "gwas-curator";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewRow {
    pub study_id: i64,
    pub accession: String,
    pub dup_tag: String,
    pub reported_trait: String,
    /// EFOのショートフォーム（`MAPPED_TRAIT` と同じ順）
    pub efo_trait: String,
    pub mapped_trait: String,
    pub pubmed_id: String,
    pub first_author: String,
}

impl ReviewRow {
    fn fields(&self) -> [String; 8] {
        [
            self.study_id.to_string(),
            self.accession.clone(),
            self.dup_tag.clone(),
            self.reported_trait.clone(),
            self.efo_trait.clone(),
            self.mapped_trait.clone(),
            self.pubmed_id.clone(),
            self.first_author.clone(),
        ]
    }
}

pub fn build_review(tables: &CatalogTables, pmid: &str) -> Result<Vec<ReviewRow>> {
    let pmid = pmid.trim();
    if pmid.is_empty() {
        return Err(TraitToolsError::InvalidInput("PubMed IDが空です".to_string()));
    }

    let rows: Vec<ReviewRow> = tables
        .studies()
        .iter()
        .filter_map(|study| tables.context(study))
        .filter(|ctx| ctx.publication.pubmed_id.as_deref() == Some(pmid))
        .map(|ctx| {
            let id = ctx.study.id;
            let efo = tables.efo_traits(id);
            let (mapped, short_forms): (Vec<&str>, Vec<&str>) = efo
                .iter()
                .filter_map(|t| Some((t.label.as_deref()?, t.short_form.as_deref().unwrap_or_default())))
                .unzip();

            ReviewRow {
                study_id: id,
                accession: ctx
                    .study
                    .accession_id
                    .clone()
                    .unwrap_or_else(|| NOT_YET_ASSIGNED.to_string()),
                dup_tag: tables.dup_tag(id).unwrap_or(NONE).to_string(),
                reported_trait: join_or_none(&tables.reported_traits(id)),
                efo_trait: join_or_none(&short_forms),
                mapped_trait: join_or_none(&mapped),
                pubmed_id: pmid.to_string(),
                first_author: ctx.first_author.fullname.clone().unwrap_or_default(),
            }
        })
        .collect();

    if rows.is_empty() {
        warn!(pmid, "no studies found for publication");
    }
    debug!(pmid, count = rows.len(), "review rows built");
    Ok(rows)
}

pub fn write_review<W: Write>(rows: &[ReviewRow], writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(REVIEW_HEADERS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_review_file(rows: &[ReviewRow], path: &Path) -> Result<()> {
    write_atomically(path, |w| write_review(rows, w))
}

/// `{pmid}_{username}_{YYYY-MM-DD-HH-MM}.csv`
///
/// ファイル名になるので区切り文字を含む値は `InvalidInput`。
pub fn review_file_name(pmid: &str, username: &str, at: NaiveDateTime) -> Result<String> {
    for (name, value) in [("PubMed ID", pmid), ("ユーザー名", username)] {
        if value.trim().is_empty() || value.contains(['/', '\\']) {
            return Err(TraitToolsError::InvalidInput(format!(
                "{}はファイル名に使えません: {:?}",
                name, value
            )));
        }
    }
    Ok(format!(
        "{}_{}_{}.csv",
        pmid.trim(),
        username.trim(),
        at.format("%Y-%m-%d-%H-%M")
    ))
}

/// 端末表示用に列幅を揃えた表
pub fn render_table(rows: &[ReviewRow]) -> String {
    let body: Vec<[String; 8]> = rows.iter().map(ReviewRow::fields).collect();

    let mut widths = REVIEW_HEADERS.map(|h| h.chars().count());
    for fields in &body {
        for (w, f) in widths.iter_mut().zip(fields) {
            *w = (*w).max(f.chars().count());
        }
    }

    let header = REVIEW_HEADERS.map(str::to_string);
    std::iter::once(&header)
        .chain(body.iter())
        .map(|fields| {
            let line = fields
                .iter()
                .zip(widths)
                .map(|(f, w)| format!("{:<width$}", f, width = w))
                .collect::<Vec<_>>()
                .join("  ");
            format!("{}\n", line.trim_end())
        })
        .collect()
}

fn join_or_none(labels: &[&str]) -> String {
    if labels.is_empty() {
        NONE.to_string()
    } else {
        labels.join(", ")
    }
}
