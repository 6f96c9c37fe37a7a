//! キュレーションキュー一覧
//!
//! 未公開（`IS_PUBLISHED = 0`）の研究を研究ID順に1行ずつ出力する。
//! 形質・人数が無い欄は `No values`、関連数は0件でも数値。

use super::format_date;
use super::tables::CatalogTables;
use crate::export::write_atomically;
use crate::error::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::debug;

pub const QUEUE_HEADERS: [&str; 16] = [
    "STUDY_ID",
    "STUDY_CREATION_DATE",
    "PUBMEDID",
    "FIRST_AUTHOR",
    "PUBLICATION_DATE",
    "JOURNAL",
    "TITLE",
    "REPORTED_TRAIT",
    "EFO_TRAIT",
    "ASSOCIATION_COUNT",
    "NUMBER_OF_INDIVIDUALS_INITIAL",
    "NUMBER_OF_INDIVIDUALS_REPLICATION",
    "USER_REQUESTED?",
    "FULL P-VALUE SET?",
    "CURATION_STATUS",
    "IS_OPEN_TARGETS?",
];

pub const NO_VALUES: &str = "No values";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// キュー1行（列順は `QUEUE_HEADERS` と同じ）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueRow {
    pub study_id: i64,
    pub study_creation_date: String,
    pub pubmed_id: String,
    pub first_author: String,
    pub publication_date: String,
    pub journal: String,
    pub title: String,
    pub reported_trait: String,
    pub efo_trait: String,
    pub association_count: usize,
    pub individuals_initial: String,
    pub individuals_replication: String,
    pub user_requested: String,
    pub full_pvalue_set: String,
    pub curation_status: String,
    pub open_targets: String,
}

pub fn build_curation_queue(tables: &CatalogTables) -> Vec<QueueRow> {
    let rows: Vec<QueueRow> = tables
        .studies()
        .iter()
        .filter_map(|study| tables.context(study))
        .filter(|ctx| ctx.housekeeping.is_published == Some(0))
        .map(|ctx| {
            let id = ctx.study.id;
            let efo: Vec<&str> = tables
                .efo_traits(id)
                .into_iter()
                .filter_map(|t| t.label.as_deref())
                .collect();

            QueueRow {
                study_id: id,
                study_creation_date: format_date(ctx.housekeeping.study_added_date.as_deref(), DATE_FORMAT),
                pubmed_id: text(&ctx.publication.pubmed_id),
                first_author: text(&ctx.first_author.fullname),
                publication_date: format_date(ctx.publication.publication_date.as_deref(), DATE_FORMAT),
                journal: text(&ctx.publication.publication),
                title: text(&ctx.publication.title),
                reported_trait: join_or_no_values(&tables.reported_traits(id)),
                efo_trait: join_or_no_values(&efo),
                association_count: tables.association_count(id),
                individuals_initial: count_or_no_values(tables.individuals(id, "initial")),
                individuals_replication: count_or_no_values(tables.individuals(id, "replication")),
                user_requested: text(&ctx.study.user_requested),
                full_pvalue_set: text(&ctx.study.full_pvalue_set),
                curation_status: text(&ctx.curation_status.status),
                open_targets: text(&ctx.study.open_targets),
            }
        })
        .collect();

    debug!(count = rows.len(), "curation queue built");
    rows
}

pub fn write_curation_queue<W: Write>(rows: &[QueueRow], writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(QUEUE_HEADERS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_curation_queue_file(rows: &[QueueRow], path: &Path) -> Result<()> {
    write_atomically(path, |w| write_curation_queue(rows, w))
}

/// `data_queue_{YYYY-MM-DD}.csv`
pub fn queue_file_name(date: NaiveDate) -> String {
    format!("data_queue_{}.csv", date.format("%Y-%m-%d"))
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn join_or_no_values(labels: &[&str]) -> String {
    if labels.is_empty() {
        NO_VALUES.to_string()
    } else {
        labels.join(", ")
    }
}

fn count_or_no_values(count: Option<i64>) -> String {
    count.map_or_else(|| NO_VALUES.to_string(), |n| n.to_string())
}
