//! バックグラウンド形質リンク削除モジュール
//!
//! 研究ごとのバックグラウンド形質一覧（TSV）から、`STUDY_EFO_TRAIT` リンク表の
//! 削除対象 (study_id, efo_trait_id) を求め、ドライランまたはコミットで適用する。
//!
//! ## 処理フロー
//! 1. TSVを読み込み、アクセッション列と形質列（`||` 区切り）を取り出す
//! 2. アクセッション → STUDY.ID、形質ラベル（小文字）→ EFO_TRAIT.ID に解決
//! 3. 解決できないものは `Unresolved` として報告（処理は止めない）
//! 4. `ExecutionMode::Commit` のときだけリンク表を書き換える

pub mod links;

pub use links::LinkTable;

use crate::error::{Result, TraitToolsError};
use crate::source::{ensure_exists, require_column};
use gwas_trait_common::TraitLabel;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info, warn};

/// 形質列の区切り
pub const TRAIT_DELIMITER: &str = "||";

const ACCESSION_COLUMN: usize = 2;
const BACKGROUND_COLUMN: usize = 4;

/// 実行モード
///
/// 破壊的な書き込みは `Commit` を明示したときだけ行う。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    #[default]
    DryRun,
    Commit,
}

impl std::str::FromStr for ExecutionMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dry-run" | "dryrun" | "debug" => Ok(ExecutionMode::DryRun),
            "commit" | "production" => Ok(ExecutionMode::Commit),
            _ => Err(format!("Unknown mode: {}. Use dry-run or commit", s)),
        }
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionMode::DryRun => write!(f, "dry-run"),
            ExecutionMode::Commit => write!(f, "commit"),
        }
    }
}

/// TSVの1行分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundRow {
    pub accession: String,
    pub traits: Vec<String>,
}

/// バックグラウンド形質TSVを解析する
///
/// 1行目はヘッダー。形質列が空の行は対象外。
pub fn parse_background_file(content: &str) -> Result<Vec<BackgroundRow>> {
    let mut rows = Vec::new();

    for (i, line) in content.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() <= BACKGROUND_COLUMN {
            return Err(TraitToolsError::InvalidInput(format!(
                "{}行目: 列が不足しています（{}列）",
                i + 1,
                fields.len()
            )));
        }

        let background = fields[BACKGROUND_COLUMN].trim();
        if background.is_empty() {
            continue;
        }

        let traits = background
            .split(TRAIT_DELIMITER)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        rows.push(BackgroundRow {
            accession: fields[ACCESSION_COLUMN].trim().to_string(),
            traits,
        });
    }

    Ok(rows)
}

pub fn read_background_file(path: &Path) -> Result<Vec<BackgroundRow>> {
    ensure_exists(path)?;
    let content = std::fs::read_to_string(path)?;
    parse_background_file(&content)
}

/// アクセッション → STUDY.ID
#[derive(Debug, Clone, Default)]
pub struct StudyIndex {
    by_accession: HashMap<String, i64>,
}

impl StudyIndex {
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        Self {
            by_accession: pairs.into_iter().map(|(a, id)| (a.into(), id)).collect(),
        }
    }

    /// `ID,ACCESSION_ID` 形式のCSVから読み込み
    ///
    /// 同じアクセッションが複数の研究にあれば `InvalidInput`。
    pub fn load(path: &Path) -> Result<Self> {
        ensure_exists(path)?;
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)?;
        let headers = rdr.headers()?.clone();
        let id_col = require_column(&headers, &["ID", "STUDY_ID"], path)?;
        let accession_col = require_column(&headers, &["ACCESSION_ID", "ACCESSION"], path)?;

        let mut by_accession = HashMap::new();
        for record in rdr.records() {
            let record = record?;
            let accession = record.get(accession_col).unwrap_or_default();
            if accession.is_empty() {
                continue;
            }
            let raw_id = record.get(id_col).unwrap_or_default();
            let id: i64 = raw_id.parse().map_err(|_| {
                TraitToolsError::InvalidInput(format!(
                    "{}: STUDY IDが数値ではありません: {:?}",
                    path.display(),
                    raw_id
                ))
            })?;
            if let Some(previous) = by_accession.insert(accession.to_string(), id) {
                return Err(TraitToolsError::InvalidInput(format!(
                    "{}: アクセッションが重複しています: {} (STUDY_ID {} と {})",
                    path.display(),
                    accession,
                    previous,
                    id
                )));
            }
        }

        debug!(path = %path.display(), count = by_accession.len(), "study index loaded");
        Ok(Self { by_accession })
    }

    pub fn get(&self, accession: &str) -> Option<i64> {
        self.by_accession.get(accession).copied()
    }
}

/// 小文字化した形質ラベル → EFO_TRAIT.ID
///
/// 同じラベル（小文字化後）が複数あれば後のものが優先。
#[derive(Debug, Clone, Default)]
pub struct EfoIndex {
    by_label: HashMap<String, i64>,
}

impl EfoIndex {
    pub fn new(vocabulary: &[TraitLabel]) -> Self {
        Self {
            by_label: vocabulary
                .iter()
                .map(|t| (t.label.trim().to_lowercase(), t.id))
                .collect(),
        }
    }

    pub fn get(&self, label: &str) -> Option<i64> {
        self.by_label.get(&label.trim().to_lowercase()).copied()
    }
}

/// 削除予定のリンク
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRemoval {
    pub accession: String,
    pub study_id: i64,
    pub efo_trait_id: i64,
    pub trait_label: String,
}

/// 解決できなかった入力
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unresolved {
    Study { accession: String },
    Trait { accession: String, label: String },
}

impl std::fmt::Display for Unresolved {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unresolved::Study { accession } => write!(f, "未登録の研究: {}", accession),
            Unresolved::Trait { accession, label } => {
                write!(f, "未登録の形質: {} ({})", label, accession)
            }
        }
    }
}

/// 削除計画
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalPlan {
    pub removals: Vec<LinkRemoval>,
    pub unresolved: Vec<Unresolved>,
}

impl RemovalPlan {
    pub fn is_empty(&self) -> bool {
        self.removals.is_empty()
    }

    /// (study_id, efo_trait_id) の集合
    pub fn pairs(&self) -> HashSet<(i64, i64)> {
        self.removals
            .iter()
            .map(|r| (r.study_id, r.efo_trait_id))
            .collect()
    }
}

/// 削除計画を作る
///
/// 同じ (study_id, efo_trait_id) は1件にまとめる。
pub fn plan_removals(rows: &[BackgroundRow], studies: &StudyIndex, efo: &EfoIndex) -> RemovalPlan {
    let mut plan = RemovalPlan::default();
    let mut seen = HashSet::new();

    for row in rows {
        let Some(study_id) = studies.get(&row.accession) else {
            warn!(accession = %row.accession, "unknown study accession");
            plan.unresolved.push(Unresolved::Study {
                accession: row.accession.clone(),
            });
            continue;
        };

        for label in &row.traits {
            match efo.get(label) {
                Some(efo_trait_id) => {
                    if seen.insert((study_id, efo_trait_id)) {
                        plan.removals.push(LinkRemoval {
                            accession: row.accession.clone(),
                            study_id,
                            efo_trait_id,
                            trait_label: label.clone(),
                        });
                    }
                }
                None => {
                    warn!(accession = %row.accession, label = %label, "unknown background trait");
                    plan.unresolved.push(Unresolved::Trait {
                        accession: row.accession.clone(),
                        label: label.clone(),
                    });
                }
            }
        }
    }

    info!(
        removals = plan.removals.len(),
        unresolved = plan.unresolved.len(),
        "removal plan built"
    );
    plan
}

/// 適用結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub mode: ExecutionMode,
    /// 計画した件数
    pub planned: usize,
    /// リンク表に存在し削除した（ドライランでは削除される）件数
    pub removed: usize,
    /// リンク表に存在しなかった件数
    pub missing: usize,
}

/// 削除計画をリンク表ファイルに適用する
///
/// `Commit` のときは `confirm` が真を返した場合だけ書き込む。偽なら `Aborted`。
/// `DryRun` では `confirm` を呼ばず、ファイルにも触れない。
pub fn execute_plan<F>(
    plan: &RemovalPlan,
    links_path: &Path,
    mode: ExecutionMode,
    confirm: F,
) -> Result<ApplyOutcome>
where
    F: FnOnce(&RemovalPlan) -> Result<bool>,
{
    let mut table = LinkTable::load(links_path)?;
    let removed = table.remove_pairs(&plan.pairs());
    let outcome = ApplyOutcome {
        mode,
        planned: plan.removals.len(),
        removed,
        missing: plan.removals.len() - removed,
    };

    match mode {
        ExecutionMode::DryRun => {
            info!(removed, "dry-run: link table left unchanged");
        }
        ExecutionMode::Commit => {
            if !confirm(plan)? {
                return Err(TraitToolsError::Aborted(
                    "リンク削除は確認されませんでした".into(),
                ));
            }
            table.save(links_path)?;
            info!(removed, path = %links_path.display(), "link table rewritten");
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TSV: &str = "PMID\tTITLE\tACCESSION\tTRAIT\tBACKGROUND\n\
1\tt1\tGCST001\tBMI\tSmoking status || Alcohol drinking\n\
2\tt2\tGCST002\tHeight\t\n\
3\tt3\tGCST003\tAsthma\tsmoking STATUS\n";

    fn studies() -> StudyIndex {
        StudyIndex::from_pairs([("GCST001", 101), ("GCST003", 103)])
    }

    fn efo() -> EfoIndex {
        EfoIndex::new(&[
            TraitLabel::new(5, "Smoking status"),
            TraitLabel::new(6, "Alcohol drinking"),
        ])
    }

    #[test]
    fn test_parse_background_file() {
        let rows = parse_background_file(TSV).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].accession, "GCST001");
        assert_eq!(rows[0].traits, vec!["Smoking status", "Alcohol drinking"]);
        assert_eq!(rows[1].traits, vec!["smoking STATUS"]);
    }

    #[test]
    fn test_parse_short_row_rejected() {
        let result = parse_background_file("header\nonly\tthree\tcols\n");
        assert!(matches!(result, Err(TraitToolsError::InvalidInput(_))));
    }

    #[test]
    fn test_plan_case_insensitive() {
        let rows = parse_background_file(TSV).unwrap();
        let plan = plan_removals(&rows, &studies(), &efo());
        let pairs: Vec<(i64, i64)> = plan
            .removals
            .iter()
            .map(|r| (r.study_id, r.efo_trait_id))
            .collect();
        assert_eq!(pairs, vec![(101, 5), (101, 6), (103, 5)]);
        assert!(plan.unresolved.is_empty());
    }

    #[test]
    fn test_plan_reports_unresolved() {
        let rows = vec![
            BackgroundRow {
                accession: "GCST999".into(),
                traits: vec!["Smoking status".into()],
            },
            BackgroundRow {
                accession: "GCST001".into(),
                traits: vec!["Unknown trait".into(), "Smoking status".into()],
            },
        ];
        let plan = plan_removals(&rows, &studies(), &efo());
        assert_eq!(plan.removals.len(), 1);
        assert_eq!(
            plan.unresolved,
            vec![
                Unresolved::Study { accession: "GCST999".into() },
                Unresolved::Trait {
                    accession: "GCST001".into(),
                    label: "Unknown trait".into()
                },
            ]
        );
    }

    #[test]
    fn test_plan_dedups_pairs() {
        let rows = vec![BackgroundRow {
            accession: "GCST001".into(),
            traits: vec!["Smoking status".into(), "smoking status".into()],
        }];
        let plan = plan_removals(&rows, &studies(), &efo());
        assert_eq!(plan.removals.len(), 1);
    }

    #[test]
    fn test_study_index_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("study.csv");
        std::fs::write(&path, "ID,ACCESSION_ID,PUBLICATION_ID\n101,GCST001,1\n102,,1\n").unwrap();

        let index = StudyIndex::load(&path).unwrap();
        assert_eq!(index.get("GCST001"), Some(101));
        assert_eq!(index.get(""), None);
    }

    #[test]
    fn test_study_index_duplicate_accession_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("study.csv");
        std::fs::write(&path, "ID,ACCESSION_ID\n101,GCST001\n102,GCST001\n").unwrap();

        let result = StudyIndex::load(&path);
        assert!(matches!(result, Err(TraitToolsError::InvalidInput(_))));
    }

    #[test]
    fn test_execution_mode_parse() {
        assert_eq!("dry-run".parse::<ExecutionMode>().unwrap(), ExecutionMode::DryRun);
        assert_eq!("debug".parse::<ExecutionMode>().unwrap(), ExecutionMode::DryRun);
        assert_eq!("production".parse::<ExecutionMode>().unwrap(), ExecutionMode::Commit);
        assert_eq!("COMMIT".parse::<ExecutionMode>().unwrap(), ExecutionMode::Commit);
        assert!("yes".parse::<ExecutionMode>().is_err());
        assert_eq!(ExecutionMode::default(), ExecutionMode::DryRun);
    }
}
