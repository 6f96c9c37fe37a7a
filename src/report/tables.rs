//! カタログDBテーブルのCSVダンプ
//!
//! 1テーブル1ファイル、ヘッダーは列名（大文字）。余分な列は無視する。
//! 空欄は `None` として読む。

use crate::error::{Result, TraitToolsError};
use crate::source::ensure_exists;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

pub const STUDY_TABLE: &str = "study.csv";
pub const HOUSEKEEPING_TABLE: &str = "housekeeping.csv";
pub const PUBLICATION_TABLE: &str = "publication.csv";
pub const AUTHOR_TABLE: &str = "author.csv";
pub const CURATION_STATUS_TABLE: &str = "curation_status.csv";
pub const DISEASE_TRAIT_TABLE: &str = "disease_trait.csv";
pub const STUDY_DISEASE_TRAIT_TABLE: &str = "study_disease_trait.csv";
pub const EFO_TRAIT_TABLE: &str = "efo_trait.csv";
pub const STUDY_EFO_TRAIT_TABLE: &str = "study_efo_trait.csv";
pub const ASSOCIATION_TABLE: &str = "association.csv";
pub const ANCESTRY_TABLE: &str = "ancestry.csv";
pub const NOTE_TABLE: &str = "note.csv";

/// 重複タグのノート種別（`NOTE.NOTE_SUBJECT_ID`）
pub const DUP_TAG_NOTE_SUBJECT: i64 = 9;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct StudyRow {
    pub id: i64,
    #[serde(default)]
    pub housekeeping_id: Option<i64>,
    #[serde(default)]
    pub publication_id: Option<i64>,
    #[serde(default)]
    pub accession_id: Option<String>,
    #[serde(default)]
    pub user_requested: Option<String>,
    #[serde(default)]
    pub full_pvalue_set: Option<String>,
    #[serde(default)]
    pub open_targets: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct HousekeepingRow {
    pub id: i64,
    #[serde(default)]
    pub is_published: Option<i64>,
    #[serde(default)]
    pub study_added_date: Option<String>,
    #[serde(default)]
    pub curation_status_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct PublicationRow {
    pub id: i64,
    #[serde(default)]
    pub pubmed_id: Option<String>,
    #[serde(default)]
    pub publication_date: Option<String>,
    /// 雑誌名
    #[serde(default)]
    pub publication: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub first_author_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct AuthorRow {
    pub id: i64,
    #[serde(default)]
    pub fullname: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct CurationStatusRow {
    pub id: i64,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiseaseTraitRow {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "TRAIT", default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EfoTraitRow {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "TRAIT", default)]
    pub label: Option<String>,
    #[serde(rename = "SHORT_FORM", default)]
    pub short_form: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct StudyDiseaseTraitRow {
    study_id: i64,
    disease_trait_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct StudyEfoTraitRow {
    study_id: i64,
    efo_trait_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct AssociationRow {
    study_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AncestryRow {
    #[serde(rename = "STUDY_ID")]
    pub study_id: i64,
    /// `initial` / `replication`
    #[serde(rename = "TYPE", default)]
    pub kind: Option<String>,
    #[serde(rename = "NUMBER_OF_INDIVIDUALS", default)]
    pub number_of_individuals: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct NoteRow {
    pub study_id: i64,
    #[serde(default)]
    pub note_subject_id: Option<i64>,
    #[serde(default)]
    pub text_note: Option<String>,
}

/// 研究と、その研究に内部結合される行
#[derive(Debug, Clone, Copy)]
pub struct StudyContext<'a> {
    pub study: &'a StudyRow,
    pub housekeeping: &'a HousekeepingRow,
    pub publication: &'a PublicationRow,
    pub first_author: &'a AuthorRow,
    pub curation_status: &'a CurationStatusRow,
}

/// 読み込み済みのテーブル一式
///
/// 研究・ハウスキーピング・論文・著者・キュレーション状態は必須。
/// 形質・関連・祖先集団・ノートはファイルが無ければ空として扱う。
#[derive(Debug, Clone, Default)]
pub struct CatalogTables {
    studies: Vec<StudyRow>,
    housekeeping: HashMap<i64, HousekeepingRow>,
    publications: HashMap<i64, PublicationRow>,
    authors: HashMap<i64, AuthorRow>,
    statuses: HashMap<i64, CurationStatusRow>,
    disease_traits: HashMap<i64, DiseaseTraitRow>,
    efo_traits: HashMap<i64, EfoTraitRow>,
    study_disease_traits: HashMap<i64, Vec<i64>>,
    study_efo_traits: HashMap<i64, Vec<i64>>,
    association_counts: HashMap<i64, usize>,
    ancestries: HashMap<i64, Vec<AncestryRow>>,
    notes: HashMap<i64, Vec<NoteRow>>,
}

impl CatalogTables {
    pub fn load(dir: &Path) -> Result<Self> {
        ensure_exists(dir)?;

        let mut studies: Vec<StudyRow> = read_table(dir, STUDY_TABLE, true)?;
        studies.sort_by_key(|s| s.id);
        if let Some(w) = studies.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(duplicate_id(STUDY_TABLE, w[0].id));
        }

        let tables = Self {
            studies,
            housekeeping: index_by_id(read_table(dir, HOUSEKEEPING_TABLE, true)?, HOUSEKEEPING_TABLE, |r: &HousekeepingRow| r.id)?,
            publications: index_by_id(read_table(dir, PUBLICATION_TABLE, true)?, PUBLICATION_TABLE, |r: &PublicationRow| r.id)?,
            authors: index_by_id(read_table(dir, AUTHOR_TABLE, true)?, AUTHOR_TABLE, |r: &AuthorRow| r.id)?,
            statuses: index_by_id(read_table(dir, CURATION_STATUS_TABLE, true)?, CURATION_STATUS_TABLE, |r: &CurationStatusRow| r.id)?,
            disease_traits: index_by_id(read_table(dir, DISEASE_TRAIT_TABLE, false)?, DISEASE_TRAIT_TABLE, |r: &DiseaseTraitRow| r.id)?,
            efo_traits: index_by_id(read_table(dir, EFO_TRAIT_TABLE, false)?, EFO_TRAIT_TABLE, |r: &EfoTraitRow| r.id)?,
            study_disease_traits: group_links(
                read_table::<StudyDiseaseTraitRow>(dir, STUDY_DISEASE_TRAIT_TABLE, false)?
                    .into_iter()
                    .map(|r| (r.study_id, r.disease_trait_id)),
            ),
            study_efo_traits: group_links(
                read_table::<StudyEfoTraitRow>(dir, STUDY_EFO_TRAIT_TABLE, false)?
                    .into_iter()
                    .map(|r| (r.study_id, r.efo_trait_id)),
            ),
            association_counts: read_table::<AssociationRow>(dir, ASSOCIATION_TABLE, false)?
                .into_iter()
                .fold(HashMap::new(), |mut acc, r| {
                    *acc.entry(r.study_id).or_insert(0) += 1;
                    acc
                }),
            ancestries: group_rows(read_table(dir, ANCESTRY_TABLE, false)?, |r: &AncestryRow| r.study_id),
            notes: group_rows(read_table(dir, NOTE_TABLE, false)?, |r: &NoteRow| r.study_id),
        };

        debug!(
            dir = %dir.display(),
            studies = tables.studies.len(),
            publications = tables.publications.len(),
            "catalog tables loaded"
        );
        Ok(tables)
    }

    /// ID昇順の研究一覧
    pub fn studies(&self) -> &[StudyRow] {
        &self.studies
    }

    /// ハウスキーピング・論文・筆頭著者・状態がすべて揃う研究だけ `Some`
    pub fn context<'a>(&'a self, study: &'a StudyRow) -> Option<StudyContext<'a>> {
        let housekeeping = self.housekeeping.get(&study.housekeeping_id?)?;
        let publication = self.publications.get(&study.publication_id?)?;
        let first_author = self.authors.get(&publication.first_author_id?)?;
        let curation_status = self.statuses.get(&housekeeping.curation_status_id?)?;
        Some(StudyContext {
            study,
            housekeeping,
            publication,
            first_author,
            curation_status,
        })
    }

    /// 報告形質ラベル（昇順）
    pub fn reported_traits(&self, study_id: i64) -> Vec<&str> {
        let mut labels: Vec<&str> = self
            .study_disease_traits
            .get(&study_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.disease_traits.get(id))
            .filter_map(|t| t.label.as_deref())
            .collect();
        labels.sort_unstable();
        labels
    }

    /// 紐付いたEFO形質（ラベル昇順）
    pub fn efo_traits(&self, study_id: i64) -> Vec<&EfoTraitRow> {
        let mut traits: Vec<&EfoTraitRow> = self
            .study_efo_traits
            .get(&study_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.efo_traits.get(id))
            .filter(|t| t.label.is_some())
            .collect();
        traits.sort_by(|a, b| a.label.cmp(&b.label));
        traits
    }

    pub fn association_count(&self, study_id: i64) -> usize {
        self.association_counts.get(&study_id).copied().unwrap_or(0)
    }

    /// `TYPE` が `kind` の祖先集団の人数合計。値が1つも無ければ `None`
    pub fn individuals(&self, study_id: i64, kind: &str) -> Option<i64> {
        self.ancestries
            .get(&study_id)?
            .iter()
            .filter(|a| a.kind.as_deref() == Some(kind))
            .filter_map(|a| a.number_of_individuals)
            .fold(None, |acc, n| Some(acc.unwrap_or(0) + n))
    }

    /// 最初の重複タグノート
    pub fn dup_tag(&self, study_id: i64) -> Option<&str> {
        self.notes
            .get(&study_id)?
            .iter()
            .find(|n| n.note_subject_id == Some(DUP_TAG_NOTE_SUBJECT))
            .and_then(|n| n.text_note.as_deref())
    }
}

fn read_table<T: DeserializeOwned>(dir: &Path, name: &str, required: bool) -> Result<Vec<T>> {
    let path = dir.join(name);
    if !path.exists() {
        if required {
            return Err(TraitToolsError::FileNotFound(path.display().to_string()));
        }
        debug!(path = %path.display(), "optional table missing, treated as empty");
        return Ok(Vec::new());
    }

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(&path)?;
    let rows = rdr.deserialize().collect::<std::result::Result<Vec<T>, _>>()?;
    debug!(path = %path.display(), rows = rows.len(), "table loaded");
    Ok(rows)
}

fn index_by_id<T>(rows: Vec<T>, table: &str, id: impl Fn(&T) -> i64) -> Result<HashMap<i64, T>> {
    let mut map = HashMap::with_capacity(rows.len());
    for row in rows {
        let key = id(&row);
        if map.insert(key, row).is_some() {
            return Err(duplicate_id(table, key));
        }
    }
    Ok(map)
}

fn group_links(pairs: impl Iterator<Item = (i64, i64)>) -> HashMap<i64, Vec<i64>> {
    let mut map: HashMap<i64, Vec<i64>> = HashMap::new();
    for (study_id, target) in pairs {
        map.entry(study_id).or_default().push(target);
    }
    map
}

fn group_rows<T>(rows: Vec<T>, study_id: impl Fn(&T) -> i64) -> HashMap<i64, Vec<T>> {
    let mut map: HashMap<i64, Vec<T>> = HashMap::new();
    for row in rows {
        map.entry(study_id(&row)).or_default().push(row);
    }
    map
}

fn duplicate_id(table: &str, id: i64) -> TraitToolsError {
    TraitToolsError::InvalidInput(format!("{}: IDが重複しています: {}", table, id))
}
