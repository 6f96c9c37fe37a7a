//! バックグラウンド形質リンク削除の統合テスト
//!
//! ドライランはファイルを変更せず、コミットは確認後にだけ書き換えることを検証

use gwas_trait_tools::error::TraitToolsError;
use gwas_trait_tools::source::{CsvVocabulary, VocabularySource};
use gwas_trait_tools::unlink::{
    execute_plan, plan_removals, read_background_file, EfoIndex, ExecutionMode, LinkTable,
    RemovalPlan, StudyIndex,
};
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

const LINKS: &str = "STUDY_ID,EFO_TRAIT_ID\n101,5\n101,6\n101,7\n103,5\n";

struct Fixture {
    _dir: TempDir,
    links: PathBuf,
    plan: RemovalPlan,
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn fixture() -> Fixture {
    let dir = tempdir().expect("Failed to create temp dir");
    let links = write(dir.path(), "study_efo_trait.csv", LINKS);
    let studies = write(
        dir.path(),
        "study.csv",
        "ID,ACCESSION_ID\n101,GCST001\n103,GCST003\n",
    );
    let efo = write(
        dir.path(),
        "efo_trait.csv",
        "ID,TRAIT\n5,Smoking status\n6,Alcohol drinking\n8,Educational attainment\n",
    );
    let background = write(
        dir.path(),
        "study_background_traits.txt",
        "PMID\tAUTHOR\tACCESSION\tTRAIT\tBACKGROUND\n\
1\tA\tGCST001\tBMI\tSmoking status||alcohol drinking\n\
2\tB\tGCST003\tHeight\tEducational attainment\n\
3\tC\tGCST404\tAsthma\tSmoking status\n",
    );

    let rows = read_background_file(&background).unwrap();
    let study_index = StudyIndex::load(&studies).unwrap();
    let efo_labels = CsvVocabulary::new(&efo).load_vocabulary().unwrap();
    let plan = plan_removals(&rows, &study_index, &EfoIndex::new(&efo_labels));

    Fixture { _dir: dir, links, plan }
}

#[test]
fn test_plan_from_files() {
    let f = fixture();
    let pairs: Vec<(i64, i64)> = f
        .plan
        .removals
        .iter()
        .map(|r| (r.study_id, r.efo_trait_id))
        .collect();
    assert_eq!(pairs, vec![(101, 5), (101, 6), (103, 8)]);
    assert_eq!(f.plan.unresolved.len(), 1);
}

#[test]
fn test_dry_run_leaves_file_untouched() {
    let f = fixture();
    let outcome = execute_plan(&f.plan, &f.links, ExecutionMode::DryRun, |_| {
        panic!("dry-run must not ask for confirmation")
    })
    .unwrap();

    assert_eq!(outcome.planned, 3);
    assert_eq!(outcome.removed, 2);
    assert_eq!(outcome.missing, 1);
    assert_eq!(std::fs::read_to_string(&f.links).unwrap(), LINKS);
}

#[test]
fn test_commit_rewrites_links() {
    let f = fixture();
    let outcome = execute_plan(&f.plan, &f.links, ExecutionMode::Commit, |_| Ok(true)).unwrap();

    assert_eq!(outcome.mode, ExecutionMode::Commit);
    assert_eq!(outcome.removed, 2);

    let table = LinkTable::load(&f.links).unwrap();
    assert_eq!(table.len(), 2);
    assert!(table.contains(101, 7));
    assert!(table.contains(103, 5));
    assert!(!table.contains(101, 5));
}

#[test]
fn test_commit_declined_aborts() {
    let f = fixture();
    let result = execute_plan(&f.plan, &f.links, ExecutionMode::Commit, |_| Ok(false));

    assert!(matches!(result, Err(TraitToolsError::Aborted(_))));
    assert_eq!(std::fs::read_to_string(&f.links).unwrap(), LINKS);
}

#[test]
fn test_missing_links_file() {
    let f = fixture();
    let result = execute_plan(
        &f.plan,
        Path::new("/nonexistent/links.csv"),
        ExecutionMode::DryRun,
        |_| Ok(true),
    );
    assert!(matches!(result, Err(TraitToolsError::FileNotFound(_))));
}
