//! 形質ラベル照合モジュール
//!
//! 参照語彙と候補ラベルの一覧から、候補ごとに閾値以上の類似ラベルを
//! 類似度の降順で求める。入出力を持たない純粋な計算。

use crate::error::Result;
use crate::similarity::{length_upper_bound, normalize_label, normalized_ratio};
use crate::types::{MatchEntry, MatchThreshold, TraitLabel};
use std::collections::HashMap;

/// 正規化済みの参照語彙
///
/// 候補ごとに語彙を小文字化し直さないよう、1回の照合実行の間だけ保持する。
#[derive(Debug, Clone)]
pub struct PreparedVocabulary<'a> {
    entries: Vec<PreparedLabel<'a>>,
}

#[derive(Debug, Clone)]
struct PreparedLabel<'a> {
    source: &'a TraitLabel,
    normalized: String,
    len: usize,
}

impl<'a> PreparedVocabulary<'a> {
    pub fn new(vocabulary: &'a [TraitLabel]) -> Self {
        let entries = vocabulary
            .iter()
            .map(|source| {
                let normalized = normalize_label(&source.label);
                let len = normalized.chars().count();
                PreparedLabel { source, normalized, len }
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 1候補分の照合
    ///
    /// 結果は類似度の降順。同点は語彙の並び順を保つ（安定ソート）。
    pub fn match_candidate(&self, candidate: &str, threshold: MatchThreshold) -> Vec<MatchEntry> {
        let normalized = normalize_label(candidate);
        let candidate_len = normalized.chars().count();
        let min_score = threshold.value();

        let mut matches: Vec<MatchEntry> = self
            .entries
            .iter()
            .filter(|entry| length_upper_bound(candidate_len, entry.len) >= min_score)
            .filter_map(|entry| {
                let score =
                    normalized_ratio(&normalized, candidate_len, &entry.normalized, entry.len);
                (score >= min_score).then(|| MatchEntry {
                    label: entry.source.label.clone(),
                    score,
                })
            })
            .collect();

        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches
    }
}

/// 候補 → 照合結果のマッピング
///
/// キーは候補文字列。並びは候補の初出順。同じ候補が複数回あれば1件にまとめる
/// （結果は文字列だけで決まるので、どの出現の結果でも同じ）。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchReport {
    rows: Vec<(String, Vec<MatchEntry>)>,
    index: HashMap<String, usize>,
}

impl MatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// 候補の結果を追加（既にあれば値を置き換え、位置は初出のまま）
    pub fn insert(&mut self, candidate: impl Into<String>, matches: Vec<MatchEntry>) {
        let candidate = candidate.into();
        if let Some(&pos) = self.index.get(&candidate) {
            self.rows[pos].1 = matches;
            return;
        }
        self.index.insert(candidate.clone(), self.rows.len());
        self.rows.push((candidate, matches));
    }

    pub fn get(&self, candidate: &str) -> Option<&[MatchEntry]> {
        self.index
            .get(candidate)
            .map(|&pos| self.rows[pos].1.as_slice())
    }

    /// 候補の初出順に走査
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[MatchEntry])> {
        self.rows
            .iter()
            .map(|(candidate, matches)| (candidate.as_str(), matches.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 一致が1件以上あった候補の数
    pub fn matched_count(&self) -> usize {
        self.rows.iter().filter(|(_, m)| !m.is_empty()).count()
    }
}

impl FromIterator<(String, Vec<MatchEntry>)> for MatchReport {
    fn from_iter<I: IntoIterator<Item = (String, Vec<MatchEntry>)>>(iter: I) -> Self {
        let mut report = Self::new();
        for (candidate, matches) in iter {
            report.insert(candidate, matches);
        }
        report
    }
}

/// 候補一覧を語彙と照合する
///
/// # Arguments
/// * `vocabulary` - 参照語彙（空でもよい）
/// * `candidates` - 候補ラベル（空・重複可）
/// * `threshold` - 類似度の下限。[0, 1] の外なら比較前に `InvalidArgument`
pub fn match_traits<S: AsRef<str>>(
    vocabulary: &[TraitLabel],
    candidates: &[S],
    threshold: f64,
) -> Result<MatchReport> {
    let threshold = MatchThreshold::new(threshold)?;
    let prepared = PreparedVocabulary::new(vocabulary);

    Ok(candidates
        .iter()
        .map(|candidate| {
            let candidate = candidate.as_ref();
            (candidate.to_string(), prepared.match_candidate(candidate, threshold))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn vocab(labels: &[&str]) -> Vec<TraitLabel> {
        labels
            .iter()
            .enumerate()
            .map(|(i, l)| TraitLabel::new(i as i64 + 1, *l))
            .collect()
    }

    #[test]
    fn test_exact_match_case_insensitive() {
        let report = match_traits(&vocab(&["Heart rate"]), &["heart rate"], 0.5).unwrap();
        let matches = report.get("heart rate").unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].label, "Heart rate");
        assert_eq!(matches[0].score, 1.0);
    }

    #[test]
    fn test_preserves_reference_casing() {
        let report = match_traits(&vocab(&["Heart Attack"]), &["heart attack"], 0.99).unwrap();
        let matches = report.get("heart attack").unwrap();
        assert_eq!(matches[0].label, "Heart Attack");
        assert_eq!(matches[0].display_entry(), "Heart Attack -- 1.00");
    }

    #[test]
    fn test_empty_vocabulary() {
        let report = match_traits(&[], &["anything"], 0.5).unwrap();
        assert_eq!(report.len(), 1);
        assert!(report.get("anything").unwrap().is_empty());
    }

    #[test]
    fn test_empty_candidates() {
        let candidates: Vec<String> = Vec::new();
        let report = match_traits(&vocab(&["Asthma"]), &candidates, 0.5).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_threshold_excludes_low_scores() {
        let report = match_traits(&vocab(&["Asthma"]), &["Diabetes"], 0.9).unwrap();
        assert!(report.get("Diabetes").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_threshold() {
        let v = vocab(&["Asthma"]);
        assert!(matches!(match_traits(&v, &["x"], 1.5), Err(Error::InvalidArgument(_))));
        assert!(matches!(match_traits(&v, &["x"], -0.1), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_sorted_descending_and_stable() {
        // "asthma" と同じ距離の "asthmb" / "asthmc" は語彙順を保つ
        let v = vocab(&["Asthmb", "Asthma", "Asthmc", "Childhood asthma"]);
        let report = match_traits(&v, &["asthma"], 0.0).unwrap();
        let labels: Vec<&str> = report
            .get("asthma")
            .unwrap()
            .iter()
            .map(|m| m.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Asthma", "Asthmb", "Asthmc", "Childhood asthma"]);
    }

    #[test]
    fn test_duplicate_labels_scored_independently() {
        let v = vocab(&["Obesity", "Obesity"]);
        let report = match_traits(&v, &["obesity"], 0.5).unwrap();
        assert_eq!(report.get("obesity").unwrap().len(), 2);
    }

    #[test]
    fn test_duplicate_candidates_collapse() {
        let report = match_traits(&vocab(&["Asthma"]), &["asthma", "bmi", "asthma"], 0.5).unwrap();
        assert_eq!(report.len(), 2);
        let order: Vec<&str> = report.iter().map(|(c, _)| c).collect();
        assert_eq!(order, vec!["asthma", "bmi"]);
    }

    #[test]
    fn test_threshold_zero_returns_every_label() {
        let v = vocab(&["Asthma", "Diabetes", ""]);
        let report = match_traits(&v, &["xyz"], 0.0).unwrap();
        assert_eq!(report.get("xyz").unwrap().len(), 3);
    }

    #[test]
    fn test_all_scores_meet_threshold_and_in_range() {
        let v = vocab(&["Body mass index", "Body height", "BMI", "Waist circumference"]);
        for t in [0.0, 0.3, 0.5, 0.7, 1.0] {
            let report = match_traits(&v, &["body mass"], t).unwrap();
            for m in report.get("body mass").unwrap() {
                assert!(m.score >= t);
                assert!((0.0..=1.0).contains(&m.score));
            }
        }
    }

    #[test]
    fn test_idempotent() {
        let v = vocab(&["Body mass index", "Body height", "BMI"]);
        let first = match_traits(&v, &["body mass", "height"], 0.3).unwrap();
        let second = match_traits(&v, &["body mass", "height"], 0.3).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_pruning_matches_unpruned_scores() {
        let v = vocab(&["a", "ab", "abc", "abcd", "abcdefgh"]);
        let report = match_traits(&v, &["abc"], 0.6).unwrap();
        for m in report.get("abc").unwrap() {
            assert_eq!(m.score, crate::similarity::similarity_ratio("abc", &m.label));
        }
        // "a": 1 - 2/4 = 0.5 は除外, "abcd": 1 - 1/7, "ab": 1 - 1/5
        let labels: Vec<&str> = report.get("abc").unwrap().iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["abc", "abcd", "ab"]);
    }
}
