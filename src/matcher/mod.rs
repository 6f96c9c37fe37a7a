//! 照合ドライバ
//!
//! コアの照合処理（`gwas_trait_common::matcher`）を候補単位で並列実行する。
//! 結果は逐次版と完全に一致する。候補間の順序は問わないが、各候補の結果の並びは変えない。

use crate::error::Result;
use gwas_trait_common::matcher::PreparedVocabulary;
use gwas_trait_common::{Error as CommonError, MatchReport, MatchThreshold, TraitLabel};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// 照合の実行オプション
#[derive(Debug, Clone, Default)]
pub struct MatchOptions {
    /// 進捗バーを表示
    pub show_progress: bool,
    /// 候補ごとに確認する中断フラグ
    pub cancel: Option<Arc<AtomicBool>>,
}

impl MatchOptions {
    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|flag| flag.load(Ordering::Relaxed))
            .unwrap_or(false)
    }
}

fn progress_bar(total: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total as u64);
    let style = ProgressStyle::with_template("{spinner} 照合中 [{bar:40}] {pos}/{len} ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    pb.set_style(style);
    pb
}

/// 候補一覧を並列に照合する
///
/// 閾値が範囲外なら比較を始める前に `InvalidArgument`。
/// 中断された場合は部分結果を返さず `Cancelled`。
pub fn match_parallel<S>(
    vocabulary: &[TraitLabel],
    candidates: &[S],
    threshold: f64,
    options: &MatchOptions,
) -> Result<MatchReport>
where
    S: AsRef<str> + Sync,
{
    let threshold = MatchThreshold::new(threshold)?;
    let prepared = PreparedVocabulary::new(vocabulary);
    info!(
        vocabulary = prepared.len(),
        candidates = candidates.len(),
        %threshold,
        "matching candidates"
    );

    let pb = progress_bar(candidates.len(), options.show_progress);

    let rows: Vec<Option<(String, Vec<_>)>> = candidates
        .par_iter()
        .map(|candidate| {
            if options.is_cancelled() {
                return None;
            }
            let candidate = candidate.as_ref();
            let matches = prepared.match_candidate(candidate, threshold);
            pb.inc(1);
            Some((candidate.to_string(), matches))
        })
        .collect();

    let completed = rows.iter().filter(|row| row.is_some()).count();
    if completed < rows.len() {
        pb.abandon();
        return Err(CommonError::Cancelled {
            completed,
            total: rows.len(),
        }
        .into());
    }
    pb.finish_and_clear();

    let report: MatchReport = rows.into_iter().flatten().collect();
    debug!(
        unique = report.len(),
        matched = report.matched_count(),
        "matching finished"
    );
    Ok(report)
}
