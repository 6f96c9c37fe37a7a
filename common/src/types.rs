//! 照合の型定義
//!
//! - TraitLabel: 参照語彙の1エントリ（ID + 表示ラベル）
//! - MatchEntry: 候補に対する1件の一致（ラベル + 類似度）
//! - MatchThreshold: 類似度の下限値（0.0〜1.0）

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// 参照語彙の形質ラベル
///
/// IDは語彙内で一意。ラベル文字列は重複してよく、それぞれ別エントリとして扱う。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitLabel {
    pub id: i64,
    pub label: String,
}

impl TraitLabel {
    pub fn new(id: i64, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

/// 照合結果の1件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEntry {
    /// 参照語彙側のラベル（元の大文字小文字を保持）
    pub label: String,
    /// 類似度 [0.0, 1.0]
    pub score: f64,
}

impl MatchEntry {
    /// 出力用の表記 `label -- 0.87`
    pub fn display_entry(&self) -> String {
        format!("{} -- {:.2}", self.label, self.score)
    }
}

/// 類似度の閾値
///
/// 範囲外（NaNを含む）は照合開始前に拒否する。丸めや補正はしない。
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct MatchThreshold(f64);

impl MatchThreshold {
    pub fn new(value: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(Error::InvalidArgument(format!(
                "threshold {} is outside [0, 1]",
                value
            )));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for MatchThreshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
