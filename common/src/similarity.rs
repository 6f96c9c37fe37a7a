//! 類似度計算
//!
//! 正規化編集距離比: `1 - lev(a, b) / (len(a) + len(b))`
//! 長さはUnicodeスカラー値で数える。両方空なら1.0。
//! 同じ編集距離なら短い文字列ほどスコアが低くなる。既存の照合結果CSVはこの式で出力されている。

use strsim::levenshtein;

/// 比較用にラベルを正規化（小文字化のみ）
pub fn normalize_label(label: &str) -> String {
    label.to_lowercase()
}

/// 2つのラベルの類似度（大文字小文字を区別しない）
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a = normalize_label(a);
    let b = normalize_label(b);
    normalized_ratio(&a, a.chars().count(), &b, b.chars().count())
}

/// 正規化済み文字列どうしの類似度
pub(crate) fn normalized_ratio(a: &str, a_len: usize, b: &str, b_len: usize) -> f64 {
    let total = a_len + b_len;
    if total == 0 {
        return 1.0;
    }
    let distance = levenshtein(a, b);
    1.0 - distance as f64 / total as f64
}

/// 長さだけから求まる類似度の上限
///
/// 編集距離は長さの差以上になるので、これが閾値未満なら比較を省略できる。
pub(crate) fn length_upper_bound(a_len: usize, b_len: usize) -> f64 {
    let total = a_len + b_len;
    if total == 0 {
        return 1.0;
    }
    1.0 - a_len.abs_diff(b_len) as f64 / total as f64
}
