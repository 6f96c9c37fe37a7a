//! 候補ラベルの読み込み

use super::ensure_exists;
use crate::error::Result;
use dialoguer::Input;
use std::path::Path;

/// 1行1候補。前後の空白を除き、空行は読み飛ばす
pub fn parse_candidates(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// 候補ファイルを読み込む
pub fn read_candidates(path: &Path) -> Result<Vec<String>> {
    ensure_exists(path)?;
    let content = std::fs::read_to_string(path)?;
    Ok(parse_candidates(&content))
}

/// 対話式で候補を入力（空入力で終了）
pub fn prompt_candidates() -> Result<Vec<String>> {
    println!("候補の形質ラベルを1件ずつ入力してください（空行で終了）");

    let mut candidates = Vec::new();
    loop {
        let entry: String = Input::new()
            .with_prompt(format!("候補 {}", candidates.len() + 1))
            .allow_empty(true)
            .interact_text()?;

        let entry = entry.trim();
        if entry.is_empty() {
            break;
        }
        candidates.push(entry.to_string());
    }

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_skips_blank_lines() {
        let content = "Heart rate\n\n   \nAsthma  \r\n  body mass index\n";
        assert_eq!(
            parse_candidates(content),
            vec!["Heart rate", "Asthma", "body mass index"]
        );
    }

    #[test]
    fn test_parse_keeps_duplicates_and_order() {
        assert_eq!(parse_candidates("b\na\nb\n"), vec!["b", "a", "b"]);
    }

    #[test]
    fn test_read_candidates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("candidates.txt");
        std::fs::write(&path, "Asthma\n\nDiabetes\n").unwrap();
        assert_eq!(read_candidates(&path).unwrap(), vec!["Asthma", "Diabetes"]);
    }

    #[test]
    fn test_read_candidates_missing() {
        assert!(read_candidates(Path::new("/nonexistent/candidates.txt")).is_err());
    }
}
