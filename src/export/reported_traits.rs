//! 報告形質一覧CSV（`Reported Trait` 1列、昇順）

use super::write_atomically;
use crate::error::Result;
use gwas_trait_common::TraitLabel;
use std::io::Write;
use std::path::Path;

pub const REPORTED_TRAIT_FILE: &str = "reported_trait.csv";

pub fn write_reported_traits<W: Write>(vocabulary: &[TraitLabel], writer: W) -> Result<()> {
    let mut traits: Vec<&str> = vocabulary.iter().map(|t| t.label.as_str()).collect();
    traits.sort_unstable();

    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Reported Trait"])?;
    for t in traits {
        wtr.write_record([t])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_reported_trait_file(vocabulary: &[TraitLabel], path: &Path) -> Result<()> {
    write_atomically(path, |w| write_reported_traits(vocabulary, w))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_with_header() {
        let vocabulary = vec![
            TraitLabel::new(3, "Obesity"),
            TraitLabel::new(1, "Asthma"),
            TraitLabel::new(2, "Body mass index"),
            TraitLabel::new(4, "Asthma"),
        ];
        let mut buf = Vec::new();
        write_reported_traits(&vocabulary, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(
            out,
            "Reported Trait\nAsthma\nAsthma\nBody mass index\nObesity\n"
        );
    }

    #[test]
    fn test_empty_vocabulary_writes_header_only() {
        let mut buf = Vec::new();
        write_reported_traits(&[], &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Reported Trait\n");
    }
}
