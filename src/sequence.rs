//! Sequence validation and a minimal FASTA reader.
//!
//! Raw input is trimmed, checked against the nucleotide alphabet and
//! canonicalised to uppercase. Lowercase `acgt` is accepted.
//!
//! ```rust
//! use needlewave::check_sequence;
//! let s = check_sequence("  actg ", "first sequence").unwrap();
//! assert_eq!(s.as_str(), "ACTG");
//! assert!(check_sequence("", "second sequence").is_err());
//! ```
use std::fmt;

use crate::common::NeedleError;

/// A validated, uppercase nucleotide sequence over `A`, `C`, `T`, `G`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Nucleotides(Vec<u8>);

impl Nucleotides {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        // only ASCII uppercase letters survive validation
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Nucleotides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<[u8]> for Nucleotides {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Trim, validate and uppercase `raw`.
///
/// `label` names the sequence in error messages (e.g. `"first sequence"`).
///
/// ## Errors
/// - [`NeedleError::EmptySequence`] if nothing is left after trimming.
/// - [`NeedleError::InvalidNucleotide`] on the first symbol outside
///   `ACTG` (case-insensitive), reported exactly as typed.
pub fn check_sequence(raw: &str, label: &str) -> Result<Nucleotides, NeedleError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(NeedleError::EmptySequence { label: label.to_string() });
    }
    let mut out = Vec::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        match c.to_ascii_uppercase() {
            u @ ('A' | 'C' | 'T' | 'G') => out.push(u as u8),
            _ => {
                return Err(NeedleError::InvalidNucleotide {
                    character: c,
                    sequence: trimmed.to_string(),
                    label: label.to_string(),
                })
            }
        }
    }
    Ok(Nucleotides(out))
}

/// A single FASTA record (identifier and raw sequence letters).
#[derive(Clone, Debug)]
pub struct FastaRecord {
    /// Identifier from the FASTA header (first word after '>').
    pub id: String,
    /// Sequence with line breaks removed. Not yet validated.
    pub seq: String,
}

/// Parse a minimal FASTA string into records.
///
/// *Lines starting with `>` start a new record.* All other lines are appended
/// (trimmed) to the current sequence. Text before the first header is ignored.
pub fn parse_fasta(text: &str) -> Vec<FastaRecord> {
    let mut out: Vec<FastaRecord> = vec![];
    let mut current: Option<FastaRecord> = None;
    for line in text.lines() {
        if let Some(rest) = line.strip_prefix('>') {
            if let Some(rec) = current.take() {
                out.push(rec);
            }
            let id = rest.split_whitespace().next().unwrap_or("").to_string();
            current = Some(FastaRecord { id, seq: String::new() });
        } else if let Some(rec) = current.as_mut() {
            rec.seq.push_str(line.trim());
        }
    }
    out.extend(current);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_upper_and_lower_case() {
        assert_eq!(check_sequence("ACTG", "first sequence").unwrap().as_str(), "ACTG");
        assert_eq!(check_sequence("actg", "first sequence").unwrap().as_str(), "ACTG");
        assert_eq!(check_sequence("ACTG", "").unwrap().len(), 4);
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(check_sequence("\tAC \n", "x").unwrap().as_bytes(), b"AC");
    }

    #[test]
    fn rejects_invalid_symbol_as_typed() {
        match check_sequence("ahctg", "first sequence") {
            Err(NeedleError::InvalidNucleotide { character, sequence, label }) => {
                assert_eq!(character, 'h');
                assert_eq!(sequence, "ahctg");
                assert_eq!(label, "first sequence");
            }
            other => panic!("unexpected {other:?}"),
        }
        let err = check_sequence("AHCTG", "first sequence").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Insertion error in the first sequence ('AHCTG'): invalid nucleotide 'H'. Sequences must contain only A, C, T, or G."
        );
    }

    #[test]
    fn rejects_empty_and_blank() {
        for raw in ["", "   "] {
            assert!(matches!(
                check_sequence(raw, "second sequence"),
                Err(NeedleError::EmptySequence { ref label }) if label == "second sequence"
            ));
        }
    }

    #[test]
    fn rejects_u_and_n() {
        assert!(check_sequence("ACGU", "s").is_err());
        assert!(check_sequence("ACNG", "s").is_err());
    }

    #[test]
    fn fasta_multi_record() {
        let recs = parse_fasta(">one desc\nAC\nGT\n>two\ntt\n");
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].id, "one");
        assert_eq!(recs[0].seq, "ACGT");
        assert_eq!(recs[1].seq, "tt");
    }

    #[test]
    fn fasta_without_header_is_empty() {
        assert!(parse_fasta("ACGT\n").is_empty());
    }
}
