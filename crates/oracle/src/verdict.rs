use regex::Regex;
use serde::Serialize;

use crate::error::Result;

/// Outcome of one prover evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// The prover found an attack trace for the lemma.
    Falsified,
    /// The prover proved the lemma.
    Verified,
    /// Timeout, launch failure, artifact failure or no marker in the output.
    Inconclusive { reason: String },
}

impl Verdict {
    /// Boolean predicate value; inconclusive results count as not falsified.
    pub fn is_falsified(&self) -> bool {
        matches!(self, Self::Falsified)
    }

    pub fn is_inconclusive(&self) -> bool {
        matches!(self, Self::Inconclusive { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Falsified => "falsified",
            Self::Verified => "verified",
            Self::Inconclusive { .. } => "inconclusive",
        }
    }
}

/// Finds the last `<lemma> (<kind>): falsified|verified` line in prover output.
#[derive(Debug, Clone)]
pub struct VerdictParser {
    pattern: Regex,
}

impl VerdictParser {
    pub fn new(lemma: &str) -> Result<Self> {
        let pattern = format!(
            r"(?:^|\s){}\s+\([^)]+\):\s+(falsified|verified)",
            regex::escape(lemma)
        );
        Ok(Self {
            pattern: Regex::new(&pattern)?,
        })
    }

    /// `Some(true)` for falsified, `Some(false)` for verified, `None` without a marker.
    pub fn parse(&self, stdout: &str) -> Option<bool> {
        stdout.lines().rev().find_map(|line| {
            self.pattern
                .captures(line)
                .map(|caps| &caps[1] == "falsified")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUMMARY: &str = "\
==============================================================================
summary of summaries:

analyzed: main.spthy

  processing time: 12.3s

  TestCardCloningResistance (all-traces): falsified - found trace (9 steps)

==============================================================================
";

    #[test]
    fn reads_falsified_marker() {
        let parser = VerdictParser::new("TestCardCloningResistance").unwrap();
        assert_eq!(parser.parse(SUMMARY), Some(true));
    }

    #[test]
    fn reads_verified_marker() {
        let parser = VerdictParser::new("TestAuth").unwrap();
        let out = "  TestAuth (exists-trace): verified (12 steps)\n";
        assert_eq!(parser.parse(out), Some(false));
    }

    #[test]
    fn last_marker_wins() {
        let parser = VerdictParser::new("TestAuth").unwrap();
        let out = "TestAuth (all-traces): verified (3 steps)\n\
                   progress...\n\
                   TestAuth (all-traces): falsified - found trace (5 steps)\n";
        assert_eq!(parser.parse(out), Some(true));
    }

    #[test]
    fn other_lemmas_and_missing_markers_are_ignored() {
        let parser = VerdictParser::new("Auth").unwrap();
        assert_eq!(parser.parse("NonAuth (all-traces): falsified\n"), None);
        assert_eq!(parser.parse("Auth (all-traces): analysis incomplete\n"), None);
        assert_eq!(parser.parse(""), None);
    }

    #[test]
    fn lemma_names_are_matched_literally() {
        let parser = VerdictParser::new("A.B").unwrap();
        assert_eq!(parser.parse("AxB (all-traces): falsified\n"), None);
        assert_eq!(parser.parse("A.B (all-traces): falsified\n"), Some(true));
    }

    #[test]
    fn inconclusive_is_not_falsified() {
        let verdict = Verdict::Inconclusive {
            reason: "timed out".to_string(),
        };
        assert!(!verdict.is_falsified());
        assert!(verdict.is_inconclusive());
        assert_eq!(verdict.label(), "inconclusive");
    }
}
