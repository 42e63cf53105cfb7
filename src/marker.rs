use aho_corasick::{AhoCorasick, AhoCorasickBuilder};
use regex_syntax::{hir::literal::Extractor, parse};

use crate::error::Result;

/// Literal-marker prefilter run before the classification regexes.
///
/// The classification patterns are plain literal alternations, so every
/// possible match must contain one of their literals. Scanning for those
/// literals with a single case-insensitive Aho-Corasick pass gives a cheap
/// "this UA has no mobile markers at all" fast path for desktop traffic.
///
/// If any source pattern yields no extractable literals the prefilter is
/// disabled and every UA proceeds to the regexes, so it can never change
/// classification results.
pub(crate) struct MarkerPrefilter {
    automaton: Option<AhoCorasick>,
}

impl MarkerPrefilter {
    /// Build a prefilter from the raw classification patterns.
    pub fn from_patterns<'a>(patterns: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let mut literals: Vec<String> = Vec::new();
        for pattern in patterns {
            let extracted = extract_literals(pattern, 3);
            if extracted.is_empty() {
                return Ok(Self { automaton: None });
            }
            literals.extend(extracted);
        }

        let automaton = AhoCorasickBuilder::new()
            .ascii_case_insensitive(true)
            .build(&literals)?;
        Ok(Self {
            automaton: Some(automaton),
        })
    }

    /// Whether `ua` can possibly match any classification pattern.
    pub fn may_match(&self, ua: &str) -> bool {
        match &self.automaton {
            None => true,
            Some(ac) => ac.is_match(ua),
        }
    }
}

/// Extract literal substrings from a regex pattern for use as Aho-Corasick
/// candidates. Returns literals of at least `min_len` bytes, or an empty vec
/// if the pattern has none (meaning the prefilter cannot be used for it).
fn extract_literals(pattern: &str, min_len: usize) -> Vec<String> {
    let hir = match parse(pattern) {
        Ok(h) => h,
        Err(_) => return Vec::new(),
    };

    let mut extractor = Extractor::new();
    extractor.kind(regex_syntax::hir::literal::ExtractKind::Prefix);

    let seq = extractor.extract(&hir);
    seq.literals()
        .into_iter()
        .flatten()
        .filter_map(|lit| {
            let s = std::str::from_utf8(lit.as_bytes()).ok()?;
            if s.len() >= min_len {
                Some(s.to_lowercase())
            } else {
                None
            }
        })
        .collect()
}
