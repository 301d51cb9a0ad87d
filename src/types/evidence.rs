use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::EvidenceChipError;

/// Link from a fire or guidance item back to a source span, formatted as
/// `document:page:start-end`.
///
/// Document identifiers may themselves contain `:`; the page and span are
/// always the last two segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EvidenceChip {
    document_id: String,
    page: u32,
    start: u64,
    end: u64,
}

impl EvidenceChip {
    #[must_use]
    pub fn new(document_id: &str, page: u32, start: u64, end: u64) -> Self {
        Self {
            document_id: document_id.to_owned(),
            page,
            start,
            end,
        }
    }

    #[must_use]
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Character span `[start, end)`.
    #[must_use]
    pub fn span(&self) -> (u64, u64) {
        (self.start, self.end)
    }
}

impl fmt::Display for EvidenceChip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}-{}",
            self.document_id, self.page, self.start, self.end
        )
    }
}

impl FromStr for EvidenceChip {
    type Err = EvidenceChipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || EvidenceChipError::Malformed {
            input: s.to_owned(),
        };
        let mut parts = s.rsplitn(3, ':');
        let (Some(span), Some(page), Some(document_id)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };
        if document_id.is_empty() {
            return Err(malformed());
        }
        let (start, end) = span.split_once('-').ok_or_else(malformed)?;
        let page = page.parse().map_err(|_| malformed())?;
        let start: u64 = start.parse().map_err(|_| malformed())?;
        let end: u64 = end.parse().map_err(|_| malformed())?;
        if end < start {
            return Err(EvidenceChipError::InvertedSpan { start, end });
        }
        Ok(Self::new(document_id, page, start, end))
    }
}

impl Serialize for EvidenceChip {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EvidenceChip {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
