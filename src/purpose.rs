use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Closed classification of an allocation's free-form purpose text.
///
/// Classification happens once, at write time, so every read path (dispatch
/// gate, vendor list) works on the tag instead of re-scanning free text.
/// The match is a case-insensitive substring test, which keeps the historical
/// behavior that e.g. "Project X" and "sales project" both classify as
/// `Project`. So does "non-project" — tightening that is a product decision,
/// and would be a one-line change here.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PurposeTag {
    #[default]
    General,
    Project,
    Marketing,
    Other,
}

impl PurposeTag {
    /// Derive the tag from free-form purpose text.
    pub fn classify(purpose: &str) -> Self {
        let trimmed = purpose.trim();
        if trimmed.is_empty() {
            return PurposeTag::General;
        }
        let lowered = trimmed.to_lowercase();
        if lowered.contains("project") {
            PurposeTag::Project
        } else if lowered.contains("marketing") {
            PurposeTag::Marketing
        } else {
            PurposeTag::Other
        }
    }

    /// Whether allocations with this tag may be dispatched to a vendor.
    pub fn vendor_eligible(self) -> bool {
        matches!(self, PurposeTag::Project | PurposeTag::Marketing)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PurposeTag::General => "general",
            PurposeTag::Project => "project",
            PurposeTag::Marketing => "marketing",
            PurposeTag::Other => "other",
        }
    }
}
