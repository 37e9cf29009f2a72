//! Data models exchanged with the webview

use serde::{Deserialize, Serialize};

/// Shown when analyze is pressed on an empty canvas
pub const DRAW_FIRST_WARNING: &str = "⚠️ Please draw an equation first.";
/// Prefix for analyze failures rendered inline
pub const ERROR_PREFIX: &str = "❌ Error: ";

/// The last successful model answer for this session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub text: String,
    pub model: String,
    pub created_at: String,
}

/// Result of a single press of the analyze button
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalyzeOutcome {
    Solved { record: AnalysisRecord },
    NeedsDrawing { message: String },
    Failed { message: String },
}

impl AnalyzeOutcome {
    pub fn needs_drawing() -> Self {
        AnalyzeOutcome::NeedsDrawing {
            message: DRAW_FIRST_WARNING.to_string(),
        }
    }

    pub fn failed(reason: &str) -> Self {
        AnalyzeOutcome::Failed {
            message: format!("{}{}", ERROR_PREFIX, reason),
        }
    }
}
