use serde::{Deserialize, Serialize};

//
// ─── INSIGHT ───────────────────────────────────────────────────────────────────
//

/// Categorized reference lists attached to an insight (inputs, tools, outputs).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IttoRefs {
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
}

/// Structured study guidance returned by the insight generator.
///
/// Ephemeral: produced per request, never persisted, superseded by the next
/// request. Field names match the generator's JSON wire shape; required
/// fields fail deserialization when absent, so a malformed response is
/// rejected as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub summary: String,
    pub best_practices: Vec<String>,
    pub common_pitfalls: Vec<String>,
    pub modern_perspective: String,
    pub tips_to_remember: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mnemonic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ittos: Option<IttoRefs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interconnectivity: Option<String>,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
