use crate::error::TempleError;
use serde::{Deserialize, Serialize};

/// Values printed on one visit label.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabelData {
    pub devotee_id: String,
    pub devotee_name: String,
    pub item: String,
    /// `YYYY-MM-DD`
    pub date: String,
}

impl LabelData {
    /// Builds label data from possibly missing values, substituting the
    /// printer placeholders for anything absent.
    pub fn with_defaults(
        devotee_id: Option<&str>,
        devotee_name: Option<&str>,
        item: Option<&str>,
        date: Option<&str>,
    ) -> Self {
        Self {
            devotee_id: devotee_id.unwrap_or("Unknown").to_string(),
            devotee_name: devotee_name.unwrap_or("Unknown").to_string(),
            item: item.unwrap_or("Unknown Item").to_string(),
            date: date.unwrap_or("Unknown Date").to_string(),
        }
    }
}

/// Render the PRN command block for the label printer.
///
/// Layout is fixed: start marker, density, barcode with the devotee id,
/// then name, item and date text lines, then print count. Values are
/// inserted verbatim; callers keep `"` and control bytes out of them.
pub fn render_prn(data: &LabelData) -> String {
    format!(
        "\nN\nD11\nB50,20,0,1,2,8,40,B,\"{}\"\nA60,70,0,3,1,1,N,\"{}\"\nA60,100,0,3,1,1,N,\"Item: {}\"\nA60,130,0,2,1,1,N,\"Date: {}\"\nP1\n",
        data.devotee_id, data.devotee_name, data.item, data.date
    )
}

/// Check the fields a label cannot be printed without.
pub fn validate_label_data(data: &LabelData) -> Result<(), TempleError> {
    let required = [
        ("devotee_id", &data.devotee_id),
        ("item", &data.item),
        ("date", &data.date),
    ];
    match required.iter().find(|(_, value)| value.is_empty()) {
        Some((field, _)) => Err(TempleError::Validation(format!(
            "Missing required field: {field}"
        ))),
        None => Ok(()),
    }
}

/// True when `value` can be embedded in a PRN string literal unchanged.
pub fn is_label_safe(value: &str) -> bool {
    !value.chars().any(|c| c == '"' || c.is_control())
}
