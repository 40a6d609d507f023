use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Viewer settings
// ---------------------------------------------------------------------------

/// Tunables for the analysis views. Defaults match the usual notebook EDA
/// conventions (5-row preview, 30-bin histograms).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Rows shown in the dataset preview.
    pub preview_rows: usize,
    /// Fixed number of bins for the histogram chart.
    pub histogram_bins: usize,
    /// Title passed to the profile report generator.
    pub report_title: String,
    pub profile: ProfileSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            histogram_bins: 30,
            report_title: "Profiling Report".to_string(),
            profile: ProfileSettings::default(),
        }
    }
}

/// Thresholds used when raising profile alerts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSettings {
    pub histogram_bins: usize,
    /// Most frequent values listed per categorical variable.
    pub top_values: usize,
    /// Categorical variables with more distinct values than this are flagged.
    pub high_cardinality_threshold: usize,
    /// |r| above this flags a pair of numeric variables.
    pub high_correlation_threshold: f64,
    /// |skewness| above this flags a numeric variable.
    pub skewness_threshold: f64,
    /// Fraction of zeros above this flags a numeric variable.
    pub zeros_fraction_threshold: f64,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            histogram_bins: 10,
            top_values: 10,
            high_cardinality_threshold: 50,
            high_correlation_threshold: 0.9,
            skewness_threshold: 20.0,
            zeros_fraction_threshold: 0.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "histogram_bins": 12, "profile": { "top_values": 3 } }"#)
                .unwrap();
        assert_eq!(settings.histogram_bins, 12);
        assert_eq!(settings.preview_rows, 5);
        assert_eq!(settings.profile.top_values, 3);
        assert_eq!(settings.profile.high_cardinality_threshold, 50);
    }
}
