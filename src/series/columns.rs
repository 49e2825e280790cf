//! Column label normalization.
//!
//! Source files label columns like `[US dollar ]` and `Period\Unit:`. We map
//! every label to a lowercase, underscore-separated identifier, then apply a
//! small override table for labels whose generic form is not useful.

/// Exact raw-label overrides, applied after the generic transform.
///
/// Keys are raw labels. A label matches when its generic form equals the key's
/// generic form, so the override also holds for already-normalized input.
pub const COLUMN_OVERRIDES: &[(&str, &str)] = &[("Period\\Unit:", "time")];

/// Normalize every label, preserving order and length.
pub fn normalize_columns<S: AsRef<str>>(labels: &[S]) -> Vec<String> {
    labels
        .iter()
        .map(|label| normalize_column(label.as_ref()))
        .collect()
}

/// Normalize a single raw label.
pub fn normalize_column(raw: &str) -> String {
    let generic = generic_transform(clean_raw(raw));
    match override_for(&generic) {
        Some(name) => name.to_string(),
        None => generic,
    }
}

/// Strip bracket markers, turn spaces into underscores, lowercase.
pub fn generic_transform(raw: &str) -> String {
    raw.replace('[', "")
        .replace(" ]", "")
        .replace(' ', "_")
        .to_lowercase()
}

fn override_for(generic: &str) -> Option<&'static str> {
    COLUMN_OVERRIDES
        .iter()
        .find(|(from, _)| generic_transform(from) == generic)
        .map(|(_, to)| *to)
}

fn clean_raw(raw: &str) -> &str {
    // Spreadsheet exports often prefix the first header with a BOM.
    raw.trim_start_matches('\u{feff}').trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn bracketed_currency_label() {
        assert_eq!(normalize_column("[US dollar ]"), "us_dollar");
        assert_eq!(normalize_column("[Japanese yen ]"), "japanese_yen");
        assert_eq!(normalize_column("[Chinese yuan renminbi ]"), "chinese_yuan_renminbi");
    }

    #[test]
    fn legacy_time_label_maps_to_time() {
        assert_eq!(normalize_column("Period\\Unit:"), "time");
        assert_eq!(normalize_column("period\\unit:"), "time");
        assert_eq!(normalize_column("\u{feff}Period\\Unit:"), "time");
    }

    #[test]
    fn unmapped_labels_use_generic_transform() {
        assert_eq!(normalize_column("Some Label"), "some_label");
        assert_eq!(normalize_column("already_clean"), "already_clean");
    }

    #[test]
    fn order_and_length_preserved() {
        let raw = ["Period\\Unit:", "[Australian dollar ]", "[US dollar ]"];
        let out = normalize_columns(&raw);
        assert_eq!(out, vec!["time", "australian_dollar", "us_dollar"]);
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(label in "[A-Za-z \\[\\]:\\\\]{0,24}") {
            let once = normalize_column(&label);
            prop_assert_eq!(normalize_column(&once), once.clone());
        }

        #[test]
        fn legacy_label_maps_to_time_in_either_order(upper in any::<bool>()) {
            let raw = if upper { "Period\\Unit:" } else { "period\\unit:" };
            prop_assert_eq!(normalize_column(raw), "time");
            prop_assert_eq!(normalize_column(&generic_transform(raw)), "time");
        }

        #[test]
        fn legacy_label_wins_regardless_of_padding(pad in " {0,3}") {
            let raw = format!("{pad}Period\\Unit:{pad}");
            prop_assert_eq!(normalize_column(&raw), "time");
        }
    }
}
