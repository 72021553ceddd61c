use serde_json::Value;
use tracing::{debug, info};

use crate::diagnostics::{Diagnostic, ReasonCode, Stage, Subject, ValidationFailure};
use crate::domain::{PriceCatalogue, Validated};
use crate::fields::{as_record, coerce_price, optional_field, required_field};

/// Builds the price lookup from raw catalogue JSON
pub struct CatalogueBuilder;

impl CatalogueBuilder {
    /// Never fails: malformed entries are omitted and reported as diagnostics.
    /// Duplicate titles keep the price of the last occurrence.
    pub fn build(raw: &Value) -> Validated<PriceCatalogue> {
        let mut catalogue = PriceCatalogue::default();
        let mut diagnostics = Vec::new();

        let Some(entries) = raw.as_array() else {
            let diagnostic = Diagnostic::input_rejected(Stage::Catalogue, "Catalogue data is not a list");
            diagnostic.trace();
            diagnostics.push(diagnostic);
            return Validated::new(catalogue, diagnostics);
        };

        for (index, entry) in entries.iter().enumerate() {
            match validate_entry(index, entry) {
                Ok((title, price)) => {
                    if catalogue.contains(&title) {
                        debug!(title = %title, price, "Duplicate catalogue title, keeping later price");
                    }
                    catalogue.insert(title, price);
                }
                Err(diagnostic) => {
                    diagnostic.trace();
                    diagnostics.push(diagnostic);
                }
            }
        }

        info!(
            entries = entries.len(),
            products = catalogue.len(),
            skipped = diagnostics.len(),
            "Price catalogue built"
        );

        Validated::new(catalogue, diagnostics)
    }
}

fn validate_entry(index: usize, entry: &Value) -> Result<(String, f64), Diagnostic> {
    let at_index = |failure: ValidationFailure| Diagnostic::skipped(Stage::Catalogue, Subject::Index(index), failure);

    let record = as_record(entry).ok_or_else(|| {
        at_index(ValidationFailure::new(
            ReasonCode::NotARecord,
            format!("Item {index} in catalogue is not a dictionary"),
        ))
    })?;

    let title = required_field(record, "title", ReasonCode::MissingTitle)
        .map_err(|failure| {
            at_index(ValidationFailure::new(
                failure.reason,
                format!("Item {index} missing 'title' field"),
            ))
        })?
        .as_str()
        .ok_or_else(|| {
            at_index(ValidationFailure::new(
                ReasonCode::InvalidTitle,
                format!("Item {index} has a non-text 'title'"),
            ))
        })?
        .to_string();

    let at_title = |failure: ValidationFailure| {
        Diagnostic::skipped(Stage::Catalogue, Subject::Key(title.clone()), failure)
    };

    let raw_price = optional_field(record, "price").ok_or_else(|| {
        at_title(ValidationFailure::new(
            ReasonCode::MissingPrice,
            format!("Item '{title}' missing 'price' field"),
        ))
    })?;

    let price = coerce_price(raw_price).map_err(|failure| {
        at_title(ValidationFailure::new(
            failure.reason,
            format!("Invalid price for '{title}': {}", failure.detail),
        ))
    })?;

    Ok((title, price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use serde_json::json;

    #[test]
    fn test_build_scenario_catalogue() {
        let raw = json!([
            {"title": "Apple", "price": "1.50"},
            {"title": "Orange", "price": 2}
        ]);
        let (catalogue, diagnostics) = CatalogueBuilder::build(&raw).into_parts();
        assert!(diagnostics.is_empty());
        assert_eq!(catalogue.len(), 2);
        assert_eq!(catalogue.price_of("Apple"), Some(1.5));
        assert_eq!(catalogue.price_of("Orange"), Some(2.0));
    }

    #[test]
    fn test_build_non_list_degrades_to_empty() {
        let raw = json!({"title": "Apple", "price": 1.0});
        let (catalogue, diagnostics) = CatalogueBuilder::build(&raw).into_parts();
        assert!(catalogue.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(diagnostics[0].reason, ReasonCode::NotAList);
        assert_eq!(diagnostics[0].subject, Subject::Input);
    }

    #[test]
    fn test_build_empty_list() {
        let (catalogue, diagnostics) = CatalogueBuilder::build(&json!([])).into_parts();
        assert!(catalogue.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_build_skips_non_record_by_index() {
        let raw = json!([42, {"title": "Pen", "price": 1.0}]);
        let (catalogue, diagnostics) = CatalogueBuilder::build(&raw).into_parts();
        assert_eq!(catalogue.len(), 1);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].reason, ReasonCode::NotARecord);
        assert_eq!(diagnostics[0].subject, Subject::Index(0));
    }

    #[test]
    fn test_build_missing_or_null_title_references_index() {
        let raw = json!([{"price": 1.0}, {"title": null, "price": 2.0}]);
        let (catalogue, diagnostics) = CatalogueBuilder::build(&raw).into_parts();
        assert!(catalogue.is_empty());
        assert_eq!(
            diagnostics.iter().map(|d| (d.reason, d.subject.clone())).collect::<Vec<_>>(),
            vec![
                (ReasonCode::MissingTitle, Subject::Index(0)),
                (ReasonCode::MissingTitle, Subject::Index(1)),
            ]
        );
    }

    #[test]
    fn test_build_non_text_title_is_skipped() {
        let raw = json!([{"title": 5, "price": 1.0}]);
        let (catalogue, diagnostics) = CatalogueBuilder::build(&raw).into_parts();
        assert!(catalogue.is_empty());
        assert_eq!(diagnostics[0].reason, ReasonCode::InvalidTitle);
        assert_eq!(diagnostics[0].subject, Subject::Index(0));
    }

    #[test]
    fn test_build_missing_price_references_title() {
        let raw = json!([{"title": "Pen"}, {"title": "Ink", "price": null}]);
        let (catalogue, diagnostics) = CatalogueBuilder::build(&raw).into_parts();
        assert!(catalogue.is_empty());
        assert_eq!(diagnostics[0].reason, ReasonCode::MissingPrice);
        assert_eq!(diagnostics[0].subject, Subject::Key("Pen".to_string()));
        assert_eq!(diagnostics[1].subject, Subject::Key("Ink".to_string()));
    }

    #[test]
    fn test_build_invalid_price_references_title_and_leaves_mapping_alone() {
        let raw = json!([
            {"title": "Pen", "price": 1.0},
            {"title": "Widget", "price": "abc"}
        ]);
        let (catalogue, diagnostics) = CatalogueBuilder::build(&raw).into_parts();
        assert_eq!(catalogue.titles().collect::<Vec<_>>(), vec!["Pen"]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].reason, ReasonCode::InvalidPrice);
        assert_eq!(diagnostics[0].subject, Subject::Key("Widget".to_string()));
        assert!(diagnostics[0].detail.contains("Widget"));
    }

    #[test]
    fn test_build_invalid_price_does_not_erase_earlier_duplicate() {
        let raw = json!([
            {"title": "Pen", "price": 1.0},
            {"title": "Pen", "price": "abc"}
        ]);
        let (catalogue, _) = CatalogueBuilder::build(&raw).into_parts();
        assert_eq!(catalogue.price_of("Pen"), Some(1.0));
    }

    /// Last-write-wins on duplicate titles is the documented policy, carried
    /// over as observed behaviour rather than a confirmed requirement.
    #[test]
    fn test_build_duplicate_titles_last_write_wins_policy() {
        let raw = json!([
            {"title": "Pen", "price": 1.0},
            {"title": "Pen", "price": 1.5}
        ]);
        let (catalogue, diagnostics) = CatalogueBuilder::build(&raw).into_parts();
        assert!(diagnostics.is_empty());
        assert_eq!(catalogue.len(), 1);
        assert_eq!(catalogue.price_of("Pen"), Some(1.5));
    }

    #[test]
    fn test_build_titles_are_case_sensitive() {
        let raw = json!([
            {"title": "pen", "price": 1.0},
            {"title": "Pen", "price": 2.0}
        ]);
        let (catalogue, _) = CatalogueBuilder::build(&raw).into_parts();
        assert_eq!(catalogue.len(), 2);
        assert_eq!(catalogue.price_of("pen"), Some(1.0));
        assert_eq!(catalogue.price_of("PEN"), None);
    }

    #[test]
    fn test_build_ignores_extra_fields() {
        let raw = json!([{"title": "Pen", "price": 1.0, "type": "office", "id": 3}]);
        let (catalogue, diagnostics) = CatalogueBuilder::build(&raw).into_parts();
        assert!(diagnostics.is_empty());
        assert_eq!(catalogue.price_of("Pen"), Some(1.0));
    }

    #[test]
    fn test_build_is_idempotent() {
        let raw = json!([
            {"title": "Apple", "price": "1.50"},
            "junk",
            {"title": "Pear", "price": "x"}
        ]);
        assert_eq!(CatalogueBuilder::build(&raw), CatalogueBuilder::build(&raw));
    }
}
