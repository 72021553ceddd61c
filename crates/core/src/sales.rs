use serde_json::Value;
use tracing::info;

use crate::diagnostics::{Diagnostic, ReasonCode, Stage, Subject, ValidationFailure};
use crate::domain::{AggregationResult, PriceCatalogue, SaleLineItem, Validated, NOT_AVAILABLE};
use crate::fields::{as_record, coerce_quantity, display_text, required_field, text_or};

/// Joins raw sale records against a price catalogue
pub struct SalesAggregator;

impl SalesAggregator {
    /// Single pass over `raw_sales`. Each record is either accepted into the
    /// result or skipped with a diagnostic; both keep input order.
    pub fn aggregate(raw_sales: &Value, catalogue: &PriceCatalogue) -> Validated<AggregationResult> {
        let Some(records) = raw_sales.as_array() else {
            let diagnostic = Diagnostic::input_rejected(Stage::Sales, "Sales data is not a list");
            diagnostic.trace();
            return Validated::new(AggregationResult::default(), vec![diagnostic]);
        };

        let (result, diagnostics) = records.iter().enumerate().fold(
            (AggregationResult::default(), Vec::new()),
            |(result, mut diagnostics), (index, record)| match validate_sale(index, record, catalogue) {
                Ok(item) => (result.accept(item), diagnostics),
                Err(diagnostic) => {
                    diagnostic.trace();
                    diagnostics.push(diagnostic);
                    (result, diagnostics)
                }
            },
        );

        info!(
            records = records.len(),
            valid = result.line_items.len(),
            skipped = diagnostics.len(),
            total_cost = result.total_cost,
            "Sales aggregated"
        );

        Validated::new(result, diagnostics)
    }
}

/// Runs every gate for one record; the first failing gate decides the diagnostic
pub fn validate_sale(index: usize, sale: &Value, catalogue: &PriceCatalogue) -> Result<SaleLineItem, Diagnostic> {
    let at_index = |failure: ValidationFailure| Diagnostic::skipped(Stage::Sales, Subject::Index(index), failure);

    let record = as_record(sale).ok_or_else(|| {
        at_index(ValidationFailure::new(
            ReasonCode::NotARecord,
            format!("Sale record {index} is not a dictionary"),
        ))
    })?;

    let product = required_field(record, "Product", ReasonCode::MissingProduct).map_err(|failure| {
        at_index(ValidationFailure::new(
            failure.reason,
            format!("Sale record {index} missing 'Product' field"),
        ))
    })?;

    let raw_quantity = required_field(record, "Quantity", ReasonCode::MissingQuantity).map_err(|failure| {
        at_index(ValidationFailure::new(
            failure.reason,
            format!("Sale record {index} missing 'Quantity' field"),
        ))
    })?;

    let quantity = coerce_quantity(raw_quantity).map_err(|failure| {
        at_index(ValidationFailure::new(
            failure.reason,
            format!("Invalid quantity for sale {index}: {}", failure.detail),
        ))
    })?;

    // Only text products can match a catalogue title
    let unit_price = product
        .as_str()
        .and_then(|title| catalogue.price_of(title))
        .ok_or_else(|| {
            let name = display_text(product);
            Diagnostic::skipped(
                Stage::Sales,
                Subject::Key(name.clone()),
                ValidationFailure::new(
                    ReasonCode::UnknownProduct,
                    format!("Product '{name}' not found in catalogue"),
                ),
            )
        })?;

    Ok(SaleLineItem::new(
        text_or(record, "SALE_ID", NOT_AVAILABLE),
        text_or(record, "SALE_Date", NOT_AVAILABLE),
        display_text(product),
        quantity,
        unit_price,
    ))
}
