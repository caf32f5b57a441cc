//! OData filter expressions.

/// Field holding a document's category.
pub const CATEGORY_FIELD: &str = "category";

/// Quote a string literal for an OData filter, doubling embedded quotes.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Filter excluding one category: `category ne '<value>'`.
pub fn exclude_category(category: &str) -> String {
    format!("{} ne {}", CATEGORY_FIELD, quote_literal(category))
}
