//! Template helper functions for code generation
//!
//! This module provides the naming conventions used across generated
//! artifacts: Go identifiers, module names, route paths and view directories.

use inflector::Inflector;

use crate::error::{ScaffoldError, ScaffoldResult};

/// Go keywords plus the names generated handlers and routes already bind
const RESERVED_LOCALS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else",
    "fallthrough", "for", "func", "go", "goto", "if", "import", "interface",
    "map", "package", "range", "return", "select", "struct", "switch", "type",
    "var", "app", "c", "db", "dbGorm", "err", "fiber", "gorm", "handlers",
    "models", "new", "nil", "result",
];

/// Naming helpers for scaffold code generation
pub struct TemplateHelpers;

impl TemplateHelpers {
    /// Derive an exported Go identifier from a table or field name
    ///
    /// Splits on `_` and upper-cases the first letter of every segment,
    /// leaving the rest of each segment untouched. Applying it to its own
    /// output returns the same identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// # use grails_scaffold::scaffold::helpers::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_identifier("order_item").unwrap(), "OrderItem");
    /// assert_eq!(TemplateHelpers::to_identifier("OrderItem").unwrap(), "OrderItem");
    /// assert!(TemplateHelpers::to_identifier("order-item").is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::InvalidIdentifier`] if the name is empty,
    /// consists only of underscores, contains anything other than ASCII
    /// alphanumerics and `_`, or starts with a digit.
    pub fn to_identifier(name: &str) -> ScaffoldResult<String> {
        if let Some(bad) = name.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
            return Err(ScaffoldError::invalid_identifier(
                name,
                format!("unexpected character '{bad}'"),
            ));
        }

        let identifier: String = name
            .split('_')
            .map(Self::capitalize_first)
            .collect();

        match identifier.chars().next() {
            None => Err(ScaffoldError::invalid_identifier(name, "name yields an empty identifier")),
            Some(first) if first.is_ascii_digit() => Err(ScaffoldError::invalid_identifier(
                name,
                "identifier cannot start with a digit",
            )),
            Some(_) => Ok(identifier),
        }
    }

    fn capitalize_first(segment: &str) -> String {
        let mut chars = segment.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_ascii_uppercase().to_string() + chars.as_str()
        })
    }

    /// Convert string to `snake_case`
    ///
    /// # Examples
    ///
    /// ```
    /// # use grails_scaffold::scaffold::helpers::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_snake_case("OrderItem"), "order_item");
    /// assert_eq!(TemplateHelpers::to_snake_case("order_item"), "order_item");
    /// ```
    #[must_use]
    pub fn to_snake_case(input: &str) -> String {
        input.to_snake_case()
    }

    /// Convert string to camelCase, used for Go local variables
    ///
    /// # Examples
    ///
    /// ```
    /// # use grails_scaffold::scaffold::helpers::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_camel_case("order_item"), "orderItem");
    /// ```
    #[must_use]
    pub fn to_camel_case(input: &str) -> String {
        input.to_camel_case()
    }

    /// Pluralize a word
    ///
    /// # Examples
    ///
    /// ```
    /// # use grails_scaffold::scaffold::helpers::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::pluralize("post"), "posts");
    /// assert_eq!(TemplateHelpers::pluralize("category"), "categories");
    /// ```
    #[must_use]
    pub fn pluralize(input: &str) -> String {
        input.to_plural()
    }

    /// Module name used for per-entity file names (`snake_case` singular)
    ///
    /// # Examples
    ///
    /// ```
    /// # use grails_scaffold::scaffold::helpers::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_module_name("OrderItem"), "order_item");
    /// ```
    #[must_use]
    pub fn to_module_name(table: &str) -> String {
        Self::to_snake_case(table)
    }

    /// View directory name (`snake_case` plural)
    ///
    /// # Examples
    ///
    /// ```
    /// # use grails_scaffold::scaffold::helpers::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_view_dir("order_item"), "order_items");
    /// ```
    #[must_use]
    pub fn to_view_dir(table: &str) -> String {
        Self::pluralize(&Self::to_snake_case(table))
    }

    /// Route mount path (`/` + `snake_case` plural)
    ///
    /// # Examples
    ///
    /// ```
    /// # use grails_scaffold::scaffold::helpers::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_route_path("order_item"), "/order_items");
    /// assert_eq!(TemplateHelpers::to_route_path("Post"), "/posts");
    /// ```
    #[must_use]
    pub fn to_route_path(table: &str) -> String {
        format!("/{}", Self::to_view_dir(table))
    }

    /// Human-readable title
    ///
    /// # Examples
    ///
    /// ```
    /// # use grails_scaffold::scaffold::helpers::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_title("order_item"), "Order Item");
    /// ```
    #[must_use]
    pub fn to_title(table: &str) -> String {
        table.to_title_case()
    }

    /// Whether `name` cannot be used as a local variable in generated Go code
    ///
    /// # Examples
    ///
    /// ```
    /// # use grails_scaffold::scaffold::helpers::TemplateHelpers;
    /// assert!(TemplateHelpers::is_reserved_local("type"));
    /// assert!(TemplateHelpers::is_reserved_local("db"));
    /// assert!(!TemplateHelpers::is_reserved_local("orderItem"));
    /// ```
    #[must_use]
    pub fn is_reserved_local(name: &str) -> bool {
        RESERVED_LOCALS.contains(&name)
    }

    /// Foreign key field for a referenced entity identifier
    ///
    /// # Examples
    ///
    /// ```
    /// # use grails_scaffold::scaffold::helpers::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_foreign_key("Order"), "OrderID");
    /// ```
    #[must_use]
    pub fn to_foreign_key(reference_identifier: &str) -> String {
        format!("{reference_identifier}ID")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier() {
        assert_eq!(TemplateHelpers::to_identifier("order_item").unwrap(), "OrderItem");
        assert_eq!(TemplateHelpers::to_identifier("user").unwrap(), "User");
        assert_eq!(TemplateHelpers::to_identifier("quantity").unwrap(), "Quantity");
        assert_eq!(TemplateHelpers::to_identifier("user_ID").unwrap(), "UserID");
        assert_eq!(TemplateHelpers::to_identifier("order__item").unwrap(), "OrderItem");
        assert_eq!(TemplateHelpers::to_identifier("_private").unwrap(), "Private");
    }

    #[test]
    fn test_identifier_is_idempotent() {
        for name in ["order_item", "user", "line_item_tax", "ABC_def"] {
            let once = TemplateHelpers::to_identifier(name).unwrap();
            let twice = TemplateHelpers::to_identifier(&once).unwrap();
            assert_eq!(once, twice, "to_identifier not idempotent for {name}");
        }
    }

    #[test]
    fn test_invalid_identifier() {
        assert!(TemplateHelpers::to_identifier("").is_err());
        assert!(TemplateHelpers::to_identifier("___").is_err());
        assert!(TemplateHelpers::to_identifier("order-item").is_err());
        assert!(TemplateHelpers::to_identifier("order item").is_err());
        assert!(TemplateHelpers::to_identifier("1order").is_err());
        assert!(TemplateHelpers::to_identifier("café").is_err());
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(TemplateHelpers::to_snake_case("OrderItem"), "order_item");
        assert_eq!(TemplateHelpers::to_snake_case("simple"), "simple");
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(TemplateHelpers::to_camel_case("order_item"), "orderItem");
        assert_eq!(TemplateHelpers::to_camel_case("OrderItem"), "orderItem");
    }

    #[test]
    fn test_route_path() {
        assert_eq!(TemplateHelpers::to_route_path("order_item"), "/order_items");
        assert_eq!(TemplateHelpers::to_route_path("OrderItem"), "/order_items");
        assert_eq!(TemplateHelpers::to_route_path("category"), "/categories");
    }

    #[test]
    fn test_view_dir() {
        assert_eq!(TemplateHelpers::to_view_dir("post"), "posts");
    }

    #[test]
    fn test_foreign_key() {
        assert_eq!(TemplateHelpers::to_foreign_key("Order"), "OrderID");
    }
}
