//! Error types for schema interpretation and DDL emission.

/// Errors that can occur while turning sheet rows into DDL.
///
/// Every variant is fatal: a run that hits one produces no output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// The type cell matched none of the known type patterns.
    #[error("@ {sheet} {column} - {value}: unrecognised column type")]
    UnclassifiableType {
        /// Sheet holding the row.
        sheet: String,
        /// Column name from the row.
        column: String,
        /// Raw type cell.
        value: String,
    },

    /// The key marker cell is outside the accepted vocabulary.
    #[error("@ {sheet} {column} - {value}: invalid key marker")]
    InvalidKeyMarker {
        /// Sheet holding the row.
        sheet: String,
        /// Column name from the row.
        column: String,
        /// Raw key marker cell.
        value: String,
    },

    /// The index marker cell is outside the accepted vocabulary.
    #[error("@ {sheet} {column} - {value}: invalid index marker")]
    InvalidIndexMarker {
        /// Sheet holding the row.
        sheet: String,
        /// Column name from the row.
        column: String,
        /// Raw index marker cell.
        value: String,
    },

    /// The nullability cell is outside the accepted vocabulary.
    #[error("@ {sheet} {column} - {value}: invalid nullability marker")]
    InvalidNullabilityMarker {
        /// Sheet holding the row.
        sheet: String,
        /// Column name from the row.
        column: String,
        /// Raw nullability cell.
        value: String,
    },

    /// Two rows of the same sheet declare the same column name.
    #[error("@ {sheet} {column} - duplicate column name")]
    DuplicateColumn {
        /// Sheet holding the rows.
        sheet: String,
        /// The repeated column name.
        column: String,
    },

    /// Two index or constraint names of one table are equal once cut to the
    /// dialect's identifier length.
    #[error("{dialect}: identifier '{identifier}' in sheet {sheet} collides after truncation to {max} characters")]
    DuplicateIdentifier {
        /// Target dialect name.
        dialect: &'static str,
        /// Sheet the identifier belongs to.
        sheet: String,
        /// The colliding, truncated identifier.
        identifier: String,
        /// The dialect's identifier length limit.
        max: usize,
    },

    /// A dialect name could not be recognised.
    #[error("Unknown dialect '{0}'")]
    UnknownDialect(String),
}

impl SchemaError {
    /// Returns the `(sheet, column, value)` triple for row-level errors.
    #[must_use]
    pub fn row_context(&self) -> Option<(&str, &str, &str)> {
        match self {
            Self::UnclassifiableType {
                sheet,
                column,
                value,
            }
            | Self::InvalidKeyMarker {
                sheet,
                column,
                value,
            }
            | Self::InvalidIndexMarker {
                sheet,
                column,
                value,
            }
            | Self::InvalidNullabilityMarker {
                sheet,
                column,
                value,
            } => Some((sheet, column, value)),
            Self::DuplicateColumn { sheet, column } => Some((sheet, column, column)),
            _ => None,
        }
    }
}

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_error_display_names_sheet_column_and_value() {
        let err = SchemaError::InvalidKeyMarker {
            sheet: "SDM_ORDER".to_string(),
            column: "order_id".to_string(),
            value: "X".to_string(),
        };
        assert_eq!(err.to_string(), "@ SDM_ORDER order_id - X: invalid key marker");
        assert_eq!(err.row_context(), Some(("SDM_ORDER", "order_id", "X")));
    }

    #[test]
    fn test_emission_error_has_no_row_context() {
        let err = SchemaError::DuplicateIdentifier {
            dialect: "oracle",
            sheet: "SDM_ORDER".to_string(),
            identifier: "ix_SDM_ORDER_registration_da".to_string(),
            max: 30,
        };
        assert!(err.row_context().is_none());
        assert!(err.to_string().contains("collides after truncation to 30"));
    }
}
