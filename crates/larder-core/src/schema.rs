// crates/larder-core/src/schema.rs
//
// Structural contracts for the staged tables: required columns, dtypes, and
// nullability. Every stager validates its frame against one of these
// contracts immediately before persisting, so a malformed staged file is
// never written.

use polars::prelude::{DataFrame, DataType};

use crate::error::{PipelineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    String,
    Float,
    Int,
    Date,
}

impl ColumnType {
    fn matches(&self, dtype: &DataType) -> bool {
        match self {
            ColumnType::String => matches!(dtype, DataType::String),
            ColumnType::Float => matches!(dtype, DataType::Float32 | DataType::Float64),
            ColumnType::Int => matches!(dtype, DataType::Int32 | DataType::Int64),
            ColumnType::Date => matches!(dtype, DataType::Date),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Float => "float",
            ColumnType::Int => "int",
            ColumnType::Date => "date",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub dtype: ColumnType,
    pub nullable: bool,
    /// Columns that a stage only emits conditionally (the shipment date
    /// deltas) are checked for type and nullability when present, but their
    /// absence is not a violation.
    pub required: bool,
}

impl ColumnSpec {
    const fn required(name: &'static str, dtype: ColumnType) -> Self {
        Self {
            name,
            dtype,
            nullable: false,
            required: true,
        }
    }

    const fn nullable(name: &'static str, dtype: ColumnType) -> Self {
        Self {
            name,
            dtype,
            nullable: true,
            required: true,
        }
    }

    const fn optional(name: &'static str, dtype: ColumnType) -> Self {
        Self {
            name,
            dtype,
            nullable: true,
            required: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub table: &'static str,
    pub columns: &'static [ColumnSpec],
}

pub const INGREDIENT_SCHEMA: TableSchema = TableSchema {
    table: "staged_ingredients",
    columns: &[
        ColumnSpec::required("menu_item", ColumnType::String),
        ColumnSpec::required("ingredient_name", ColumnType::String),
        ColumnSpec::required("quantity", ColumnType::Float),
    ],
};

pub const SHIPMENT_SCHEMA: TableSchema = TableSchema {
    table: "staged_shipments",
    columns: &[
        ColumnSpec::required("ingredient_name", ColumnType::String),
        ColumnSpec::optional("expected_date", ColumnType::Date),
        ColumnSpec::optional("arrival_date", ColumnType::Date),
        ColumnSpec::optional("quantity", ColumnType::Float),
        ColumnSpec::optional("delay_days", ColumnType::Int),
    ],
};

pub const SALES_SCHEMA: TableSchema = TableSchema {
    table: "staged_sales",
    columns: &[
        ColumnSpec::required("month", ColumnType::String),
        ColumnSpec::required("menu_item", ColumnType::String),
        ColumnSpec::required("ingredient_name", ColumnType::String),
        ColumnSpec::required("quantity", ColumnType::Float),
    ],
};

pub const FORECAST_SCHEMA: TableSchema = TableSchema {
    table: "staged_forecast",
    columns: &[
        ColumnSpec::required("ingredient_name", ColumnType::String),
        ColumnSpec::required("predicted_usage_next_month", ColumnType::Float),
    ],
};

impl TableSchema {
    /// Checks the frame against the contract and reports every violating
    /// column at once.
    pub fn validate(&self, df: &DataFrame) -> Result<()> {
        let mut violations: Vec<String> = Vec::new();

        for spec in self.columns {
            let column = match df.column(spec.name) {
                Ok(column) => column,
                Err(_) => {
                    if spec.required {
                        violations.push(format!("missing column '{}'", spec.name));
                    }
                    continue;
                }
            };

            let dtype = column.dtype();
            if !spec.dtype.matches(dtype) {
                violations.push(format!(
                    "column '{}' has dtype {} (expected {})",
                    spec.name,
                    dtype,
                    spec.dtype.label()
                ));
                continue;
            }

            if !spec.nullable && column.null_count() > 0 {
                violations.push(format!(
                    "column '{}' contains {} null value(s) but is not nullable",
                    spec.name,
                    column.null_count()
                ));
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(PipelineError::Validation {
                table: self.table.to_string(),
                reason: violations.join("; "),
            })
        }
    }
}
