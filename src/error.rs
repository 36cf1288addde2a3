use thiserror::Error;

/// Domain failures raised while repairing and aggregating the source tables.
///
/// All of these are fatal: the job is a one-shot batch run, so the fix is to
/// repair the offending source file and run again.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("quantity value {0:?} is not a number even after word substitution")]
    BadQuantity(String),

    #[error("no parser in the {field} cascade accepted the value {value:?}")]
    DateTimeExhausted { field: &'static str, value: String },

    #[error("pizza {pizza_id:?} references recipe {pizza_type_id:?}, which is not in the pizza types table")]
    UnknownRecipe {
        pizza_id: String,
        pizza_type_id: String,
    },

    #[error("pizza {pizza_id:?} has size code {size:?}, expected one of s/m/l/xl/xxl")]
    UnknownSizeCode { pizza_id: String, size: String },
}
