pub mod datetime_normalizer;
pub mod order_normalizer;
pub mod quality_report;

pub use datetime_normalizer::*;
pub use order_normalizer::*;
pub use quality_report::*;
