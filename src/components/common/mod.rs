mod fields;

pub use fields::{FieldFocus, NumericField, TextField};
