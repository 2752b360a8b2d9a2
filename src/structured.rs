//! Type tags for structured outputs (sequences, factor graphs, ...).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StructuredDataType {
    Unknown,
    Real,
    SequenceOfLabels,
    FactorGraph,
    Multilabel,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructuredDataError {
    #[error(
        "{0}::structured_data_type() not defined. Make sure that every \
         implementor of StructuredData overrides structured_data_type()"
    )]
    TypeNotDefined(String),
}

/// A structured label or output value.
pub trait StructuredData {
    fn name(&self) -> &str;

    /// Implementors must override this; the default is an implementation error.
    fn structured_data_type(&self) -> Result<StructuredDataType, StructuredDataError> {
        Err(StructuredDataError::TypeNotDefined(self.name().to_string()))
    }
}

/// Real-valued structured output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RealNumber(pub f64);

impl StructuredData for RealNumber {
    fn name(&self) -> &str {
        "RealNumber"
    }

    fn structured_data_type(&self) -> Result<StructuredDataType, StructuredDataError> {
        Ok(StructuredDataType::Real)
    }
}

/// Label sequence, e.g. hidden states of an HMM-SVM.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sequence(pub Vec<i32>);

impl StructuredData for Sequence {
    fn name(&self) -> &str {
        "Sequence"
    }

    fn structured_data_type(&self) -> Result<StructuredDataType, StructuredDataError> {
        Ok(StructuredDataType::SequenceOfLabels)
    }
}
