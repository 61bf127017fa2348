//! Implementações de traits para o enum de erro do pipeline
//!
//! Este módulo existe exclusivamente para desacoplar:
//! - definição de erros (enums)
//! - implementação de traits (`Display`, `Error`, `From`)

use std::error::Error as StdError;
use std::fmt;

use polars::error::PolarsError;

use crate::errors::PipelineError;

/* ========================================================================== */
/* Display                                                                    */
/* ========================================================================== */

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Io(err) => write!(f, "[I/O] {}", err),
            PipelineError::Json(err) => write!(f, "[JSON] {}", err),
            PipelineError::Polars(err) => write!(f, "[Polars] {}", err),
            PipelineError::Config(msg) => write!(f, "[Config] {}", msg),
            PipelineError::Schema(msg) => write!(f, "[Schema] {}", msg),
            PipelineError::Dag(msg) => write!(f, "[DAG] {}", msg),
        }
    }
}

/* ========================================================================== */
/* std::error::Error                                                          */
/* ========================================================================== */

impl StdError for PipelineError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            PipelineError::Io(err) => Some(err),
            PipelineError::Json(err) => Some(err),
            PipelineError::Polars(err) => Some(err),
            PipelineError::Config(_) | PipelineError::Schema(_) | PipelineError::Dag(_) => None,
        }
    }
}

/* ========================================================================== */
/* Conversions                                                                */
/* ========================================================================== */

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::Io(err)
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::Json(err)
    }
}

impl From<PolarsError> for PipelineError {
    fn from(err: PolarsError) -> Self {
        match err {
            PolarsError::ColumnNotFound(msg) => {
                PipelineError::Schema(format!("coluna ausente: {}", msg))
            }
            other => PipelineError::Polars(other),
        }
    }
}
