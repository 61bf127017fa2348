//! Verificação de qualidade das tabelas geradas.
//!
//! Apenas observabilidade: um resultado vazio é registrado como falha, mas
//! nunca interrompe o pipeline.

use std::fmt;

use log::{info, warn};
use polars::prelude::DataFrame;
use serde::Serialize;

/// Resultado da verificação de uma tabela.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualityReport {
    pub table: String,
    pub row_count: usize,
    pub passed: bool,
}

impl QualityReport {
    pub fn new(table: impl Into<String>, row_count: usize) -> Self {
        Self {
            table: table.into(),
            row_count,
            passed: row_count > 0,
        }
    }
}

impl fmt::Display for QualityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed {
            write!(
                f,
                "Verificação de qualidade bem-sucedida em {} - {} registros.",
                self.table,
                group_thousands(self.row_count)
            )
        } else {
            write!(
                f,
                "Verificação de qualidade falhou em {} - nenhum registro!",
                self.table
            )
        }
    }
}

/// Conta as linhas de `df` e registra o resultado no log.
pub fn data_quality_check(df: &DataFrame, table: &str) -> QualityReport {
    let report = QualityReport::new(table, df.height());

    if report.passed {
        info!("{}", report);
    } else {
        warn!("{}", report);
    }
    report
}

// 1234567 -> "1,234,567"
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
