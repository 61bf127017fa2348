//! # Construtores do Modelo Estrela
//!
//! Cada construtor recebe suas tabelas de entrada e o [`TableStore`] de saída,
//! grava a tabela resultante (overwrite) e devolve o `DataFrame` gravado.
//!
//! [`TableStore`]: crate::storage::TableStore

pub mod arrivals;
pub mod country;
pub mod demographics;
pub mod fact;
pub mod visa_type;

use polars::prelude::*;

pub use arrivals::build_arrivals_dimension;
pub use country::build_country_dimension;
pub use demographics::build_demographics_dimension;
pub use fact::build_immigration_fact;
pub use visa_type::build_visa_type_dimension;

pub const VISA_TYPE_TABLE: &str = "visatype";
pub const FACT_TABLE: &str = "immigration_fact";
pub const ARRIVALS_TABLE: &str = "immigration_arrivals";
pub const DEMOGRAPHICS_TABLE: &str = "demographics";
pub const COUNTRY_TABLE: &str = "country";

/// Acrescenta ao final uma chave substituta `0..n` na ordem atual das linhas.
///
/// A ordem é sempre fixada pelo chamador (ordenação ou ordem da origem), o que
/// torna as chaves reprodutíveis entre execuções.
pub(crate) fn append_surrogate_id(df: &mut DataFrame, name: &str) -> PolarsResult<()> {
    let ids: Vec<i64> = (0..df.height() as i64).collect();
    df.with_column(Column::new(name.into(), ids))?;
    Ok(())
}

/// Expressão que lê um código como texto.
///
/// Códigos vindos do SAS chegam como float (`101.0`); nesse caso passam por
/// inteiro antes de virar texto.
pub(crate) fn code_as_text(df: &DataFrame, name: &str) -> PolarsResult<Expr> {
    let dtype = df.column(name)?.dtype();
    let expr = if dtype.is_float() {
        col(name).cast(DataType::Int64).cast(DataType::String)
    } else {
        col(name).cast(DataType::String)
    };
    Ok(expr.alias(name))
}
