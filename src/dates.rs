//! Conversão de datas no formato SAS.
//!
//! Os registros de imigração guardam a data de chegada como número de dias
//! desde 1960-01-01. Aqui ficam a conversão escalar (com `chrono`) e a versão
//! aplicada elemento a elemento sobre uma coluna do Polars.

use chrono::{Datelike, Duration, NaiveDate};
use polars::prelude::*;

/// Decomposição de uma data de chegada em partes de calendário.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarParts {
    pub day: i32,
    /// Semana ISO-8601 do ano.
    pub week: i32,
    pub month: i32,
    pub year: i32,
    /// 1 = domingo ... 7 = sábado.
    pub weekday: i32,
}

/// Data correspondente a `offset` dias após 1960-01-01.
///
/// Retorna `None` para entrada ausente ou fora do intervalo representável.
pub fn date_from_offset(offset: Option<i64>) -> Option<NaiveDate> {
    let days = Duration::try_days(offset?)?;
    NaiveDate::from_ymd_opt(1960, 1, 1)?.checked_add_signed(days)
}

/// Mesma conversão, já formatada como texto ISO-8601 (`YYYY-MM-DD`).
pub fn iso_date_from_offset(offset: Option<i64>) -> Option<String> {
    date_from_offset(offset).map(|date| date.format("%Y-%m-%d").to_string())
}

pub fn calendar_parts(date: NaiveDate) -> CalendarParts {
    CalendarParts {
        day: date.day() as i32,
        week: date.iso_week().week() as i32,
        month: date.month() as i32,
        year: date.year(),
        weekday: date.weekday().number_from_sunday() as i32,
    }
}

/// Converte uma coluna de offsets SAS em texto ISO, preservando o nome.
///
/// Valores fracionários são truncados; nulos permanecem nulos.
pub fn sas_column_to_iso(column: &Column) -> PolarsResult<Column> {
    let days = column.cast(&DataType::Int64)?;

    let iso: StringChunked = days
        .as_materialized_series()
        .i64()?
        .into_iter()
        .map(iso_date_from_offset)
        .collect();

    Ok(Column::from(iso.with_name(column.name().clone()).into_series()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_zero_is_sas_epoch() {
        assert_eq!(iso_date_from_offset(Some(0)).as_deref(), Some("1960-01-01"));
    }

    #[test]
    fn offsets_count_days_from_epoch() {
        assert_eq!(iso_date_from_offset(Some(366)).as_deref(), Some("1961-01-01"));
        assert_eq!(iso_date_from_offset(Some(20_545)).as_deref(), Some("2016-04-01"));
        assert_eq!(iso_date_from_offset(Some(-1)).as_deref(), Some("1959-12-31"));
    }

    #[test]
    fn missing_offset_stays_missing() {
        assert_eq!(iso_date_from_offset(None), None);
        assert_eq!(date_from_offset(Some(i64::MAX)), None);
    }

    #[test]
    fn calendar_parts_of_epoch() {
        let parts = calendar_parts(NaiveDate::from_ymd_opt(1960, 1, 1).unwrap());
        assert_eq!(
            parts,
            CalendarParts {
                day: 1,
                week: 53,
                month: 1,
                year: 1960,
                weekday: 6,
            }
        );
    }

    #[test]
    fn column_conversion_tolerates_nulls_and_floats() {
        let column = Column::new("arrdate".into(), [Some(20_545.0f64), None, Some(0.0)]);
        let converted = sas_column_to_iso(&column).unwrap();

        assert_eq!(converted.name().as_str(), "arrdate");
        let values: Vec<Option<&str>> = converted
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(values, vec![Some("2016-04-01"), None, Some("1960-01-01")]);
    }
}
