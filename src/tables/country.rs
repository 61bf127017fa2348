//! Dimensão de países.

use log::{info, warn};
use polars::prelude::*;

use super::{COUNTRY_TABLE, code_as_text};
use crate::errors::Result;
use crate::storage::TableStore;
use crate::temperature::{AVERAGE_TEMPERATURE, COUNTRY, TemperatureAggregator};

/// Cria a dimensão de países.
///
/// 1. Códigos de residência (`i94res`) ligados ao mapeamento `code -> Name`.
/// 2. Pares distintos `(country_code, country_name)` ligados à temperatura
///    média agregada, por igualdade exata do nome do país.
///
/// Códigos sem mapeamento geram nome e temperatura nulos; nomes sem
/// temperatura geram apenas temperatura nula.
pub fn build_country_dimension(
    immigration: &DataFrame,
    country_codes: &DataFrame,
    temperature: &DataFrame,
    aggregator: &dyn TemperatureAggregator,
    store: &TableStore,
) -> Result<DataFrame> {
    let temperatures = aggregator.aggregate(temperature)?;

    let residence = code_as_text(immigration, "i94res")?;
    let code = code_as_text(country_codes, "code")?;

    let codes = country_codes
        .clone()
        .lazy()
        .select([code, col("Name").cast(DataType::String)]);

    let pairs = immigration
        .clone()
        .lazy()
        .select([residence])
        .join(
            codes,
            [col("i94res")],
            [col("code")],
            JoinArgs::new(JoinType::Left),
        )
        .select([
            col("i94res").alias("country_code"),
            col("Name").alias("country_name"),
        ])
        .unique_stable(None, UniqueKeepStrategy::First);

    let temperatures = temperatures
        .lazy()
        .select([col(COUNTRY), col(AVERAGE_TEMPERATURE)]);

    let mut dim = pairs
        .join(
            temperatures,
            [col("country_name")],
            [col(COUNTRY)],
            JoinArgs::new(JoinType::Left),
        )
        .select([
            col("country_code"),
            col("country_name"),
            col(AVERAGE_TEMPERATURE),
        ])
        .unique_stable(None, UniqueKeepStrategy::First)
        .sort(
            ["country_code"],
            SortMultipleOptions::default().with_nulls_last(true),
        )
        .collect()?;

    let unmatched = dim.column(AVERAGE_TEMPERATURE)?.null_count();
    if unmatched > 0 {
        warn!(
            "Dimensão {}: {} países sem temperatura correspondente",
            COUNTRY_TABLE, unmatched
        );
    }

    store.write_table(COUNTRY_TABLE, &mut dim)?;

    info!("Dimensão {}: {} países", COUNTRY_TABLE, dim.height());
    Ok(dim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temperature::MeanByCountry;
    use crate::tables::test_support::*;
    use tempfile::TempDir;

    fn country_codes() -> DataFrame {
        df!(
            "code" => [101i64, 582, 245],
            "Name" => ["GERMANY", "MEXICO Air Sea, and Not Reported (I-94, no land arrivals)", "CHINA, PRC"],
        )
        .unwrap()
    }

    fn temperature() -> DataFrame {
        df!(
            "AverageTemperature" => [9.0, 10.0, 21.0],
            "Country" => ["GERMANY", "GERMANY", "Mexico"],
        )
        .unwrap()
    }

    #[test]
    fn joins_codes_names_and_temperatures() {
        let tmp = TempDir::new().unwrap();
        let store = TableStore::new(tmp.path());
        let immigration = df!(
            "ccid" => [1i64, 2, 3, 4, 5],
            "i94res" => [101.0f64, 582.0, 101.0, 999.0, 245.0],
        )
        .unwrap();

        let dim = build_country_dimension(
            &immigration,
            &country_codes(),
            &temperature(),
            &MeanByCountry::default(),
            &store,
        )
        .unwrap();

        assert_eq!(dim.height(), 4);
        assert_eq!(
            strings(&dim, "country_code"),
            vec![
                Some("101".to_string()),
                Some("245".to_string()),
                Some("582".to_string()),
                Some("999".to_string()),
            ]
        );
        assert_eq!(
            strings(&dim, "country_name"),
            vec![
                Some("GERMANY".to_string()),
                Some("CHINA, PRC".to_string()),
                Some("MEXICO Air Sea, and Not Reported (I-94, no land arrivals)".to_string()),
                None,
            ]
        );
        // Sem normalização: "Mexico" não casa com o nome do mapeamento.
        assert_eq!(
            floats(&dim, AVERAGE_TEMPERATURE),
            vec![Some(9.5), None, None, None]
        );
        assert_eq!(store.read_table(COUNTRY_TABLE).unwrap().height(), 4);
    }

    #[test]
    fn name_match_is_case_sensitive() {
        let tmp = TempDir::new().unwrap();
        let store = TableStore::new(tmp.path());
        let immigration = df!("i94res" => ["101"]).unwrap();
        let temperature = df!("AverageTemperature" => [9.5], "Country" => ["Germany"]).unwrap();

        let dim = build_country_dimension(
            &immigration,
            &country_codes(),
            &temperature,
            &MeanByCountry::default(),
            &store,
        )
        .unwrap();

        assert_eq!(strings(&dim, "country_name"), vec![Some("GERMANY".to_string())]);
        assert_eq!(floats(&dim, AVERAGE_TEMPERATURE), vec![None]);
    }
}
