//! Agregação das temperaturas por país.

use polars::prelude::*;

use crate::errors::Result;
use crate::models::TemperatureConfig;

/// Coluna de país na saída de qualquer agregador.
pub const COUNTRY: &str = "Country";
/// Coluna de temperatura média na saída de qualquer agregador.
pub const AVERAGE_TEMPERATURE: &str = "average_temperature";

/// Colaborador que reduz as observações brutas a uma linha por país.
///
/// A saída deve conter as colunas [`COUNTRY`] e [`AVERAGE_TEMPERATURE`].
pub trait TemperatureAggregator {
    fn aggregate(&self, raw: &DataFrame) -> Result<DataFrame>;
}

/// Média simples das observações de cada país.
#[derive(Debug, Clone)]
pub struct MeanByCountry {
    country_column: String,
    value_column: String,
}

impl MeanByCountry {
    pub fn new(country_column: impl Into<String>, value_column: impl Into<String>) -> Self {
        Self {
            country_column: country_column.into(),
            value_column: value_column.into(),
        }
    }
}

impl Default for MeanByCountry {
    fn default() -> Self {
        Self::from(&TemperatureConfig::default())
    }
}

impl From<&TemperatureConfig> for MeanByCountry {
    fn from(config: &TemperatureConfig) -> Self {
        Self::new(&config.country_column, &config.value_column)
    }
}

impl TemperatureAggregator for MeanByCountry {
    fn aggregate(&self, raw: &DataFrame) -> Result<DataFrame> {
        let country = self.country_column.as_str();

        let grouped = raw
            .clone()
            .lazy()
            .filter(col(country).is_not_null())
            .group_by_stable([col(country)])
            .agg([col(self.value_column.as_str())
                .cast(DataType::Float64)
                .mean()
                .alias(AVERAGE_TEMPERATURE)])
            .select([
                col(country).cast(DataType::String).alias(COUNTRY),
                col(AVERAGE_TEMPERATURE),
            ])
            .collect()?;

        Ok(grouped)
    }
}
