//! Dimensão demográfica.

use log::info;
use polars::prelude::*;

use super::{DEMOGRAPHICS_TABLE, append_surrogate_id};
use crate::errors::Result;
use crate::storage::TableStore;

/// Nomes originais do dataset de cidades e seus equivalentes canônicos.
pub const RENAMES: [(&str, &str); 8] = [
    ("Median Age", "median_age"),
    ("Male Population", "male_population"),
    ("Female Population", "female_population"),
    ("Total Population", "total_population"),
    ("Number of Veterans", "number_of_veterans"),
    ("Foreign-born", "foreign_born"),
    ("Average Household Size", "average_household_size"),
    ("State Code", "state_code"),
];

/// Renomeia as colunas e acrescenta `id` na ordem da origem.
///
/// Nenhuma linha é filtrada ou combinada.
pub fn build_demographics_dimension(
    demographics: &DataFrame,
    store: &TableStore,
) -> Result<DataFrame> {
    let mut dim = demographics.clone();
    for (source, target) in RENAMES {
        dim.rename(source, target.into())?;
    }

    append_surrogate_id(&mut dim, "id")?;
    store.write_table(DEMOGRAPHICS_TABLE, &mut dim)?;

    info!("Dimensão {}: {} linhas", DEMOGRAPHICS_TABLE, dim.height());
    Ok(dim)
}
