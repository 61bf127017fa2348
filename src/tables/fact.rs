//! Tabela fato de imigração.

use log::{info, warn};
use polars::prelude::*;

use super::{FACT_TABLE, VISA_TYPE_TABLE, code_as_text};
use crate::dates::sas_column_to_iso;
use crate::errors::Result;
use crate::storage::TableStore;

/// Renomeações obrigatórias: a ausência da coluna é erro de schema.
const REQUIRED_RENAMES: [(&str, &str); 2] = [("ccid", "record_id"), ("i94res", "residence_code")];

/// Renomeações opcionais: a coluna ausente vira uma coluna de texto nula.
const OPTIONAL_RENAMES: [(&str, &str); 1] = [("i94addr", "state_code")];

/// Cria a tabela fato a partir dos registros de imigração.
///
/// Relê a dimensão `visatype` do `store`, portanto ela precisa ter sido
/// gravada antes. Cada registro de entrada gera exatamente um registro de
/// saída; `visa_type_id` fica nulo quando o tipo de visto não é encontrado.
pub fn build_immigration_fact(immigration: &DataFrame, store: &TableStore) -> Result<DataFrame> {
    let visa_types = store.read_table(VISA_TYPE_TABLE)?;

    let mut df = immigration.clone();
    for (source, target) in REQUIRED_RENAMES {
        df.rename(source, target.into())?;
    }
    for (source, target) in OPTIONAL_RENAMES {
        if df.get_column_index(source).is_some() {
            df.rename(source, target.into())?;
        } else {
            warn!("Coluna {} ausente; {} será nula", source, target);
            let height = df.height();
            df.with_column(Series::full_null(target.into(), height, &DataType::String))?;
        }
    }

    let residence = code_as_text(&df, "residence_code")?;
    let mut df = df
        .lazy()
        .with_columns([residence, col("visatype").cast(DataType::String)])
        .join(
            visa_types.lazy(),
            [col("visatype")],
            [col("visatype")],
            JoinArgs::new(JoinType::Left),
        )
        .collect()?;

    let arrdate = sas_column_to_iso(df.column("arrdate")?)?;
    df.with_column(arrdate)?;

    let mut df = df.drop("visatype")?;
    store.write_table(FACT_TABLE, &mut df)?;

    info!("Fato {}: {} registros", FACT_TABLE, df.height());
    Ok(df)
}
