//! Dimensão de tipos de visto.

use log::info;
use polars::prelude::*;

use super::{VISA_TYPE_TABLE, append_surrogate_id};
use crate::errors::Result;
use crate::storage::TableStore;

/// Cria a dimensão `visatype` a partir dos registros de imigração.
///
/// Uma linha por valor distinto de `visatype` (o nulo conta como um valor),
/// ordenada alfabeticamente com nulos ao final; `visa_type_id` é a posição
/// nessa ordem.
pub fn build_visa_type_dimension(immigration: &DataFrame, store: &TableStore) -> Result<DataFrame> {
    let mut dim = immigration
        .clone()
        .lazy()
        .select([col("visatype").cast(DataType::String)])
        .unique_stable(None, UniqueKeepStrategy::First)
        .sort(
            ["visatype"],
            SortMultipleOptions::default().with_nulls_last(true),
        )
        .collect()?;

    append_surrogate_id(&mut dim, "visa_type_id")?;
    store.write_table(VISA_TYPE_TABLE, &mut dim)?;

    info!("Dimensão {}: {} tipos de visto", VISA_TYPE_TABLE, dim.height());
    Ok(dim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::test_support::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    #[test]
    fn one_row_per_distinct_visatype() {
        let tmp = TempDir::new().unwrap();
        let store = TableStore::new(tmp.path());
        let immigration = df!(
            "ccid" => [1i64, 2, 3, 4, 5],
            "visatype" => [Some("WT"), Some("B2"), Some("WT"), None, Some("B2")],
        )
        .unwrap();

        let dim = build_visa_type_dimension(&immigration, &store).unwrap();

        assert_eq!(
            strings(&dim, "visatype"),
            vec![Some("B2".to_string()), Some("WT".to_string()), None]
        );
        let ids: HashSet<_> = ints(&dim, "visa_type_id").into_iter().collect();
        assert_eq!(ids.len(), dim.height());
    }

    #[test]
    fn ids_are_reproducible_across_runs() {
        let tmp = TempDir::new().unwrap();
        let store = TableStore::new(tmp.path());
        let first = df!("visatype" => ["F1", "B1", "E2"]).unwrap();
        let shuffled = df!("visatype" => ["E2", "F1", "B1", "B1"]).unwrap();

        let a = build_visa_type_dimension(&first, &store).unwrap();
        let b = build_visa_type_dimension(&shuffled, &store).unwrap();

        assert!(a.equals(&b));
        assert!(store.read_table(VISA_TYPE_TABLE).unwrap().equals(&b));
    }
}
