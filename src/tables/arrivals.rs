//! Dimensão de datas de chegada.

use log::info;
use polars::prelude::*;

use super::{ARRIVALS_TABLE, append_surrogate_id};
use crate::dates::{calendar_parts, date_from_offset};
use crate::errors::Result;
use crate::storage::TableStore;

/// Colunas usadas no particionamento físico da tabela.
pub const PARTITION_COLUMNS: [&str; 3] = ["arrival_year", "arrival_month", "arrival_week"];

/// Cria a dimensão de chegadas a partir dos registros de imigração.
///
/// Uma linha por data de chegada distinta (datas ausentes são ignoradas), em
/// ordem cronológica; `id` é a posição nessa ordem. A gravação é particionada
/// por ano, mês e semana.
pub fn build_arrivals_dimension(immigration: &DataFrame, store: &TableStore) -> Result<DataFrame> {
    let offsets = immigration
        .clone()
        .lazy()
        .select([col("arrdate").cast(DataType::Int64)])
        .drop_nulls(None)
        .unique_stable(None, UniqueKeepStrategy::First)
        .sort(["arrdate"], SortMultipleOptions::default())
        .collect()?;

    let capacity = offsets.height();
    let mut arrdate = Vec::with_capacity(capacity);
    let mut day = Vec::with_capacity(capacity);
    let mut week = Vec::with_capacity(capacity);
    let mut month = Vec::with_capacity(capacity);
    let mut year = Vec::with_capacity(capacity);
    let mut weekday = Vec::with_capacity(capacity);

    let dates = offsets
        .column("arrdate")?
        .as_materialized_series()
        .i64()?
        .into_iter()
        .filter_map(date_from_offset);

    for date in dates {
        let parts = calendar_parts(date);
        arrdate.push(date.format("%Y-%m-%d").to_string());
        day.push(parts.day);
        week.push(parts.week);
        month.push(parts.month);
        year.push(parts.year);
        weekday.push(parts.weekday);
    }

    let mut dim = df!(
        "arrdate" => arrdate,
        "arrival_day" => day,
        "arrival_week" => week,
        "arrival_month" => month,
        "arrival_year" => year,
        "arrival_weekday" => weekday,
    )?;
    append_surrogate_id(&mut dim, "id")?;

    let partitions = store.write_partitioned(ARRIVALS_TABLE, &dim, &PARTITION_COLUMNS)?;

    info!(
        "Dimensão {}: {} datas em {} partições",
        ARRIVALS_TABLE,
        dim.height(),
        partitions
    );
    Ok(dim)
}
