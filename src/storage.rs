//! # Leitura de Origens e Escrita do Data Lake
//!
//! ## Engenharia de Dados
//! - Origens brutas são lidas conforme a extensão (Parquet, CSV, JSON).
//! - Cada tabela de saída vive em `<raiz>/<tabela>/` e é sempre reescrita por
//!   completo (overwrite).
//! - Tabelas particionadas seguem o layout Hive (`coluna=valor/`).

use polars::io::SerReader;
use polars::prelude::*;

use std::fs::{self, File};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use log::debug;

use crate::errors::{PipelineError, Result};
use crate::models::SourceSpec;

/// Nome do único arquivo gravado em cada diretório de tabela/partição.
pub const PART_FILE: &str = "part-00000.parquet";

/// Lê um arquivo de origem já resolvido, escolhendo o leitor pela extensão.
pub fn read_source(path: &Path, spec: &SourceSpec) -> Result<DataFrame> {
    let df = match spec.extension().as_deref() {
        Some("parquet") => {
            let file = File::open(path)?;
            ParquetReader::new(file).finish()?
        }
        Some("csv") => CsvReadOptions::default()
            .with_has_header(true)
            .with_parse_options(
                CsvParseOptions::default().with_separator(spec.separator_byte()),
            )
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?,
        Some("json") => {
            let file = File::open(path)?;
            JsonReader::new(file)
                .infer_schema_len(NonZeroUsize::new(1000))
                .finish()?
        }
        _ => {
            return Err(PipelineError::Config(format!(
                "Formato não suportado: {}",
                path.display()
            )));
        }
    };

    debug!("Origem {} carregada: {:?}", path.display(), df.shape());
    Ok(df)
}

/// Handle para o data lake de saída.
///
/// Todas as etapas recebem o mesmo `TableStore` explicitamente; não existe
/// estado global.
#[derive(Debug, Clone)]
pub struct TableStore {
    root: PathBuf,
}

impl TableStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn table_dir(&self, table: &str) -> PathBuf {
        self.root.join(table)
    }

    /// Grava a tabela inteira, substituindo qualquer versão anterior.
    pub fn write_table(&self, table: &str, df: &mut DataFrame) -> Result<PathBuf> {
        let dir = self.table_dir(table);
        reset_dir(&dir)?;

        let path = dir.join(PART_FILE);
        write_parquet(&path, df)?;

        debug!("Tabela {} gravada em {}", table, path.display());
        Ok(path)
    }

    /// Grava a tabela particionada pelas colunas informadas.
    ///
    /// As colunas de partição ficam codificadas no caminho e são removidas dos
    /// arquivos. Retorna o número de partições escritas.
    pub fn write_partitioned(
        &self,
        table: &str,
        df: &DataFrame,
        partition_by: &[&str],
    ) -> Result<usize> {
        let dir = self.table_dir(table);
        reset_dir(&dir)?;

        let parts = df.partition_by_stable(partition_by.iter().copied(), true)?;
        let total = parts.len();

        for part in parts {
            let mut part_dir = dir.clone();
            let mut part_df = part;

            for key in partition_by {
                let value = part_df.column(key)?.get(0)?;
                part_dir.push(format!("{}={}", key, partition_value(&value)));
                part_df = part_df.drop(key)?;
            }

            fs::create_dir_all(&part_dir)?;
            write_parquet(&part_dir.join(PART_FILE), &mut part_df)?;
        }

        debug!("Tabela {} gravada em {} partições", table, total);
        Ok(total)
    }

    /// Relê uma tabela não particionada previamente gravada.
    pub fn read_table(&self, table: &str) -> Result<DataFrame> {
        let path = self.table_dir(table).join(PART_FILE);
        let file = File::open(&path).map_err(|e| {
            PipelineError::Io(std::io::Error::new(
                e.kind(),
                format!("tabela '{}' indisponível em {}: {}", table, path.display(), e),
            ))
        })?;

        Ok(ParquetReader::new(file).finish()?)
    }
}

fn reset_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)?;
    Ok(())
}

fn write_parquet(path: &Path, df: &mut DataFrame) -> Result<()> {
    let file_out = File::create(path)?;

    let stats_options = StatisticsOptions {
        min_value: true,
        max_value: true,
        null_count: true,
        distinct_count: false,
    };

    ParquetWriter::new(file_out)
        .with_compression(ParquetCompression::Snappy)
        .with_statistics(stats_options)
        .finish(df)?;

    Ok(())
}

// Valor nulo vira a partição padrão do Hive.
fn partition_value(value: &AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => "__HIVE_DEFAULT_PARTITION__".to_string(),
        AnyValue::String(s) => (*s).to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_then_read_back() {
        let tmp = TempDir::new().unwrap();
        let store = TableStore::new(tmp.path());
        let mut df = df!("visatype" => ["B1", "B2"], "visa_type_id" => [0i64, 1]).unwrap();

        store.write_table("visatype", &mut df).unwrap();
        let back = store.read_table("visatype").unwrap();

        assert!(back.equals(&df));
    }

    #[test]
    fn write_overwrites_previous_contents() {
        let tmp = TempDir::new().unwrap();
        let store = TableStore::new(tmp.path());
        let stale = store.table_dir("country").join("stale.parquet");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, b"old").unwrap();

        let mut df = df!("country_code" => ["101"]).unwrap();
        store.write_table("country", &mut df).unwrap();

        assert!(!stale.exists());
        assert_eq!(store.read_table("country").unwrap().height(), 1);
    }

    #[test]
    fn partitioned_layout_is_hive_style() {
        let tmp = TempDir::new().unwrap();
        let store = TableStore::new(tmp.path());
        let df = df!(
            "arrdate" => ["1960-01-01", "1960-01-02", "2016-04-01"],
            "arrival_year" => [1960i32, 1960, 2016],
            "arrival_month" => [1i32, 1, 4],
        )
        .unwrap();

        let written = store
            .write_partitioned("arrivals", &df, &["arrival_year", "arrival_month"])
            .unwrap();
        assert_eq!(written, 2);

        let part = store
            .table_dir("arrivals")
            .join("arrival_year=1960")
            .join("arrival_month=1")
            .join(PART_FILE);
        let back = ParquetReader::new(File::open(part).unwrap()).finish().unwrap();
        assert_eq!(back.height(), 2);
        assert_eq!(back.width(), 1);
    }

    #[test]
    fn reading_missing_table_fails() {
        let tmp = TempDir::new().unwrap();
        let store = TableStore::new(tmp.path());
        assert!(matches!(
            store.read_table("visatype"),
            Err(PipelineError::Io(_))
        ));
    }

    #[test]
    fn reads_csv_with_custom_separator() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("demo.csv");
        fs::write(&path, "City;State Code\nBoston;MA\nAustin;TX\n").unwrap();
        let spec = SourceSpec {
            path: "demo.csv".to_string(),
            separator: Some(';'),
        };

        let df = read_source(&path, &spec).unwrap();
        assert_eq!(df.shape(), (2, 2));
        assert!(df.column("State Code").is_ok());
    }
}
