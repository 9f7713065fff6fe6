//! Decoding of `tokio_postgres` rows into [`Row`]s.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;
use tokio_postgres::types::{FromSql, Type};

use crate::db::row::Row;
use crate::error::{BackendError, StorageError, StorageResult};

fn get<'a, T>(row: &'a tokio_postgres::Row, idx: usize) -> StorageResult<Option<T>>
where
    T: FromSql<'a>,
{
    row.try_get::<_, Option<T>>(idx).map_err(|e| {
        StorageError::Backend(BackendError::Internal {
            backend_name: "postgres".to_string(),
            message: format!(
                "failed to decode column '{}': {}",
                row.columns()[idx].name(),
                e
            ),
        })
    })
}

fn to_json<T: Into<Value>>(value: Option<T>) -> Value {
    value.map(Into::into).unwrap_or(Value::Null)
}

fn decode_value(row: &tokio_postgres::Row, idx: usize, ty: &Type) -> StorageResult<Value> {
    let value = match *ty {
        Type::BOOL => to_json(get::<bool>(row, idx)?),
        Type::INT2 => to_json(get::<i16>(row, idx)?),
        Type::INT4 => to_json(get::<i32>(row, idx)?),
        Type::INT8 => to_json(get::<i64>(row, idx)?),
        Type::FLOAT4 => to_json(get::<f32>(row, idx)?),
        Type::FLOAT8 => to_json(get::<f64>(row, idx)?),
        Type::NUMERIC => to_json(get::<Decimal>(row, idx)?.and_then(|d| d.to_f64())),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME => {
            to_json(get::<String>(row, idx)?)
        }
        Type::JSON | Type::JSONB => get::<Value>(row, idx)?.unwrap_or(Value::Null),
        Type::TIMESTAMPTZ => to_json(
            get::<DateTime<Utc>>(row, idx)?
                .map(|ts| ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        ),
        Type::TIMESTAMP => to_json(
            get::<NaiveDateTime>(row, idx)?.map(|ts| ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
        ),
        Type::DATE => to_json(get::<NaiveDate>(row, idx)?.map(|d| d.to_string())),
        Type::INT2_ARRAY => to_json(get::<Vec<i16>>(row, idx)?),
        Type::INT4_ARRAY => to_json(get::<Vec<i32>>(row, idx)?),
        Type::INT8_ARRAY => to_json(get::<Vec<i64>>(row, idx)?),
        Type::FLOAT4_ARRAY => to_json(get::<Vec<f32>>(row, idx)?),
        Type::FLOAT8_ARRAY => to_json(get::<Vec<f64>>(row, idx)?),
        Type::TEXT_ARRAY | Type::VARCHAR_ARRAY => to_json(get::<Vec<String>>(row, idx)?),
        Type::JSON_ARRAY | Type::JSONB_ARRAY => to_json(get::<Vec<Value>>(row, idx)?),
        _ => Value::Null,
    };
    Ok(value)
}

/// Decodes a result set. Column names are shared by every decoded row.
pub fn decode_rows(rows: &[tokio_postgres::Row]) -> StorageResult<Vec<Row>> {
    let Some(first) = rows.first() else {
        return Ok(Vec::new());
    };
    let columns: Arc<[String]> = first
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();

    rows.iter()
        .map(|row| {
            let values = row
                .columns()
                .iter()
                .enumerate()
                .map(|(idx, column)| decode_value(row, idx, column.type_()))
                .collect::<StorageResult<Vec<_>>>()?;
            Ok(Row::new(Arc::clone(&columns), values))
        })
        .collect()
}
