//! Binding of [`SqlValue`]s to whatever type PostgreSQL inferred for a placeholder.
//!
//! The same named parameter can land in an `int4`, `int8` or `float8`
//! position depending on the statement, so values are converted at bind time
//! rather than fixed to one wire type. Combinations with no lossless
//! conversion fail with a [`BindError`] before anything reaches the server.

use std::error::Error as StdError;

use bytes::BytesMut;
use chrono::{NaiveTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

use crate::query::value::SqlValue;

type BindResult = Result<IsNull, Box<dyn StdError + Sync + Send>>;

/// A parameter that cannot be sent for the placeholder type the server inferred.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindError {
    /// No conversion exists from the value to the placeholder type.
    #[error("cannot bind a {value} parameter to a placeholder of type {placeholder}")]
    Unsupported {
        value: &'static str,
        placeholder: String,
    },

    /// The value does not fit the placeholder type.
    #[error("value {value} is out of range for type {placeholder}")]
    OutOfRange { value: String, placeholder: String },
}

fn unsupported(value: &SqlValue, ty: &Type) -> BindResult {
    Err(Box::new(BindError::Unsupported {
        value: kind(value),
        placeholder: ty.name().to_string(),
    }))
}

fn out_of_range(value: impl ToString, ty: &Type) -> Box<dyn StdError + Sync + Send> {
    Box::new(BindError::OutOfRange {
        value: value.to_string(),
        placeholder: ty.name().to_string(),
    })
}

fn kind(value: &SqlValue) -> &'static str {
    match value {
        SqlValue::Null => "null",
        SqlValue::Bool(_) => "boolean",
        SqlValue::Int(_) => "integer",
        SqlValue::Float(_) => "float",
        SqlValue::Text(_) => "text",
        SqlValue::IntList(_) => "integer list",
        SqlValue::Date(_) => "date",
        SqlValue::Timestamp(_) => "timestamp",
        SqlValue::TimestampTz(_) => "timestamptz",
    }
}

fn is_text(ty: &Type) -> bool {
    matches!(*ty, Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME)
}

fn int_to_sql(v: i64, ty: &Type, out: &mut BytesMut) -> BindResult {
    match *ty {
        Type::INT2 => i16::try_from(v)
            .map_err(|_| out_of_range(v, ty))?
            .to_sql(ty, out),
        Type::INT4 => i32::try_from(v)
            .map_err(|_| out_of_range(v, ty))?
            .to_sql(ty, out),
        Type::INT8 => v.to_sql(ty, out),
        Type::FLOAT4 => (v as f32).to_sql(ty, out),
        Type::FLOAT8 => (v as f64).to_sql(ty, out),
        Type::NUMERIC => Decimal::from(v).to_sql(ty, out),
        _ if is_text(ty) => v.to_string().to_sql(ty, out),
        _ => unsupported(&SqlValue::Int(v), ty),
    }
}

fn float_to_sql(v: f64, ty: &Type, out: &mut BytesMut) -> BindResult {
    match *ty {
        Type::FLOAT4 => (v as f32).to_sql(ty, out),
        Type::FLOAT8 => v.to_sql(ty, out),
        Type::NUMERIC => Decimal::try_from(v)
            .map_err(|_| out_of_range(v, ty))?
            .to_sql(ty, out),
        _ if is_text(ty) => v.to_string().to_sql(ty, out),
        _ => unsupported(&SqlValue::Float(v), ty),
    }
}

fn int_list_to_sql(v: &[i64], ty: &Type, out: &mut BytesMut) -> BindResult {
    match *ty {
        Type::INT2_ARRAY => v
            .iter()
            .map(|&i| i16::try_from(i).map_err(|_| out_of_range(i, ty)))
            .collect::<Result<Vec<_>, _>>()?
            .to_sql(ty, out),
        Type::INT4_ARRAY => v
            .iter()
            .map(|&i| i32::try_from(i).map_err(|_| out_of_range(i, ty)))
            .collect::<Result<Vec<_>, _>>()?
            .to_sql(ty, out),
        Type::INT8_ARRAY => v.to_vec().to_sql(ty, out),
        _ => unsupported(&SqlValue::IntList(v.to_vec()), ty),
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> BindResult {
        match self {
            SqlValue::Null => Ok(IsNull::Yes),
            SqlValue::Bool(b) => match *ty {
                Type::BOOL => b.to_sql(ty, out),
                _ if is_text(ty) => b.to_string().to_sql(ty, out),
                _ => unsupported(self, ty),
            },
            SqlValue::Int(i) => int_to_sql(*i, ty, out),
            SqlValue::Float(f) => float_to_sql(*f, ty, out),
            SqlValue::Text(s) if is_text(ty) => s.as_str().to_sql(ty, out),
            SqlValue::Text(_) => unsupported(self, ty),
            SqlValue::IntList(items) => int_list_to_sql(items, ty, out),
            SqlValue::Date(d) => match *ty {
                Type::DATE => d.to_sql(ty, out),
                Type::TIMESTAMP => d.and_time(NaiveTime::MIN).to_sql(ty, out),
                Type::TIMESTAMPTZ => d.and_time(NaiveTime::MIN).and_utc().to_sql(ty, out),
                _ if is_text(ty) => d.to_string().to_sql(ty, out),
                _ => unsupported(self, ty),
            },
            SqlValue::Timestamp(ts) => match *ty {
                Type::TIMESTAMP => ts.to_sql(ty, out),
                Type::TIMESTAMPTZ => ts.and_utc().to_sql(ty, out),
                Type::DATE => ts.date().to_sql(ty, out),
                _ => unsupported(self, ty),
            },
            SqlValue::TimestampTz(ts) => match *ty {
                Type::TIMESTAMPTZ => ts.with_timezone(&Utc).to_sql(ty, out),
                Type::TIMESTAMP => ts.naive_utc().to_sql(ty, out),
                Type::DATE => ts.naive_utc().date().to_sql(ty, out),
                _ => unsupported(self, ty),
            },
        }
    }

    /// Every placeholder type is offered to [`ToSql::to_sql`], which rejects
    /// the combinations a variant cannot represent.
    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}
