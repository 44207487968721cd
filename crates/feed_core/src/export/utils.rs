use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array, StringArray, StructArray};
use arrow::datatypes::{DataType, Field, Fields, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;

use crate::error::{FeedError, FeedResult};
use crate::records::Location;

pub(super) fn utf8_field(name: &'static str) -> Field {
    Field::new(name, DataType::Utf8, false)
}

pub(super) fn nullable_utf8_field(name: &'static str) -> Field {
    Field::new(name, DataType::Utf8, true)
}

pub(super) fn i64_field(name: &'static str) -> Field {
    Field::new(name, DataType::Int64, false)
}

pub(super) fn location_fields() -> Fields {
    Fields::from(vec![
        Field::new("latitude", DataType::Float64, false),
        Field::new("longitude", DataType::Float64, false),
    ])
}

pub(super) fn location_field(name: &'static str) -> Field {
    Field::new(name, DataType::Struct(location_fields()), false)
}

pub(super) fn location_array<'a>(
    locations: impl ExactSizeIterator<Item = &'a Location>,
) -> FeedResult<ArrayRef> {
    let mut latitudes = Vec::with_capacity(locations.len());
    let mut longitudes = Vec::with_capacity(locations.len());
    for location in locations {
        latitudes.push(location.latitude);
        longitudes.push(location.longitude);
    }
    let children: Vec<ArrayRef> = vec![
        Arc::new(Float64Array::from(latitudes)),
        Arc::new(Float64Array::from(longitudes)),
    ];
    Ok(Arc::new(StructArray::try_new(location_fields(), children, None)?))
}

/// Create the parent directory of `path` if it does not exist yet.
pub(super) fn ensure_parent_dir(path: &Path) -> FeedResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

pub(super) fn write_record_batch(path: &Path, schema: Schema, arrays: Vec<ArrayRef>) -> FeedResult<()> {
    let schema = Arc::new(schema);
    let batch = RecordBatch::try_new(schema.clone(), arrays)?;
    ensure_parent_dir(path)?;
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

/// Read every batch of `path`. A file without `key_column` holds another
/// entity kind and fails with [`FeedError::MissingKeyColumn`], even when empty.
pub(super) fn read_record_batches(
    path: &Path,
    key_column: &'static str,
) -> FeedResult<Vec<RecordBatch>> {
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    if builder.schema().field_with_name(key_column).is_err() {
        return Err(FeedError::MissingKeyColumn {
            path: path.display().to_string(),
            column: key_column,
        });
    }
    let reader = builder.build()?;
    Ok(reader.collect::<Result<Vec<_>, _>>()?)
}

/// Column `name` of `batch`, downcast to its concrete array type.
pub(super) fn column<'a, T: Array + 'static>(batch: &'a RecordBatch, name: &str) -> FeedResult<&'a T> {
    batch
        .column_by_name(name)
        .ok_or_else(|| FeedError::Schema(format!("missing column '{name}'")))?
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| FeedError::Schema(format!("column '{name}' has an unexpected type")))
}

pub(super) fn struct_child<'a, T: Array + 'static>(
    parent: &'a StructArray,
    name: &str,
) -> FeedResult<&'a T> {
    parent
        .column_by_name(name)
        .ok_or_else(|| FeedError::Schema(format!("missing struct field '{name}'")))?
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| FeedError::Schema(format!("struct field '{name}' has an unexpected type")))
}

pub(super) fn read_locations(array: &StructArray) -> FeedResult<Vec<Location>> {
    let latitude = struct_child::<Float64Array>(array, "latitude")?;
    let longitude = struct_child::<Float64Array>(array, "longitude")?;
    Ok((0..array.len())
        .map(|row| Location::new(latitude.value(row), longitude.value(row)))
        .collect())
}

pub(super) fn optional_string(array: &StringArray, row: usize) -> Option<String> {
    (!array.is_null(row)).then(|| array.value(row).to_string())
}

/// Parse an enum symbol, reporting the column on failure.
pub(super) fn parse_symbol<T>(
    column: &str,
    symbol: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> FeedResult<T> {
    parse(symbol).ok_or_else(|| FeedError::Schema(format!("unknown {column} symbol '{symbol}'")))
}
