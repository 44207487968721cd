use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::FeedResult;

use super::utils::ensure_parent_dir;

/// Write `records` as a JSON array indented by four spaces.
pub fn write_json_records<T: Serialize, P: AsRef<Path>>(path: P, records: &[T]) -> FeedResult<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    let mut out = BufWriter::new(File::create(path)?);
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    records.serialize(&mut serializer)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

pub fn read_json_records<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> FeedResult<Vec<T>> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
