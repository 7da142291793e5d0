//! Header validation and row reading.

use std::{
  fs::File,
  io::{BufReader, Read},
  path::Path,
};

use hires_core::record::{COLUMNS, RawRecord};

use crate::{Error, Result};

fn delimiter_byte(delimiter: char) -> Result<u8> {
  u8::try_from(delimiter)
    .ok()
    .filter(u8::is_ascii)
    .ok_or(Error::Delimiter(delimiter))
}

/// Read every data row of `reader`.
///
/// Fields and headers are trimmed. Columns outside
/// [`COLUMNS`] are ignored; a missing recognised column fails the whole read
/// before any row is returned.
pub fn read_records<R: Read>(reader: R, delimiter: char) -> Result<Vec<RawRecord>> {
  let mut rdr = csv::ReaderBuilder::new()
    .delimiter(delimiter_byte(delimiter)?)
    .trim(csv::Trim::All)
    .from_reader(reader);

  let headers = rdr.headers()?.clone();
  if headers.iter().all(str::is_empty) {
    return Err(Error::NoHeader);
  }
  if let Some(missing) = COLUMNS
    .iter()
    .find(|column| !headers.iter().any(|h| h == **column))
  {
    return Err(Error::MissingColumn(*missing));
  }

  let mut records = Vec::new();
  for row in rdr.records() {
    let row = row?;
    let line = row.position().map_or(0, csv::Position::line);
    let mut record: RawRecord = row
      .deserialize(Some(&headers))
      .map_err(|source| Error::Row { line, source })?;
    record.line = line;
    records.push(record);
  }
  Ok(records)
}

/// Open `path` and read it with [`read_records`].
pub fn read_path(path: impl AsRef<Path>, delimiter: char) -> Result<Vec<RawRecord>> {
  let path = path.as_ref();
  let file = File::open(path).map_err(|source| Error::Open {
    path: path.to_owned(),
    source,
  })?;
  let records = read_records(BufReader::new(file), delimiter)?;
  tracing::info!(
    path = %path.display(),
    records = records.len(),
    "extracted source rows"
  );
  Ok(records)
}
