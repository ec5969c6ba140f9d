use std::{collections::HashMap, hash::Hash};

use serde::{de::DeserializeOwned, Serialize};

use crate::Error;

/// Loads CSV bytes into a HashMap based on the primary key of the type
/// # Error
/// Errors if any record cannot be deserialized
pub(crate) fn load<H: Hash + Eq, D: DeserializeOwned, PK: Fn(D) -> (H, D)>(
    data: &[u8],
    map: PK,
) -> Result<HashMap<H, D>, Error> {
    deserialize(data).map(|r| r.map(&map)).collect()
}

/// Serializes `items` into CSV bytes with a header row
pub fn serialize(items: impl Iterator<Item = impl Serialize>) -> Result<Vec<u8>, Error> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for item in items {
        wtr.serialize(item)?;
    }
    wtr.into_inner().map_err(|e| Error::Csv(e.to_string()))
}

/// Deserializes CSV bytes with a header row, one item per record
pub fn deserialize<'a, D: DeserializeOwned + 'a>(
    data: &'a [u8],
) -> impl Iterator<Item = Result<D, Error>> + 'a {
    let rdr = csv::ReaderBuilder::new()
        .delimiter(b',')
        .trim(csv::Trim::All)
        .from_reader(std::io::Cursor::new(data));
    rdr.into_deserialize().map(|r| r.map_err(Error::from))
}
