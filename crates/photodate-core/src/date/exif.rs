use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use exif::{In, Reader, Value};

use super::TagMap;

/// Read the primary-image EXIF fields of `path` into a [`TagMap`].
///
/// A file without any EXIF block yields an empty map. ASCII values are kept
/// verbatim (the library's display formatting rewrites datetimes), everything
/// else goes through `display_value`.
pub fn read_tags(path: &Path) -> Result<TagMap, exif::Error> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let exif = match Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => return Ok(TagMap::new()),
        Err(e) => return Err(e),
    };

    let mut tags = TagMap::new();
    for field in exif.fields().filter(|f| f.ifd_num == In::PRIMARY) {
        let value = match &field.value {
            Value::Ascii(parts) => parts
                .first()
                .map(|bytes| {
                    String::from_utf8_lossy(bytes)
                        .trim_end_matches('\0')
                        .to_string()
                })
                .unwrap_or_default(),
            _ => field.display_value().to_string(),
        };
        tags.entry(field.tag.to_string()).or_insert(value);
    }
    Ok(tags)
}
