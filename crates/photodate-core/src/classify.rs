use std::fs::File;
use std::io::Read;
use std::path::Path;

use image::io::Reader as ImageReader;

/// ISO-BMFF brands of HEIF-family stills (no decoder in `image`).
const HEIF_BRANDS: &[&[u8; 4]] = &[
    b"heic", b"heix", b"heim", b"heis", b"hevc", b"hevx", b"mif1", b"msf1", b"avif",
];

/// Whether `path` holds an image: header decodes, or a HEIF container.
pub fn is_media(path: &Path) -> bool {
    if decodes_as_image(path) {
        return true;
    }
    let heif = is_heif(path);
    if !heif {
        tracing::debug!(path = %path.display(), "not an image");
    }
    heif
}

fn decodes_as_image(path: &Path) -> bool {
    let Ok(reader) = ImageReader::open(path) else {
        return false;
    };
    let Ok(reader) = reader.with_guessed_format() else {
        return false;
    };
    if reader.format().is_none() {
        return false;
    }
    reader.into_dimensions().is_ok()
}

fn is_heif(path: &Path) -> bool {
    let mut header = [0u8; 12];
    let Ok(mut file) = File::open(path) else {
        return false;
    };
    if file.read_exact(&mut header).is_err() {
        return false;
    }
    header[4..8] == b"ftyp"[..] && HEIF_BRANDS.iter().any(|b| header[8..12] == b[..])
}
