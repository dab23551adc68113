//! Fixture builders shared by unit and integration tests.
#![allow(dead_code)]

/// Tag name -> (tag number, lives in the Exif sub-IFD).
fn tag_id(name: &str) -> (u16, bool) {
    match name {
        "Make" => (0x010F, false),
        "Model" => (0x0110, false),
        "DateTime" => (0x0132, false),
        "DateTimeOriginal" => (0x9003, true),
        "DateTimeDigitized" => (0x9004, true),
        other => panic!("no fixture mapping for tag {other}"),
    }
}

/// Little-endian TIFF body holding the given ASCII tags.
pub fn exif_tiff(tags: &[(&str, &str)]) -> Vec<u8> {
    let mut ifd0: Vec<(u16, Vec<u8>)> = Vec::new();
    let mut sub: Vec<(u16, Vec<u8>)> = Vec::new();
    for (name, value) in tags {
        let (id, in_sub) = tag_id(name);
        let mut bytes = value.as_bytes().to_vec();
        bytes.push(0);
        if in_sub {
            sub.push((id, bytes));
        } else {
            ifd0.push((id, bytes));
        }
    }
    ifd0.sort_by_key(|(id, _)| *id);
    sub.sort_by_key(|(id, _)| *id);

    let has_sub = !sub.is_empty();
    let ifd0_count = ifd0.len() + usize::from(has_sub);
    let ifd0_size = 2 + 12 * ifd0_count + 4;
    let sub_offset = 8 + ifd0_size;
    let sub_size = if has_sub { 2 + 12 * sub.len() + 4 } else { 0 };
    let data_offset = 8 + ifd0_size + sub_size;

    let mut out = Vec::new();
    let mut data = Vec::new();
    out.extend_from_slice(b"II");
    out.extend_from_slice(&42u16.to_le_bytes());
    out.extend_from_slice(&8u32.to_le_bytes());

    let mut write_ascii = |out: &mut Vec<u8>, id: u16, bytes: &[u8]| {
        out.extend_from_slice(&id.to_le_bytes());
        out.extend_from_slice(&2u16.to_le_bytes());
        out.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
        if bytes.len() <= 4 {
            let mut inline = [0u8; 4];
            inline[..bytes.len()].copy_from_slice(bytes);
            out.extend_from_slice(&inline);
        } else {
            let offset = (data_offset + data.len()) as u32;
            out.extend_from_slice(&offset.to_le_bytes());
            data.extend_from_slice(bytes);
            if data.len() % 2 == 1 {
                data.push(0);
            }
        }
    };

    out.extend_from_slice(&(ifd0_count as u16).to_le_bytes());
    for (id, bytes) in &ifd0 {
        write_ascii(&mut out, *id, &bytes[..]);
    }
    if has_sub {
        out.extend_from_slice(&0x8769u16.to_le_bytes());
        out.extend_from_slice(&4u16.to_le_bytes());
        out.extend_from_slice(&1u32.to_le_bytes());
        out.extend_from_slice(&(sub_offset as u32).to_le_bytes());
    }
    out.extend_from_slice(&0u32.to_le_bytes());

    if has_sub {
        out.extend_from_slice(&(sub.len() as u16).to_le_bytes());
        for (id, bytes) in &sub {
            write_ascii(&mut out, *id, &bytes[..]);
        }
        out.extend_from_slice(&0u32.to_le_bytes());
    }

    out.extend_from_slice(&data);
    out
}

/// A small valid JPEG, with an APP1 Exif segment when `tags` is non-empty.
pub fn jpeg_with_exif(tags: &[(&str, &str)]) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([200, 120, 40]));
    let mut jpeg = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut jpeg)
        .encode(img.as_raw(), 4, 4, image::ColorType::Rgb8)
        .unwrap();
    if tags.is_empty() {
        return jpeg;
    }

    let tiff = exif_tiff(tags);
    let mut out = Vec::with_capacity(jpeg.len() + tiff.len() + 10);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&((2 + 6 + tiff.len()) as u16).to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(&tiff);
    out.extend_from_slice(&jpeg[2..]);
    out
}

fn bmff_box(kind: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + body.len());
    out.extend_from_slice(&((8 + body.len()) as u32).to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(body);
    out
}

fn full_box(kind: &[u8; 4], version: u8, body: &[u8]) -> Vec<u8> {
    let mut full = vec![version, 0, 0, 0];
    full.extend_from_slice(body);
    bmff_box(kind, &full)
}

/// Header of an ISO-BMFF HEIC file (enough for brand sniffing).
pub fn heic_header() -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(b"heic");
    body.extend_from_slice(&0u32.to_be_bytes());
    body.extend_from_slice(b"mif1heic");
    bmff_box(b"ftyp", &body)
}

/// A HEIC container whose only item is an Exif block with the given tags.
pub fn heic_with_exif(tags: &[(&str, &str)]) -> Vec<u8> {
    // Exif item payload: offset to the TIFF header, then the TIFF body
    let mut payload = 0u32.to_be_bytes().to_vec();
    payload.extend_from_slice(&exif_tiff(tags));

    let mut hdlr = 0u32.to_be_bytes().to_vec();
    hdlr.extend_from_slice(b"pict");
    hdlr.extend_from_slice(&[0u8; 12]);
    hdlr.push(0);
    let hdlr = full_box(b"hdlr", 0, &hdlr);

    let mut infe = Vec::new();
    infe.extend_from_slice(&1u16.to_be_bytes());
    infe.extend_from_slice(&0u16.to_be_bytes());
    infe.extend_from_slice(b"Exif");
    infe.push(0);
    let infe = full_box(b"infe", 2, &infe);
    let mut iinf = 1u16.to_be_bytes().to_vec();
    iinf.extend_from_slice(&infe);
    let iinf = full_box(b"iinf", 0, &iinf);

    let ftyp = heic_header();
    // iloc has a fixed size, so the mdat offset is known before filling it in
    let iloc_with = |extent_offset: u32| {
        let mut iloc = vec![0x44, 0x00];
        iloc.extend_from_slice(&1u16.to_be_bytes());
        iloc.extend_from_slice(&1u16.to_be_bytes());
        iloc.extend_from_slice(&0u16.to_be_bytes());
        iloc.extend_from_slice(&1u16.to_be_bytes());
        iloc.extend_from_slice(&extent_offset.to_be_bytes());
        iloc.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        full_box(b"iloc", 0, &iloc)
    };
    let meta_with = |extent_offset: u32| {
        let mut children = hdlr.clone();
        children.extend_from_slice(&iinf);
        children.extend_from_slice(&iloc_with(extent_offset));
        full_box(b"meta", 0, &children)
    };

    let meta_len = meta_with(0).len();
    let extent_offset = (ftyp.len() + meta_len + 8) as u32;

    let mut out = ftyp;
    out.extend_from_slice(&meta_with(extent_offset));
    out.extend_from_slice(&bmff_box(b"mdat", &payload));
    out
}
