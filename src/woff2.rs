// this_file: fontman/src/woff2.rs
//
// TTF/OTF to WOFF2 conversion.
//
// Tables are stored with the null transform (glyf and loca use transform
// version 3) and compressed as a single brotli stream. This trades a few
// percent of size against the reference encoder for a much simpler writer.

use crate::{FontmanError, Result};
use skrifa::{FontRef, Tag};
use std::{fs, io::Write, path::Path};

const WOFF2_SIGNATURE: u32 = 0x774F_4632; // 'wOF2'
const HEADER_SIZE: usize = 48;
const BROTLI_QUALITY: u32 = 11;
const BROTLI_WINDOW: u32 = 22;
const BROTLI_BUFFER: usize = 4096;

/// Flag value meaning "tag follows as four bytes"
const ARBITRARY_TAG: u8 = 0x3F;

/// Transform version 3 is the null transform for glyf and loca
const NULL_TRANSFORM_GLYF_LOCA: u8 = 3 << 6;

/// Tags with a one-byte encoding in the table directory, by index
const KNOWN_TAGS: [&[u8; 4]; 63] = [
    b"cmap", b"head", b"hhea", b"hmtx", b"maxp", b"name", b"OS/2", b"post", b"cvt ", b"fpgm",
    b"glyf", b"loca", b"prep", b"CFF ", b"VORG", b"EBDT", b"EBLC", b"gasp", b"hdmx", b"kern",
    b"LTSH", b"PCLT", b"VDMX", b"vhea", b"vmtx", b"BASE", b"GDEF", b"GPOS", b"GSUB", b"EBSC",
    b"JSTF", b"MATH", b"CBDT", b"CBLC", b"COLR", b"CPAL", b"SVG ", b"sbix", b"acnt", b"avar",
    b"bdat", b"bloc", b"bsln", b"cvar", b"fdsc", b"feat", b"fmtx", b"fvar", b"gvar", b"hsty",
    b"just", b"lcar", b"mort", b"morx", b"opbd", b"prop", b"trak", b"Zapf", b"Silf", b"Glat",
    b"Gloc", b"Feat", b"Sill",
];

/// Append a UIntBase128 encoded value
fn push_base128(out: &mut Vec<u8>, value: u32) {
    let mut bytes = [0u8; 5];
    let mut len = 0;
    let mut rest = value;
    loop {
        bytes[len] = (rest & 0x7F) as u8;
        len += 1;
        rest >>= 7;
        if rest == 0 {
            break;
        }
    }
    for i in (0..len).rev() {
        let continuation = if i == 0 { 0 } else { 0x80 };
        out.push(bytes[i] | continuation);
    }
}

fn pad4(len: usize) -> usize {
    (len + 3) & !3
}

/// Build the directory entry for one table
fn push_directory_entry(out: &mut Vec<u8>, tag: Tag, length: u32) {
    let raw = tag.to_be_bytes();
    let index = KNOWN_TAGS.iter().position(|known| **known == raw);
    let transform = if &raw == b"glyf" || &raw == b"loca" {
        NULL_TRANSFORM_GLYF_LOCA
    } else {
        0
    };

    match index {
        Some(index) => out.push(index as u8 | transform),
        None => {
            out.push(ARBITRARY_TAG | transform);
            out.extend_from_slice(&raw);
        }
    }
    push_base128(out, length);
}

/// Encode an sfnt (TrueType or CFF-flavored OpenType) font as WOFF2
pub fn compress_sfnt(data: &[u8]) -> Result<Vec<u8>> {
    let font = FontRef::new(data).map_err(|e| FontmanError::Font(e.to_string()))?;
    let records = font.table_directory.table_records();
    if records.is_empty() {
        return Err(FontmanError::Font("font has no tables".to_string()));
    }

    let mut directory = Vec::new();
    let mut stream = Vec::new();
    let mut sfnt_size = 12 + 16 * records.len();

    for record in records {
        let tag = record.tag();
        let table = font
            .table_data(tag)
            .ok_or_else(|| FontmanError::Font(format!("table '{}' is out of bounds", tag)))?;
        let bytes = table.as_bytes();
        push_directory_entry(&mut directory, tag, bytes.len() as u32);
        stream.extend_from_slice(bytes);
        sfnt_size += pad4(bytes.len());
    }

    let compressed = brotli_compress(&stream)?;
    let total_len = pad4(HEADER_SIZE + directory.len() + compressed.len());

    let mut out = Vec::with_capacity(total_len);
    out.extend_from_slice(&WOFF2_SIGNATURE.to_be_bytes());
    out.extend_from_slice(&font.table_directory.sfnt_version().to_be_bytes());
    out.extend_from_slice(&(total_len as u32).to_be_bytes());
    out.extend_from_slice(&(records.len() as u16).to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes()); // reserved
    out.extend_from_slice(&(sfnt_size as u32).to_be_bytes());
    out.extend_from_slice(&(compressed.len() as u32).to_be_bytes());
    out.extend_from_slice(&1u16.to_be_bytes()); // majorVersion
    out.extend_from_slice(&0u16.to_be_bytes()); // minorVersion
    out.extend_from_slice(&[0u8; 20]); // no metadata or private block
    out.extend_from_slice(&directory);
    out.extend_from_slice(&compressed);
    out.resize(total_len, 0);
    Ok(out)
}

fn brotli_compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut writer =
        brotli::CompressorWriter::new(Vec::new(), BROTLI_BUFFER, BROTLI_QUALITY, BROTLI_WINDOW);
    writer.write_all(data)?;
    writer.flush()?;
    Ok(writer.into_inner())
}

/// Convert a font file to WOFF2
pub fn convert_file(src: &Path, dest: &Path) -> Result<()> {
    let data = fs::read(src)?;
    let woff2 = compress_sfnt(&data)?;
    fs::write(dest, woff2)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testfont::TestFont;
    use std::io::Read;

    fn base128(value: u32) -> Vec<u8> {
        let mut out = Vec::new();
        push_base128(&mut out, value);
        out
    }

    #[test]
    fn test_base128() {
        assert_eq!(base128(0), vec![0x00]);
        assert_eq!(base128(127), vec![0x7F]);
        assert_eq!(base128(128), vec![0x81, 0x00]);
        assert_eq!(base128(63), vec![0x3F]);
        assert_eq!(base128(16384), vec![0x81, 0x80, 0x00]);
        assert_eq!(base128(u32::MAX), vec![0x8F, 0xFF, 0xFF, 0xFF, 0x7F]);
    }

    #[test]
    fn test_directory_entries() {
        let mut out = Vec::new();
        push_directory_entry(&mut out, Tag::new(b"cmap"), 10);
        assert_eq!(out, vec![0x00, 10]);

        let mut out = Vec::new();
        push_directory_entry(&mut out, Tag::new(b"glyf"), 10);
        assert_eq!(out, vec![10 | 0xC0, 10]);

        let mut out = Vec::new();
        push_directory_entry(&mut out, Tag::new(b"zzzz"), 300);
        assert_eq!(out, vec![0x3F, b'z', b'z', b'z', b'z', 0x82, 0x2C]);
    }

    #[test]
    fn test_compress_sfnt() {
        let font = TestFont::new("Foo", "Regular", 400)
            .table(b"zzzz", b"abc")
            .build();
        let woff2 = compress_sfnt(&font).unwrap();

        assert_eq!(&woff2[0..4], b"wOF2");
        assert_eq!(&woff2[4..8], &0x0001_0000u32.to_be_bytes());
        assert_eq!(u32::from_be_bytes(woff2[8..12].try_into().unwrap()) as usize, woff2.len());
        assert_eq!(u16::from_be_bytes([woff2[12], woff2[13]]), 3);
        assert_eq!(woff2.len() % 4, 0);

        let parsed = FontRef::new(&font).unwrap();
        let records = parsed.table_directory.table_records();
        let sfnt_size = u32::from_be_bytes(woff2[16..20].try_into().unwrap()) as usize;
        let padded: usize = records.iter().map(|r| pad4(r.length() as usize)).sum();
        assert_eq!(sfnt_size, 12 + 16 * records.len() + padded);

        // Directory: OS/2, name, arbitrary 'zzzz'
        let mut expected_dir = Vec::new();
        for record in records {
            push_directory_entry(&mut expected_dir, record.tag(), record.length());
        }
        assert_eq!(expected_dir[0], 6);
        assert_eq!(&expected_dir[expected_dir.len() - 6..], &[0x3F, b'z', b'z', b'z', b'z', 3]);
        let start = HEADER_SIZE + expected_dir.len();
        assert_eq!(&woff2[HEADER_SIZE..start], &expected_dir[..]);

        let compressed_len = u32::from_be_bytes(woff2[20..24].try_into().unwrap()) as usize;
        let mut decompressed = Vec::new();
        brotli::Decompressor::new(&woff2[start..start + compressed_len], 4096)
            .read_to_end(&mut decompressed)
            .unwrap();

        let expected: Vec<u8> = [b"OS/2", b"name", b"zzzz"]
            .iter()
            .flat_map(|tag| parsed.table_data(Tag::new(tag)).unwrap().as_bytes().to_vec())
            .collect();
        assert_eq!(decompressed, expected);
    }

    #[test]
    fn test_compress_rejects_garbage() {
        assert!(compress_sfnt(b"not a font at all").is_err());
    }

    #[test]
    fn test_convert_file() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("Foo-Regular.ttf");
        let dest = dir.path().join("Foo-Regular.woff2");
        TestFont::new("Foo", "Regular", 400).write(&src);

        convert_file(&src, &dest).unwrap();
        assert_eq!(&fs::read(&dest).unwrap()[0..4], b"wOF2");
    }
}
