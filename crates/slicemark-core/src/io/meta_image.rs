use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{BigEndian, ByteOrder, LittleEndian, WriteBytesExt};
use memmap2::Mmap;

use crate::error::{Result, SlicemarkError};

/// Sample type of a MetaImage element buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementType {
    UChar,
    Short,
    UShort,
    Int,
}

impl ElementType {
    pub fn byte_size(&self) -> usize {
        match self {
            ElementType::UChar => 1,
            ElementType::Short | ElementType::UShort => 2,
            ElementType::Int => 4,
        }
    }

    fn keyword(&self) -> &'static str {
        match self {
            ElementType::UChar => "MET_UCHAR",
            ElementType::Short => "MET_SHORT",
            ElementType::UShort => "MET_USHORT",
            ElementType::Int => "MET_INT",
        }
    }

    fn from_keyword(s: &str) -> Result<Self> {
        match s {
            "MET_UCHAR" => Ok(ElementType::UChar),
            "MET_SHORT" => Ok(ElementType::Short),
            "MET_USHORT" => Ok(ElementType::UShort),
            "MET_INT" => Ok(ElementType::Int),
            other => Err(SlicemarkError::Codec(format!(
                "unsupported element type: {other}"
            ))),
        }
    }
}

/// A decoded MetaImage (.mha) slice: a single-channel integer buffer with
/// its physical geometry.
///
/// Files are written as single-slice 3-D volumes (DimSize z = 1) with local
/// raw data, matching what medical toolkits emit for 2-D slices; both 2-D
/// and single-slice 3-D files are accepted on read.
#[derive(Clone, Debug)]
pub struct MetaImage {
    pub width: usize,
    pub height: usize,
    pub spacing: (f64, f64),
    pub origin: (f64, f64),
    pub element_type: ElementType,
    /// Row-major samples widened to i32.
    pub samples: Vec<i32>,
}

impl MetaImage {
    /// Read and decode a .mha file with local raw data.
    pub fn read(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        let (header, data_offset) = parse_header(&mmap)?;

        let expected = header.width * header.height * header.element_type.byte_size();
        let raw = &mmap[data_offset..];
        if raw.len() < expected {
            return Err(SlicemarkError::Codec(format!(
                "file truncated: expected {} data bytes, got {}",
                expected,
                raw.len()
            )));
        }

        let samples = decode_samples(
            &raw[..expected],
            header.element_type,
            header.big_endian,
        );

        Ok(Self {
            width: header.width,
            height: header.height,
            spacing: header.spacing,
            origin: header.origin,
            element_type: header.element_type,
            samples,
        })
    }

    /// Write as a single-slice 3-D volume with little-endian local raw data.
    pub fn write(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut w = BufWriter::new(file);

        writeln!(w, "ObjectType = Image")?;
        writeln!(w, "NDims = 3")?;
        writeln!(w, "BinaryData = True")?;
        writeln!(w, "BinaryDataByteOrderMSB = False")?;
        writeln!(w, "CompressedData = False")?;
        writeln!(w, "DimSize = {} {} 1", self.width, self.height)?;
        writeln!(w, "ElementSpacing = {} {} 1", self.spacing.0, self.spacing.1)?;
        writeln!(w, "Offset = {} {} 0", self.origin.0, self.origin.1)?;
        writeln!(w, "ElementType = {}", self.element_type.keyword())?;
        writeln!(w, "ElementDataFile = LOCAL")?;

        for &v in &self.samples {
            match self.element_type {
                ElementType::UChar => w.write_u8(clamp_to(v, 0, 255) as u8)?,
                ElementType::Short => {
                    w.write_i16::<LittleEndian>(clamp_to(v, i16::MIN as i32, i16::MAX as i32) as i16)?
                }
                ElementType::UShort => {
                    w.write_u16::<LittleEndian>(clamp_to(v, 0, u16::MAX as i32) as u16)?
                }
                ElementType::Int => w.write_i32::<LittleEndian>(v)?,
            }
        }

        w.flush()?;
        Ok(())
    }
}

fn clamp_to(v: i32, lo: i32, hi: i32) -> i32 {
    v.clamp(lo, hi)
}

struct MetaHeader {
    width: usize,
    height: usize,
    spacing: (f64, f64),
    origin: (f64, f64),
    element_type: ElementType,
    big_endian: bool,
}

/// Parse the ASCII key/value header; returns the header and the byte offset
/// where the local raw data begins.
fn parse_header(buf: &[u8]) -> Result<(MetaHeader, usize)> {
    let mut ndims: Option<usize> = None;
    let mut dims: Vec<usize> = Vec::new();
    let mut spacing: Vec<f64> = Vec::new();
    let mut origin: Vec<f64> = Vec::new();
    let mut element_type: Option<ElementType> = None;
    let mut big_endian = false;

    let mut offset = 0;
    let mut found_data = false;

    while offset < buf.len() {
        let line_end = buf[offset..]
            .iter()
            .position(|&b| b == b'\n')
            .map(|p| offset + p)
            .ok_or_else(|| SlicemarkError::Codec("header not terminated".into()))?;
        let line = std::str::from_utf8(&buf[offset..line_end])
            .map_err(|_| SlicemarkError::Codec("non-UTF-8 header line".into()))?
            .trim_end_matches('\r');
        offset = line_end + 1;

        let Some((key, value)) = line.split_once('=') else {
            return Err(SlicemarkError::Codec(format!(
                "malformed header line: {line}"
            )));
        };
        let key = key.trim();
        let value = value.trim();

        match key {
            "ObjectType" => {
                if value != "Image" {
                    return Err(SlicemarkError::Codec(format!(
                        "unsupported object type: {value}"
                    )));
                }
            }
            "NDims" => ndims = Some(parse_num(key, value)?),
            "DimSize" => dims = parse_num_list(key, value)?,
            "ElementSpacing" => spacing = parse_num_list(key, value)?,
            "Offset" => origin = parse_num_list(key, value)?,
            "ElementType" => element_type = Some(ElementType::from_keyword(value)?),
            "BinaryDataByteOrderMSB" => big_endian = value.eq_ignore_ascii_case("true"),
            "CompressedData" => {
                if value.eq_ignore_ascii_case("true") {
                    return Err(SlicemarkError::Codec(
                        "compressed data is not supported".into(),
                    ));
                }
            }
            "ElementDataFile" => {
                if value != "LOCAL" {
                    return Err(SlicemarkError::Codec(format!(
                        "only local element data is supported, got {value}"
                    )));
                }
                found_data = true;
                break;
            }
            // Unknown keys (TransformMatrix etc.) are skipped
            _ => {}
        }
    }

    if !found_data {
        return Err(SlicemarkError::Codec("missing ElementDataFile".into()));
    }

    let ndims = ndims.ok_or_else(|| SlicemarkError::Codec("missing NDims".into()))?;
    if ndims != 2 && ndims != 3 {
        return Err(SlicemarkError::Codec(format!(
            "unsupported dimensionality: {ndims}"
        )));
    }
    if dims.len() != ndims {
        return Err(SlicemarkError::Codec("DimSize does not match NDims".into()));
    }
    if ndims == 3 && dims[2] != 1 {
        return Err(SlicemarkError::Codec(format!(
            "only single-slice volumes are supported, got {} slices",
            dims[2]
        )));
    }
    let (width, height) = (dims[0], dims[1]);
    if width == 0 || height == 0 {
        return Err(SlicemarkError::Codec(format!(
            "invalid dimensions: {width}x{height}"
        )));
    }

    let spacing = match spacing.len() {
        0 => (1.0, 1.0),
        n if n >= 2 => (spacing[0], spacing[1]),
        _ => return Err(SlicemarkError::Codec("malformed ElementSpacing".into())),
    };
    let origin = match origin.len() {
        0 => (0.0, 0.0),
        n if n >= 2 => (origin[0], origin[1]),
        _ => return Err(SlicemarkError::Codec("malformed Offset".into())),
    };

    let element_type =
        element_type.ok_or_else(|| SlicemarkError::Codec("missing ElementType".into()))?;

    Ok((
        MetaHeader {
            width,
            height,
            spacing,
            origin,
            element_type,
            big_endian,
        },
        offset,
    ))
}

fn parse_num<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| SlicemarkError::Codec(format!("malformed {key}: {value}")))
}

fn parse_num_list<T: std::str::FromStr>(key: &str, value: &str) -> Result<Vec<T>> {
    value
        .split_whitespace()
        .map(|tok| {
            tok.parse()
                .map_err(|_| SlicemarkError::Codec(format!("malformed {key}: {value}")))
        })
        .collect()
}

fn decode_samples(raw: &[u8], element_type: ElementType, big_endian: bool) -> Vec<i32> {
    let size = element_type.byte_size();
    raw.chunks_exact(size)
        .map(|chunk| match element_type {
            ElementType::UChar => chunk[0] as i32,
            ElementType::Short => {
                if big_endian {
                    BigEndian::read_i16(chunk) as i32
                } else {
                    LittleEndian::read_i16(chunk) as i32
                }
            }
            ElementType::UShort => {
                if big_endian {
                    BigEndian::read_u16(chunk) as i32
                } else {
                    LittleEndian::read_u16(chunk) as i32
                }
            }
            ElementType::Int => {
                if big_endian {
                    BigEndian::read_i32(chunk)
                } else {
                    LittleEndian::read_i32(chunk)
                }
            }
        })
        .collect()
}
