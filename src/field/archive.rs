//! Field archive codec (NumPy `.npy` format, version 1.0 / 2.0).
//!
//! Only little-endian `f64` arrays are accepted, which is what NumPy writes
//! for `np.save(path, field)` on a float64 field.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use ndarray::{Array2, ArrayView2, ShapeBuilder};

use crate::error::{HelixError, Result};

const MAGIC: &[u8] = b"\x93NUMPY";
const HEADER_ALIGN: usize = 64;
const DESCR: &str = "<f8";

/// Decoded archive contents before shape validation
#[derive(Debug, Clone, PartialEq)]
pub struct NpyArray {
    pub shape: Vec<usize>,
    pub fortran_order: bool,
    pub data: Vec<f64>,
}

impl NpyArray {
    /// Convert into a 2-D array of the expected shape
    pub fn into_array2(self, expected: (usize, usize)) -> Result<Array2<f64>> {
        if self.shape != [expected.0, expected.1] {
            return Err(HelixError::ShapeMismatch {
                expected,
                found: self.shape,
            });
        }

        let array = if self.fortran_order {
            Array2::from_shape_vec(expected.f(), self.data)
        } else {
            Array2::from_shape_vec(expected, self.data)
        }
        .map_err(|e| HelixError::ArchiveFormat(e.to_string()))?;

        Ok(array.as_standard_layout().into_owned())
    }
}

/// Write a field to `path` verbatim
pub fn write_npy(path: impl AsRef<Path>, field: ArrayView2<'_, f64>) -> Result<()> {
    fs::write(path, encode_npy(field))?;
    Ok(())
}

/// Read an archive from `path`; a missing file is `MissingArchive`
pub fn read_npy(path: impl AsRef<Path>) -> Result<NpyArray> {
    let path = path.as_ref();
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(HelixError::MissingArchive {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(e.into()),
    };
    decode_npy(&bytes)
}

/// Encode a 2-D field as a version 1.0 `.npy` byte buffer (C order)
pub fn encode_npy(field: ArrayView2<'_, f64>) -> Vec<u8> {
    let (rows, cols) = field.dim();
    let mut header = format!(
        "{{'descr': '{}', 'fortran_order': False, 'shape': ({}, {}), }}",
        DESCR, rows, cols
    );

    // magic + version + u16 length + header + '\n' must land on the alignment
    let unpadded = MAGIC.len() + 2 + 2 + header.len() + 1;
    let padding = (HEADER_ALIGN - unpadded % HEADER_ALIGN) % HEADER_ALIGN;
    header.push_str(&" ".repeat(padding));
    header.push('\n');

    let mut out = Vec::with_capacity(unpadded + padding + rows * cols * 8);
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&[1, 0]);
    out.extend_from_slice(&(header.len() as u16).to_le_bytes());
    out.extend_from_slice(header.as_bytes());
    for value in field.iter() {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out
}

/// Decode a `.npy` byte buffer
pub fn decode_npy(bytes: &[u8]) -> Result<NpyArray> {
    if bytes.len() < MAGIC.len() + 2 || &bytes[..MAGIC.len()] != MAGIC {
        return Err(format_error("missing .npy magic"));
    }

    let major = bytes[MAGIC.len()];
    let cursor = MAGIC.len() + 2;
    let (header_len, header_start) = match major {
        1 => {
            let raw = bytes
                .get(cursor..cursor + 2)
                .ok_or_else(|| format_error("truncated header length"))?;
            (u16::from_le_bytes([raw[0], raw[1]]) as usize, cursor + 2)
        }
        2 | 3 => {
            let raw = bytes
                .get(cursor..cursor + 4)
                .ok_or_else(|| format_error("truncated header length"))?;
            (
                u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as usize,
                cursor + 4,
            )
        }
        other => return Err(format_error(&format!("unsupported version {}", other))),
    };

    let header_bytes = bytes
        .get(header_start..header_start + header_len)
        .ok_or_else(|| format_error("truncated header"))?;
    let header = std::str::from_utf8(header_bytes)
        .map_err(|_| format_error("header is not valid text"))?;

    let descr = dict_value(header, "descr")
        .ok_or_else(|| format_error("header has no descr"))?
        .trim_matches(|c| c == '\'' || c == '"');
    if descr != DESCR {
        return Err(format_error(&format!("unsupported dtype {}", descr)));
    }

    let fortran_order = match dict_value(header, "fortran_order") {
        Some("True") => true,
        Some("False") => false,
        _ => return Err(format_error("header has no fortran_order")),
    };

    let shape = parse_shape(header)?;

    let payload = &bytes[header_start + header_len..];
    let byte_count = shape
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
        .and_then(|count| count.checked_mul(8))
        .ok_or_else(|| format_error("shape too large"))?;
    let count = byte_count / 8;
    if payload.len() != byte_count {
        return Err(format_error(&format!(
            "expected {} values, found {} bytes of data",
            count,
            payload.len()
        )));
    }

    let data = payload
        .chunks_exact(8)
        .map(|chunk| {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(chunk);
            f64::from_le_bytes(raw)
        })
        .collect();

    Ok(NpyArray {
        shape,
        fortran_order,
        data,
    })
}

/// Raw text of a scalar entry in the header dict (up to the next comma)
fn dict_value<'a>(header: &'a str, key: &str) -> Option<&'a str> {
    let needle = format!("'{}':", key);
    let start = header.find(&needle)? + needle.len();
    let rest = header[start..].trim_start();
    let end = rest.find([',', '}']).unwrap_or(rest.len());
    Some(rest[..end].trim())
}

fn parse_shape(header: &str) -> Result<Vec<usize>> {
    let needle = "'shape':";
    let start = header
        .find(needle)
        .ok_or_else(|| format_error("header has no shape"))?
        + needle.len();
    let rest = &header[start..];
    let open = rest
        .find('(')
        .ok_or_else(|| format_error("shape is not a tuple"))?;
    let close = rest
        .find(')')
        .ok_or_else(|| format_error("shape is not a tuple"))?;
    if close < open {
        return Err(format_error("shape is not a tuple"));
    }

    rest[open + 1..close]
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<usize>()
                .map_err(|_| format_error(&format!("bad shape entry {}", part)))
        })
        .collect()
}

fn format_error(message: &str) -> HelixError {
    HelixError::ArchiveFormat(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_header_is_aligned() {
        let field = Array2::<f64>::zeros((64, 64));
        let bytes = encode_npy(field.view());
        let header_len = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;

        assert_eq!((10 + header_len) % HEADER_ALIGN, 0);
        assert_eq!(bytes[10 + header_len - 1], b'\n');
        assert_eq!(bytes.len(), 10 + header_len + 64 * 64 * 8);
    }

    #[test]
    fn test_decode_reads_values_in_row_major_order() {
        let field = array![[0.0, 0.25], [0.5, 1.0]];
        let decoded = decode_npy(&encode_npy(field.view())).unwrap();

        assert_eq!(decoded.shape, vec![2, 2]);
        assert!(!decoded.fortran_order);
        assert_eq!(decoded.data, vec![0.0, 0.25, 0.5, 1.0]);
    }

    #[test]
    fn test_fortran_order_is_transposed_back() {
        let decoded = NpyArray {
            shape: vec![2, 3],
            fortran_order: true,
            data: vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0],
        };

        let array = decoded.into_array2((2, 3)).unwrap();
        assert_eq!(array, array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    }

    #[test]
    fn test_shape_mismatch_is_reported() {
        let field = Array2::<f64>::zeros((128, 128));
        let decoded = decode_npy(&encode_npy(field.view())).unwrap();

        match decoded.into_array2((64, 64)) {
            Err(HelixError::ShapeMismatch { expected, found }) => {
                assert_eq!(expected, (64, 64));
                assert_eq!(found, vec![128, 128]);
            }
            other => panic!("expected shape mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_foreign_dtype_and_garbage() {
        assert!(matches!(
            decode_npy(b"not an archive"),
            Err(HelixError::ArchiveFormat(_))
        ));

        let field = Array2::<f64>::zeros((2, 2));
        let mut bytes = encode_npy(field.view());
        let pos = bytes.windows(3).position(|w| w == b"<f8").unwrap();
        bytes[pos + 2] = b'4';
        assert!(matches!(
            decode_npy(&bytes),
            Err(HelixError::ArchiveFormat(_))
        ));
    }

    #[test]
    fn test_truncated_payload_is_rejected() {
        let field = Array2::<f64>::zeros((4, 4));
        let mut bytes = encode_npy(field.view());
        bytes.truncate(bytes.len() - 8);
        assert!(matches!(
            decode_npy(&bytes),
            Err(HelixError::ArchiveFormat(_))
        ));
    }

    #[test]
    fn test_oversized_shape_is_format_error() {
        let header = "{'descr': '<f8', 'fortran_order': False, 'shape': (4294967296, 4294967296), }\n";
        let mut bytes = MAGIC.to_vec();
        bytes.extend_from_slice(&[1, 0]);
        bytes.extend_from_slice(&(header.len() as u16).to_le_bytes());
        bytes.extend_from_slice(header.as_bytes());
        bytes.extend_from_slice(&[0u8; 16]);

        assert!(matches!(
            decode_npy(&bytes),
            Err(HelixError::ArchiveFormat(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.npy");
        assert!(matches!(
            read_npy(&path),
            Err(HelixError::MissingArchive { .. })
        ));
    }
}
