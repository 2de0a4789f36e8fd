use crate::{error::MapGwasError, utils::util::Result};
use flate2::read::MultiGzDecoder;
use std::{
    fs::File,
    io::{BufReader, Read as ioRead},
    path::Path,
};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub type InputReader = BufReader<Box<dyn ioRead>>;

fn is_gzip_named(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".gzip") || path_str.ends_with(".bgz")
}

fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| MapGwasError::OpenInput {
        path: path.to_path_buf(),
        source,
    })
}

fn has_gzip_magic(path: &Path) -> Result<bool> {
    let mut f = open_file(path)?;
    let mut m = [0u8; 2];
    let mut n = 0;
    while n < m.len() {
        let read = f.read(&mut m[n..])?;
        if read == 0 {
            break;
        }
        n += read;
    }
    Ok(n == 2 && m == GZIP_MAGIC)
}

/// Opens a plain or gzip/bgzip-compressed text input.
///
/// Compression is detected from the magic bytes; a file named `.gz` that does
/// not carry a gzip header is rejected.
pub fn open_input_reader(path: &Path) -> Result<InputReader> {
    let is_gzip = has_gzip_magic(path)?;
    if !is_gzip && is_gzip_named(path) {
        return Err(MapGwasError::InvalidGzipHeader {
            path: path.to_path_buf(),
        });
    }

    let file = open_file(path)?;
    if is_gzip {
        let gz_decoder = MultiGzDecoder::new(file);
        if gz_decoder.header().is_some() {
            Ok(BufReader::new(Box::new(gz_decoder)))
        } else {
            Err(MapGwasError::InvalidGzipHeader {
                path: path.to_path_buf(),
            })
        }
    } else {
        Ok(BufReader::new(Box::new(file)))
    }
}
