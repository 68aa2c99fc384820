//! Program image format.
//!
//! An image is a stream of big-endian 16-bit words with no header:
//! - word 0: origin, the address the first content word is stored at
//! - words 1..: contents, stored contiguously from the origin
//!
//! Loading stops at end of stream or at the top of the address space,
//! whichever comes first. A trailing odd byte is ignored.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::cpu::memory::{Memory, MEMORY_SIZE};

/// Where an image landed in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadedImage {
    /// Address of the first content word.
    pub origin: u16,
    /// Number of words stored.
    pub len: usize,
}

/// Load an image from a byte stream into `mem`.
pub fn load_image<R: Read>(mem: &mut Memory, mut reader: R) -> Result<LoadedImage, ImageError> {
    let mut origin = [0u8; 2];
    match read_full(&mut reader, &mut origin)? {
        2 => {}
        _ => return Err(ImageError::MissingOrigin),
    }
    let origin = u16::from_be_bytes(origin);

    let capacity = MEMORY_SIZE - origin as usize;
    let mut words = Vec::new();
    let mut buf = [0u8; 2];
    while words.len() < capacity {
        if read_full(&mut reader, &mut buf)? < 2 {
            break;
        }
        words.push(u16::from_be_bytes(buf));
    }

    let len = mem.load(origin, &words);
    Ok(LoadedImage { origin, len })
}

/// Load an image file into `mem`.
pub fn load_image_file<P: AsRef<Path>>(mem: &mut Memory, path: P) -> Result<LoadedImage, ImageError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ImageError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    load_image(mem, BufReader::new(file))
}

/// Fill `buf` as far as the stream allows. Returns the bytes read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize, ImageError> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ImageError::Read(e)),
        }
    }
    Ok(filled)
}

/// Errors that can occur while loading an image.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("failed to open image {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("image has no origin word")]
    MissingOrigin,

    #[error("failed to read image: {0}")]
    Read(#[source] io::Error),
}
