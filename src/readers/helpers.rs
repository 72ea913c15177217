// src/readers/helpers.rs

//! Miscellaneous helper functions for _Readers_.

use crate::common::{File, FPath, FPATH_STDIN, Path};

use std::io::{BufRead, BufReader, Error, ErrorKind};

use ::bzip2_rs::DecoderReader as Bz2DecoderReader;
use ::flate2::read::MultiGzDecoder;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Kinds of input an [`FPath`] may name.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputType {
    Stdin,
    /// plain text file
    File,
    /// gzip compressed file, `.gz`
    FileGz,
    /// bzip2 compressed file, `.bz2`
    FileBz2,
}

/// The [`InputType`] of `path`, by name only.
pub fn fpath_to_inputtype(path: &FPath) -> InputType {
    if path.as_str() == FPATH_STDIN {
        return InputType::Stdin;
    }
    let extension: String = match Path::new(path).extension() {
        Some(extension) => extension.to_string_lossy().to_lowercase(),
        None => return InputType::File,
    };
    match extension.as_str() {
        "gz" => InputType::FileGz,
        "bz2" => InputType::FileBz2,
        _ => InputType::File,
    }
}

/// Open `path` for reading lines, `-` for stdin.
///
/// Compressed files are decompressed while read, never to a temporary
/// file.
pub fn open_fpath(path: &FPath) -> Result<Box<dyn BufRead>, Error> {
    defn!("({:?})", path);
    let inputtype: InputType = fpath_to_inputtype(path);
    if let InputType::Stdin = inputtype {
        defx!("stdin");
        return Ok(Box::new(BufReader::new(std::io::stdin())));
    }
    let file: File = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            defx!("File::open error {}", err);
            return Err(Error::new(err.kind(), format!("{} for file {:?}", err, path)));
        }
    };
    if file.metadata()?.is_dir() {
        defx!("is a directory");
        return Err(Error::new(ErrorKind::InvalidInput, format!("path {:?} is a directory", path)));
    }
    let reader: Box<dyn BufRead> = match inputtype {
        InputType::FileGz => Box::new(BufReader::new(MultiGzDecoder::new(file))),
        InputType::FileBz2 => Box::new(BufReader::new(Bz2DecoderReader::new(file))),
        InputType::File | InputType::Stdin => Box::new(BufReader::new(file)),
    };
    defx!("{:?}", inputtype);

    Ok(reader)
}
