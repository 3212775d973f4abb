use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::download::segment::{Segment, StreamKind};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combined {
    pub path: PathBuf,
    pub segments: u64,
    pub bytes: u64,
}

/// Append `0{ext}`, `1{ext}`, ... from `folder` into a freshly created
/// `output`, stopping at the first missing index.
///
/// A missing `0{ext}` yields an empty output file.
pub fn combine(kind: StreamKind, folder: &Path, output: &Path) -> Result<Combined> {
    let file = match File::create(output) {
        Ok(file) => file,
        Err(err) => {
            tracing::error!("Error creating file {}: {}", output.display(), err);
            return Err(Error::io(output, err));
        }
    };
    let mut file = BufWriter::new(file);

    let mut segments = 0;
    let mut bytes = 0;

    loop {
        let seg_path = Segment::new(kind, segments).local_path(folder);
        if !seg_path.exists() {
            break;
        }

        let seg_file = File::open(&seg_path).map_err(|err| Error::io(&seg_path, err))?;
        let mut content = BufReader::new(seg_file);
        bytes += std::io::copy(&mut content, &mut file).map_err(|err| Error::io(output, err))?;
        segments += 1;
    }

    file.flush().map_err(|err| Error::io(output, err))?;

    tracing::info!(
        "Combined {} {} segments into {} ({} bytes)",
        segments,
        kind,
        output.display(),
        bytes
    );

    Ok(Combined {
        path: output.to_path_buf(),
        segments,
        bytes,
    })
}
