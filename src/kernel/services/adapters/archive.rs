//! Project export as a zip archive with the three canonical entries.

use std::io::{self, Seek, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::kernel::services::ports::persistence::ProjectSnapshot;

pub const ARCHIVE_NAME: &str = "code-editor-project.zip";

const ENTRIES: [(&str, fn(&ProjectSnapshot) -> &str); 3] = [
    ("index.html", |s| &s.html),
    ("style.css", |s| &s.css),
    ("script.js", |s| &s.js),
];

pub fn write_archive<W: Write + Seek>(snapshot: &ProjectSnapshot, writer: W) -> io::Result<()> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for (name, extract) in ENTRIES {
        zip.start_file(name, options)?;
        zip.write_all(extract(snapshot).as_bytes())?;
    }

    zip.finish()?;
    Ok(())
}
