use crate::error::Result;
use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// The zip container of a `.docx`, kept as ordered (name, bytes) entries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Package {
    entries: Vec<(String, Vec<u8>)>,
}

impl Package {
    /// Read every entry of a `.docx` file, preserving entry order
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            let mut data = Vec::new();
            entry.read_to_end(&mut data)?;
            entries.push((name, data));
        }
        Ok(Self { entries })
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, data)| data.as_slice())
    }

    /// Replace a part, or append it when absent
    pub fn set_part(&mut self, name: &str, data: Vec<u8>) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = data,
            None => self.entries.push((name.to_string(), data)),
        }
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Write the package, substituting `part` for the entry of the same name
    pub fn save_with<P: AsRef<Path>>(&self, path: P, part: (&str, &[u8])) -> Result<()> {
        let file = File::create(path.as_ref())?;
        self.write_with(file, part)
    }

    /// Media is stored, everything else deflated, matching what Word writes
    pub fn write_with<W: Write + Seek>(&self, writer: W, part: (&str, &[u8])) -> Result<()> {
        let (part_name, part_data) = part;
        let mut zip = ZipWriter::new(writer);
        let deflated = FileOptions::default().compression_method(CompressionMethod::Deflated);
        let stored = FileOptions::default().compression_method(CompressionMethod::Stored);

        let mut written = false;
        for (name, data) in &self.entries {
            let options = if name.starts_with("word/media/") {
                stored
            } else {
                deflated
            };
            zip.start_file(name.as_str(), options)?;
            if name == part_name {
                zip.write_all(part_data)?;
                written = true;
            } else {
                zip.write_all(data)?;
            }
        }
        if !written {
            zip.start_file(part_name, deflated)?;
            zip.write_all(part_data)?;
        }

        zip.finish()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample() -> Package {
        let mut package = Package::default();
        package.set_part("[Content_Types].xml", b"<Types/>".to_vec());
        package.set_part("word/document.xml", b"<w:document/>".to_vec());
        package.set_part("word/media/image1.png", vec![0x89, b'P', b'N', b'G']);
        package
    }

    #[test]
    fn test_write_with_replaces_part_in_place() {
        let package = sample();
        let mut buffer = Cursor::new(Vec::new());
        package
            .write_with(&mut buffer, ("word/document.xml", b"<w:document>x</w:document>"))
            .unwrap();

        buffer.set_position(0);
        let reread = Package::from_reader(buffer).unwrap();
        let names: Vec<&str> = reread.part_names().collect();
        assert_eq!(
            names,
            vec!["[Content_Types].xml", "word/document.xml", "word/media/image1.png"]
        );
        assert_eq!(
            reread.part("word/document.xml").unwrap(),
            b"<w:document>x</w:document>"
        );
        assert_eq!(reread.part("word/media/image1.png").unwrap(), &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn test_set_part_appends_new_entry() {
        let mut package = sample();
        package.set_part("docProps/app.xml", b"<Properties/>".to_vec());
        assert_eq!(package.part_names().count(), 4);
        assert!(package.part("missing.xml").is_none());
    }
}
