use std::fs::File;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// for types that can be written to
/// and loaded from disk as an opaque
/// byte stream. only round-trip fidelity
/// is promised, not a stable layout.
pub trait Disk: Sized {
    /// Returns the name of the entity, used in logs.
    fn name() -> &'static str;
    /// Signature leading every file.
    fn header() -> &'static [u8];
    /// Signature closing every file.
    fn footer() -> u16 {
        0xFFFF
    }
    /// Encode into any byte sink.
    fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()>;
    /// Decode from any byte source.
    fn read<R: Read>(reader: &mut R) -> std::io::Result<Self>;

    /// write to disk
    fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let ref mut writer = BufWriter::new(File::create(path)?);
        self.write(writer)?;
        writer.flush()
    }
    /// read from disk
    fn load(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let ref mut reader = BufReader::new(File::open(path)?);
        Self::read(reader)
    }
    /// Resolves a bare file name inside `dir`.
    /// Anything other than a single plain component is refused.
    fn path(dir: &Path, name: &str) -> std::io::Result<PathBuf> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(file)), None) => Ok(dir.join(file)),
            _ => Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a plain file name", name),
            )),
        }
    }
}
