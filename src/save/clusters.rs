use super::*;
use crate::Id;
use crate::data::*;
use crate::mining::*;
use byteorder::BE;
use byteorder::ReadBytesExt;
use byteorder::WriteBytesExt;
use std::io::Error;
use std::io::ErrorKind;
use std::io::Read;
use std::io::Write;

const VERSION: u32 = 1;
const CONTINUOUS: u8 = 0;
const DISCRETE: u8 = 1;

/// Layout (big-endian):
///
/// header, version, schema, cluster count, clusters, footer.
/// The schema is recovered from the first centroid, so that
/// a restored set can be rendered without its record set.
impl Disk for ClusterSet {
    fn name() -> &'static str {
        "clusters"
    }
    fn header() -> &'static [u8] {
        b"QTCLUST\n\xFF\r\n\0"
    }
    fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let schema = self
            .iter()
            .next()
            .map(|c| c.centroid().items().map(Item::attribute).collect::<Vec<_>>())
            .unwrap_or_default();
        writer.write_all(Self::header())?;
        writer.write_u32::<BE>(VERSION)?;
        writer.write_u16::<BE>(length(schema.len())?)?;
        for attribute in schema.iter() {
            write_attribute(writer, attribute)?;
        }
        writer.write_u32::<BE>(length(self.len())?)?;
        for cluster in self.iter() {
            write_cluster(writer, &schema, cluster)?;
        }
        writer.write_u16::<BE>(Self::footer())?;
        Ok(())
    }
    fn read<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let ref mut magic = vec![0u8; Self::header().len()];
        reader.read_exact(magic)?;
        if magic.as_slice() != Self::header() {
            return Err(corrupt("missing cluster file header"));
        }
        match reader.read_u32::<BE>()? {
            VERSION => {}
            v => return Err(corrupt(format!("unsupported cluster file version {}", v))),
        }
        let schema = (0..reader.read_u16::<BE>()?)
            .map(|_| read_attribute(reader))
            .collect::<std::io::Result<Vec<_>>>()?;
        let clusters = (0..reader.read_u32::<BE>()?)
            .map(|_| read_cluster(reader, &schema))
            .collect::<std::io::Result<ClusterSet>>()?;
        match reader.read_u16::<BE>()? {
            footer if footer == Self::footer() => Ok(clusters),
            _ => Err(corrupt("missing cluster file trailer")),
        }
    }
}

fn write_attribute<W: Write>(writer: &mut W, attribute: &Attribute) -> std::io::Result<()> {
    match attribute {
        Attribute::Continuous(a) => {
            writer.write_u8(CONTINUOUS)?;
            write_str(writer, a.name())?;
            writer.write_u32::<BE>(length(a.index())?)?;
            writer.write_f64::<BE>(a.min())?;
            writer.write_f64::<BE>(a.max())?;
        }
        Attribute::Discrete(a) => {
            writer.write_u8(DISCRETE)?;
            write_str(writer, a.name())?;
            writer.write_u32::<BE>(length(a.index())?)?;
            writer.write_u32::<BE>(length(a.n())?)?;
            for value in a.values() {
                write_str(writer, value)?;
            }
        }
    }
    Ok(())
}

fn read_attribute<R: Read>(reader: &mut R) -> std::io::Result<Attribute> {
    let tag = reader.read_u8()?;
    let name = read_str(reader)?;
    let index = reader.read_u32::<BE>()? as usize;
    match tag {
        CONTINUOUS => {
            let min = reader.read_f64::<BE>()?;
            let max = reader.read_f64::<BE>()?;
            Continuous::new(name, index, min, max)
                .map(Attribute::from)
                .map_err(corrupt)
        }
        DISCRETE => {
            let values = (0..reader.read_u32::<BE>()?)
                .map(|_| read_str(reader))
                .collect::<std::io::Result<Vec<_>>>()?;
            Ok(Attribute::from(Discrete::new(name, index, values)))
        }
        t => Err(corrupt(format!("unknown attribute tag {}", t))),
    }
}

fn write_cluster<W: Write>(
    writer: &mut W,
    schema: &[Attribute],
    cluster: &Cluster,
) -> std::io::Result<()> {
    if cluster.centroid().len() != schema.len() {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            "centroids of one cluster set must share a schema",
        ));
    }
    for (item, attribute) in cluster.centroid().items().zip(schema) {
        match (item, attribute) {
            (Item::Continuous(_, x), Attribute::Continuous(_)) => writer.write_f64::<BE>(*x)?,
            (Item::Discrete(_, s), Attribute::Discrete(_)) => write_str(writer, s)?,
            _ => {
                return Err(Error::new(
                    ErrorKind::InvalidInput,
                    format!("centroid value {} does not fit {}", item, attribute),
                ));
            }
        }
    }
    writer.write_u32::<BE>(length(cluster.size())?)?;
    for id in cluster.iter() {
        writer.write_u64::<BE>(id as u64)?;
    }
    Ok(())
}

fn read_cluster<R: Read>(reader: &mut R, schema: &[Attribute]) -> std::io::Result<Cluster> {
    let centroid = schema
        .iter()
        .map(|attribute| {
            let value = match attribute {
                Attribute::Continuous(_) => Value::Number(reader.read_f64::<BE>()?),
                Attribute::Discrete(_) => Value::Text(read_str(reader)?),
            };
            Item::bind(attribute, value).map_err(corrupt)
        })
        .collect::<std::io::Result<Vec<_>>>()
        .map(Tuple::from)?;
    let mut cluster = Cluster::new(centroid);
    for _ in 0..reader.read_u32::<BE>()? {
        let id = Id::try_from(reader.read_u64::<BE>()?).map_err(corrupt)?;
        cluster.add(id);
    }
    Ok(cluster)
}

fn write_str<W: Write>(writer: &mut W, s: &str) -> std::io::Result<()> {
    writer.write_u32::<BE>(length(s.len())?)?;
    writer.write_all(s.as_bytes())
}

fn read_str<R: Read>(reader: &mut R) -> std::io::Result<String> {
    let n = reader.read_u32::<BE>()? as u64;
    let mut bytes = Vec::new();
    reader.take(n).read_to_end(&mut bytes)?;
    if bytes.len() as u64 != n {
        return Err(Error::from(ErrorKind::UnexpectedEof));
    }
    String::from_utf8(bytes).map_err(corrupt)
}

fn length<T: TryFrom<usize>>(n: usize) -> std::io::Result<T> {
    T::try_from(n).map_err(|_| Error::new(ErrorKind::InvalidInput, format!("{} overflows", n)))
}

fn corrupt<E>(e: E) -> Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    Error::new(ErrorKind::InvalidData, e)
}
