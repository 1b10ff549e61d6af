use super::*;
use crate::data::*;
use tokio_postgres::Client;
use tokio_postgres::Row;

const NUMERIC: [&str; 6] = [
    "smallint",
    "integer",
    "bigint",
    "real",
    "double precision",
    "numeric",
];
const CATEGORICAL: [&str; 4] = ["character varying", "character", "text", "boolean"];

/// Tables in a PostgreSQL database.
///
/// A connection is opened per load and dropped when the load completes.
/// Numeric columns become continuous attributes bounded by their MIN and MAX;
/// character and boolean columns become categorical over their distinct values.
/// Columns of any other type are skipped, as are rows holding a NULL.
#[derive(Debug, Clone)]
pub struct Postgres {
    url: Option<String>,
}

struct Column {
    name: String,
    continuous: bool,
}

impl Postgres {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
        }
    }
    /// Reads the connection string from `DB_URL`.
    /// A missing variable surfaces on the first load.
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("DB_URL").ok(),
        }
    }

    async fn connect(&self) -> Result<Client, SourceError> {
        let url = self
            .url
            .as_deref()
            .ok_or_else(|| SourceError::Connection("DB_URL must be set".to_string()))?;
        let (client, connection) = tokio_postgres::connect(url, tokio_postgres::tls::NoTls)
            .await
            .map_err(|e| SourceError::Connection(e.to_string()))?;
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                log::warn!("database connection closed: {}", e);
            }
        });
        Ok(client)
    }

    async fn columns(client: &Client, table: &str) -> Result<Vec<Column>, SourceError> {
        const SQL: &str = "\
            SELECT column_name::text, data_type::text \
            FROM   information_schema.columns \
            WHERE  table_schema = current_schema() \
            AND    table_name::text = $1 \
            ORDER  BY ordinal_position";
        let mut columns = Vec::new();
        for row in client.query(SQL, &[&table]).await? {
            let name = row.try_get::<_, String>(0)?;
            let kind = row.try_get::<_, String>(1)?;
            match kind.as_str() {
                k if NUMERIC.contains(&k) => columns.push(Column {
                    name,
                    continuous: true,
                }),
                k if CATEGORICAL.contains(&k) => columns.push(Column {
                    name,
                    continuous: false,
                }),
                k => log::debug!("skipping {}.{} of type {}", table, name, k),
            }
        }
        Ok(columns)
    }

    fn select(column: &Column) -> String {
        match column.continuous {
            true => format!("{}::float8", quote(&column.name)),
            false => format!("{}::text", quote(&column.name)),
        }
    }

    fn value(row: &Row, j: usize, column: &Column) -> Result<Value, SourceError> {
        match column.continuous {
            true => Ok(Value::Number(row.try_get::<_, f64>(j)?)),
            false => Ok(Value::Text(row.try_get::<_, String>(j)?)),
        }
    }

    async fn attribute(
        client: &Client,
        from: &str,
        j: usize,
        column: &Column,
    ) -> Result<Attribute, SourceError> {
        let ref quoted = quote(&column.name);
        match column.continuous {
            true => {
                let sql = format!("SELECT MIN({q})::float8, MAX({q})::float8 {from}", q = quoted);
                let row = client.query_one(sql.as_str(), &[]).await?;
                let min = row.try_get::<_, Option<f64>>(0)?;
                let max = row.try_get::<_, Option<f64>>(1)?;
                match (min, max) {
                    (Some(min), Some(max)) => Ok(Attribute::from(Continuous::new(
                        column.name.clone(),
                        j,
                        min,
                        max,
                    )?)),
                    _ => Err(SourceError::NoValue(column.name.clone())),
                }
            }
            false => {
                let sql = format!("SELECT DISTINCT {q}::text {from} ORDER BY 1", q = quoted);
                let values = client
                    .query(sql.as_str(), &[])
                    .await?
                    .iter()
                    .map(|row| row.try_get::<_, String>(0))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Attribute::from(Discrete::new(
                    column.name.clone(),
                    j,
                    values,
                )))
            }
        }
    }
}

#[async_trait::async_trait]
impl Source for Postgres {
    async fn load(&self, table: &str) -> Result<Data, SourceError> {
        let client = self.connect().await?;
        let columns = Self::columns(&client, table).await?;
        if columns.is_empty() {
            return Err(SourceError::NoData(table.to_string()));
        }
        let from = format!(
            "FROM {} WHERE {}",
            quote(table),
            columns
                .iter()
                .map(|c| format!("{} IS NOT NULL", quote(&c.name)))
                .collect::<Vec<_>>()
                .join(" AND ")
        );
        let sql = format!(
            "SELECT DISTINCT {} {}",
            columns.iter().map(Self::select).collect::<Vec<_>>().join(", "),
            from
        );
        let rows = client.query(sql.as_str(), &[]).await?;
        if rows.is_empty() {
            return Err(SourceError::NoData(table.to_string()));
        }
        let mut schema = Vec::with_capacity(columns.len());
        for (j, column) in columns.iter().enumerate() {
            schema.push(Self::attribute(&client, &from, j, column).await?);
        }
        let records = rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .enumerate()
                    .map(|(j, column)| Self::value(row, j, column))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("loaded {} records from {}", records.len(), table);
        Ok(Data::new(schema, records)?)
    }
}

/// Quotes an identifier, doubling embedded quotes.
fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}
