use super::*;
use crate::data::*;
use std::collections::BTreeMap;

/// Tables held in process, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Memory(BTreeMap<String, Data>);

impl Memory {
    pub fn insert(&mut self, table: impl Into<String>, data: Data) {
        self.0.insert(table.into(), data);
    }
    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// The classic weather table plus a one-dimensional line.
    pub fn demo() -> Self {
        const PLAYTENNIS: [(&str, f64, &str, &str, &str); 14] = [
            ("sunny", 30.3, "high", "weak", "no"),
            ("sunny", 30.3, "high", "strong", "no"),
            ("overcast", 30.0, "high", "weak", "yes"),
            ("rain", 13.0, "high", "weak", "yes"),
            ("rain", 0.0, "normal", "weak", "yes"),
            ("rain", 0.0, "normal", "strong", "no"),
            ("overcast", 0.1, "normal", "strong", "yes"),
            ("sunny", 13.0, "high", "weak", "no"),
            ("sunny", 0.1, "normal", "weak", "yes"),
            ("rain", 12.0, "normal", "weak", "yes"),
            ("sunny", 12.5, "normal", "strong", "yes"),
            ("overcast", 12.5, "high", "strong", "yes"),
            ("overcast", 29.21, "normal", "weak", "yes"),
            ("rain", 12.5, "high", "strong", "no"),
        ];
        let playtennis = PLAYTENNIS
            .iter()
            .map(|&(outlook, temperature, humidity, wind, play)| {
                vec![
                    Value::from(outlook),
                    Value::from(temperature),
                    Value::from(humidity),
                    Value::from(wind),
                    Value::from(play),
                ]
            })
            .collect();
        let line = [0.0, 1.0, 2.0, 10.0, 11.0]
            .into_iter()
            .map(|x| vec![Value::from(x)])
            .collect();
        let mut memory = Self::default();
        memory.insert(
            "playtennis",
            Data::infer(
                ["outlook", "temperature", "humidity", "wind", "play"],
                playtennis,
            )
            .expect("weather table is rectangular"),
        );
        memory.insert(
            "line",
            Data::infer(["x"], line).expect("line table is rectangular"),
        );
        memory
    }
}

#[async_trait::async_trait]
impl Source for Memory {
    async fn load(&self, table: &str) -> Result<Data, SourceError> {
        self.0
            .get(table)
            .filter(|data| !data.is_empty())
            .cloned()
            .ok_or_else(|| SourceError::NoData(table.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn demo_serves_weather() {
        let data = Memory::demo().load("playtennis").await.unwrap();
        assert_eq!(data.len(), 14);
        assert_eq!(data.n_attributes(), 5);
        assert!(data.attribute(1).map(Attribute::is_continuous).unwrap());
        assert!(!data.attribute(0).map(Attribute::is_continuous).unwrap());
    }
    #[tokio::test]
    async fn missing_table_is_no_data() {
        let err = Memory::demo().load("nowhere").await.unwrap_err();
        assert_eq!(err, SourceError::NoData("nowhere".to_string()));
    }
    #[tokio::test]
    async fn empty_table_is_no_data() {
        let mut memory = Memory::default();
        memory.insert("empty", Data::infer(["x"], vec![]).unwrap());
        assert!(matches!(
            memory.load("empty").await,
            Err(SourceError::NoData(_))
        ));
    }
    #[test]
    fn tables_are_listed_by_name() {
        let memory = Memory::demo();
        assert_eq!(memory.tables().collect::<Vec<_>>(), vec!["line", "playtennis"]);
    }
}
