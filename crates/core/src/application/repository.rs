// Repository - the boundary between logical and storage records

use crate::application::DatabaseLayer;
use crate::coercion;
use crate::domain::{
    Columns, DataType, JsonValue, ModelObject, QueryOptions, ResultSet, SqlValue, StorageRecord,
    UpdateObject, Where,
};
use crate::error::{AppError, Result};
use crate::port::SqlConnection;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Maps one table's rows to logical records
///
/// Input is sanitized against the schema and coerced to storage values before
/// it reaches the execution layer; rows coming back are coerced to logical
/// values.
pub struct Repository {
    columns: Arc<Columns>,
    database_layer: DatabaseLayer,
}

impl Repository {
    pub fn new(
        connection: Arc<dyn SqlConnection>,
        table_name: impl Into<String>,
        columns: Columns,
    ) -> Self {
        Self {
            columns: Arc::new(columns),
            database_layer: DatabaseLayer::new(connection, table_name),
        }
    }

    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    pub fn table_name(&self) -> &str {
        self.database_layer.table_name()
    }

    pub fn database_layer(&self) -> &DatabaseLayer {
        &self.database_layer
    }

    pub async fn create_table(&self) -> Result<bool> {
        self.database_layer.create_table(&self.columns).await
    }

    pub async fn drop_table(&self) -> Result<bool> {
        self.database_layer.drop_table().await
    }

    /// Insert a record and return the stored row as a logical record
    ///
    /// Unknown keys are dropped; absent columns with a default producer are
    /// filled before coercion and follow the caller's keys.
    pub async fn insert(&self, record: &ModelObject) -> Result<Option<ModelObject>> {
        let record = self.fill_defaults(self.sanitize(record), false);
        let stored = coercion::to_database_value(&self.columns, &record)?;

        match self.database_layer.insert(&stored).await? {
            Some(row) => Ok(Some(self.to_model(&row)?)),
            None => Ok(None),
        }
    }

    /// Update the row identified by `update.primary_key`
    ///
    /// Returns the engine acknowledgement, not the row.
    pub async fn update(&self, update: UpdateObject) -> Result<ResultSet> {
        let primary_key = self.columns.primary_key_name();
        let mut properties = self.sanitize(&update.properties);
        properties.retain(|name, _| name != primary_key);

        if properties.is_empty() {
            debug!(table = %self.table_name(), "Update without properties, nothing to do");
            return Ok(ResultSet::default());
        }

        let stored = coercion::to_database_value(&self.columns, &properties)?;
        let key_value = self.key_value(&update.primary_key)?;

        self.database_layer
            .update(&stored, primary_key, key_value)
            .await
    }

    /// Insert when the record has no primary-key value, otherwise update it
    ///
    /// Returns the stored row either way.
    pub async fn save(&self, record: &ModelObject) -> Result<Option<ModelObject>> {
        let primary_key = self.columns.primary_key_name();

        match UpdateObject::from_record(self.sanitize(record), primary_key) {
            Some(update) => {
                let key_value = self.key_value(&update.primary_key)?;
                self.update(update).await?;
                self.find(key_value).await
            }
            None => self.insert(record).await,
        }
    }

    /// Atomic upsert of many records
    pub async fn bulk_insert_or_replace(&self, records: &[ModelObject]) -> Result<Vec<ResultSet>> {
        let stored = records
            .iter()
            .map(|record| {
                let record = self.fill_defaults(self.sanitize(record), false);
                coercion::to_database_value(&self.columns, &record)
            })
            .collect::<Result<Vec<StorageRecord>>>()?;

        self.database_layer.bulk_insert_or_replace(&stored).await
    }

    pub async fn destroy(&self, key_value: impl Into<SqlValue>) -> Result<bool> {
        self.database_layer
            .destroy_by_key(self.columns.primary_key_name(), key_value)
            .await
    }

    pub async fn destroy_all(&self) -> Result<bool> {
        self.database_layer.destroy_all().await
    }

    /// Find by primary-key value; `None` when no row has it
    pub async fn find(&self, key_value: impl Into<SqlValue>) -> Result<Option<ModelObject>> {
        let primary_key = self.columns.primary_key_name();
        match self.database_layer.find_by_key(primary_key, key_value).await? {
            Some(row) => Ok(Some(self.to_model(&row)?)),
            None => Ok(None),
        }
    }

    /// `None` when no row matches
    pub async fn find_by(&self, filter: &Where) -> Result<Option<ModelObject>> {
        match self.database_layer.find_by(filter).await? {
            Some(row) => Ok(Some(self.to_model(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn query(&self, options: &QueryOptions) -> Result<Vec<ModelObject>> {
        let rows = self.database_layer.query(options).await?;
        rows.iter().map(|row| self.to_model(row)).collect()
    }

    pub async fn find_as<T: DeserializeOwned>(&self, id: impl Into<SqlValue>) -> Result<Option<T>> {
        self.find(id).await?.map(from_model_object).transpose()
    }

    pub async fn query_as<T: DeserializeOwned>(&self, options: &QueryOptions) -> Result<Vec<T>> {
        self.query(options)
            .await?
            .into_iter()
            .map(from_model_object)
            .collect()
    }

    /// Insert a typed value; it must serialize to a JSON object
    pub async fn insert_as<T>(&self, value: &T) -> Result<Option<T>>
    where
        T: Serialize + DeserializeOwned,
    {
        let record = to_model_object(value)?;
        self.insert(&record).await?.map(from_model_object).transpose()
    }

    /// Copy of `record` restricted to schema keys; unknown keys are dropped
    pub fn sanitize(&self, record: &ModelObject) -> ModelObject {
        record
            .iter()
            .filter(|(name, _)| self.columns.contains(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// Full record over every schema column, in schema order
    ///
    /// Each column takes the caller's value when present, else its default
    /// producer's value, else `null`.
    pub fn assemble(&self, record: &ModelObject) -> ModelObject {
        let record = self.fill_defaults(self.sanitize(record), true);
        self.columns
            .names()
            .filter_map(|name| record.get(name).map(|value| (name.to_string(), value.clone())))
            .collect()
    }

    /// Append absent columns after the caller's keys, in schema order
    ///
    /// Default producers see the caller's values plus every default filled
    /// before them.
    fn fill_defaults(&self, mut record: ModelObject, null_when_absent: bool) -> ModelObject {
        for (name, column) in self.columns.iter() {
            if record.contains_key(name) {
                continue;
            }
            match column.default_for(&record) {
                Some(value) => {
                    record.insert(name.to_string(), value);
                }
                None if null_when_absent => {
                    record.insert(name.to_string(), JsonValue::Null);
                }
                None => {}
            }
        }
        record
    }

    fn to_model(&self, row: &StorageRecord) -> Result<ModelObject> {
        coercion::to_model_value(&self.columns, row)
    }

    fn key_value(&self, value: &JsonValue) -> Result<SqlValue> {
        let data_type = self
            .columns
            .get(self.columns.primary_key_name())
            .map_or(DataType::Integer, |column| column.data_type);
        coercion::property_to_database_value(data_type, value)
    }
}

/// Serialize a typed value into a logical record
pub fn to_model_object<T: Serialize>(value: &T) -> Result<ModelObject> {
    match serde_json::to_value(value)? {
        JsonValue::Object(record) => Ok(record),
        other => Err(AppError::Serialization(<serde_json::Error as serde::ser::Error>::custom(
            format!("expected a JSON object, got {}", other),
        ))),
    }
}

/// Deserialize a logical record into a typed value
pub fn from_model_object<T: DeserializeOwned>(record: ModelObject) -> Result<T> {
    Ok(serde_json::from_value(JsonValue::Object(record))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Column;
    use crate::port::MockSqlConnection;
    use mockall::Sequence;
    use serde::Deserialize;
    use serde_json::json;

    fn columns() -> Columns {
        Columns::new()
            .column("id", Column::new(DataType::Integer).primary_key())
            .column("name", Column::new(DataType::Text))
            .column("active", Column::new(DataType::Boolean))
            .column("other", Column::new(DataType::Json))
    }

    fn object(value: JsonValue) -> ModelObject {
        value.as_object().cloned().unwrap()
    }

    fn repository(mock: MockSqlConnection) -> Repository {
        Repository::new(Arc::new(mock), "test", columns())
    }

    fn stored_row() -> StorageRecord {
        let mut row = StorageRecord::new();
        row.insert("id".to_string(), SqlValue::Integer(1));
        row.insert("name".to_string(), SqlValue::from("Daniel"));
        row.insert("active".to_string(), SqlValue::Integer(1));
        row.insert("other".to_string(), SqlValue::from(r#"{"p1":"asd"}"#));
        row
    }

    #[test]
    fn test_sanitize() {
        let repo = repository(MockSqlConnection::new());
        let record = object(json!({
            "id": 1,
            "name": "Daniel",
            "teste2": 3.5,
            "teste3": {"prop": 123},
            "abacaxi": "amarelo"
        }));

        assert_eq!(repo.sanitize(&record), object(json!({"id": 1, "name": "Daniel"})));
    }

    #[test]
    fn test_sanitize_keeps_every_schema_key_present() {
        let repo = repository(MockSqlConnection::new());
        let record = object(json!({"other": null, "active": false, "x": 1}));
        let sanitized = repo.sanitize(&record);

        assert!(sanitized.keys().all(|key| repo.columns().contains(key)));
        assert!(sanitized.contains_key("other"));
        assert!(sanitized.contains_key("active"));
    }

    #[test]
    fn test_assemble_applies_defaults() {
        let columns = Columns::new()
            .column("id", Column::new(DataType::Integer).primary_key())
            .column("nome", Column::new(DataType::Text))
            .column("email", Column::new(DataType::Text))
            .column("active", Column::new(DataType::Boolean))
            .column(
                "timestamp",
                Column::new(DataType::Datetime).default_value("123456"),
            )
            .column(
                "slug",
                Column::new(DataType::Text).default_with(|record| {
                    json!(record["nome"].as_str().unwrap_or("").to_lowercase())
                }),
            );
        let repo = Repository::new(Arc::new(MockSqlConnection::new()), "tmp", columns);

        let assembled = repo.assemble(&object(json!({
            "nome": "Daniel",
            "email": "",
            "active": false,
            "id": 1
        })));

        assert_eq!(
            assembled,
            object(json!({
                "id": 1,
                "nome": "Daniel",
                "email": "",
                "active": false,
                "timestamp": "123456",
                "slug": "daniel"
            }))
        );
        let keys: Vec<&str> = assembled.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "nome", "email", "active", "timestamp", "slug"]);
    }

    #[test]
    fn test_assemble_fills_null_without_default() {
        let repo = repository(MockSqlConnection::new());
        let assembled = repo.assemble(&ModelObject::new());
        assert_eq!(
            assembled,
            object(json!({"id": null, "name": null, "active": null, "other": null}))
        );
    }

    #[tokio::test]
    async fn test_insert_sanitizes_coerces_and_reads_back() {
        let mut seq = Sequence::new();
        let mut mock = MockSqlConnection::new();
        mock.expect_execute_batch()
            .withf(|statements| {
                statements[0].sql == "INSERT INTO test (id, name, other) VALUES (?, ?, ?);"
                    && statements[0].params
                        == vec![
                            SqlValue::Integer(1),
                            SqlValue::from("Daniel"),
                            SqlValue::from(r#"{"p1":"asd"}"#),
                        ]
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Ok(vec![ResultSet {
                    rows_affected: 1,
                    last_insert_id: Some(1),
                    ..Default::default()
                }])
            });
        mock.expect_execute_batch()
            .withf(|statements| statements[0].params == vec![SqlValue::Integer(1)])
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec![ResultSet::with_rows(vec![stored_row()])]));

        let record = object(json!({
            "id": 1,
            "name": "Daniel",
            "email": "test@test.com",
            "other": {"p1": "asd"}
        }));

        let inserted = repository(mock).insert(&record).await.unwrap().unwrap();
        assert_eq!(
            inserted,
            object(json!({"id": 1, "name": "Daniel", "active": true, "other": {"p1": "asd"}}))
        );
    }

    #[tokio::test]
    async fn test_update_separates_primary_key() {
        let mut mock = MockSqlConnection::new();
        mock.expect_execute_batch()
            .withf(|statements| {
                statements[0].sql == "UPDATE test SET name = ?, active = ? WHERE id = ?;"
                    && statements[0].params
                        == vec![SqlValue::from("Daniel"), SqlValue::Integer(0), SqlValue::Integer(1)]
            })
            .times(1)
            .returning(|_| {
                Ok(vec![ResultSet {
                    rows_affected: 1,
                    ..Default::default()
                }])
            });

        let update = UpdateObject::new(
            1,
            object(json!({"id": 99, "name": "Daniel", "active": false, "email": "test@test.com"})),
        );
        let result = repository(mock).update(update).await.unwrap();
        assert_eq!(result.rows_affected, 1);
    }

    #[tokio::test]
    async fn test_update_without_properties_skips_engine() {
        let mut mock = MockSqlConnection::new();
        mock.expect_execute_batch().times(0);

        let update = UpdateObject::new(1, object(json!({"email": "test@test.com"})));
        let result = repository(mock).update(update).await.unwrap();
        assert_eq!(result, ResultSet::default());
    }

    #[tokio::test]
    async fn test_find_found() {
        let mut mock = MockSqlConnection::new();
        mock.expect_execute_batch()
            .withf(|statements| statements[0].params == vec![SqlValue::Integer(999)])
            .times(1)
            .returning(|_| {
                let mut row = StorageRecord::new();
                row.insert("id".to_string(), SqlValue::Integer(999));
                Ok(vec![ResultSet::with_rows(vec![row])])
            });

        let found = repository(mock).find(999).await.unwrap();
        assert_eq!(found, Some(object(json!({"id": 999}))));
    }

    #[tokio::test]
    async fn test_find_not_found_is_none() {
        let mut mock = MockSqlConnection::new();
        mock.expect_execute_batch()
            .times(1)
            .returning(|_| Ok(vec![ResultSet::default()]));

        assert_eq!(repository(mock).find(1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_find_by() {
        let mut mock = MockSqlConnection::new();
        mock.expect_execute_batch()
            .withf(|statements| statements[0].sql.contains("WHERE name = ?"))
            .times(1)
            .returning(|_| Ok(vec![ResultSet::with_rows(vec![stored_row()])]));

        let mut filter = Where::new();
        filter.insert("name_eq".to_string(), SqlValue::from("Daniel"));

        let found = repository(mock).find_by(&filter).await.unwrap().unwrap();
        assert_eq!(found["active"], json!(true));
    }

    #[tokio::test]
    async fn test_find_by_not_found_is_none() {
        let mut mock = MockSqlConnection::new();
        mock.expect_execute_batch()
            .times(1)
            .returning(|_| Ok(vec![ResultSet::default()]));

        assert_eq!(repository(mock).find_by(&Where::new()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_query_coerces_each_row_in_order() {
        let mut mock = MockSqlConnection::new();
        mock.expect_execute_batch().times(1).returning(|_| {
            let rows = [2, 3]
                .into_iter()
                .map(|id| {
                    let mut row = StorageRecord::new();
                    row.insert("id".to_string(), SqlValue::Integer(id));
                    row.insert("active".to_string(), SqlValue::Integer(id % 2));
                    row
                })
                .collect();
            Ok(vec![ResultSet::with_rows(rows)])
        });

        let options = QueryOptions::new().filter_by("status_eq", "ativo");
        let rows = repository(mock).query(&options).await.unwrap();
        assert_eq!(
            rows,
            vec![
                object(json!({"id": 2, "active": false})),
                object(json!({"id": 3, "active": true})),
            ]
        );
    }

    #[tokio::test]
    async fn test_query_empty() {
        let mut mock = MockSqlConnection::new();
        mock.expect_execute_batch()
            .times(1)
            .returning(|_| Ok(vec![ResultSet::default()]));

        let rows = repository(mock).query(&QueryOptions::default()).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_save_without_key_inserts() {
        let mut mock = MockSqlConnection::new();
        mock.expect_execute_batch()
            .withf(|statements| statements[0].sql.starts_with("INSERT INTO test"))
            .times(1)
            .returning(|_| {
                Ok(vec![ResultSet {
                    last_insert_id: Some(1),
                    ..Default::default()
                }])
            });
        mock.expect_execute_batch()
            .withf(|statements| statements[0].sql.starts_with("SELECT"))
            .times(1)
            .returning(|_| Ok(vec![ResultSet::with_rows(vec![stored_row()])]));

        let saved = repository(mock)
            .save(&object(json!({"name": "Daniel"})))
            .await
            .unwrap();
        assert_eq!(saved.unwrap()["id"], json!(1));
    }

    #[tokio::test]
    async fn test_save_with_key_updates() {
        let mut mock = MockSqlConnection::new();
        mock.expect_execute_batch()
            .withf(|statements| statements[0].sql == "UPDATE test SET name = ? WHERE id = ?;")
            .times(1)
            .returning(|_| Ok(vec![ResultSet::default()]));
        mock.expect_execute_batch()
            .withf(|statements| statements[0].sql.starts_with("SELECT"))
            .times(1)
            .returning(|_| Ok(vec![ResultSet::with_rows(vec![stored_row()])]));

        let saved = repository(mock)
            .save(&object(json!({"id": 1, "name": "Daniel"})))
            .await
            .unwrap();
        assert_eq!(saved.unwrap()["name"], json!("Daniel"));
    }

    fn coded_repository(mock: MockSqlConnection) -> Repository {
        let columns = Columns::new()
            .column("codigo", Column::new(DataType::Integer).primary_key())
            .column("nome", Column::new(DataType::Text));
        Repository::new(Arc::new(mock), "test", columns)
    }

    fn coded_row(codigo: i64, nome: &str) -> StorageRecord {
        let mut row = StorageRecord::new();
        row.insert("codigo".to_string(), SqlValue::Integer(codigo));
        row.insert("nome".to_string(), SqlValue::from(nome));
        row
    }

    #[tokio::test]
    async fn test_save_reads_back_by_named_primary_key() {
        let mut seq = Sequence::new();
        let mut mock = MockSqlConnection::new();
        mock.expect_execute_batch()
            .withf(|statements| statements[0].sql == "UPDATE test SET nome = ? WHERE codigo = ?;")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Ok(vec![ResultSet {
                    rows_affected: 1,
                    ..Default::default()
                }])
            });
        mock.expect_execute_batch()
            .withf(|statements| {
                statements[0].sql == "SELECT * FROM test WHERE codigo = ? LIMIT 1;"
                    && statements[0].params == vec![SqlValue::Integer(1)]
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec![ResultSet::with_rows(vec![coded_row(1, "b")])]));

        let saved = coded_repository(mock)
            .save(&object(json!({"codigo": 1, "nome": "b"})))
            .await
            .unwrap();
        assert_eq!(saved, Some(object(json!({"codigo": 1, "nome": "b"}))));
    }

    #[tokio::test]
    async fn test_insert_reads_back_by_rowid_and_destroys_by_named_key() {
        let mut seq = Sequence::new();
        let mut mock = MockSqlConnection::new();
        mock.expect_execute_batch()
            .withf(|statements| statements[0].sql == "INSERT INTO test (nome) VALUES (?);")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Ok(vec![ResultSet {
                    rows_affected: 1,
                    last_insert_id: Some(2),
                    ..Default::default()
                }])
            });
        mock.expect_execute_batch()
            .withf(|statements| statements[0].sql == "SELECT * FROM test WHERE rowid = ? LIMIT 1;")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec![ResultSet::with_rows(vec![coded_row(2, "c")])]));
        mock.expect_execute_batch()
            .withf(|statements| statements[0].sql == "DELETE FROM test WHERE codigo = ?;")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec![ResultSet::default()]));

        let repo = coded_repository(mock);
        let inserted = repo.insert(&object(json!({"nome": "c"}))).await.unwrap();
        assert_eq!(inserted, Some(object(json!({"codigo": 2, "nome": "c"}))));
        assert!(repo.destroy(2).await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_keeps_caller_key_order_with_defaults_last() {
        let columns = Columns::new()
            .column("id", Column::new(DataType::Integer).primary_key())
            .column("active", Column::new(DataType::Boolean).default_value(true))
            .column("name", Column::new(DataType::Text));
        let mut seq = Sequence::new();
        let mut mock = MockSqlConnection::new();
        mock.expect_execute_batch()
            .withf(|statements| {
                statements[0].sql == "INSERT INTO test (name, id, active) VALUES (?, ?, ?);"
                    && statements[0].params
                        == vec![SqlValue::from("Ana"), SqlValue::Integer(5), SqlValue::Integer(1)]
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Ok(vec![ResultSet {
                    rows_affected: 1,
                    last_insert_id: Some(5),
                    ..Default::default()
                }])
            });
        mock.expect_execute_batch()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec![ResultSet::default()]));

        let repo = Repository::new(Arc::new(mock), "test", columns);
        let inserted = repo
            .insert(&object(json!({"name": "Ana", "id": 5})))
            .await
            .unwrap();
        assert_eq!(inserted, None);
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Person {
        id: i64,
        name: String,
        active: bool,
    }

    #[tokio::test]
    async fn test_find_as_deserializes_record() {
        let mut mock = MockSqlConnection::new();
        mock.expect_execute_batch()
            .returning(|_| Ok(vec![ResultSet::with_rows(vec![stored_row()])]));

        let person: Person = repository(mock).find_as(1).await.unwrap().unwrap();
        assert_eq!(
            person,
            Person {
                id: 1,
                name: "Daniel".to_string(),
                active: true,
            }
        );
    }

    #[test]
    fn test_to_model_object_requires_object() {
        assert!(to_model_object(&json!([1, 2])).is_err());
        assert_eq!(
            to_model_object(&json!({"id": 1})).unwrap(),
            object(json!({"id": 1}))
        );
    }
}
