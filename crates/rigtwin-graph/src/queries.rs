//! Read operations for the asset graph.

use neo4rs::query;

use crate::client::{GraphClient, GraphError};
use crate::cypher::validate_ident;

impl GraphClient {
    /// Check whether an equipment node with the given Description exists.
    ///
    /// Read-only: the parameter attacher uses this as its precondition and
    /// never creates equipment itself.
    pub async fn equipment_exists(&self, description: &str) -> Result<bool, GraphError> {
        let q = query("MATCH (e:EQUI {Description: $description}) RETURN e LIMIT 1")
            .param("description", description);

        Ok(self.query_one(q).await?.is_some())
    }

    /// Count nodes carrying the given label.
    pub async fn count_nodes(&self, label: &str) -> Result<i64, GraphError> {
        validate_ident("label", label)?;
        let cypher = format!("MATCH (n:{label}) RETURN count(n) AS cnt");

        match self.query_one(query(&cypher)).await? {
            Some(row) => Ok(row.get::<i64>("cnt").unwrap_or(0)),
            None => Ok(0),
        }
    }

    /// Count relationships of the given type.
    pub async fn count_relationships(&self, relationship_type: &str) -> Result<i64, GraphError> {
        validate_ident("relationship type", relationship_type)?;
        let cypher = format!("MATCH ()-[r:{relationship_type}]->() RETURN count(r) AS cnt");

        match self.query_one(query(&cypher)).await? {
            Some(row) => Ok(row.get::<i64>("cnt").unwrap_or(0)),
            None => Ok(0),
        }
    }
}
