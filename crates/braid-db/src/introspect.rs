//! Relation introspection used for schema snapshots.
//!
//! DuckDB keeps the `CREATE` statement of every sequence, table, index and
//! view in its `duckdb_*()` catalog functions, so a snapshot is the list of
//! those statements and replaying them in dependency order rebuilds the
//! structure. Macros only expose their body, so their statement is assembled
//! from the parameter list.

use crate::error::{DbError, DbResult};
use duckdb::Connection;
use serde::{Deserialize, Serialize};

/// Catalog object type, in replay order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    Sequence,
    Table,
    Macro,
    Index,
    View,
}

/// A catalog object together with the DDL that recreates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDdl {
    pub schema: String,
    pub name: String,
    pub kind: RelationKind,
    pub sql: String,
}

// Each query yields (schema, name, owning table, sql).

const SEQUENCES_SQL: &str = "SELECT schema_name, sequence_name, NULL::VARCHAR, sql \
     FROM duckdb_sequences() \
     WHERE NOT temporary AND database_name = current_database() \
     ORDER BY sequence_oid";

const TABLES_SQL: &str = "SELECT schema_name, table_name, table_name, sql FROM duckdb_tables() \
     WHERE NOT internal AND NOT temporary AND database_name = current_database() \
     ORDER BY table_oid";

const MACROS_SQL: &str = "SELECT schema_name, function_name, NULL::VARCHAR, \
     'CREATE MACRO \"' || schema_name || '\".\"' || function_name || '\"(' \
     || array_to_string(parameters, ', ') || ') AS ' \
     || CASE WHEN function_type = 'table_macro' THEN 'TABLE ' ELSE '' END \
     || macro_definition || ';' \
     FROM duckdb_functions() \
     WHERE function_type IN ('macro', 'table_macro') AND NOT internal \
     AND database_name = current_database() \
     QUALIFY row_number() OVER (PARTITION BY schema_name, function_name ORDER BY function_oid) = 1 \
     ORDER BY function_oid";

const INDEXES_SQL: &str = "SELECT schema_name, index_name, table_name, sql FROM duckdb_indexes() \
     WHERE database_name = current_database() \
     ORDER BY index_oid";

const VIEWS_SQL: &str = "SELECT schema_name, view_name, NULL::VARCHAR, sql FROM duckdb_views() \
     WHERE NOT internal AND NOT temporary AND database_name = current_database() \
     ORDER BY view_oid";

const SCHEMAS_SQL: &str = "SELECT schema_name FROM duckdb_schemas() \
     WHERE NOT internal AND database_name = current_database() AND schema_name <> 'main' \
     ORDER BY schema_name";

fn query_relations(
    conn: &Connection,
    sql: &str,
    kind: RelationKind,
    exclude: &[&str],
) -> DbResult<Vec<RelationDdl>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, Option<String>>(2)?,
            row.get::<_, Option<String>>(3)?,
        ))
    })?;

    let mut relations = Vec::new();
    for row in rows {
        let (schema, name, table, sql) = row?;
        if schema == "main" && table.is_some_and(|t| exclude.contains(&t.as_str())) {
            continue;
        }
        let Some(sql) = sql else {
            log::debug!("Skipping {schema}.{name}: no stored DDL");
            continue;
        };
        relations.push(RelationDdl {
            schema,
            name,
            kind,
            sql,
        });
    }
    Ok(relations)
}

/// User schemas other than `main`.
pub fn list_schemas(conn: &Connection) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare(SCHEMAS_SQL)?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
}

/// Sequences, tables, macros, indexes then views, each in creation order.
///
/// Tables in `main` whose name is listed in `exclude` are skipped together
/// with their indexes.
pub fn list_relations(conn: &Connection, exclude: &[&str]) -> DbResult<Vec<RelationDdl>> {
    let mut relations = Vec::new();
    for (sql, kind) in [
        (SEQUENCES_SQL, RelationKind::Sequence),
        (TABLES_SQL, RelationKind::Table),
        (MACROS_SQL, RelationKind::Macro),
        (INDEXES_SQL, RelationKind::Index),
        (VIEWS_SQL, RelationKind::View),
    ] {
        relations.extend(query_relations(conn, sql, kind, exclude)?);
    }
    Ok(relations)
}

/// Recreate schemas and relations captured by [`list_schemas`] and
/// [`list_relations`].
pub fn apply_relations(
    conn: &Connection,
    schemas: &[String],
    relations: &[RelationDdl],
) -> DbResult<()> {
    for schema in schemas {
        conn.execute_batch(&format!("CREATE SCHEMA IF NOT EXISTS \"{schema}\";"))
            .map_err(|e| DbError::ExecutionError(format!("create schema {schema}: {e}")))?;
    }
    let mut ordered: Vec<&RelationDdl> = relations.iter().collect();
    ordered.sort_by_key(|r| r.kind);
    for relation in ordered {
        conn.execute_batch(&relation.sql).map_err(|e| {
            DbError::ExecutionError(format!(
                "recreate {}.{}: {e}",
                relation.schema, relation.name
            ))
        })?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "introspect_test.rs"]
mod tests;
