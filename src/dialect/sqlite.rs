//! SQLite metadata queries.
//!
//! SQLite has no information schema; everything comes from the pragma
//! table-valued functions. Attached databases show up as schemas. There is
//! nowhere to keep index remarks, so the extension queries are left
//! unregistered.

use super::InformationSchemaKey;

pub(super) const TEMPLATES: &[(InformationSchemaKey, &str)] = &[
    (
        InformationSchemaKey::Schemata,
        "SELECT NULL AS CATALOG_NAME, name AS SCHEMA_NAME \
         FROM pragma_database_list \
         ORDER BY seq",
    ),
    (
        InformationSchemaKey::Tables,
        "SELECT NULL AS TABLE_CATALOG, t.schema AS TABLE_SCHEMA, t.name AS TABLE_NAME, \
         CASE t.type WHEN 'view' THEN 'VIEW' ELSE 'TABLE' END AS TABLE_TYPE, \
         NULL AS REMARKS \
         FROM pragma_table_list AS t \
         WHERE t.schema = :schema \
         AND t.type IN ('table', 'view') \
         AND t.name NOT LIKE 'sqlite_%' \
         ORDER BY t.name",
    ),
    (
        InformationSchemaKey::TableColumns,
        "SELECT NULL AS TABLE_CATALOG, :schema AS TABLE_SCHEMA, :table AS TABLE_NAME, \
         c.name AS COLUMN_NAME, c.cid + 1 AS ORDINAL_POSITION, c.type AS DATA_TYPE, \
         CASE c.\"notnull\" WHEN 0 THEN 'YES' ELSE 'NO' END AS IS_NULLABLE, \
         c.dflt_value AS COLUMN_DEFAULT, NULL AS REMARKS \
         FROM pragma_table_info(:table, :schema) AS c \
         ORDER BY c.cid",
    ),
    (
        InformationSchemaKey::Indexes,
        "SELECT NULL AS TABLE_CATALOG, :schema AS TABLE_SCHEMA, :table AS TABLE_NAME, \
         il.name AS INDEX_NAME, il.\"unique\" AS IS_UNIQUE, ic.name AS COLUMN_NAME, \
         ic.seqno + 1 AS ORDINAL_POSITION, ic.\"desc\" AS IS_DESCENDING \
         FROM pragma_index_list(:table, :schema) AS il \
         JOIN pragma_index_xinfo(il.name, :schema) AS ic \
         WHERE ic.key = 1 \
         ORDER BY il.name, ic.seqno",
    ),
    (
        InformationSchemaKey::PrimaryKeys,
        "SELECT NULL AS TABLE_CATALOG, :schema AS TABLE_SCHEMA, :table AS TABLE_NAME, \
         NULL AS CONSTRAINT_NAME, c.name AS COLUMN_NAME, c.pk AS KEY_SEQ \
         FROM pragma_table_info(:table, :schema) AS c \
         WHERE c.pk > 0 \
         ORDER BY c.pk",
    ),
    (
        InformationSchemaKey::ForeignKeys,
        "SELECT NULL AS FK_NAME, fk.id AS FK_ID, \
         NULL AS PKTABLE_CATALOG, :schema AS PKTABLE_SCHEMA, fk.\"table\" AS PKTABLE_NAME, \
         fk.\"to\" AS PKCOLUMN_NAME, \
         NULL AS FKTABLE_CATALOG, :schema AS FKTABLE_SCHEMA, :table AS FKTABLE_NAME, \
         fk.\"from\" AS FKCOLUMN_NAME, \
         fk.seq + 1 AS KEY_SEQ, fk.on_update AS UPDATE_RULE, fk.on_delete AS DELETE_RULE \
         FROM pragma_foreign_key_list(:table, :schema) AS fk \
         ORDER BY fk.id, fk.seq",
    ),
];
