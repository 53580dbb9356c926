//! ANSI `INFORMATION_SCHEMA` queries.
//!
//! The standard views have no index metadata, so `INDEXES` is left
//! unregistered and the index step contributes nothing.

use super::InformationSchemaKey;

pub(super) const TEMPLATES: &[(InformationSchemaKey, &str)] = &[
    (
        InformationSchemaKey::Schemata,
        "SELECT CATALOG_NAME, SCHEMA_NAME \
         FROM INFORMATION_SCHEMA.SCHEMATA \
         ORDER BY CATALOG_NAME, SCHEMA_NAME",
    ),
    (
        InformationSchemaKey::Tables,
        "SELECT TABLE_CATALOG, TABLE_SCHEMA, TABLE_NAME, \
         CASE TABLE_TYPE WHEN 'VIEW' THEN 'VIEW' ELSE 'TABLE' END AS TABLE_TYPE, \
         NULL AS REMARKS \
         FROM INFORMATION_SCHEMA.TABLES \
         WHERE TABLE_SCHEMA = :schema \
         ORDER BY TABLE_NAME",
    ),
    (
        InformationSchemaKey::TableColumns,
        "SELECT TABLE_CATALOG, TABLE_SCHEMA, TABLE_NAME, COLUMN_NAME, ORDINAL_POSITION, \
         DATA_TYPE, IS_NULLABLE, COLUMN_DEFAULT, NULL AS REMARKS \
         FROM INFORMATION_SCHEMA.COLUMNS \
         WHERE TABLE_SCHEMA = :schema AND TABLE_NAME = :table \
         ORDER BY ORDINAL_POSITION",
    ),
    (
        InformationSchemaKey::PrimaryKeys,
        "SELECT TC.TABLE_CATALOG, TC.TABLE_SCHEMA, TC.TABLE_NAME, TC.CONSTRAINT_NAME, \
         KCU.COLUMN_NAME, KCU.ORDINAL_POSITION AS KEY_SEQ \
         FROM INFORMATION_SCHEMA.TABLE_CONSTRAINTS TC \
         JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE KCU \
         ON KCU.CONSTRAINT_SCHEMA = TC.CONSTRAINT_SCHEMA AND KCU.CONSTRAINT_NAME = TC.CONSTRAINT_NAME \
         WHERE TC.TABLE_SCHEMA = :schema AND TC.CONSTRAINT_TYPE = 'PRIMARY KEY' \
         ORDER BY TC.TABLE_NAME, KCU.ORDINAL_POSITION",
    ),
    (
        InformationSchemaKey::ExtTables,
        "SELECT TABLE_CATALOG, TABLE_SCHEMA, TABLE_NAME, NULL AS REMARKS, \
         VIEW_DEFINITION AS TABLE_DEFINITION \
         FROM INFORMATION_SCHEMA.VIEWS \
         WHERE TABLE_SCHEMA = :schema",
    ),
    (
        InformationSchemaKey::ForeignKeys,
        "SELECT RC.CONSTRAINT_NAME AS FK_NAME, NULL AS FK_ID, \
         PK.TABLE_CATALOG AS PKTABLE_CATALOG, PK.TABLE_SCHEMA AS PKTABLE_SCHEMA, \
         PK.TABLE_NAME AS PKTABLE_NAME, PK.COLUMN_NAME AS PKCOLUMN_NAME, \
         FK.TABLE_CATALOG AS FKTABLE_CATALOG, FK.TABLE_SCHEMA AS FKTABLE_SCHEMA, \
         FK.TABLE_NAME AS FKTABLE_NAME, FK.COLUMN_NAME AS FKCOLUMN_NAME, \
         FK.ORDINAL_POSITION AS KEY_SEQ, RC.UPDATE_RULE, RC.DELETE_RULE \
         FROM INFORMATION_SCHEMA.REFERENTIAL_CONSTRAINTS RC \
         JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE FK \
         ON FK.CONSTRAINT_SCHEMA = RC.CONSTRAINT_SCHEMA AND FK.CONSTRAINT_NAME = RC.CONSTRAINT_NAME \
         JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE PK \
         ON PK.CONSTRAINT_SCHEMA = RC.UNIQUE_CONSTRAINT_SCHEMA \
         AND PK.CONSTRAINT_NAME = RC.UNIQUE_CONSTRAINT_NAME \
         AND PK.ORDINAL_POSITION = FK.POSITION_IN_UNIQUE_CONSTRAINT \
         WHERE FK.TABLE_SCHEMA = :schema \
         ORDER BY RC.CONSTRAINT_NAME, FK.ORDINAL_POSITION",
    ),
    (
        InformationSchemaKey::Routines,
        "SELECT ROUTINE_CATALOG, ROUTINE_SCHEMA, ROUTINE_NAME, ROUTINE_TYPE, \
         ROUTINE_DEFINITION \
         FROM INFORMATION_SCHEMA.ROUTINES \
         WHERE ROUTINE_SCHEMA = :schema",
    ),
];
