//! Oracle data dictionary queries.
//!
//! Uses the `ALL_*` views so the crawl sees whatever the connected user can
//! see. Schemas are Oracle users; there is no catalog level.

use super::InformationSchemaKey;

pub(super) const TEMPLATES: &[(InformationSchemaKey, &str)] = &[
    (
        InformationSchemaKey::Schemata,
        "SELECT NULL AS CATALOG_NAME, USERNAME AS SCHEMA_NAME \
         FROM ALL_USERS \
         ORDER BY USERNAME",
    ),
    (
        InformationSchemaKey::Tables,
        "SELECT NULL AS TABLE_CATALOG, T.OWNER AS TABLE_SCHEMA, T.TABLE_NAME, \
         T.TABLE_TYPE, C.COMMENTS AS REMARKS \
         FROM ALL_CATALOG T \
         LEFT JOIN ALL_TAB_COMMENTS C \
         ON C.OWNER = T.OWNER AND C.TABLE_NAME = T.TABLE_NAME \
         WHERE T.OWNER = :schema AND T.TABLE_TYPE IN ('TABLE', 'VIEW') \
         ORDER BY T.TABLE_NAME",
    ),
    (
        InformationSchemaKey::TableColumns,
        "SELECT NULL AS TABLE_CATALOG, C.OWNER AS TABLE_SCHEMA, C.TABLE_NAME, \
         C.COLUMN_NAME, C.COLUMN_ID AS ORDINAL_POSITION, C.DATA_TYPE, \
         CASE C.NULLABLE WHEN 'Y' THEN 'YES' ELSE 'NO' END AS IS_NULLABLE, \
         C.DATA_DEFAULT AS COLUMN_DEFAULT, M.COMMENTS AS REMARKS \
         FROM ALL_TAB_COLUMNS C \
         LEFT JOIN ALL_COL_COMMENTS M \
         ON M.OWNER = C.OWNER AND M.TABLE_NAME = C.TABLE_NAME AND M.COLUMN_NAME = C.COLUMN_NAME \
         WHERE C.OWNER = :schema AND C.TABLE_NAME = :table \
         ORDER BY C.COLUMN_ID",
    ),
    (
        InformationSchemaKey::Indexes,
        "SELECT NULL AS TABLE_CATALOG, I.TABLE_OWNER AS TABLE_SCHEMA, I.TABLE_NAME, \
         I.INDEX_NAME, CASE I.UNIQUENESS WHEN 'UNIQUE' THEN 1 ELSE 0 END AS IS_UNIQUE, \
         IC.COLUMN_NAME, IC.COLUMN_POSITION AS ORDINAL_POSITION, \
         CASE IC.DESCEND WHEN 'DESC' THEN 1 ELSE 0 END AS IS_DESCENDING \
         FROM ALL_INDEXES I \
         JOIN ALL_IND_COLUMNS IC ON IC.INDEX_OWNER = I.OWNER AND IC.INDEX_NAME = I.INDEX_NAME \
         WHERE I.TABLE_OWNER = :schema \
         ORDER BY I.TABLE_NAME, I.INDEX_NAME, IC.COLUMN_POSITION",
    ),
    (
        InformationSchemaKey::PrimaryKeys,
        "SELECT NULL AS TABLE_CATALOG, C.OWNER AS TABLE_SCHEMA, C.TABLE_NAME, \
         C.CONSTRAINT_NAME, CC.COLUMN_NAME, CC.POSITION AS KEY_SEQ \
         FROM ALL_CONSTRAINTS C \
         JOIN ALL_CONS_COLUMNS CC ON CC.OWNER = C.OWNER AND CC.CONSTRAINT_NAME = C.CONSTRAINT_NAME \
         WHERE C.OWNER = :schema AND C.CONSTRAINT_TYPE = 'P' \
         ORDER BY C.TABLE_NAME, CC.POSITION",
    ),
    (
        InformationSchemaKey::ExtTables,
        "SELECT NULL AS TABLE_CATALOG, OWNER AS TABLE_SCHEMA, VIEW_NAME AS TABLE_NAME, \
         NULL AS REMARKS, TEXT_VC AS TABLE_DEFINITION \
         FROM ALL_VIEWS \
         WHERE OWNER = :schema",
    ),
    (
        InformationSchemaKey::ExtIndexColumns,
        "SELECT NULL AS INDEX_CATALOG, E.INDEX_OWNER AS INDEX_SCHEMA, E.TABLE_NAME, \
         E.INDEX_NAME, IC.COLUMN_NAME, 1 AS IS_GENERATED, \
         E.COLUMN_EXPRESSION AS INDEX_COLUMN_DEFINITION \
         FROM ALL_IND_EXPRESSIONS E \
         JOIN ALL_IND_COLUMNS IC ON IC.INDEX_OWNER = E.INDEX_OWNER \
         AND IC.INDEX_NAME = E.INDEX_NAME AND IC.COLUMN_POSITION = E.COLUMN_POSITION \
         WHERE E.INDEX_OWNER = :schema",
    ),
    (
        InformationSchemaKey::ForeignKeys,
        "SELECT FK.CONSTRAINT_NAME AS FK_NAME, NULL AS FK_ID, \
         NULL AS PKTABLE_CATALOG, PK.OWNER AS PKTABLE_SCHEMA, PK.TABLE_NAME AS PKTABLE_NAME, \
         PKC.COLUMN_NAME AS PKCOLUMN_NAME, \
         NULL AS FKTABLE_CATALOG, FK.OWNER AS FKTABLE_SCHEMA, FK.TABLE_NAME AS FKTABLE_NAME, \
         FKC.COLUMN_NAME AS FKCOLUMN_NAME, FKC.POSITION AS KEY_SEQ, \
         'NO ACTION' AS UPDATE_RULE, FK.DELETE_RULE \
         FROM ALL_CONSTRAINTS FK \
         JOIN ALL_CONSTRAINTS PK ON PK.OWNER = FK.R_OWNER AND PK.CONSTRAINT_NAME = FK.R_CONSTRAINT_NAME \
         JOIN ALL_CONS_COLUMNS FKC ON FKC.OWNER = FK.OWNER AND FKC.CONSTRAINT_NAME = FK.CONSTRAINT_NAME \
         JOIN ALL_CONS_COLUMNS PKC ON PKC.OWNER = PK.OWNER AND PKC.CONSTRAINT_NAME = PK.CONSTRAINT_NAME \
         AND PKC.POSITION = FKC.POSITION \
         WHERE FK.OWNER = :schema AND FK.CONSTRAINT_TYPE = 'R' \
         ORDER BY FK.CONSTRAINT_NAME, FKC.POSITION",
    ),
    (
        InformationSchemaKey::Routines,
        "SELECT NULL AS ROUTINE_CATALOG, OWNER AS ROUTINE_SCHEMA, OBJECT_NAME AS ROUTINE_NAME, \
         OBJECT_TYPE AS ROUTINE_TYPE, NULL AS ROUTINE_DEFINITION \
         FROM ALL_OBJECTS \
         WHERE OWNER = :schema AND OBJECT_TYPE IN ('PROCEDURE', 'FUNCTION')",
    ),
];
