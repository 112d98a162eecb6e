use core_types::Backend;

/// Logical column types, mapped to a concrete SQL type per backend.
///
/// Timestamps are stored as sortable UTC text in `TIME_FORMAT`; the `Any`
/// driver only carries scalar parameters, and lexicographic order on that
/// format matches chronological order, so range comparisons stay correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Id,
    BigInt,
    Real,
    Text,
    Boolean,
    Timestamp,
}

impl ColumnType {
    pub fn sql_type(&self, backend: Backend) -> &'static str {
        match self {
            ColumnType::Id => match backend {
                Backend::Sqlite => "INTEGER PRIMARY KEY AUTOINCREMENT",
                Backend::Mysql => "BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY",
                Backend::Postgres => "BIGSERIAL PRIMARY KEY",
                Backend::Mssql => "BIGINT IDENTITY(1,1) PRIMARY KEY",
            },
            ColumnType::BigInt => "BIGINT",
            ColumnType::Real => match backend {
                Backend::Mysql => "DOUBLE",
                Backend::Mssql => "FLOAT",
                _ => "DOUBLE PRECISION",
            },
            ColumnType::Text => match backend {
                Backend::Mssql => "NVARCHAR(MAX)",
                _ => "TEXT",
            },
            ColumnType::Boolean => match backend {
                Backend::Mssql => "BIT",
                _ => "BOOLEAN",
            },
            ColumnType::Timestamp => match backend {
                Backend::Mysql => "VARCHAR(32)",
                Backend::Mssql => "NVARCHAR(32)",
                _ => "TEXT",
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub ty: ColumnType,
}

const fn col(name: &'static str, ty: ColumnType) -> ColumnSpec {
    ColumnSpec { name, ty }
}

/// An entity kind that must have a corresponding table.
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    pub name: &'static str,
    pub columns: &'static [ColumnSpec],
}

/// The ordered set of entity-kind descriptors requiring schema objects.
/// Every member must migrate successfully or the whole migration aborts.
pub const MODEL_REGISTRY: &[TableSpec] = &[
    TableSpec {
        name: "monitors",
        columns: &[
            col("id", ColumnType::Id),
            col("name", ColumnType::Text),
            col("domain", ColumnType::Text),
            col("check_interval", ColumnType::BigInt),
            col("created_at", ColumnType::Timestamp),
            col("updated_at", ColumnType::Timestamp),
        ],
    },
    TableSpec {
        name: "accounts",
        columns: &[
            col("id", ColumnType::Id),
            col("username", ColumnType::Text),
            col("email", ColumnType::Text),
            col("admin", ColumnType::Boolean),
            col("created_at", ColumnType::Timestamp),
            col("updated_at", ColumnType::Timestamp),
        ],
    },
    TableSpec {
        name: "hits",
        columns: &[
            col("id", ColumnType::Id),
            col("monitor_id", ColumnType::BigInt),
            col("latency", ColumnType::Real),
            col("created_at", ColumnType::Timestamp),
        ],
    },
    TableSpec {
        name: "failures",
        columns: &[
            col("id", ColumnType::Id),
            col("monitor_id", ColumnType::BigInt),
            col("issue", ColumnType::Text),
            col("created_at", ColumnType::Timestamp),
        ],
    },
    TableSpec {
        name: "messages",
        columns: &[
            col("id", ColumnType::Id),
            col("title", ColumnType::Text),
            col("description", ColumnType::Text),
            col("monitor_id", ColumnType::BigInt),
            col("start_on", ColumnType::Timestamp),
            col("end_on", ColumnType::Timestamp),
            col("created_at", ColumnType::Timestamp),
            col("updated_at", ColumnType::Timestamp),
        ],
    },
    TableSpec {
        name: "groups",
        columns: &[
            col("id", ColumnType::Id),
            col("name", ColumnType::Text),
            col("public", ColumnType::Boolean),
            col("created_at", ColumnType::Timestamp),
            col("updated_at", ColumnType::Timestamp),
        ],
    },
    TableSpec {
        // "interval" is a reserved word on some backends, hence report_interval.
        name: "checkins",
        columns: &[
            col("id", ColumnType::Id),
            col("monitor_id", ColumnType::BigInt),
            col("report_interval", ColumnType::BigInt),
            col("api_key", ColumnType::Text),
            col("created_at", ColumnType::Timestamp),
            col("updated_at", ColumnType::Timestamp),
        ],
    },
    TableSpec {
        name: "checkin_hits",
        columns: &[
            col("id", ColumnType::Id),
            col("checkin_id", ColumnType::BigInt),
            col("from_ip", ColumnType::Text),
            col("created_at", ColumnType::Timestamp),
        ],
    },
    TableSpec {
        name: "notifications",
        columns: &[
            col("id", ColumnType::Id),
            col("method", ColumnType::Text),
            col("host", ColumnType::Text),
            col("port", ColumnType::BigInt),
            col("username", ColumnType::Text),
            col("password", ColumnType::Text),
            col("api_key", ColumnType::Text),
            col("api_secret", ColumnType::Text),
            col("enabled", ColumnType::Boolean),
            col("limits", ColumnType::BigInt),
            col("created_at", ColumnType::Timestamp),
            col("updated_at", ColumnType::Timestamp),
        ],
    },
    TableSpec {
        name: "incidents",
        columns: &[
            col("id", ColumnType::Id),
            col("title", ColumnType::Text),
            col("description", ColumnType::Text),
            col("monitor_id", ColumnType::BigInt),
            col("created_at", ColumnType::Timestamp),
            col("updated_at", ColumnType::Timestamp),
        ],
    },
    TableSpec {
        name: "incident_updates",
        columns: &[
            col("id", ColumnType::Id),
            col("incident_id", ColumnType::BigInt),
            col("message", ColumnType::Text),
            col("update_type", ColumnType::Text),
            col("created_at", ColumnType::Timestamp),
            col("updated_at", ColumnType::Timestamp),
        ],
    },
];

/// The singleton settings table. It sits outside the model registry but is
/// created, migrated and dropped alongside it.
pub const CORE_TABLE: TableSpec = TableSpec {
    name: "core",
    columns: &[
        col("name", ColumnType::Text),
        col("description", ColumnType::Text),
        col("config", ColumnType::Text),
        col("api_key", ColumnType::Text),
        col("api_secret", ColumnType::Text),
        col("domain", ColumnType::Text),
        col("timezone", ColumnType::Real),
        col("migration_id", ColumnType::BigInt),
        col("created_at", ColumnType::Timestamp),
        col("updated_at", ColumnType::Timestamp),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_covers_every_entity_kind_in_order() {
        let names: Vec<_> = MODEL_REGISTRY.iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            [
                "monitors",
                "accounts",
                "hits",
                "failures",
                "messages",
                "groups",
                "checkins",
                "checkin_hits",
                "notifications",
                "incidents",
                "incident_updates",
            ]
        );
    }

    #[test]
    fn checkins_store_their_interval_under_the_schema_name() {
        let checkins = MODEL_REGISTRY.iter().find(|t| t.name == "checkins").unwrap();
        assert!(checkins.columns.iter().any(|c| c.name == "report_interval"));
    }

    #[test]
    fn every_table_stores_a_creation_timestamp() {
        for table in MODEL_REGISTRY {
            assert!(
                table.columns.iter().any(|c| c.name == "created_at"),
                "{} has no created_at column",
                table.name
            );
        }
    }

    #[test]
    fn id_columns_map_to_backend_specific_ddl() {
        assert_eq!(
            ColumnType::Id.sql_type(Backend::Sqlite),
            "INTEGER PRIMARY KEY AUTOINCREMENT"
        );
        assert_eq!(ColumnType::Id.sql_type(Backend::Postgres), "BIGSERIAL PRIMARY KEY");
        assert!(ColumnType::Id.sql_type(Backend::Mysql).contains("AUTO_INCREMENT"));
        assert!(ColumnType::Id.sql_type(Backend::Mssql).contains("IDENTITY"));
    }
}
