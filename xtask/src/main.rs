// Copyright (C) 2024-2025 Fred Clausen and the ratatui project contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation
//!
//! Developer tasks for the Accademia workspace: linting, building,
//! testing and coverage wrap the usual cargo tooling.
//!
//! `cargo xtask verify-schema` applies the embedded `SQLite` migrations to
//! an in-memory database and checks the resulting tables, columns, keys
//! and unique constraints against what the persistence layer maps.
//! It needs no external services and runs as part of `cargo xtask ci`.

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::{fmt::Debug, io, process::Output, vec};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{
    Result,
    eyre::{Context, eyre},
};
use diesel::sql_types::{Integer, Text};
use diesel::{QueryableByName, RunQueryDsl, SqliteConnection};
use duct::cmd;
use std::collections::{BTreeMap, BTreeSet};
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, build, test, schema)
    CI,

    /// Build the project
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Generate code coverage report
    #[command(visible_alias = "cov")]
    Coverage,

    /// Check dependencies
    #[command(visible_alias = "cd")]
    Deny,

    // Check unused dependencies
    #[command(visible_alias = "m")]
    Machete,

    /// Lint formatting, typos, clippy, and docs
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy on the project
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Check documentation for errors and warnings
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check for formatting issues in the project
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Lint markdown files
    #[command(visible_alias = "md")]
    LintMarkdown,

    /// Check for typos in the project
    #[command(visible_alias = "lt")]
    LintTypos,

    /// Fix clippy warnings in the project
    #[command(visible_alias = "fc")]
    FixClippy,

    /// Fix formatting issues in the project
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Fix typos in the project
    #[command(visible_alias = "typos")]
    FixTypos,

    /// Run tests
    #[command(visible_alias = "t")]
    Test,

    /// Run doc tests
    #[command(visible_alias = "td")]
    TestDocs,

    /// Run lib tests
    #[command(visible_alias = "tl")]
    TestLibs,

    /// Check the migrated `SQLite` schema against the persistence mapping
    #[command(visible_alias = "vs")]
    VerifySchema,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => build(),
            Self::Check => check(),
            Self::Deny => deny(),
            Self::Machete => machete(),
            Self::Coverage => coverage(),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => lint_format(),
            Self::LintTypos => lint_typos(),
            Self::LintMarkdown => lint_markdown(),
            Self::FixClippy => fix_clippy(),
            Self::FixFormatting => fix_format(),
            Self::FixTypos => fix_typos(),
            Self::Test => test(),
            Self::TestDocs => test_docs(),
            Self::TestLibs => test_libs(),
            Self::VerifySchema => verify_schema(),
        }
    }
}

/// Run CI checks (lint, build, test, schema)
fn ci() -> Result<()> {
    lint()?;
    deny()?;
    machete()?;
    build()?;
    test()?;
    verify_schema()?;
    Ok(())
}

fn deny() -> Result<()> {
    run_cargo(vec!["deny", "check"])
}

fn machete() -> Result<()> {
    cmd!("cargo-machete").run_with_trace()?;
    Ok(())
}

/// Build the project
fn build() -> Result<()> {
    run_cargo(vec!["build", "--all-targets", "--all-features"])
}

/// Run cargo check
fn check() -> Result<()> {
    run_cargo(vec!["check", "--all-targets", "--all-features"])
}

/// Generate code coverage report
fn coverage() -> Result<()> {
    run_cargo(vec![
        "llvm-cov",
        "--lcov",
        "--output-path",
        "target/lcov.info",
        "--all-features",
    ])
}

/// Lint formatting, typos, clippy, and docs (and a soft fail on markdown)
fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    lint_format()?;
    lint_typos()?;
    if let Err(err) = lint_markdown() {
        tracing::warn!("markdownlint reported issues: {err}");
    }
    Ok(())
}

/// Run clippy on the project
fn lint_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

/// Fix clippy warnings in the project
fn fix_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--fix",
        "--allow-dirty",
        "--allow-staged",
        "--",
        "-D",
        "warnings",
    ])
}

/// Check that docs build without errors using docs.rs-equivalent flags
fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        cmd(
            "cargo",
            [
                "doc",
                "--no-deps",
                "--all-features",
                "--package",
                &package.name,
            ],
        )
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .env("RUSTDOCFLAGS", "--cfg docsrs -D warnings")
        .run_with_trace()?;
    }

    Ok(())
}

/// Lint formatting issues in the project
fn lint_format() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all", "--check"])
}

/// Fix formatting issues in the project
fn fix_format() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all"])
}

/// Lint markdown files using [markdownlint-cli2](https://github.com/DavidAnson/markdownlint-cli2)
fn lint_markdown() -> Result<()> {
    cmd!("markdownlint-cli2", "**/*.md", "!target", "!**/target").run_with_trace()?;
    Ok(())
}

/// Check for typos in the project using [typos-cli](https://github.com/crate-ci/typos/)
fn lint_typos() -> Result<()> {
    cmd!("typos").run_with_trace()?;
    Ok(())
}

/// Fix typos in the project
fn fix_typos() -> Result<()> {
    cmd!("typos", "-w").run_with_trace()?;
    Ok(())
}

/// Run tests for libs and docs
fn test() -> Result<()> {
    test_libs()?;
    test_docs()?; // run last because it's slow
    Ok(())
}

/// Run doc tests for the workspace's default packages
fn test_docs() -> Result<()> {
    run_cargo(vec!["test", "--doc", "--all-features"])
}

/// Run lib tests for the workspace's default packages
fn test_libs() -> Result<()> {
    run_cargo(vec!["test", "--all-targets", "--all-features"])
}

/// Run a cargo subcommand with the default toolchain
fn run_cargo(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// Run a cargo subcommand with the nightly toolchain
fn run_cargo_nightly(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args)
        // CARGO env var is set because we're running in a cargo subcommand
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .run_with_trace()?;
    Ok(())
}

// ========================================================================
// Schema verification
// ========================================================================

/// Columns every record table carries.
const RECORD_TIMESTAMPS: [(&str, &str, bool); 2] =
    [("created_at", "text", false), ("updated_at", "text", false)];

/// Expected columns per table as `(name, normalized type, nullable)`.
///
/// Record tables also carry [`RECORD_TIMESTAMPS`].
const EXPECTED_RECORD_TABLES: &[(&str, &[(&str, &str, bool)])] = &[
    (
        "categories",
        &[
            ("category_id", "integer", true),
            ("name", "text", false),
            ("color_hex", "text", false),
        ],
    ),
    (
        "courses",
        &[
            ("course_id", "integer", true),
            ("name", "text", false),
            ("category", "text", true),
            ("base_price", "real", false),
            ("additional_price", "real", false),
            ("weekly_hours", "real", false),
            ("lessons_json", "text", false),
        ],
    ),
    (
        "members",
        &[
            ("member_id", "integer", true),
            ("first_name", "text", false),
            ("last_name", "text", false),
            ("fiscal_code", "text", true),
            ("birth_date", "text", true),
            ("email", "text", true),
            ("phone", "text", true),
            ("base_course", "text", true),
            ("courses_json", "text", false),
            ("enrollment_fee", "real", false),
            ("monthly_fee", "real", false),
            ("quarterly_fee", "real", false),
            ("annual_fee", "real", false),
            ("exhibition_fee", "real", false),
            ("notes", "text", true),
        ],
    ),
    (
        "membership_types",
        &[
            ("membership_type_id", "integer", true),
            ("name", "text", false),
            ("value", "text", false),
        ],
    ),
    (
        "payments",
        &[
            ("payment_id", "integer", true),
            ("member_id", "integer", false),
            ("kind", "text", false),
            ("period_label", "text", false),
            ("amount", "real", false),
            ("paid_on", "text", false),
            ("method", "text", true),
            ("notes", "text", true),
        ],
    ),
    (
        "pricing_tiers",
        &[
            ("pricing_tier_id", "integer", true),
            ("position", "integer", false),
            ("tier_key", "text", false),
            ("description", "text", false),
            ("value", "text", false),
        ],
    ),
    (
        "rooms",
        &[
            ("room_id", "integer", true),
            ("name", "text", false),
            ("capacity", "integer", true),
        ],
    ),
    (
        "teachers",
        &[
            ("teacher_id", "integer", true),
            ("first_name", "text", false),
            ("last_name", "text", false),
            ("email", "text", true),
            ("phone", "text", true),
            ("disciplines_json", "text", false),
        ],
    ),
];

/// Tables without the record timestamp pair.
const EXPECTED_ACCESS_TABLES: &[(&str, &[(&str, &str, bool)])] = &[
    (
        "operation_log",
        &[
            ("entry_id", "integer", true),
            ("operator_name", "text", false),
            ("operator_role", "text", false),
            ("operation", "text", false),
            ("list_name", "text", false),
            ("element_description", "text", false),
            ("created_at", "text", false),
        ],
    ),
    (
        "operators",
        &[
            ("operator_id", "integer", true),
            ("login_name", "text", false),
            ("display_name", "text", false),
            ("password_hash", "text", false),
            ("role", "text", false),
            ("is_disabled", "integer", false),
            ("created_at", "text", false),
            ("disabled_at", "text", true),
            ("last_login_at", "text", true),
        ],
    ),
    (
        "sessions",
        &[
            ("session_id", "integer", true),
            ("session_token", "text", false),
            ("operator_id", "integer", false),
            ("created_at", "text", false),
            ("last_activity_at", "text", false),
            ("expires_at", "text", false),
        ],
    ),
];

/// `(table, column, referenced table, referenced column)`
const EXPECTED_FOREIGN_KEYS: &[(&str, &str, &str, &str)] = &[
    ("payments", "member_id", "members", "member_id"),
    ("sessions", "operator_id", "operators", "operator_id"),
];

/// `(table, column)` pairs that must carry a single-column unique constraint.
const EXPECTED_UNIQUE_COLUMNS: &[(&str, &str)] = &[
    ("categories", "name"),
    ("courses", "name"),
    ("members", "fiscal_code"),
    ("membership_types", "name"),
    ("operators", "login_name"),
    ("pricing_tiers", "position"),
    ("rooms", "name"),
    ("sessions", "session_token"),
];

/// Apply the migrations to an in-memory database and check the result.
fn verify_schema() -> Result<()> {
    use diesel::Connection;
    use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

    const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../crates/persistence/migrations");

    tracing::info!("Applying SQLite migrations");
    let mut conn = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;
    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .wrap_err("Failed to enable foreign keys")?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply migrations: {e}"))?;

    tracing::info!("Introspecting schema");
    let schema = introspect_sqlite_schema(&mut conn)?;

    let problems = schema_problems(&schema);
    if problems.is_empty() {
        tracing::info!(
            "✓ Schema verification passed ({} tables)",
            schema.tables.len()
        );
        return Ok(());
    }

    for problem in &problems {
        tracing::error!("{problem}");
    }
    Err(eyre!(
        "Schema verification failed with {} problem(s)",
        problems.len()
    ))
}

/// Everything in `schema` that departs from the expected layout.
fn schema_problems(schema: &Schema) -> Vec<String> {
    let mut problems: Vec<String> = Vec::new();

    let mut expected: BTreeMap<&str, Vec<(&str, &str, bool)>> = BTreeMap::new();
    for (table, columns) in EXPECTED_RECORD_TABLES {
        let mut all: Vec<(&str, &str, bool)> = columns.to_vec();
        all.extend(RECORD_TIMESTAMPS);
        expected.insert(*table, all);
    }
    for (table, columns) in EXPECTED_ACCESS_TABLES {
        expected.insert(*table, columns.to_vec());
    }

    for name in schema.tables.keys() {
        if !expected.contains_key(name.as_str()) {
            problems.push(format!("Unexpected table: {name}"));
        }
    }

    for (table_name, columns) in &expected {
        let Some(table) = schema.tables.get(*table_name) else {
            problems.push(format!("Missing table: {table_name}"));
            continue;
        };

        for (column_name, column_type, nullable) in columns {
            match table.columns.get(*column_name) {
                None => problems.push(format!("Missing column: {table_name}.{column_name}")),
                Some(column) => {
                    if column.normalized_type != *column_type {
                        problems.push(format!(
                            "Column {table_name}.{column_name} is {} instead of {column_type}",
                            column.normalized_type
                        ));
                    }
                    // SQLite reports INTEGER PRIMARY KEY columns as nullable.
                    let is_key: bool = table.primary_keys.contains(*column_name);
                    if !is_key && column.nullable != *nullable {
                        problems.push(format!(
                            "Column {table_name}.{column_name} nullable={} instead of {nullable}",
                            column.nullable
                        ));
                    }
                }
            }
        }

        let known: BTreeSet<&str> = columns.iter().map(|(name, _, _)| *name).collect();
        for column_name in table.columns.keys() {
            if !known.contains(column_name.as_str()) {
                problems.push(format!("Unexpected column: {table_name}.{column_name}"));
            }
        }
    }

    for (table, from, to_table, to_column) in EXPECTED_FOREIGN_KEYS {
        let wanted: ForeignKey = ForeignKey {
            from_column: (*from).to_string(),
            to_table: (*to_table).to_string(),
            to_column: (*to_column).to_string(),
        };
        let present: bool = schema
            .tables
            .get(*table)
            .is_some_and(|t| t.foreign_keys.contains(&wanted));
        if !present {
            problems.push(format!(
                "Missing foreign key: {table}.{from} -> {to_table}.{to_column}"
            ));
        }
    }

    for (table, column) in EXPECTED_UNIQUE_COLUMNS {
        let present: bool = schema.tables.get(*table).is_some_and(|t| {
            t.unique_columns
                .iter()
                .any(|columns| columns.len() == 1 && columns[0] == *column)
        });
        if !present {
            problems.push(format!("Missing unique constraint: {table}.{column}"));
        }
    }

    problems
}

/// Normalized schema representation
#[derive(Debug, Clone, PartialEq, Eq)]
struct Schema {
    tables: BTreeMap<String, Table>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Table {
    columns: BTreeMap<String, Column>,
    primary_keys: BTreeSet<String>,
    foreign_keys: BTreeSet<ForeignKey>,
    /// Column lists of unique constraints, in index order.
    unique_columns: BTreeSet<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Column {
    normalized_type: String,
    nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ForeignKey {
    from_column: String,
    to_table: String,
    to_column: String,
}

/// Introspect `SQLite` schema through the `PRAGMA` table functions
fn introspect_sqlite_schema(conn: &mut SqliteConnection) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        r#type: String,
        #[diesel(sql_type = Integer)]
        notnull: i32,
        #[diesel(sql_type = Integer)]
        pk: i32,
    }

    #[derive(QueryableByName)]
    struct ForeignKeyInfo {
        #[diesel(sql_type = Text)]
        table: String,
        #[diesel(sql_type = Text)]
        from: String,
        #[diesel(sql_type = Text)]
        to: String,
    }

    #[derive(QueryableByName)]
    struct IndexInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        origin: String,
    }

    #[derive(QueryableByName)]
    struct IndexColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
    }

    let tables: Vec<TableName> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' ORDER BY name",
    )
    .load(conn)
    .wrap_err("Failed to query SQLite tables")?;

    let mut schema = Schema {
        tables: BTreeMap::new(),
    };

    for table in tables {
        let mut table_info = Table {
            columns: BTreeMap::new(),
            primary_keys: BTreeSet::new(),
            foreign_keys: BTreeSet::new(),
            unique_columns: BTreeSet::new(),
        };

        let columns: Vec<ColumnInfo> =
            diesel::sql_query(format!("PRAGMA table_info({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get columns for table {}", table.name))?;
        for col in columns {
            if col.pk > 0 {
                table_info.primary_keys.insert(col.name.clone());
            }
            table_info.columns.insert(
                col.name,
                Column {
                    normalized_type: normalize_sqlite_type(&col.r#type),
                    nullable: col.notnull == 0,
                },
            );
        }

        let fks: Vec<ForeignKeyInfo> =
            diesel::sql_query(format!("PRAGMA foreign_key_list({})", table.name))
                .load(conn)
                .wrap_err(format!(
                    "Failed to get foreign keys for table {}",
                    table.name
                ))?;
        table_info
            .foreign_keys
            .extend(fks.into_iter().map(|fk| ForeignKey {
                from_column: fk.from,
                to_table: fk.table,
                to_column: fk.to,
            }));

        let indexes: Vec<IndexInfo> =
            diesel::sql_query(format!("PRAGMA index_list({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get indexes for table {}", table.name))?;

        // Origin 'u' marks a UNIQUE column or table constraint.
        for idx in indexes.into_iter().filter(|idx| idx.origin == "u") {
            let index_columns: Vec<IndexColumnInfo> =
                diesel::sql_query(format!("PRAGMA index_info({})", idx.name))
                    .load(conn)
                    .wrap_err(format!("Failed to get index columns for {}", idx.name))?;
            table_info
                .unique_columns
                .insert(index_columns.into_iter().map(|c| c.name).collect());
        }

        schema.tables.insert(table.name, table_info);
    }

    Ok(schema)
}

/// Map a declared `SQLite` type onto its storage affinity
fn normalize_sqlite_type(sqlite_type: &str) -> String {
    let upper = sqlite_type.to_uppercase();
    let affinity = if upper.contains("INT") {
        "integer"
    } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
        "real"
    } else if upper.contains("BLOB") {
        "blob"
    } else {
        "text"
    };
    affinity.to_string()
}

/// An extension trait for `duct::Expression` that logs the command being run
/// before running it.
trait ExpressionExt {
    /// Run the command and log the command being run
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command that was run may have scrolled off the screen, so repeat it here
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_sqlite_type_uses_affinity_rules() {
        assert_eq!(normalize_sqlite_type("INTEGER"), "integer");
        assert_eq!(normalize_sqlite_type("BIGINT"), "integer");
        assert_eq!(normalize_sqlite_type("double precision"), "real");
        assert_eq!(normalize_sqlite_type("VARCHAR(20)"), "text");
        assert_eq!(normalize_sqlite_type(""), "text");
    }

    #[test]
    fn test_empty_schema_reports_every_table_missing() {
        let schema: Schema = Schema {
            tables: BTreeMap::new(),
        };
        let problems: Vec<String> = schema_problems(&schema);
        assert!(problems.contains(&"Missing table: members".to_string()));
        assert!(problems.contains(&"Missing table: sessions".to_string()));
        assert!(
            problems.contains(&"Missing foreign key: payments.member_id -> members.member_id".to_string())
        );
    }
}
