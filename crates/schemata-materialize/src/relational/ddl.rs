//! Relational schema objects and their PostgreSQL rendering.

/// Words that must be double-quoted when used as identifiers.
const RESERVED: &[&str] = &[
    "all", "and", "any", "as", "asc", "both", "case", "check", "column", "constraint", "create",
    "default", "desc", "distinct", "do", "else", "end", "false", "for", "foreign", "from",
    "grant", "group", "having", "in", "into", "is", "join", "limit", "not", "null", "offset",
    "on", "only", "or", "order", "primary", "references", "select", "table", "then", "to",
    "true", "union", "unique", "user", "using", "when", "where", "with",
];

/// Quote `name` if it is a reserved word.
pub fn ident(name: &str) -> String {
    if RESERVED.contains(&name) {
        format!("\"{name}\"")
    } else {
        name.to_string()
    }
}

/// A SQL string literal.
pub fn literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn ident_list(names: &[String]) -> String {
    names.iter().map(|n| ident(n)).collect::<Vec<_>>().join(", ")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub sql_type: String,
    pub nullable: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            nullable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueConstraint {
    pub name: String,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    /// Declaration the table materializes.
    pub source: String,
    pub columns: Vec<Column>,
    pub primary_key: Vec<String>,
    pub uniques: Vec<UniqueConstraint>,
    /// CHECK expressions.
    pub checks: Vec<String>,
}

impl Table {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            columns: Vec::new(),
            primary_key: Vec::new(),
            uniques: Vec::new(),
            checks: Vec::new(),
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    fn render(&self) -> String {
        let mut lines: Vec<String> = self
            .columns
            .iter()
            .map(|c| {
                let null = if c.nullable { "" } else { " NOT NULL" };
                format!("    {} {}{null}", ident(&c.name), c.sql_type)
            })
            .collect();
        if !self.primary_key.is_empty() {
            lines.push(format!("    PRIMARY KEY ({})", ident_list(&self.primary_key)));
        }
        for u in &self.uniques {
            lines.push(format!(
                "    CONSTRAINT {} UNIQUE ({})",
                u.name,
                ident_list(&u.columns)
            ));
        }
        for check in &self.checks {
            lines.push(format!("    CHECK ({check})"));
        }
        format!(
            "CREATE TABLE {} (\n{}\n);\n",
            ident(&self.name),
            lines.join(",\n")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    pub name: String,
    pub table: String,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub name: String,
    pub table: String,
    pub columns: Vec<String>,
    pub ref_table: String,
    pub ref_columns: Vec<String>,
}

/// Rows of an enum lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRows {
    pub table: String,
    /// `(id, key literal, value literal)`.
    pub rows: Vec<(usize, String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub name: String,
    pub source: String,
    /// `expression AS alias` items.
    pub columns: Vec<String>,
    pub from: String,
    pub joins: Vec<String>,
}

/// A complete relational schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    pub tables: Vec<Table>,
    pub lookups: Vec<LookupRows>,
    pub indexes: Vec<Index>,
    pub foreign_keys: Vec<ForeignKey>,
    pub views: Vec<View>,
}

impl Schema {
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.name == name)
    }

    pub fn view(&self, name: &str) -> Option<&View> {
        self.views.iter().find(|v| v.name == name)
    }

    /// Foreign keys declared on `table`.
    pub fn foreign_keys_of<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a ForeignKey> {
        self.foreign_keys.iter().filter(move |fk| fk.table == table)
    }

    /// Render DDL: tables, lookup rows, indexes, then foreign keys (so
    /// relation cycles need no table ordering), then views.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for table in &self.tables {
            out.push_str(&table.render());
            out.push('\n');
        }
        for lookup in &self.lookups {
            if lookup.rows.is_empty() {
                continue;
            }
            let values: Vec<String> = lookup
                .rows
                .iter()
                .map(|(id, key, value)| format!("    ({id}, {key}, {value})"))
                .collect();
            out.push_str(&format!(
                "INSERT INTO {} (id, key, value) VALUES\n{};\n\n",
                ident(&lookup.table),
                values.join(",\n")
            ));
        }
        for index in &self.indexes {
            out.push_str(&format!(
                "CREATE INDEX {} ON {} ({});\n",
                index.name,
                ident(&index.table),
                ident_list(&index.columns)
            ));
        }
        if !self.indexes.is_empty() {
            out.push('\n');
        }
        for fk in &self.foreign_keys {
            out.push_str(&format!(
                "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({});\n",
                ident(&fk.table),
                fk.name,
                ident_list(&fk.columns),
                ident(&fk.ref_table),
                ident_list(&fk.ref_columns)
            ));
        }
        if !self.foreign_keys.is_empty() {
            out.push('\n');
        }
        for view in &self.views {
            let mut sql = format!(
                "CREATE VIEW {} AS\nSELECT\n    {}\nFROM {}",
                ident(&view.name),
                view.columns.join(",\n    "),
                view.from
            );
            for join in &view.joins {
                sql.push('\n');
                sql.push_str(join);
            }
            out.push_str(&sql);
            out.push_str(";\n\n");
        }
        out
    }
}
