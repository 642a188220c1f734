use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Field")]
    pub field: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

/// Two-column key/value table
pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            field: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }
        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

/// One reference in `rescope references` output
#[derive(Tabled)]
pub struct ReferenceRow {
    #[tabled(rename = "Position")]
    pub position: String,
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[tabled(rename = "Line")]
    pub line: String,
}

/// One scope in `rescope scopes` output
#[derive(Tabled)]
pub struct ScopeRow {
    #[tabled(rename = "Scope")]
    pub id: u32,
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[tabled(rename = "Parent")]
    pub parent: String,
    #[tabled(rename = "Range")]
    pub range: String,
    #[tabled(rename = "Bindings")]
    pub bindings: String,
}

pub fn references_table(rows: &[ReferenceRow]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn scopes_table(rows: &[ScopeRow]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}
