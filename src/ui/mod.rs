pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{error, file_modified, header, info, name, plan_summary, position, section, success, warn};
pub use table::{references_table, scopes_table, ReferenceRow, ScopeRow, TableBuilder};
pub use theme::{theme, Theme};
