/// Glyphs for status lines, one per kind of message
pub struct Icons;

impl Icons {
    pub const SCOPE: &str = "🔭";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
    /// A planned refactoring
    pub const EDIT: &str = "✏️";
    /// A rewritten file
    pub const SAVED: &str = "💾";
}
