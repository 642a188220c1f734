use owo_colors::Style;
use std::sync::OnceLock;
use crate::binding::ReferenceKind;

static THEME: OnceLock<Theme> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub success: Style,
    pub error: Style,
    pub warn: Style,
    pub info: Style,
    pub dim: Style,
    /// Binding names
    pub name: Style,
    /// `line:column` positions
    pub position: Style,
    /// References that assign to their binding
    pub write: Style,
}

impl Theme {
    /// Colors when stdout is a terminal and `NO_COLOR` is unset
    pub fn detect() -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        if no_color || !console::Term::stdout().is_term() {
            return Self::plain();
        }
        Self::colored()
    }

    pub fn colored() -> Self {
        Self {
            header: Style::new().cyan().bold(),
            success: Style::new().green().bold(),
            error: Style::new().red().bold(),
            warn: Style::new().yellow().bold(),
            info: Style::new().magenta(),
            dim: Style::new().white().dimmed(),
            name: Style::new().blue().bold(),
            position: Style::new().cyan(),
            write: Style::new().yellow(),
        }
    }

    pub fn plain() -> Self {
        Self {
            header: Style::new(),
            success: Style::new(),
            error: Style::new(),
            warn: Style::new(),
            info: Style::new(),
            dim: Style::new(),
            name: Style::new(),
            position: Style::new(),
            write: Style::new(),
        }
    }

    /// Style for a reference of the given kind
    pub fn reference(&self, kind: ReferenceKind) -> Style {
        if kind.is_write() {
            self.write.clone()
        } else {
            self.dim.clone()
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use owo_colors::OwoColorize;

    #[test]
    fn test_writes_stand_out_from_reads() {
        let theme = Theme::colored();
        let write = "n".style(theme.reference(ReferenceKind::Write)).to_string();
        let read = "n".style(theme.reference(ReferenceKind::Read)).to_string();
        let update = "n".style(theme.reference(ReferenceKind::Update)).to_string();

        assert!(write.contains('n'));
        assert_ne!(write, read);
        assert_eq!(write, update);
    }
}
