use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    println!("{} {}", Icons::SCOPE, text.style(theme().header.clone()));
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().error.clone()));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().warn.clone()));
}

pub fn info(label: &str, value: &str) {
    println!(
        "{} {}: {}",
        Icons::INFO.style(theme().info.clone()),
        label.style(theme().dim.clone()),
        value
    );
}

pub fn section(title: &str) {
    println!();
    println!("━{}━", title.style(theme().header.clone()));
}

/// `✏️ rename total (4 edits)`
pub fn plan_summary(label: &str, edits: usize) {
    let noun = if edits == 1 { "edit" } else { "edits" };
    println!(
        "{} {} {}",
        Icons::EDIT,
        label.style(theme().success.clone()),
        format!("({} {})", edits, noun).style(theme().dim.clone())
    );
}

pub fn file_modified(path: &str) {
    println!("{} {}", Icons::SAVED.style(theme().warn.clone()), path);
}

/// Bold binding name, for inline use in messages
pub fn name(text: &str) -> String {
    text.style(theme().name.clone()).to_string()
}

/// Colored `line:column`, for inline use in messages
pub fn position(text: &str) -> String {
    text.style(theme().position.clone()).to_string()
}
