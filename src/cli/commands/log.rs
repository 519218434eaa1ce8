use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::AuditStore;
use crate::db::log::{LogEntry, load_log};
use crate::errors::AppResult;
use crate::ui::messages::info;
use ansi_term::Colour;
use unicode_width::UnicodeWidthStr;

const OP_TARGET_MAX: usize = 60;

fn color_for_operation(op: &str) -> Colour {
    match op {
        "export" => Colour::Green,
        "reexport" => Colour::Cyan,
        "delete" => Colour::Red,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if matches!(cmd, Commands::Log { print: true }) {
        let store = AuditStore::open(&cfg.database)?;
        print_log(&load_log(store.conn())?);
    }

    Ok(())
}

/// `operation (target)`, cut to a visible width with an ellipsis.
fn op_target_label(entry: &LogEntry) -> (String, String) {
    let rest = if entry.target.is_empty() {
        String::new()
    } else {
        format!(" ({})", entry.target)
    };

    let full = format!("{}{rest}", entry.operation);
    if full.width() <= OP_TARGET_MAX {
        return (entry.operation.clone(), rest);
    }

    let mut cut: String = full.chars().take(OP_TARGET_MAX - 3).collect();
    cut.push_str("...");
    match cut.split_at_checked(entry.operation.len().min(cut.len())) {
        Some((op, tail)) => (op.to_string(), tail.to_string()),
        None => (cut, String::new()),
    }
}

fn print_log(entries: &[LogEntry]) {
    if entries.is_empty() {
        info("The internal log is empty.");
        return;
    }

    let id_w = entries.iter().map(|e| e.id.to_string().len()).max().unwrap_or(1);
    let date_w = entries.iter().map(|e| e.date.len()).max().unwrap_or(10);

    let labels: Vec<(String, String)> = entries.iter().map(op_target_label).collect();
    let op_w = labels
        .iter()
        .map(|(op, rest)| op.width() + rest.width())
        .max()
        .unwrap_or(10);

    println!("📜 Internal log:\n");

    for (entry, (op, rest)) in entries.iter().zip(labels) {
        let padding = " ".repeat(op_w.saturating_sub(op.width() + rest.width()));
        println!(
            "{:>id_w$}: {:<date_w$} | {}{rest}{padding} => {}",
            entry.id,
            entry.date,
            color_for_operation(&entry.operation).paint(op),
            entry.message,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(operation: &str, target: &str) -> LogEntry {
        LogEntry {
            id: 1,
            date: "2024-01-01T08:00:00+00:00".into(),
            operation: operation.into(),
            target: target.into(),
            message: "m".into(),
        }
    }

    #[test]
    fn short_labels_are_kept_whole() {
        let (op, rest) = op_target_label(&entry("export", "/tmp/a.xlsx"));
        assert_eq!(op, "export");
        assert_eq!(rest, " (/tmp/a.xlsx)");
    }

    #[test]
    fn long_targets_are_truncated() {
        let long = "x".repeat(100);
        let (op, rest) = op_target_label(&entry("export", &long));
        assert_eq!(op, "export");
        assert_eq!(op.width() + rest.width(), OP_TARGET_MAX);
        assert!(rest.ends_with("..."));
    }
}
