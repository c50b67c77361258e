use crate::db::pool::DbPool;
use crate::errors::AppResult;
use ansi_term::Colour;
use regex::Regex;
use std::sync::LazyLock;

static ANSI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;]*[mK]").expect("static ANSI pattern"));

const OP_TARGET_MAX: usize = 60;

fn strip_ansi(s: &str) -> String {
    ANSI.replace_all(s, "").into_owned()
}

/// Colour of an audit operation
fn color_for_operation(op: &str) -> Colour {
    match op {
        "clock_in" => Colour::Green,
        "clock_out" => Colour::Cyan,
        "disqualify" => Colour::Red,
        "sweep" => Colour::RGB(255, 153, 51), // arancione
        "edit" => Colour::Yellow,
        "del" => Colour::Red,
        "user_add" => Colour::Blue,
        "init" | "migration_applied" => Colour::Purple,
        _ => Colour::White,
    }
}

#[derive(Debug, Clone)]
pub struct LogRow {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

pub struct LogLogic;

impl LogLogic {
    /// Audit rows, oldest first; `operation` filters when given.
    pub fn load(pool: &DbPool, operation: Option<&str>) -> AppResult<Vec<LogRow>> {
        let mut stmt = pool.conn.prepare_cached(
            "SELECT id, date, operation, target, message FROM log
             WHERE ?1 IS NULL OR operation = ?1
             ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([operation], |row| {
            Ok(LogRow {
                id: row.get(0)?,
                date: row.get(1)?,
                operation: row.get(2)?,
                target: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                message: row.get(4)?,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn print_log(pool: &DbPool, operation: Option<&str>) -> AppResult<()> {
        let entries = Self::load(pool, operation)?;

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let rendered: Vec<(String, String)> = entries
            .iter()
            .map(|r| {
                let date = chrono::DateTime::parse_from_rfc3339(&r.date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or_else(|_| r.date.clone());
                (date, render_op_target(&r.operation, &r.target))
            })
            .collect();

        let id_w = entries
            .iter()
            .map(|r| r.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = rendered.iter().map(|(d, _)| d.len()).max().unwrap_or(10);
        let op_w = rendered
            .iter()
            .map(|(_, op)| strip_ansi(op).chars().count())
            .max()
            .unwrap_or(10)
            .min(OP_TARGET_MAX);

        println!("📜 Internal log:\n");

        for (row, (date, op_target)) in entries.iter().zip(rendered) {
            // pad on the visible width, ANSI excluded
            let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&op_target).chars().count()));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                row.id,
                date,
                op_target,
                padding,
                row.message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}

/// `operation (target)`, operation coloured, truncated to the visible limit.
fn render_op_target(operation: &str, target: &str) -> String {
    let visible = if target.is_empty() {
        operation.to_string()
    } else {
        format!("{operation} ({target})")
    };

    let visible = if visible.chars().count() > OP_TARGET_MAX {
        let mut s: String = visible.chars().take(OP_TARGET_MAX - 3).collect();
        s.push_str("...");
        s
    } else {
        visible
    };

    // only the operation word keeps the colour
    let color = color_for_operation(operation);
    match visible.split_once(' ') {
        Some((op_word, rest)) => format!("{} {}", color.paint(op_word), rest),
        None => color.paint(visible.as_str()).to_string(),
    }
}
