//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `agenda_core` linkage without the Flutter/FFI runtime.
//! - Print a text month grid for `YYYY-MM` (defaults to the current month).

use agenda_core::{month_grid, YearMonth};
use chrono::{Datelike, Local};
use std::process::ExitCode;

const WEEKDAY_HEADER: &str = " Su Mo Tu We Th Fr Sa";

fn main() -> ExitCode {
    println!("agenda_core ping={}", agenda_core::ping());
    println!("agenda_core version={}", agenda_core::core_version());

    let today = Local::now().date_naive();
    let month = match std::env::args().nth(1) {
        Some(arg) => match parse_year_month(&arg) {
            Some(month) => month,
            None => {
                eprintln!("invalid month `{arg}`; expected YYYY-MM");
                return ExitCode::FAILURE;
            }
        },
        None => YearMonth::of(today),
    };

    println!();
    print!("{}", render_month(month, today));
    ExitCode::SUCCESS
}

fn parse_year_month(value: &str) -> Option<YearMonth> {
    let (year, month) = value.trim().split_once('-')?;
    YearMonth::new(year.parse().ok()?, month.parse().ok()?)
}

/// Padding days render as `.`; today is marked with `*`.
fn render_month(month: YearMonth, today: chrono::NaiveDate) -> String {
    let grid = month_grid(month.first_day());
    let mut out = format!("{:04}-{:02}\n{WEEKDAY_HEADER}\n", month.year(), month.month());
    for week in grid.weeks() {
        for day in week {
            let marker = if *day == today { '*' } else { ' ' };
            if grid.is_in_month(*day) {
                out.push_str(&format!("{marker}{:>2}", day.day()));
            } else {
                out.push_str(&format!("{marker} ."));
            }
        }
        out.push('\n');
    }
    out
}
