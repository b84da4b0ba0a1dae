//! Plain-text tables for result pages.

use client_core::ResultPage;
use shared::domain::{EntrySummary, Person};

pub fn entries(page: &ResultPage<EntrySummary>) -> String {
    let rows: Vec<Vec<String>> = page
        .content
        .iter()
        .map(|e| {
            vec![
                e.id.to_string(),
                e.person.clone(),
                e.description.clone(),
                e.due_date.format("%d/%m/%Y").to_string(),
                e.payment_date
                    .map(|d| d.format("%d/%m/%Y").to_string())
                    .unwrap_or_default(),
                format!("{:.2}", e.amount),
                e.kind.to_string(),
            ]
        })
        .collect();
    let mut out = table(
        &["Id", "Person", "Description", "Due", "Paid", "Amount", "Kind"],
        &rows,
    );
    out.push_str(&footer(page));
    out
}

pub fn people(page: &ResultPage<Person>) -> String {
    let rows: Vec<Vec<String>> = page
        .content
        .iter()
        .map(|p| {
            vec![
                p.id.map(|id| id.to_string()).unwrap_or_default(),
                p.name.clone(),
                p.address.city.clone().unwrap_or_default(),
                p.address.state.clone().unwrap_or_default(),
                if p.active { "Active" } else { "Inactive" }.to_string(),
            ]
        })
        .collect();
    let mut out = table(&["Id", "Name", "City", "State", "Status"], &rows);
    out.push_str(&footer(page));
    out
}

fn footer<T>(page: &ResultPage<T>) -> String {
    if page.total_elements == 0 {
        return "no records\n".to_string();
    }
    format!(
        "page {} of {} ({} records)\n",
        page.number.saturating_add(1),
        page.page_count().max(1),
        page.total_elements
    )
}

pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    push_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
