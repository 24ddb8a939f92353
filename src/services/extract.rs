// src/services/extract.rs

//! Service-row extraction.
//!
//! Locates the "Registro Civil-Nacimientos" row in the appointment-openings
//! page and splits it into the four record fields. The row is matched by a
//! loose case-insensitive pattern rather than exact text, since the page's
//! wording has drifted across revisions.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::AppointmentRecord;

/// Loose pattern identifying the births row of the civil registry.
static SERVICE_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)registro\s*civil.*nacimiento").expect("service row pattern compiles")
});

/// Extract the target appointment record from the fetched page.
///
/// `page_url` is only used for diagnostics when no row matches.
pub fn extract_record(html: &str, page_url: &str) -> Result<AppointmentRecord> {
    let document = Html::parse_document(html);
    let row_sel = parse_selector("tr")?;
    let cell_sel = parse_selector("td")?;
    let link_sel = parse_selector("a")?;

    // First row in document order whose text matches the service pattern.
    let row = document
        .select(&row_sel)
        .find(|row| SERVICE_ROW.is_match(&element_text(row)))
        .ok_or_else(|| AppError::RowNotFound {
            url: page_url.to_string(),
            body_len: html.len(),
        })?;

    let cells: Vec<ElementRef> = row.select(&cell_sel).collect();
    if cells.len() < 4 {
        return Err(AppError::RowShape {
            row_text: element_text(&row),
        });
    }

    let service_name = element_text(&cells[0]);

    // Re-check the first cell: the row was matched on its whole text, which
    // could have hit a link or a note elsewhere in the row.
    if !SERVICE_ROW.is_match(&service_name) {
        return Err(AppError::RowShape {
            row_text: element_text(&row),
        });
    }

    let request_path = cells[3]
        .select(&link_sel)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
        .ok_or_else(|| AppError::MissingLink {
            row_text: element_text(&row),
        })?;

    Ok(AppointmentRecord {
        service_name,
        last_opened_date: element_text(&cells[1]),
        next_opening: element_text(&cells[2]),
        request_path,
    })
}

/// Collected text of an element, with whitespace runs collapsed.
fn element_text(element: &ElementRef) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
