//! Column layout shared by the printable document and the spreadsheet.

use super::types::{Meal, Record, Weekday};

pub const YES: &str = "Sim";
pub const NO: &str = "Não";

pub const fn yes_no(flag: bool) -> &'static str {
    if flag { YES } else { NO }
}

/// Header row: person fields, then one column per (meal, weekday).
pub fn export_headers() -> Vec<String> {
    let mut headers: Vec<String> = ["Nome", "Nome de Guerra", "P/G", "OM"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    for meal in Meal::ALL {
        let short = match meal {
            Meal::Breakfast => "Café",
            Meal::Lunch => "Almoço",
        };
        for day in Weekday::ALL {
            headers.push(format!("{short} {}", day.short_label()));
        }
    }
    headers
}

/// One export row, aligned with [`export_headers`].
pub fn export_row(record: &Record) -> Vec<String> {
    let mut row = vec![
        record.nome.clone(),
        record.nome_guerra.clone(),
        record.graduacao.clone(),
        record.om.clone(),
    ];
    row.extend(record.grid_flags().iter().map(|flag| yes_no(*flag).to_string()));
    row
}
