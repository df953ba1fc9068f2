use askama::Template;

use super::PageContext;
use crate::models::record::{
    DayMap, Meal, NewRecord, Record, RecordForm, Weekday, column, export_headers, export_row,
};

/// Text inputs echoed back into the form after a rejected submission.
#[derive(Default)]
pub struct FormValues {
    pub nome: String,
    pub nome_guerra: String,
    pub graduacao: String,
    pub om: String,
}

pub struct DayOption {
    pub column: &'static str,
    pub label: &'static str,
    pub checked: bool,
}

/// One meal's row of weekday checkboxes.
pub struct MealFieldset {
    pub label: &'static str,
    pub options: Vec<DayOption>,
}

impl MealFieldset {
    pub fn all(breakfast: &DayMap, lunch: &DayMap) -> Vec<Self> {
        Meal::ALL
            .iter()
            .map(|&meal| {
                let days = match meal {
                    Meal::Breakfast => breakfast,
                    Meal::Lunch => lunch,
                };
                MealFieldset {
                    label: meal.label(),
                    options: Weekday::ALL
                        .iter()
                        .map(|&day| DayOption {
                            column: column(meal, day),
                            label: day.label(),
                            checked: days.get(day),
                        })
                        .collect(),
                }
            })
            .collect()
    }
}

#[derive(Template)]
#[template(path = "records/form.html")]
pub struct RecordFormTemplate {
    pub ctx: PageContext,
    pub values: FormValues,
    pub meals: Vec<MealFieldset>,
    pub errors: Vec<String>,
}

impl RecordFormTemplate {
    /// Empty form, every day unchecked.
    pub fn blank(ctx: PageContext) -> Self {
        Self {
            ctx,
            values: FormValues::default(),
            meals: MealFieldset::all(&DayMap::default(), &DayMap::default()),
            errors: vec![],
        }
    }

    /// Form re-filled with what the user submitted.
    pub fn refill(ctx: PageContext, form: &RecordForm, errors: Vec<String>) -> Self {
        let NewRecord { nome, nome_guerra, graduacao, om, breakfast, lunch } = form.to_new_record();
        Self {
            ctx,
            values: FormValues { nome, nome_guerra, graduacao, om },
            meals: MealFieldset::all(&breakfast, &lunch),
            errors,
        }
    }
}

pub struct MealHeader {
    pub label: &'static str,
    pub days: Vec<&'static str>,
}

pub struct GridCell {
    pub mark: &'static str,
    pub class: &'static str,
}

pub struct RecordRow {
    pub id: String,
    pub graduacao: String,
    pub nome_guerra: String,
    pub nome: String,
    pub om: String,
    pub cells: Vec<GridCell>,
}

impl From<&Record> for RecordRow {
    fn from(record: &Record) -> Self {
        let cells = record
            .grid_flags()
            .iter()
            .map(|&flag| if flag {
                GridCell { mark: "✓", class: "cell-yes" }
            } else {
                GridCell { mark: "✗", class: "cell-no" }
            })
            .collect();
        RecordRow {
            id: record.id.clone(),
            graduacao: record.graduacao.clone(),
            nome_guerra: record.nome_guerra.clone(),
            nome: record.nome.clone(),
            om: record.om.clone(),
            cells,
        }
    }
}

#[derive(Template)]
#[template(path = "records/table.html")]
pub struct RecordTableTemplate {
    pub ctx: PageContext,
    pub meals: Vec<MealHeader>,
    pub rows: Vec<RecordRow>,
    /// Open the realtime refresh socket.
    pub live: bool,
}

impl RecordTableTemplate {
    pub fn new(ctx: PageContext, records: &[Record], live: bool) -> Self {
        let meals = Meal::ALL
            .iter()
            .map(|meal| MealHeader {
                label: meal.label(),
                days: Weekday::ALL.iter().map(|d| d.short_label()).collect(),
            })
            .collect();
        Self { ctx, meals, rows: records.iter().map(RecordRow::from).collect(), live }
    }
}

/// Rows for both export formats.
pub struct ExportSheet {
    pub title: String,
    pub generated_at: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ExportSheet {
    pub fn new(title: &str, records: &[Record]) -> Self {
        Self {
            title: title.to_string(),
            generated_at: chrono::Local::now().format("%d/%m/%Y %H:%M").to_string(),
            headers: export_headers(),
            rows: records.iter().map(export_row).collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "records/export_document.html")]
pub struct ExportDocumentTemplate {
    pub sheet: ExportSheet,
}

#[derive(Template)]
#[template(path = "records/export_workbook.xml")]
pub struct ExportWorkbookTemplate {
    pub sheet: ExportSheet,
}
