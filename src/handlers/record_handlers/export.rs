use actix_web::{web, HttpResponse};
use askama::Template;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::store::RecordStore;
use crate::templates_structs::{ExportDocumentTemplate, ExportSheet, ExportWorkbookTemplate};

const EXPORT_TITLE: &str = "Registros de Arranchamento";

/// GET /records/export/document: print-friendly HTML; the browser prints it to PDF
pub async fn document(
    store: web::Data<RecordStore>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    let records = store.list().await;
    let title = format!("{EXPORT_TITLE} - {}", config.app_name);
    let html = ExportDocumentTemplate { sheet: ExportSheet::new(&title, &records) }.render()?;
    log::info!("Exported {} record(s) to document", records.len());

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .insert_header(("Content-Disposition", "inline; filename=\"arranchamento.html\""))
        .body(html))
}

/// GET /records/export/spreadsheet: XML Spreadsheet 2003 workbook download
pub async fn spreadsheet(
    store: web::Data<RecordStore>,
) -> Result<HttpResponse, AppError> {
    let records = store.list().await;
    let xml = ExportWorkbookTemplate { sheet: ExportSheet::new(EXPORT_TITLE, &records) }.render()?;
    log::info!("Exported {} record(s) to spreadsheet", records.len());

    Ok(HttpResponse::Ok()
        .content_type("application/vnd.ms-excel")
        .insert_header(("Content-Disposition", "attachment; filename=\"arranchamento.xls\""))
        .body(xml))
}
