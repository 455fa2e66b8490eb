//! End-to-end conversion: PDF in, filled spreadsheet template out.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{InvsheetError, Result};
use crate::invoice::{parse_document, ParserRegistry};
use crate::models::config::{ConvertOptions, InvsheetConfig};
use crate::models::invoice::ParseResult;
use crate::pdf::extract_document;
use crate::sheet::write_items_to_template;

/// One conversion job.
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pub pdf: PathBuf,
    pub template: PathBuf,
    pub output: PathBuf,
    pub supplier: String,
    pub options: ConvertOptions,
}

/// Parse a PDF with the named supplier parser.
///
/// `options` are layered over the supplier profile and the config.
pub fn parse_pdf(
    registry: &ParserRegistry,
    config: &InvsheetConfig,
    pdf: &Path,
    supplier: &str,
    options: &ConvertOptions,
) -> Result<ParseResult> {
    let parser = registry.get(supplier)?;
    let options = config.effective_options(parser.key(), options);

    let document = extract_document(pdf)?;
    info!(
        "Extracted {} pages and {} table candidates from {}",
        document.page_count(),
        document.tables.len(),
        pdf.display()
    );
    if document.is_blank() {
        warn!("{} has no text layer", pdf.display());
    }

    Ok(parse_document(
        parser,
        &document.pages,
        &document.tables,
        &config.parse_options(&options),
    ))
}

/// Parse the request's PDF and write its rows into a copy of the template.
pub fn convert(
    registry: &ParserRegistry,
    config: &InvsheetConfig,
    request: &ConvertRequest,
) -> Result<ParseResult> {
    if same_file(&request.template, &request.output) {
        return Err(InvsheetError::Config(format!(
            "output {} would overwrite the template",
            request.output.display()
        )));
    }

    let parser = registry.get(&request.supplier)?;
    let options = config.effective_options(parser.key(), &request.options);

    let result = parse_pdf(registry, config, &request.pdf, parser.key(), &request.options)?;
    info!("Parsed {} items", result.items.len());
    if result.has_warnings() {
        warn!(
            "{} warnings while parsing {}",
            result.warnings.len(),
            request.pdf.display()
        );
    }

    let summary = write_items_to_template(
        &request.template,
        &request.output,
        &result.items,
        &config.write_options(&options),
    )?;
    info!(
        "Wrote {} rows below header row {} of '{}'",
        summary.rows_written, summary.header_row, summary.sheet
    );

    Ok(result)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn request(dir: &Path, supplier: &str) -> ConvertRequest {
        ConvertRequest {
            pdf: dir.join("invoice.pdf"),
            template: dir.join("template.xlsx"),
            output: dir.join("out.xlsx"),
            supplier: supplier.to_string(),
            options: ConvertOptions::default(),
        }
    }

    #[test]
    fn test_unknown_supplier_fails_before_io() {
        let dir = tempdir().unwrap();
        let err = convert(
            &ParserRegistry::builtin(),
            &InvsheetConfig::default(),
            &request(dir.path(), "acme"),
        )
        .unwrap_err();
        assert!(matches!(err, InvsheetError::Registry(_)));
    }

    #[test]
    fn test_missing_pdf_is_io_error() {
        let dir = tempdir().unwrap();
        let err = convert(
            &ParserRegistry::builtin(),
            &InvsheetConfig::default(),
            &request(dir.path(), "omnia"),
        )
        .unwrap_err();
        assert!(matches!(err, InvsheetError::Io(_)));
    }

    #[test]
    fn test_output_must_differ_from_template() {
        let dir = tempdir().unwrap();
        let mut req = request(dir.path(), "omnia");
        req.output = req.template.clone();

        let err = convert(&ParserRegistry::builtin(), &InvsheetConfig::default(), &req).unwrap_err();
        assert!(matches!(err, InvsheetError::Config(_)));
    }
}
