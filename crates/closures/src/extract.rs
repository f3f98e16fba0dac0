use crate::prelude::{eprintln, println, *};
use closures_core::{extract_document, Extraction, Page, Record, Rect, TextFragment};
use pdf::PageText;

#[derive(Debug, clap::Args, Clone)]
pub struct ExtractOptions {
    /// Path or http(s) URL of the notices PDF
    #[arg(value_name = "SOURCE")]
    pub source: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(options: ExtractOptions, global: crate::Global) -> Result<()> {
    if global.verbose {
        println!("Loading {}...", options.source);
    }

    let extraction = extract_data(&options.source).await?;

    if options.json {
        output_json(&extraction.records)?;
    } else {
        output_formatted(&extraction.records);
    }

    report_dropped(&extraction, global.verbose);

    Ok(())
}

/// Load a document and run the full reconstruction pipeline over it.
pub async fn extract_data(source: &str) -> Result<Extraction> {
    let bytes = crate::source::load(source).await?;
    let rendered = pdf::render_pages(&bytes)?;
    let pages = to_pages(rendered);
    Ok(extract_document(&pages))
}

/// Convert the rendering boundary's page output into the engine's input
/// type. Coordinates pass through unchanged; the boundary has already placed
/// them in the global space.
fn to_pages(rendered: Vec<PageText>) -> Vec<Page> {
    rendered
        .into_iter()
        .map(|page| Page {
            index: page.index,
            width: page.width,
            height: page.height,
            fragments: page
                .fragments
                .into_iter()
                .map(|f| TextFragment::new(&f.text, Rect::new(f.x, f.y, f.width, f.height)))
                .collect(),
        })
        .collect()
}

/// Convert extracted records to a pretty-printed JSON string.
fn format_records_json(records: &[Record]) -> Result<String> {
    serde_json::to_string_pretty(records).map_err(|e| eyre!("JSON serialization failed: {}", e))
}

/// Render extracted records as an aligned text table.
fn format_records_table(records: &[Record]) -> prettytable::Table {
    let mut table = new_table();
    table.add_row(prettytable::row!["ID", "NAME", "START", "END"]);
    for record in records {
        table.add_row(prettytable::row![
            record.id,
            record.primary_name,
            record.start_date,
            record.end_date,
        ]);
    }
    table
}

fn output_json(records: &[Record]) -> Result<()> {
    println!("{}", format_records_json(records)?);
    Ok(())
}

fn output_formatted(records: &[Record]) {
    if records.is_empty() {
        println!("No closure records found.");
        return;
    }
    format_records_table(records).printstd();
}

/// Summarize rows the engine dropped during normalization on stderr, so the
/// record output on stdout stays machine-consumable.
fn report_dropped(extraction: &Extraction, verbose: bool) {
    if extraction.dropped.is_empty() {
        return;
    }
    eprintln!(
        "warning: dropped {} row(s) during normalization",
        extraction.dropped.len()
    );
    if verbose {
        for dropped in &extraction.dropped {
            eprintln!("  page {}: {}", dropped.page, dropped.reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use closures_core::record_id;
    use pdf::Fragment;

    fn record(name: &str, start: &str, end: &str) -> Record {
        Record {
            id: record_id(name, start, end),
            primary_name: name.to_string(),
            start_date: start.to_string(),
            end_date: end.to_string(),
        }
    }

    #[test]
    fn pages_convert_without_coordinate_changes() {
        let rendered = vec![PageText {
            index: 3,
            width: 600.0,
            height: 800.0,
            fragments: vec![Fragment {
                text: "Start Date".to_string(),
                x: 350.0,
                y: 2500.0,
                width: 60.0,
                height: 10.0,
            }],
        }];

        let pages = to_pages(rendered);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].index, 3);
        assert_eq!(pages[0].fragments[0].text, "Start Date");
        assert_eq!(pages[0].fragments[0].rect.x, 350.0);
        assert_eq!(pages[0].fragments[0].rect.y, 2500.0);
    }

    #[test]
    fn json_output_is_a_record_array() {
        let records = vec![record("Example Market", "2021-01-01", "2021-01-02")];
        let json = format_records_json(&records).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.as_array().unwrap().len(), 1);
        assert_eq!(parsed[0]["primary_name"], "Example Market");
        assert_eq!(parsed[0]["start_date"], "2021-01-01");
        assert_eq!(parsed[0]["id"].as_str().unwrap().len(), 40);
    }

    #[test]
    fn json_output_empty_is_empty_array() {
        let json = format_records_json(&[]).unwrap();
        assert_eq!(json.trim(), "[]");
    }

    #[test]
    fn table_has_header_and_one_row_per_record() {
        let records = vec![
            record("Alpha Centre", "2021-02-01", "2021-02-02"),
            record("Beta Centre", "2021-02-03", "2021-02-04"),
        ];
        let table = format_records_table(&records);
        assert_eq!(table.len(), 3);

        let rendered = table.to_string();
        assert!(rendered.contains("Alpha Centre"));
        assert!(rendered.contains("2021-02-04"));
    }
}
