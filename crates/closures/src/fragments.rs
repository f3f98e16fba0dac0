use crate::prelude::{println, *};
use pdf::PageText;

#[derive(Debug, clap::Args, Clone)]
pub struct FragmentsOptions {
    /// Path or http(s) URL of the notices PDF
    #[arg(value_name = "SOURCE")]
    pub source: String,

    /// Only show fragments from this 0-based page
    #[arg(short, long)]
    pub page: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Dump the rendering boundary's positioned fragments. This is the
/// debugging view for tuning against a new notice layout: it shows exactly
/// what the reconstruction engine will see.
pub async fn run(options: FragmentsOptions, global: crate::Global) -> Result<()> {
    if global.verbose {
        println!("Loading {}...", options.source);
    }

    let bytes = crate::source::load(&options.source).await?;
    let pages = pdf::render_pages(&bytes)?;
    let pages = filter_pages(pages, options.page);

    if options.json {
        println!("{}", format_pages_json(&pages)?);
    } else {
        format_fragments_table(&pages).printstd();
    }

    Ok(())
}

fn filter_pages(pages: Vec<PageText>, page: Option<usize>) -> Vec<PageText> {
    match page {
        Some(index) => pages.into_iter().filter(|p| p.index == index).collect(),
        None => pages,
    }
}

fn format_pages_json(pages: &[PageText]) -> Result<String> {
    serde_json::to_string_pretty(pages).map_err(|e| eyre!("JSON serialization failed: {}", e))
}

fn format_fragments_table(pages: &[PageText]) -> prettytable::Table {
    let mut table = new_table();
    table.add_row(prettytable::row!["PAGE", "X", "Y", "W", "H", "TEXT"]);
    for page in pages {
        for fragment in &page.fragments {
            table.add_row(prettytable::row![
                page.index,
                format!("{:.1}", fragment.x),
                format!("{:.1}", fragment.y),
                format!("{:.1}", fragment.width),
                format!("{:.1}", fragment.height),
                fragment.text,
            ]);
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdf::Fragment;

    fn page(index: usize, texts: &[&str]) -> PageText {
        PageText {
            index,
            width: 600.0,
            height: 800.0,
            fragments: texts
                .iter()
                .enumerate()
                .map(|(i, text)| Fragment {
                    text: text.to_string(),
                    x: 40.0,
                    y: 100.0 + i as f64 * 20.0,
                    width: 50.0,
                    height: 10.0,
                })
                .collect(),
        }
    }

    #[test]
    fn page_filter_keeps_only_requested_page() {
        let pages = vec![page(0, &["a"]), page(1, &["b"]), page(2, &["c"])];
        let filtered = filter_pages(pages, Some(1));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].index, 1);
    }

    #[test]
    fn no_page_filter_keeps_everything() {
        let pages = vec![page(0, &["a"]), page(1, &["b"])];
        assert_eq!(filter_pages(pages, None).len(), 2);
    }

    #[test]
    fn table_lists_fragments_across_pages() {
        let pages = vec![page(0, &["No", "12"]), page(1, &["End Date"])];
        let table = format_fragments_table(&pages);
        // Header plus three fragment rows.
        assert_eq!(table.len(), 4);

        let rendered = table.to_string();
        assert!(rendered.contains("End Date"));
    }

    #[test]
    fn json_includes_page_dimensions() {
        let pages = vec![page(0, &["No"])];
        let json = format_pages_json(&pages).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["width"], 600.0);
        assert_eq!(parsed[0]["fragments"][0]["text"], "No");
    }
}
