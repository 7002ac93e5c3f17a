//! Problem statement extraction
//!
//! A Codeforces problem page carries three regions we care about, each in a
//! `div` with a stable class name:
//! - `problem-statement`: its second direct `div` child is the legend
//! - `input-specification`: a `section-title` header followed by the text
//! - `output-specification`: same layout as the input section
//!
//! Missing regions contribute an empty string; the three parts are always
//! joined with blank lines.

use crate::catalog::Problem;
use crate::client::HarvestClient;
use crate::ExtractionError;
use scraper::{ElementRef, Html, Selector};

/// Separator placed between the three statement sections
pub const SECTION_SEPARATOR: &str = "\n\n";

/// A problem together with its extracted statement text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementRecord {
    pub problem: Problem,
    pub statement: String,
}

/// Downloads a problem page and extracts its statement
///
/// # Returns
///
/// * `Ok(StatementRecord)` - The page was fetched; sections that were not
///   found are empty
/// * `Err(ExtractionError)` - The problem has no contest id, the request
///   failed, or the page answered with a non-2xx status
pub async fn fetch_statement(
    client: &HarvestClient,
    problem: &Problem,
) -> Result<StatementRecord, ExtractionError> {
    let contest_id = problem
        .contest_id
        .ok_or_else(|| ExtractionError::MissingIdentifier {
            index: problem.index.clone(),
        })?;

    let url = client.problem_url(contest_id, &problem.index);
    let html = client
        .get_text(&url)
        .await
        .map_err(|failure| ExtractionError::from_failure(&url, failure))?;

    Ok(StatementRecord {
        problem: problem.clone(),
        statement: parse_statement(&html),
    })
}

/// Extracts the statement text from a problem page
///
/// # Example
///
/// ```
/// use cf_harvest::extract::parse_statement;
///
/// let html = r#"<div class="problem-statement">
///     <div class="header">A. Title</div>
///     <div><p>Legend.</p></div>
///     <div class="output-specification"><div class="section-title">Output</div>Print it.</div>
/// </div>"#;
/// assert_eq!(parse_statement(html), "Legend.\n\n\n\nPrint it.");
/// ```
pub fn parse_statement(html: &str) -> String {
    let document = Html::parse_document(html);

    let legend = extract_legend(&document);
    let input = extract_specification(&document, "div.input-specification");
    let output = extract_specification(&document, "div.output-specification");

    [legend, input, output].join(SECTION_SEPARATOR)
}

/// Finds the first element matching a CSS selector
fn first_match<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    document.select(&selector).next()
}

/// Second direct `div` child of `div.problem-statement`, when there is one
fn extract_legend(document: &Html) -> String {
    let Some(container) = first_match(document, "div.problem-statement") else {
        return String::new();
    };

    container
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "div")
        .nth(1)
        .map(|legend| element_text(legend, None))
        .unwrap_or_default()
}

/// Text of a specification section without its `section-title` header
fn extract_specification(document: &Html, selector: &str) -> String {
    let Some(container) = first_match(document, selector) else {
        return String::new();
    };

    let title = Selector::parse("div.section-title")
        .ok()
        .and_then(|title| container.select(&title).next());

    element_text(container, title)
}

/// Concatenated, trimmed text of an element, skipping the subtree rooted at `skip`
fn element_text(element: ElementRef<'_>, skip: Option<ElementRef<'_>>) -> String {
    element
        .descendants()
        .filter(|node| match skip {
            Some(skip) => !node.ancestors().any(|ancestor| ancestor.id() == skip.id()),
            None => true,
        })
        .filter_map(|node| node.value().as_text())
        .map(|text| &**text)
        .collect::<String>()
        .trim()
        .to_string()
}
