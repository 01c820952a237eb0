//! End-to-end runs of the generation pipeline against a saved documentation page.

use std::fs;

use alphavantage_apigen::checksum::{FOOTER_LEN, digest, footer_line, parse_footer};
use alphavantage_apigen::scraper::sanitize;
use alphavantage_apigen::{ApiGenError, DocPipeline, GeneratorConfig, Outcome};
use tempfile::TempDir;

const FIXTURE: &str = include_str!("fixtures/documentation.html");

fn pipeline(dir: &TempDir) -> DocPipeline {
    DocPipeline::new(GeneratorConfig::default().with_output(dir.path().join("api_generated.rs")))
}

/// The fixture with every CDN-injected value swapped for a different one.
fn reloaded_fixture() -> String {
    FIXTURE
        .replace("b3c0c6c3c3dcc1c7f3d2dfc3dbd2", "0f1e2d3c4b5a69788796a5b4c3d2")
        .replace(
            "295a5c5959465b5d6948455941485f48475d484e4c074a46",
            "77aa77aa77aa77aa77aa77aa77aa77aa77aa77aa77aa77aa",
        )
        .replace("8c1f2e3d4a5b6c7d", "0000ffff1111eeee")
}

#[test]
fn generates_bindings_for_two_categories() {
    let dir = TempDir::new().unwrap();
    let pipeline = pipeline(&dir);

    let (path, record, categories, endpoints) = match pipeline.run_with_page(FIXTURE.as_bytes()) {
        Ok(Outcome::Generated {
            path,
            record,
            categories,
            endpoints,
        }) => (path, record, categories, endpoints),
        other => panic!("expected a generated artifact, got {other:?}"),
    };
    assert_eq!(categories, 2);
    assert_eq!(endpoints, 2);

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.matches("pub struct ").count(), 2);
    assert!(text.contains("pub struct Overview"));
    assert!(text.contains("pub struct TimeSeriesIntraday"));

    // required and optional parameters are named apart
    assert!(text.contains("pub symbol: String"));
    assert!(text.contains("pub opt_adjusted: Option<String>"));

    // sorted by link id, not page order
    let fundamentals = text.find("pub mod fundamentals").unwrap();
    let core = text.find("pub mod time_series_data").unwrap();
    assert!(fundamentals < core);

    let canonical = sanitize(FIXTURE.as_bytes()).unwrap();
    let expected = digest(&canonical);
    assert_eq!(record.digest, expected);
    assert_eq!(parse_footer(&text[text.len() - FOOTER_LEN..]), Some(expected));
    assert!(text.ends_with(&footer_line(&expected)));
}

#[test]
fn volatile_values_do_not_change_the_digest() {
    let dir = TempDir::new().unwrap();
    let pipeline = pipeline(&dir);

    let first = pipeline.page_digest(FIXTURE.as_bytes()).unwrap();
    let second = pipeline.page_digest(reloaded_fixture().as_bytes()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unchanged_documentation_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let pipeline = pipeline(&dir);
    let path = pipeline.config().output_path.clone();

    let canonical = sanitize(FIXTURE.as_bytes()).unwrap();
    let placeholder = format!("// hand-written placeholder\n{}", footer_line(&digest(&canonical)));
    fs::write(&path, &placeholder).unwrap();

    let outcome = pipeline.run_with_page(reloaded_fixture().as_bytes()).unwrap();
    assert_eq!(
        outcome,
        Outcome::Unchanged {
            digest: digest(&canonical)
        }
    );
    assert_eq!(fs::read_to_string(&path).unwrap(), placeholder);
}

#[test]
fn second_run_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let pipeline = pipeline(&dir);

    assert!(matches!(
        pipeline.run_with_page(FIXTURE.as_bytes()).unwrap(),
        Outcome::Generated { .. }
    ));
    let written = fs::read_to_string(&pipeline.config().output_path).unwrap();

    assert!(matches!(
        pipeline.run_with_page(FIXTURE.as_bytes()).unwrap(),
        Outcome::Unchanged { .. }
    ));
    assert_eq!(
        fs::read_to_string(&pipeline.config().output_path).unwrap(),
        written
    );
}

#[test]
fn force_regenerates_matching_documentation() {
    let dir = TempDir::new().unwrap();
    let config = GeneratorConfig::default()
        .with_output(dir.path().join("api_generated.rs"))
        .with_force(true);
    let pipeline = DocPipeline::new(config);

    pipeline.run_with_page(FIXTURE.as_bytes()).unwrap();
    assert!(matches!(
        pipeline.run_with_page(FIXTURE.as_bytes()).unwrap(),
        Outcome::Generated { .. }
    ));
}

#[test]
fn output_is_deterministic_apart_from_the_timestamp() {
    let first_dir = TempDir::new().unwrap();
    let second_dir = TempDir::new().unwrap();
    pipeline(&first_dir).run_with_page(FIXTURE.as_bytes()).unwrap();
    pipeline(&second_dir).run_with_page(FIXTURE.as_bytes()).unwrap();

    let strip_timestamp = |text: String| -> Vec<String> {
        text.lines()
            .filter(|line| !line.contains("retrieved"))
            .map(str::to_string)
            .collect()
    };
    let first = fs::read_to_string(first_dir.path().join("api_generated.rs")).unwrap();
    let second = fs::read_to_string(second_dir.path().join("api_generated.rs")).unwrap();
    assert_eq!(strip_timestamp(first), strip_timestamp(second));
}

#[test]
fn structural_drift_aborts_without_touching_the_artifact() {
    let dir = TempDir::new().unwrap();
    let pipeline = pipeline(&dir);
    let path = pipeline.config().output_path.clone();
    fs::write(&path, "previous artifact").unwrap();

    let drifted = FIXTURE.replace("<h4 id=\"company-overview\">", "<h4 id=\"overview\">");
    let err = pipeline.run_with_page(drifted.as_bytes()).unwrap_err();
    assert!(matches!(err, ApiGenError::Extract(_)));
    assert!(err.to_string().contains("company-overview"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "previous artifact");
}

#[test]
fn missing_sanitizer_marker_aborts() {
    let dir = TempDir::new().unwrap();
    let page = FIXTURE.replace("data-cfemail", "data-email");
    let err = pipeline(&dir).run_with_page(page.as_bytes()).unwrap_err();
    assert!(matches!(err, ApiGenError::Sanitize(_)));
}
