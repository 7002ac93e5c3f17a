use crate::common::{problem, problem_page, problem_set, read, test_config};
use cf_harvest::batch::{harvest_statements, Selection};
use cf_harvest::config::LogFormat;
use cf_harvest::BatchReport;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_problem_set(server: &MockServer, problems: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path("/api/problemset.problems"))
        .respond_with(ResponseTemplate::new(200).set_body_json(problem_set(problems)))
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, route: &str, response: ResponseTemplate, calls: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .expect(calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_statements_are_appended_in_catalog_order() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server, dir.path());

    mount_problem_set(
        &server,
        vec![
            problem(2000, "B", "Second", Some(1200), &["greedy", "sortings"]),
            problem(2000, "A", "First", None, &[]),
        ],
    )
    .await;
    mount_page(
        &server,
        "/problemset/problem/2000/B",
        ResponseTemplate::new(200).set_body_string(problem_page("Sort it.", "n numbers", "the answer")),
        1,
    )
    .await;
    mount_page(
        &server,
        "/problemset/problem/2000/A",
        ResponseTemplate::new(200).set_body_string(problem_page("Add them.", "two numbers", "their sum")),
        1,
    )
    .await;

    let report = harvest_statements(&config, Selection::Catalog).await.unwrap();

    assert_eq!(report.succeeded, 2);
    assert_eq!(report.rows_written, 2);
    assert_eq!(report.delays, 2);
    assert_eq!(
        read(&config.output.problems_path),
        "2000,B,Second,1200,\"['greedy', 'sortings']\",\"Sort it.\n\nn numbers\n\nthe answer\"\n\
         2000,A,First,,[],\"Add them.\n\ntwo numbers\n\ntheir sum\"\n"
    );
}

#[tokio::test]
async fn test_page_without_input_section_keeps_both_separators() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server, dir.path());

    mount_problem_set(&server, vec![problem(1, "A", "Interactive", Some(1500), &["interactive"])]).await;
    mount_page(
        &server,
        "/problemset/problem/1/A",
        ResponseTemplate::new(200).set_body_string(
            r#"<div class="problem-statement">
<div class="header">A. Interactive</div>
<div>Guess the number.</div>
<div class="output-specification"><div class="section-title">Output</div>Print it.</div>
</div>"#,
        ),
        1,
    )
    .await;

    harvest_statements(&config, Selection::Catalog).await.unwrap();

    let table = read(&config.output.problems_path);
    assert!(table.ends_with(",\"Guess the number.\n\n\n\nPrint it.\"\n"));
}

#[tokio::test]
async fn test_failed_page_is_logged_and_batch_continues() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server, dir.path());

    mount_problem_set(
        &server,
        vec![
            problem(5, "A", "Broken", None, &[]),
            problem(5, "B", "Fine", None, &[]),
        ],
    )
    .await;
    mount_page(&server, "/problemset/problem/5/A", ResponseTemplate::new(403), 1).await;
    mount_page(
        &server,
        "/problemset/problem/5/B",
        ResponseTemplate::new(200).set_body_string(problem_page("L", "I", "O")),
        1,
    )
    .await;

    let report = harvest_statements(&config, Selection::Catalog).await.unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(report.succeeded, 1);

    let table = read(&config.output.problems_path);
    assert_eq!(table.lines().next(), Some("5,B,Fine,,[],\"L"));

    let log = read(&config.output.problems_log);
    assert_eq!(log.lines().count(), 1);
    assert!(log.contains(" - ERROR - Failed to fetch statement for problem 5/A. Status code: 403"));
}

#[tokio::test]
async fn test_retry_refetches_only_failed_problems() {
    let dir = TempDir::new().unwrap();

    // First run: B fails
    {
        let server = MockServer::start().await;
        let config = test_config(&server, dir.path());
        mount_problem_set(
            &server,
            vec![problem(8, "A", "Alpha", None, &[]), problem(8, "B", "Beta", None, &[])],
        )
        .await;
        mount_page(
            &server,
            "/problemset/problem/8/A",
            ResponseTemplate::new(200).set_body_string(problem_page("a", "b", "c")),
            1,
        )
        .await;
        mount_page(&server, "/problemset/problem/8/B", ResponseTemplate::new(500), 1).await;

        let report = harvest_statements(&config, Selection::Catalog).await.unwrap();
        assert_eq!(report.failed, 1);
    }

    // Second run: only B is requested
    let server = MockServer::start().await;
    let config = test_config(&server, dir.path());
    mount_problem_set(
        &server,
        vec![problem(8, "A", "Alpha", None, &[]), problem(8, "B", "Beta", None, &[])],
    )
    .await;
    mount_page(
        &server,
        "/problemset/problem/8/A",
        ResponseTemplate::new(200).set_body_string(problem_page("a", "b", "c")),
        0,
    )
    .await;
    mount_page(
        &server,
        "/problemset/problem/8/B",
        ResponseTemplate::new(200).set_body_string(problem_page("x", "y", "z")),
        1,
    )
    .await;

    let report = harvest_statements(&config, Selection::RetryFailed).await.unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(report.succeeded, 1);

    let table = read(&config.output.problems_path);
    assert!(table.starts_with("8,A,Alpha,"));
    assert!(table.contains("8,B,Beta,,[],\"x\n\ny\n\nz\"\n"));
}

#[tokio::test]
async fn test_key_value_failure_log_round_trip() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    let mut config = test_config(&server, dir.path());
    config.output.log_format = LogFormat::KeyValue;

    mount_problem_set(&server, vec![problem(3, "C1", "Easy version", None, &[])]).await;
    Mock::given(method("GET"))
        .and(path("/problemset/problem/3/C1"))
        .respond_with(ResponseTemplate::new(504))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/problemset/problem/3/C1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(problem_page("p", "q", "r")))
        .mount(&server)
        .await;

    harvest_statements(&config, Selection::Catalog).await.unwrap();

    let log = read(&config.output.problems_log);
    assert!(log.contains(" level=ERROR id=3/C1 msg=\""));

    let report = harvest_statements(&config, Selection::RetryFailed).await.unwrap();
    assert_eq!(report.succeeded, 1);
}

#[tokio::test]
async fn test_unavailable_problem_set_ends_the_run_quietly() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server, dir.path());

    Mock::given(method("GET"))
        .and(path("/api/problemset.problems"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let report = harvest_statements(&config, Selection::Catalog).await.unwrap();

    assert_eq!(report, BatchReport::default());
    assert!(!config.output.problems_path.exists());
    assert!(!config.output.problems_log.exists());
}

#[tokio::test]
async fn test_empty_problem_set_performs_no_iteration() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server, dir.path());

    Mock::given(method("GET"))
        .and(path("/api/problemset.problems"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "result": { "problems": [], "problemStatistics": [] }
        })))
        .mount(&server)
        .await;

    let report = harvest_statements(&config, Selection::Catalog).await.unwrap();

    assert_eq!(report, BatchReport::default());
}
