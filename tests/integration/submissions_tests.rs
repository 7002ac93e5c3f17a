use crate::common::{contest, ok, read, submission, test_config};
use cf_harvest::batch::{harvest_submissions, Selection};
use cf_harvest::BatchReport;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_contest_list(server: &MockServer, contests: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/contest.list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(contests)))
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, contest_id: i64, response: ResponseTemplate, calls: u64) {
    Mock::given(method("GET"))
        .and(path("/api/contest.status"))
        .and(query_param("contestId", contest_id.to_string()))
        .respond_with(response)
        .expect(calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_only_finished_contests_are_counted() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server, dir.path());

    mount_contest_list(&server, json!([contest(1, "FINISHED"), contest(2, "CODING")])).await;
    mount_status(
        &server,
        1,
        ResponseTemplate::new(200).set_body_json(ok(json!([
            submission(1, "A", "OK"),
            submission(1, "A", "WRONG_ANSWER"),
            submission(1, "A", "OK"),
            submission(1, "A", "OK"),
            submission(1, "A", "MEMORY_LIMIT_EXCEEDED")
        ]))),
        1,
    )
    .await;
    mount_status(&server, 2, ResponseTemplate::new(200).set_body_json(ok(json!([]))), 0).await;

    let report = harvest_submissions(&config, Selection::Catalog).await.unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.rows_written, 1);
    assert_eq!(
        read(&config.output.submissions_path),
        "problem,accepted_count,total_count\n\"(1, 'A')\",3,5\n"
    );
    assert!(!config.output.submissions_log.exists());
}

#[tokio::test]
async fn test_rows_follow_first_seen_order() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server, dir.path());

    mount_contest_list(&server, json!([contest(7, "FINISHED")])).await;
    mount_status(
        &server,
        7,
        ResponseTemplate::new(200).set_body_json(ok(json!([
            submission(7, "C", "WRONG_ANSWER"),
            submission(7, "A", "OK"),
            submission(7, "C", "OK"),
            submission(7, "B", "COMPILATION_ERROR")
        ]))),
        1,
    )
    .await;

    harvest_submissions(&config, Selection::Catalog).await.unwrap();

    assert_eq!(
        read(&config.output.submissions_path),
        "problem,accepted_count,total_count\n\
         \"(7, 'C')\",1,2\n\
         \"(7, 'A')\",1,1\n\
         \"(7, 'B')\",0,1\n"
    );
}

#[tokio::test]
async fn test_failed_contest_goes_to_failure_log() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server, dir.path());

    mount_contest_list(
        &server,
        json!([contest(3, "FINISHED"), contest(4, "FINISHED"), contest(5, "FINISHED")]),
    )
    .await;
    mount_status(
        &server,
        3,
        ResponseTemplate::new(200).set_body_json(ok(json!([submission(3, "A", "OK")]))),
        1,
    )
    .await;
    mount_status(&server, 4, ResponseTemplate::new(400), 1).await;
    mount_status(
        &server,
        5,
        ResponseTemplate::new(200).set_body_json(ok(json!([submission(5, "D", "OK")]))),
        1,
    )
    .await;

    let report = harvest_submissions(&config, Selection::Catalog).await.unwrap();

    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.delays, 3);

    let table = read(&config.output.submissions_path);
    assert_eq!(
        table,
        "problem,accepted_count,total_count\n\"(3, 'A')\",1,1\n\"(5, 'D')\",1,1\n"
    );

    let log = read(&config.output.submissions_log);
    assert_eq!(log.lines().count(), 1);
    assert!(log
        .trim_end()
        .ends_with(" - ERROR - Failed to fetch submissions for contest 4. Status code: 400"));
}

#[tokio::test]
async fn test_header_written_once_across_runs() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server, dir.path());

    mount_contest_list(&server, json!([contest(9, "FINISHED")])).await;
    mount_status(
        &server,
        9,
        ResponseTemplate::new(200).set_body_json(ok(json!([submission(9, "A", "OK")]))),
        2,
    )
    .await;

    harvest_submissions(&config, Selection::Catalog).await.unwrap();
    harvest_submissions(&config, Selection::Catalog).await.unwrap();

    let table = read(&config.output.submissions_path);
    assert_eq!(table.matches("problem,accepted_count,total_count").count(), 1);
    assert_eq!(table.matches("\"(9, 'A')\",1,1").count(), 2);
}

#[tokio::test]
async fn test_unavailable_contest_list_ends_the_run_quietly() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server, dir.path());

    Mock::given(method("GET"))
        .and(path("/api/contest.list"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/contest.status"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let report = harvest_submissions(&config, Selection::Catalog).await.unwrap();

    assert_eq!(report, BatchReport::default());
    assert!(!config.output.submissions_path.exists());
    assert!(!config.output.submissions_log.exists());
}

#[tokio::test]
async fn test_rejected_contest_list_counts_as_no_catalog() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server, dir.path());

    Mock::given(method("GET"))
        .and(path("/api/contest.list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "FAILED",
            "comment": "Call limit exceeded"
        })))
        .mount(&server)
        .await;

    let report = harvest_submissions(&config, Selection::Catalog).await.unwrap();

    assert_eq!(report, BatchReport::default());
}

#[tokio::test]
async fn test_retry_walks_only_logged_contests() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server, dir.path());

    // Left behind by an earlier run
    std::fs::write(
        &config.output.submissions_log,
        "2025-02-20 10:11:12,345 - ERROR - Failed to fetch submissions for contest 12. Status code: 503\n\
         2025-02-20 10:11:20,001 - ERROR - Failed to fetch submissions for contest 15. Status code: 429\n",
    )
    .unwrap();

    Mock::given(method("GET"))
        .and(path("/api/contest.list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!([]))))
        .expect(0)
        .mount(&server)
        .await;
    mount_status(
        &server,
        12,
        ResponseTemplate::new(200).set_body_json(ok(json!([submission(12, "B", "OK")]))),
        1,
    )
    .await;
    mount_status(
        &server,
        15,
        ResponseTemplate::new(200).set_body_json(ok(json!([submission(15, "E", "WRONG_ANSWER")]))),
        1,
    )
    .await;

    let report = harvest_submissions(&config, Selection::RetryFailed).await.unwrap();

    assert_eq!(report.succeeded, 2);
    assert_eq!(
        read(&config.output.submissions_path),
        "problem,accepted_count,total_count\n\"(12, 'B')\",1,1\n\"(15, 'E')\",0,1\n"
    );
}

#[tokio::test]
async fn test_retry_without_failure_log_does_nothing() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server, dir.path());

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let report = harvest_submissions(&config, Selection::RetryFailed).await.unwrap();

    assert_eq!(report, BatchReport::default());
}
