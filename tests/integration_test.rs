use assert_cmd::Command;
use assert_cmd::cargo;
use mockito::{Matcher, Server};
use std::io::Write;
use tempfile::NamedTempFile;

fn xmpush() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("xmpush"));
    cmd.env_remove("XMPUSH_CONFIG")
        .env_remove("XMPUSH_APP_SECRET")
        .env_remove("XMPUSH_PACKAGE")
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn test_send_to_reg_ids() {
    let mut server = Server::new();

    let mock = server
        .mock("POST", "/v3/message/regid")
        .match_header("authorization", "key=secret")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("registration_id".into(), "r1,r2".into()),
            Matcher::UrlEncoded("restricted_package_name".into(), "com.example.app".into()),
            Matcher::UrlEncoded("title".into(), "hello".into()),
            Matcher::UrlEncoded("description".into(), "from the cli".into()),
            Matcher::UrlEncoded("extra.badge".into(), "3".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"result":"ok","code":0,"trace_id":"t1","data":{"id":"scm0001"}}"#)
        .create();

    xmpush()
        .args([
            "--app-secret",
            "secret",
            "--package",
            "com.example.app",
            "--api-url",
            &server.url(),
            "send",
            "--reg-id",
            "r1",
            "--reg-id",
            "r2",
            "--title",
            "hello",
            "--description",
            "from the cli",
            "--badge",
            "3",
        ])
        .assert()
        .success()
        .stdout(predicates::str::contains("scm0001"));

    mock.assert();
}

#[test]
fn test_config_file_and_error_code() {
    let mut server = Server::new();

    let mock = server
        .mock("POST", "/v2/schedule_job/delete")
        .match_header("authorization", "key=file-secret")
        .match_body(Matcher::UrlEncoded("job_id".into(), "job_9".into()))
        .with_status(200)
        .with_body(r#"{"result":"error","code":20301,"reason":"job not found"}"#)
        .create();

    let mut config = NamedTempFile::new().unwrap();
    write!(
        config,
        r#"{{"appSecret":"file-secret","packageName":["com.example.app"]}}"#
    )
    .unwrap();

    xmpush()
        .arg("--config")
        .arg(config.path())
        .args(["--api-url", &server.url(), "job-delete", "job_9"])
        .assert()
        .failure()
        .stdout(predicates::str::contains("20301"))
        .stderr(predicates::str::contains("job not found"));

    mock.assert();
}

#[test]
fn test_server_error_is_retried() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/v1/topic/all")
        .match_query(Matcher::UrlEncoded("registration_id".into(), "r1".into()))
        .with_status(503)
        .with_body("busy")
        .expect(3)
        .create();

    xmpush()
        .args([
            "--app-secret",
            "secret",
            "--package",
            "com.example.app",
            "--api-url",
            &server.url(),
            "topics",
            "r1",
        ])
        .assert()
        .failure()
        .stderr(predicates::str::contains("status 503"));

    mock.assert();
}

#[test]
fn test_verbose_dumps_requests() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/v1/topic/all")
        .match_query(Matcher::UrlEncoded("registration_id".into(), "r1".into()))
        .with_status(200)
        .with_body(r#"{"result":"ok","code":0,"data":{"list":["news"]}}"#)
        .create();

    xmpush()
        .env_remove("RUST_LOG")
        .args([
            "--app-secret",
            "secret",
            "--package",
            "com.example.app",
            "--api-url",
            &server.url(),
            "-v",
            "topics",
            "r1",
        ])
        .assert()
        .success()
        .stdout(predicates::str::contains("news"))
        .stderr(predicates::str::contains("request url"))
        .stderr(predicates::str::contains("status: 200"));

    mock.assert();
}

#[test]
fn test_missing_credentials() {
    xmpush()
        .args(["--package", "com.example.app", "invalid-reg-ids"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("Failed to create client"));
}

#[test]
fn test_invalid_message_is_not_sent() {
    let server = Server::new();

    xmpush()
        .args([
            "--app-secret",
            "secret",
            "--package",
            "com.example.app",
            "--api-url",
            &server.url(),
            "send",
            "--all",
            "--title",
            "",
            "--description",
            "d",
        ])
        .assert()
        .failure()
        .stderr(predicates::str::contains("title"));
}
