//! Integration tests for httplog.
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::cell::Cell;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use httplog::headers::LOG_RESPONSE_BODY;
use httplog::{
    Body, Direction, Error, FormUrlencodedBodyMasker, HeaderRedactor, HttpLogFormatter,
    HttpLoggingConfig, IdGenerator, JsonBodyMasker, LogEvent, Masker, MaskerChain,
    SectionOverrides, UriQueryMasker,
};

fn fields(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

fn header(name: &str, value: &str) -> (String, Vec<String>) {
    (name.to_string(), vec![value.to_string()])
}

#[test]
fn test_error_types() {
    let err = Error::InvalidConfig("negative column width".to_string());
    let display = format!("{err}");
    assert!(display.contains("invalid configuration"));
    assert!(display.contains("negative column width"));

    let err = Error::OperationFailed {
        operation: "read_config".to_string(),
        cause: "file not found".to_string(),
    };
    let display = format!("{err}");
    assert!(display.contains("read_config"));
    assert!(display.contains("file not found"));
}

#[test]
fn test_json_password_masked() {
    let masker = JsonBodyMasker::new(&fields(&["password"])).unwrap();
    assert_eq!(
        masker.mask(Some(r#"{"password":"secret123","user":"bob"}"#)),
        r#"{"password":"<MASKED>","user":"bob"}"#
    );
}

#[test]
fn test_form_leading_and_trailing_value() {
    let masker = FormUrlencodedBodyMasker::new(&fields(&["token"])).unwrap();
    assert_eq!(
        masker.mask(Some("token=abc123&user=bob")),
        "token=<MASKED>&user=bob"
    );
    assert_eq!(
        masker.mask(Some("user=bob&token=abc123")),
        "user=bob&token=<MASKED>"
    );
}

#[test]
fn test_header_map_rendering() {
    let mut headers = BTreeMap::new();
    headers.insert("Authorization", vec!["Bearer xyz"]);
    headers.insert("X-Trace", vec!["t1"]);

    let rendered = HeaderRedactor::new().render(headers, &fields(&["Authorization"]));
    assert_eq!(rendered, "Authorization:<MASKED>;X-Trace:t1");
}

#[test]
fn test_oversized_body_never_reaches_maskers() {
    let mut config = HttpLoggingConfig::default();
    config.request.max_body_size = 10;

    struct Panicking;
    impl Masker for Panicking {
        fn mask(&self, _text: Option<&str>) -> String {
            panic!("masker invoked for an oversized body");
        }
    }

    let formatter = HttpLogFormatter::new("client", Arc::new(config))
        .unwrap()
        .with_body_maskers(Direction::Request, MaskerChain::new().with(Panicking));

    let body = "b".repeat(50);
    let line = formatter
        .body_line(None, Body::text(&body), Direction::Request)
        .unwrap();
    assert!(line.contains("50"));
    assert!(line.ends_with("<TOO BIG 50 bytes>"));
}

#[test]
fn test_absent_input_yields_empty_string() {
    let names = fields(&["token"]);
    assert_eq!(JsonBodyMasker::new(&names).unwrap().mask(None), "");
    assert_eq!(FormUrlencodedBodyMasker::new(&names).unwrap().mask(None), "");
    assert_eq!(UriQueryMasker::new(&names).unwrap().mask(None), "");
    assert_eq!(MaskerChain::new().mask(None), "");
}

#[test]
fn test_chain_masks_json_then_form() {
    let names = fields(&["token"]);
    let chain = MaskerChain::new()
        .with(JsonBodyMasker::new(&names).unwrap())
        .with(FormUrlencodedBodyMasker::new(&names).unwrap());

    assert_eq!(
        chain.mask(Some(r#"{"token":"abc"}"#)),
        r#"{"token":"<MASKED>"}"#
    );
    assert_eq!(chain.mask(Some("a=1&token=abc")), "a=1&token=<MASKED>");
}

#[test]
fn test_request_response_pair() {
    let formatter =
        HttpLogFormatter::new("billing", Arc::new(HttpLoggingConfig::default())).unwrap();
    let ids = IdGenerator::seeded(7);
    let id = ids.next_id();
    let started_at = Instant::now();

    let request_headers = vec![
        header("authorization", "Bearer xyz"),
        header("Content-Type", "application/x-www-form-urlencoded"),
    ];
    let request = formatter.render(LogEvent {
        direction: Direction::Request,
        overrides: SectionOverrides::default(),
        id: &id,
        uri: "/oauth/token?code=c0de&state=s#frag",
        headers: &request_headers,
        body: Body::text("grant_type=password&password=hunter2"),
        started_at,
    });

    let response_headers = vec![
        header("Content-Type", "application/json"),
        header(LOG_RESPONSE_BODY, "false"),
    ];
    let response = formatter.render(LogEvent {
        direction: Direction::Response,
        overrides: SectionOverrides::from_control_headers(
            response_headers.iter().map(|(k, v)| (k, v)),
            Direction::Response,
        ),
        id: &id,
        uri: "/oauth/token",
        headers: &response_headers,
        body: Body::deferred(None, || panic!("response body disabled")),
        started_at,
    });

    assert!(request.starts_with("\n===========================billing Request begin"));
    assert!(request.contains(&format!("=ID           : {id}")));
    assert!(request.contains("=URI          : /oauth/token?code=<MASKED>&state=s#frag"));
    assert!(request.contains("authorization:<MASKED>;Content-Type:application/x-www-form-urlencoded"));
    assert!(request.contains("=Body         : grant_type=password&password=<MASKED>"));
    assert!(!request.contains("=Took"));

    assert!(response.contains(&format!("=ID           : {id}")));
    assert!(response.contains("=Headers      : Content-Type:application/json\n"));
    assert!(!response.contains("=Body"));
    assert!(response.contains("=Took"));
    assert!(response.ends_with("billing Response end  ==========================="));
}

#[test]
fn test_sections_in_fixed_order() {
    let mut config = HttpLoggingConfig::default();
    config.request.took_time_included = true;
    let formatter = HttpLogFormatter::new("c", Arc::new(config)).unwrap();

    let block = formatter.render(LogEvent {
        direction: Direction::Request,
        overrides: SectionOverrides::default(),
        id: "0000-00",
        uri: "/",
        headers: &[],
        body: Body::empty(),
        started_at: Instant::now(),
    });

    let labels: Vec<&str> = block
        .lines()
        .filter(|l| l.starts_with('=') && !l.starts_with("=="))
        .map(|l| l.trim_start_matches('=').split_whitespace().next().unwrap())
        .collect();
    assert_eq!(labels, ["ID", "URI", "Headers", "Body", "Took"]);
}

#[test]
fn test_config_file_drives_formatter() {
    let config = HttpLoggingConfig::from_toml_str(
        r#"
        new_line_column_symbols = 8

        [request.mask]
        mask_json_body_keys = ["pin"]
        mask_query_parameters = []
        "#,
    )
    .unwrap();
    let formatter = HttpLogFormatter::new("c", Arc::new(config)).unwrap();

    assert_eq!(
        formatter.uri_line(None, "/a?token=t", Direction::Request),
        Some("=URI    : /a?token=t".to_string())
    );
    assert_eq!(
        formatter.body_line(None, Body::text(r#"{"pin":"1","password":"p"}"#), Direction::Request),
        Some(r#"=Body   : {"pin":"<MASKED>","password":"p"}"#.to_string())
    );
}

#[test]
fn test_negative_column_width_fails_fast() {
    let err = HttpLoggingConfig::from_toml_str("new_line_column_symbols = -1").unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));
}

#[test]
fn test_disabled_config_never_materializes_body() {
    let mut config = HttpLoggingConfig::default();
    config.enabled = false;
    let formatter = HttpLogFormatter::new("c", Arc::new(config)).unwrap();
    let called = Cell::new(false);

    let logged = formatter.log(LogEvent {
        direction: Direction::Request,
        overrides: SectionOverrides::default(),
        id: "0000-00",
        uri: "/",
        headers: &[],
        body: Body::deferred(None, || {
            called.set(true);
            None
        }),
        started_at: Instant::now(),
    });

    assert!(logged.is_none());
    assert!(!called.get());
}

#[test]
fn test_formatter_shared_across_threads() {
    let formatter = Arc::new(
        HttpLogFormatter::new("shared", Arc::new(HttpLoggingConfig::default())).unwrap(),
    );
    let ids = Arc::new(IdGenerator::new());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let formatter = Arc::clone(&formatter);
            let ids = Arc::clone(&ids);
            std::thread::spawn(move || {
                let id = ids.next_id();
                let body = format!(r#"{{"secret":"s{i}"}}"#);
                formatter.render(LogEvent {
                    direction: Direction::Response,
                    overrides: SectionOverrides::default(),
                    id: &id,
                    uri: "/",
                    headers: &[],
                    body: Body::text(&body),
                    started_at: Instant::now(),
                })
            })
        })
        .collect();

    for handle in handles {
        let block = handle.join().unwrap();
        assert!(block.contains(r#"{"secret":"<MASKED>"}"#));
    }
}
