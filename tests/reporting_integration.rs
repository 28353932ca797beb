use apirecon::config::ScanConfig;
use apirecon::loader::DocumentFetcher;
use apirecon::reporting::{export_csv, format_report, write_csv, SourceReport, SEPARATOR};
use apirecon::scanner::{
    collect_sources, expand_spec_paths, read_url_list, render_reports, scan_source,
};
use apirecon::{Method, PublicEndpoint};
use pretty_assertions::assert_eq;
use std::fs;

fn report(source: &str, endpoints: Vec<PublicEndpoint>) -> SourceReport {
    SourceReport {
        source: source.to_string(),
        endpoints,
    }
}

#[test]
fn verbose_report_lists_endpoints() {
    let r = report(
        "https://api.example.com/swagger.json",
        vec![
            PublicEndpoint::new(Method::GET, "/health"),
            PublicEndpoint::new(Method::POST, "/login"),
        ],
    );
    assert_eq!(
        format_report(&r, false, SEPARATOR),
        "\n-----\nPublic endpoints in https://api.example.com/swagger.json:\n  GET /health\n  POST /login\n-----"
    );
}

#[test]
fn verbose_report_without_findings() {
    let r = report("spec.json", vec![]);
    assert_eq!(
        format_report(&r, false, "#####"),
        "\n#####\nPublic endpoints in spec.json:\n  No public endpoints found.\n#####"
    );
}

#[test]
fn silent_report_is_just_the_source() {
    let hit = report("a.json", vec![PublicEndpoint::new(Method::GET, "/")]);
    let miss = report("b.json", vec![]);
    assert_eq!(format_report(&hit, true, SEPARATOR), "a.json");
    assert_eq!(format_report(&miss, true, SEPARATOR), "");
    assert_eq!(render_reports(&[hit, miss], true, SEPARATOR), "a.json");
}

#[test]
fn csv_lists_every_public_endpoint() {
    let reports = vec![
        report("a.json", vec![PublicEndpoint::new(Method::GET, "/x")]),
        report("=evil", vec![PublicEndpoint::new(Method::DELETE, "/y,z")]),
    ];
    let mut buf = Vec::new();
    write_csv(&mut buf, &reports).unwrap();
    assert_eq!(
        String::from_utf8(buf).unwrap(),
        "Source,Method,Path\na.json,GET,/x\n\"'=evil\",DELETE,\"/y,z\"\n"
    );
}

#[test]
fn csv_export_creates_timestamped_file() {
    let reports = vec![report("a.json", vec![PublicEndpoint::new(Method::GET, "/x")])];
    let filename = export_csv(&reports).expect("CSV export should succeed");
    assert!(fs::metadata(&filename).is_ok(), "CSV file should exist: {}", filename);
    assert!(filename.starts_with("apirecon_public_"));
    assert!(filename.ends_with(".csv"));
    let _ = fs::remove_file(&filename);
}

#[test]
fn url_list_skips_blanks_and_comments() {
    let dir = tempfile::tempdir().unwrap();
    let list = dir.path().join("urls.txt");
    fs::write(&list, "https://a.example/swagger.json\n\n# staging\n  b.example/openapi.yaml  \n").unwrap();
    assert_eq!(
        read_url_list(&list).unwrap(),
        vec!["https://a.example/swagger.json", "b.example/openapi.yaml"]
    );
    assert!(read_url_list(&dir.path().join("missing.txt")).is_err());
}

#[test]
fn sources_are_normalised_and_expanded() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.json"), "{}").unwrap();
    fs::write(dir.path().join("b.yaml"), "{}").unwrap();
    fs::write(dir.path().join("notes.txt"), "").unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("nested").join("c.yml"), "{}").unwrap();

    let files = expand_spec_paths(&[dir.path().to_path_buf()]);
    assert_eq!(files.len(), 3);
    assert!(files[0].ends_with("a.json"));
    assert!(files[1].ends_with("b.yaml"));
    assert!(files[2].ends_with("c.yml"));

    let config = ScanConfig {
        urls: vec!["example.com/swagger.json".to_string()],
        specs: vec![dir.path().join("a.json")],
        ..ScanConfig::default()
    };
    let sources = collect_sources(&config).unwrap();
    assert_eq!(sources[0], "https://example.com/swagger.json");
    assert!(sources[1].ends_with("a.json"));
    assert_eq!(config.separator(), SEPARATOR);
}

#[tokio::test]
async fn scanning_a_local_document() {
    let dir = tempfile::tempdir().unwrap();
    let spec = dir.path().join("swagger.json");
    fs::write(
        &spec,
        r#"{
            "swagger": "2.0",
            "securityDefinitions": {"key": {"type": "apiKey", "in": "header", "name": "X-Key"}},
            "security": [{"key": []}],
            "paths": {
                "/status": {"get": {"security": []}},
                "/admin": {"post": {}}
            }
        }"#,
    )
    .unwrap();

    let fetcher = DocumentFetcher::new().unwrap();
    let source = spec.display().to_string();
    let result = scan_source(&fetcher, &source, false).await;
    assert_eq!(result.endpoints, vec![PublicEndpoint::new(Method::GET, "/status")]);

    // unreadable sources are reported as empty, not as errors
    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{{{").unwrap();
    let result = scan_source(&fetcher, &broken.display().to_string(), false).await;
    assert!(!result.has_public());
    let result = scan_source(&fetcher, "/definitely/not/here.json", false).await;
    assert!(!result.has_public());
    let result = scan_source(&fetcher, "/definitely/not/here.json", true).await;
    assert!(!result.has_public());
    assert_eq!(result.source, "/definitely/not/here.json");
}
