use std::io::Write;

use clickpath_core::metrics::{bounce_rate, conversion_rate, DEFAULT_SUCCESS_EVENT};
use clickpath_csv::{CsvLoader, LoadError};

const SAMPLE: &str = "\
direct,mobile,home,product_1,purchase_start,purchase_success,,,,,,,,,,,,
facebook_advert,desktop,home,,,,,,,,,,,,,,,
search,tablet,,product_2,,cart,,,,,,,,,,,,
linkedin_share,mobile,home,product_1,product_2,product_3,product_4,product_5,product_6,product_7,product_8,product_9,product_10,product_11,product_12,product_13,product_14,product_15,overflow
partner_advert,mobile
";

#[test]
fn loads_sparse_rows_and_skips_overlong_ones() {
    let outcome = CsvLoader::new()
        .load_reader(SAMPLE.as_bytes())
        .expect("load sample");

    assert_eq!(outcome.skipped_rows, 1);
    let sessions = outcome.store.sessions();
    assert_eq!(sessions.len(), 4);

    assert_eq!(
        sessions[0].path().as_slice(),
        ["home", "product_1", "purchase_start", "purchase_success"]
    );
    assert_eq!(sessions[1].path().as_slice(), ["home"]);
    assert_eq!(sessions[2].path().as_slice(), ["product_2", "cart"]);
    assert_eq!(sessions[3].source(), "partner_advert");
    assert!(sessions[3].path().is_empty());

    assert_eq!(bounce_rate(sessions), 50.0);
    assert_eq!(conversion_rate(sessions, DEFAULT_SUCCESS_EVENT), 25.0);
}

#[test]
fn missing_device_fails_the_load() {
    let data = "direct,mobile,home\nsearch\n";
    let err = CsvLoader::new()
        .load_reader(data.as_bytes())
        .expect_err("missing device");
    match err {
        LoadError::Malformed { line, field } => {
            assert_eq!(line, 2);
            assert_eq!(field, "device");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_row_after_skipped_row_reports_its_own_line() {
    let overlong = format!("linkedin_share,mobile{}", ",page".repeat(17));
    let data = format!("direct,mobile,home\n{overlong}\nsearch\n");
    let err = CsvLoader::new()
        .load_reader(data.as_bytes())
        .expect_err("missing device");
    match err {
        LoadError::Malformed { line, field } => {
            assert_eq!(line, 3);
            assert_eq!(field, "device");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_line_counts_the_header() {
    let data = "Source,Device,Link 1\ndirect,mobile,home\n,tablet,cart\n";
    let err = CsvLoader::new()
        .has_headers(true)
        .load_reader(data.as_bytes())
        .expect_err("missing source");
    assert!(matches!(
        err,
        LoadError::Malformed {
            line: 3,
            field: "source"
        }
    ));
}

#[test]
fn load_path_reads_a_file() {
    let path = std::env::temp_dir().join(format!(
        "clickpath-load-{}.csv",
        std::process::id()
    ));
    {
        let mut file = std::fs::File::create(&path).expect("create temp file");
        file.write_all(SAMPLE.as_bytes()).expect("write sample");
    }

    let outcome = CsvLoader::new().load_path(&path).expect("load file");
    assert_eq!(outcome.store.len(), 4);

    std::fs::remove_file(&path).ok();
}

#[test]
fn missing_file_reports_path() {
    let err = CsvLoader::new()
        .load_path("/nonexistent/clickstream.csv")
        .expect_err("missing file");
    assert!(matches!(err, LoadError::Io { .. }));
    assert!(err.to_string().contains("/nonexistent/clickstream.csv"));
}

#[test]
fn empty_input_yields_empty_store() {
    let outcome = CsvLoader::new().load_reader("".as_bytes()).expect("load");
    assert!(outcome.store.is_empty());
    assert_eq!(outcome.skipped_rows, 0);
}
