#![allow(dead_code)]

use std::io::Write;

use tempfile::NamedTempFile;

use dslab_workflow::trace::MINUTES_PER_DAY;

pub fn assert_float_eq(x: f64, y: f64, eps: f64) {
    assert!(x > y - eps && x < y + eps);
}

pub fn trace_header() -> String {
    let mut header = "HashOwner,HashApp,HashFunction,Trigger".to_string();
    for minute in 1..=MINUTES_PER_DAY {
        header.push_str(&format!(",{}", minute));
    }
    header
}

/// Builds a trace row with zero invocations except the given (minute, value) pairs.
pub fn trace_row(function: &str, counts: &[(usize, &str)]) -> String {
    let mut values = vec!["0"; MINUTES_PER_DAY];
    for &(minute, value) in counts {
        values[minute] = value;
    }
    format!("owner,app,{},http,{}", function, values.join(","))
}

pub fn write_trace(rows: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", trace_header()).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file.flush().unwrap();
    file
}
