use std::error::Error;
use std::fs::{self, File};
use crate::error::TraceError;
use crate::io::{get_reader, read_trace, write_csv, CSV_HEADER};
use crate::replacement_policies::ReplacementPolicy;
use crate::sweep::SweepRecord;
use crate::workload::AccessPattern;

#[test]
fn reads_decimal_and_hex_addresses() -> Result<(), Box<dyn Error>> {
    let trace = "0\n0x4\n0XFF\n\n   # comment only\n  12  \n0x10 # trailing\n";
    assert_eq!(read_trace(trace.as_bytes())?, vec![0, 4, 255, 12, 16]);
    Ok(())
}

#[test]
fn reports_line_of_bad_address() {
    match read_trace("1\n2\nzz\n".as_bytes()) {
        Err(TraceError::Parse { line, text }) => {
            assert_eq!(line, 3);
            assert_eq!(text, "zz");
        }
        other => panic!("Expected a parse error, got {other:?}"),
    }
    assert!(read_trace("0x".as_bytes()).is_err());
    assert!(read_trace("-4".as_bytes()).is_err());
    assert!(read_trace("99999999999999999999999".as_bytes()).is_err());
}

#[test]
fn reads_trace_file_through_reader() -> Result<(), Box<dyn Error>> {
    let path = std::env::temp_dir().join(format!("hierlib-trace-{}.txt", std::process::id()));
    fs::write(&path, "0\n4\n0\n8\n")?;
    let addresses = read_trace(get_reader(File::open(&path)?)?);
    fs::remove_file(&path)?;
    assert_eq!(addresses?, vec![0, 4, 0, 8]);
    Ok(())
}

#[test]
fn writes_csv_with_header() -> Result<(), Box<dyn Error>> {
    let record = SweepRecord {
        l1_size: 64,
        l2_size: 128,
        l1_associativity: 1,
        l2_associativity: 2,
        block_size: 4,
        workload: AccessPattern::Looping,
        policy: ReplacementPolicy::LeastRecentlyUsed,
        l1_hit_rate: 0.84,
        l2_hit_rate: 0.0,
        amat: 9.8,
        l1_cold_misses: 16,
        l2_cold_misses: 16,
    };
    let mut out = Vec::new();
    write_csv(&mut out, &[record.clone(), record])?;
    let text = String::from_utf8(out)?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], CSV_HEADER.join(","));
    assert_eq!(lines[1], "64,128,1,2,4,looping,LRU,0.84,0,9.8,16,16");
    Ok(())
}

#[test]
fn json_records_use_column_names() -> Result<(), Box<dyn Error>> {
    let record = SweepRecord {
        l1_size: 64,
        l2_size: 64,
        l1_associativity: 4,
        l2_associativity: 4,
        block_size: 8,
        workload: AccessPattern::Random,
        policy: ReplacementPolicy::FirstInFirstOut,
        l1_hit_rate: 0.5,
        l2_hit_rate: 0.25,
        amat: 20.0,
        l1_cold_misses: 8,
        l2_cold_misses: 8,
    };
    let value = serde_json::to_value(&record)?;
    assert_eq!(value["L1 Assoc"], 4);
    assert_eq!(value["Workload"], "random");
    assert_eq!(value["Policy"], "FIFO");
    let back: SweepRecord = serde_json::from_value(value)?;
    assert_eq!(back, record);
    Ok(())
}
