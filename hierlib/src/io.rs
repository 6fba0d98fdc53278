use std::fs::File;
use std::io::{self, BufRead, Write};
use lazy_static::lazy_static;
use regex::Regex;
use crate::error::TraceError;
use crate::sweep::SweepRecord;

lazy_static! {
    static ref ADDRESS_LINE: Regex = Regex::new(r"^(?:0[xX](?P<hex>[0-9a-fA-F]+)|(?P<dec>[0-9]+))$").unwrap();
}

/// Column order of `write_csv`
pub const CSV_HEADER: [&str; 12] = [
    "L1 Size",
    "L2 Size",
    "L1 Assoc",
    "L2 Assoc",
    "Block Size",
    "Workload",
    "Policy",
    "L1 Hit Rate",
    "L2 Hit Rate",
    "AMAT",
    "L1 Cold Misses",
    "L2 Cold Misses",
];

pub fn get_reader(file: File) -> Result<impl BufRead, TraceError> {
    // Compatibility on other systems
    #[cfg(not(unix))]
    {
        use std::io::BufReader;
        Ok(BufReader::new(file))
    }
    // Memory map the file on unix systems, traces are only ever read front to back
    #[cfg(unix)]
    {
        use std::io::Cursor;
        use memmap2::{Advice, Mmap};
        unsafe {
            let m = Mmap::map(&file)?;
            m.advise(Advice::Sequential)?;
            Ok(Cursor::new(m))
        }
    }
}

/// Reads a trace of addresses, one per line
///
/// Addresses are decimal, or hexadecimal with a `0x` prefix. Blank lines and anything after a
/// `#` are ignored
///
/// # Examples
///
/// ```
/// use hierlib::io::read_trace;
/// let trace = "# warm up\n0x10\n  32 \n\n4 # again\n";
/// assert_eq!(read_trace(trace.as_bytes()).unwrap(), vec![16, 32, 4]);
/// ```
pub fn read_trace<R: BufRead>(reader: R) -> Result<Vec<u64>, TraceError> {
    let mut addresses = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let content = line.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }
        addresses.push(parse_address(content).ok_or_else(|| TraceError::Parse {
            line: index + 1,
            text: line.clone(),
        })?);
    }
    Ok(addresses)
}

fn parse_address(token: &str) -> Option<u64> {
    let captures = ADDRESS_LINE.captures(token)?;
    if let Some(hex) = captures.name("hex") {
        u64::from_str_radix(hex.as_str(), 16).ok()
    } else {
        captures.name("dec")?.as_str().parse().ok()
    }
}

/// Writes sweep records as CSV, with a header row
///
/// None of the fields can contain a comma or a quote, so no quoting is needed
pub fn write_csv<W: Write>(mut writer: W, records: &[SweepRecord]) -> io::Result<()> {
    writeln!(writer, "{}", CSV_HEADER.join(","))?;
    for r in records {
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{},{},{},{},{}",
            r.l1_size,
            r.l2_size,
            r.l1_associativity,
            r.l2_associativity,
            r.block_size,
            r.workload,
            r.policy,
            r.l1_hit_rate,
            r.l2_hit_rate,
            r.amat,
            r.l1_cold_misses,
            r.l2_cold_misses
        )?;
    }
    writer.flush()
}
