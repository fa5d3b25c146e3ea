use rayon::prelude::*;

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::time::Duration;

use error::{Error, Result};
use rules::{Rule, RuleSink};
use sequence::Sequence;

/// Reads the whole dataset at `path`, one sequence per non-blank line.
pub fn read_sequences(path: &Path) -> Result<Vec<Sequence>> {
    let file = File::open(path).map_err(Error::io("open", path))?;
    let mut text = String::new();
    BufReader::new(file)
        .read_to_string(&mut text)
        .map_err(Error::io("read", path))?;

    let sequences = parse_sequences(&text)?;
    info!("read {} sequences from {}", sequences.len(), path.display());
    Ok(sequences)
}

/// Parses dataset text. Lines are parsed in parallel but keep their order;
/// errors report the 1-based line number.
pub fn parse_sequences(text: &str) -> Result<Vec<Sequence>> {
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .filter(|&(index, line)| {
            let blank = line.trim().is_empty();
            if blank {
                debug!("skipping blank line {}", index + 1);
            }
            !blank
        })
        .collect();

    lines
        .into_par_iter()
        .map(|(index, line)| {
            line.parse::<Sequence>().map_err(|source| Error::Parse {
                line: index + 1,
                source,
            })
        })
        .collect()
}

/// Writes one rule per line, optionally echoing each to stdout.
pub struct RuleWriter<W: Write> {
    out: BufWriter<W>,
    echo: bool,
    written: usize,
}

impl RuleWriter<File> {
    pub fn create(path: &Path, echo: bool) -> Result<Self> {
        let file = File::create(path).map_err(Error::io("create", path))?;
        Ok(Self::new(file, echo))
    }
}

impl<W: Write> RuleWriter<W> {
    pub fn new(out: W, echo: bool) -> Self {
        Self {
            out: BufWriter::new(out),
            echo,
            written: 0,
        }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Flushes and hands back the underlying writer.
    pub fn finish(self) -> io::Result<W> {
        self.out.into_inner().map_err(|err| err.into_error())
    }
}

impl<W: Write> RuleSink for RuleWriter<W> {
    type Error = io::Error;

    fn accept(&mut self, rule: Rule) -> io::Result<()> {
        writeln!(self.out, "{}", rule)?;
        if self.echo {
            println!("{}", rule);
        }
        self.written += 1;
        Ok(())
    }
}

/// Appends `Min Utility: <t>, Execution Time: <s> seconds` to the log at
/// `path`, creating it if needed.
pub fn append_execution_log(path: &Path, min_utility: f64, elapsed: Duration) -> Result<()> {
    let mut log = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(Error::io("open", path))?;

    writeln!(
        log,
        "Min Utility: {}, Execution Time: {} seconds",
        min_utility,
        elapsed.as_secs_f64()
    )
    .map_err(Error::io("append to", path))
}

#[cfg(test)]
mod tests {
    use super::{append_execution_log, parse_sequences, read_sequences, RuleWriter};
    use error::Error;
    use rules::{Rule, RuleSink};
    use sequence::{Item, ParseError};
    use std::fs;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn test_parse_keeps_order_and_skips_blank_lines() {
        let text = "1[5] 2[3] -1 SUtility:20\n\n   \n3[1] -1 SUtility:4\n";
        let sequences = parse_sequences(text).unwrap();

        assert_eq!(sequences.len(), 2);
        assert_eq!(sequences[0].items(), &[Item::new(1, 5), Item::new(2, 3)]);
        assert_eq!(sequences[1].utility(), 4);
    }

    #[test]
    fn test_parse_error_reports_line() {
        let text = "1[5] -1 SUtility:20\n\n2[x] -1 SUtility:3\n";

        match parse_sequences(text) {
            Err(Error::Parse { line, source }) => {
                assert_eq!(line, 3);
                assert_eq!(source, ParseError::MalformedItem("2[x]".to_string()));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.txt");

        match read_sequences(&path) {
            Err(Error::Io { action, .. }) => assert_eq!(action, "open"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_read_sequences_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.txt");
        fs::write(&path, "1[5] 2[3] -1 SUtility:20\n4[2] -1 -2 SUtility:9\n").unwrap();

        let sequences = read_sequences(&path).unwrap();

        assert_eq!(sequences.len(), 2);
        assert_eq!(sequences[1].items(), &[Item::new(4, 2)]);
    }

    #[test]
    fn test_rule_writer_writes_lines() {
        let mut writer = RuleWriter::new(Vec::new(), false);
        writer
            .accept(Rule::SinglePath {
                path: " -> 1".to_string(),
                cumulative_utility: 7,
            })
            .unwrap();
        writer
            .accept(Rule::Edge {
                antecedent: "".to_string(),
                consequent: "2".to_string(),
                sequence_id: 3,
                utility: 9,
                previous_utility: 1,
                remaining_utility: 8,
            })
            .unwrap();

        assert_eq!(writer.written(), 2);
        let out = String::from_utf8(writer.finish().unwrap()).unwrap();
        assert_eq!(
            out,
            "Single Path Rule:  -> 1 [Cumulative Utility: 7]\n\
             Rule:  -> 2 [SID: 3, Utility: 9, PUT: 1, RUT: 8]\n"
        );
    }

    #[test]
    fn test_execution_log_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("execution_log.txt");

        append_execution_log(&path, 65.0, Duration::from_millis(1500)).unwrap();
        append_execution_log(&path, 12.5, Duration::from_millis(250)).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Min Utility: 65, Execution Time: 1.5 seconds\n\
             Min Utility: 12.5, Execution Time: 0.25 seconds\n"
        );
    }
}
