//! Compact tabular text encoding of the snapshot history.
//!
//! The history is written as a handful of tables, each introduced by a
//! header of the form `name[rows]{field,field,...}:` followed by one indented,
//! comma-separated row per record:
//!
//! ```text
//! system_history[1]{timestamp,platform,cpu,...}:
//!   2025-01-01T12:00:00.250Z,Linux,92.0,...
//! disks[1]{sample,path,total,used,free,pct,error}:
//!   0,/,500107862016,250053931008,250053931008,50.0,~
//! ```
//!
//! Nested collections (disks, temperatures, processes) live in their own
//! tables whose `sample` column is the row index in `system_history`.
//! `~` marks an absent value. Floats always carry a fractional part or an
//! exponent and integers never do, so a reader can tell them apart. Strings
//! that could be mistaken for anything else are double-quoted.

use crate::model::{
    BatteryState, DiskStats, DiskStatus, DiskUsage, MemoryStats, ProcessSample, SensorReading,
    Snapshot, Temperatures,
};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write as _;
use thiserror::Error;

const ABSENT: &str = "~";

const HISTORY_TABLE: &str = "system_history";
const HISTORY_FIELDS: &[&str] = &[
    "timestamp",
    "platform",
    "cpu",
    "mem_total",
    "mem_used",
    "mem_available",
    "mem_pct",
    "battery",
    "battery_pct",
    "battery_plugged",
    "temps",
];

const DISK_TABLE: &str = "disks";
const DISK_FIELDS: &[&str] = &["sample", "path", "total", "used", "free", "pct", "error"];

const TEMPERATURE_TABLE: &str = "temperatures";
const TEMPERATURE_FIELDS: &[&str] = &["sample", "sensor", "celsius"];

const PROCESS_TABLE: &str = "processes";
const PROCESS_FIELDS: &[&str] = &["sample", "pid", "name", "cpu"];

const BATTERY_PRESENT: &str = "present";
const BATTERY_ABSENT: &str = "absent";
const BATTERY_UNSUPPORTED: &str = "unsupported";

const TEMPS_READINGS: &str = "readings";
const TEMPS_NONE: &str = "none";
const TEMPS_UNSUPPORTED: &str = "unsupported";

#[derive(Error, Debug, Clone, PartialEq)]
#[error("line {line}: {message}")]
pub struct DecodeError {
    pub line: usize,
    pub message: String,
}

impl DecodeError {
    fn new<S: Into<String>>(line: usize, message: S) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Render snapshots, oldest first, as tabular text.
pub fn serialize(snapshots: &[Snapshot]) -> String {
    let mut history = Vec::with_capacity(snapshots.len());
    let mut disks = Vec::new();
    let mut temperatures = Vec::new();
    let mut processes = Vec::new();

    for (index, snapshot) in snapshots.iter().enumerate() {
        let sample = index.to_string();

        let (battery, battery_pct, battery_plugged) = match &snapshot.battery {
            BatteryState::Present { percent, plugged } => {
                (BATTERY_PRESENT, float(*percent), plugged.to_string())
            }
            BatteryState::Absent => (BATTERY_ABSENT, ABSENT.to_string(), ABSENT.to_string()),
            BatteryState::Unsupported => {
                (BATTERY_UNSUPPORTED, ABSENT.to_string(), ABSENT.to_string())
            }
        };

        let temps = match &snapshot.temperatures {
            Temperatures::Readings(readings) => {
                for reading in readings {
                    temperatures.push(vec![
                        sample.clone(),
                        text(&reading.label),
                        float(reading.celsius),
                    ]);
                }
                TEMPS_READINGS
            }
            Temperatures::NoSensors => TEMPS_NONE,
            Temperatures::Unsupported => TEMPS_UNSUPPORTED,
        };

        history.push(vec![
            snapshot
                .timestamp
                .to_rfc3339_opts(SecondsFormat::AutoSi, true),
            text(&snapshot.platform),
            float(snapshot.cpu_percent),
            snapshot.memory.total.to_string(),
            snapshot.memory.used.to_string(),
            snapshot.memory.available.to_string(),
            float(snapshot.memory.percent),
            battery.to_string(),
            battery_pct,
            battery_plugged,
            temps.to_string(),
        ]);

        for disk in &snapshot.disks {
            let row = match &disk.status {
                DiskStatus::Mounted(stats) => vec![
                    sample.clone(),
                    text(&disk.path),
                    stats.total.to_string(),
                    stats.used.to_string(),
                    stats.free.to_string(),
                    float(stats.percent),
                    ABSENT.to_string(),
                ],
                DiskStatus::Unavailable(reason) => vec![
                    sample.clone(),
                    text(&disk.path),
                    ABSENT.to_string(),
                    ABSENT.to_string(),
                    ABSENT.to_string(),
                    ABSENT.to_string(),
                    text(reason),
                ],
            };
            disks.push(row);
        }

        for process in &snapshot.processes {
            processes.push(vec![
                sample.clone(),
                process.pid.to_string(),
                text(&process.name),
                float(process.cpu_percent),
            ]);
        }
    }

    let mut out = String::new();
    write_table(&mut out, HISTORY_TABLE, HISTORY_FIELDS, &history);
    write_table(&mut out, DISK_TABLE, DISK_FIELDS, &disks);
    write_table(&mut out, TEMPERATURE_TABLE, TEMPERATURE_FIELDS, &temperatures);
    write_table(&mut out, PROCESS_TABLE, PROCESS_FIELDS, &processes);
    out
}

fn write_table(out: &mut String, name: &str, fields: &[&str], rows: &[Vec<String>]) {
    let _ = writeln!(out, "{}[{}]{{{}}}:", name, rows.len(), fields.join(","));
    for row in rows {
        let _ = writeln!(out, "  {}", row.join(","));
    }
}

fn float(value: f32) -> String {
    // Debug keeps the fractional part ("3.0") and round-trips exactly.
    format!("{:?}", value)
}

fn text(value: &str) -> String {
    if !needs_quotes(value) {
        return value.to_string();
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

fn needs_quotes(value: &str) -> bool {
    value.is_empty()
        || value == ABSENT
        || value == "true"
        || value == "false"
        || value.trim() != value
        || value.parse::<f64>().is_ok()
        || value
            .chars()
            .any(|c| matches!(c, ',' | '"' | '\\' | '[' | ']' | '{' | '}') || c.is_control())
}

/// A cell as read from a row; quoting is kept so `"~"` stays text.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Raw(String),
    Quoted(String),
}

impl Cell {
    fn is_absent(&self) -> bool {
        matches!(self, Cell::Raw(v) if v == ABSENT)
    }
}

struct Table {
    line: usize,
    fields: Vec<String>,
    rows: Vec<(usize, Vec<Cell>)>,
}

/// Parse text produced by [`serialize`] back into snapshots.
pub fn deserialize(input: &str) -> Result<Vec<Snapshot>, DecodeError> {
    let tables = parse_tables(input)?;
    let mut tables = tables.into_iter();

    let mut next_table = |name: &str, fields: &[&str]| -> Result<Table, DecodeError> {
        let (found, table) = tables.next().ok_or_else(|| {
            DecodeError::new(input.lines().count(), format!("missing table '{}'", name))
        })?;
        if found != name {
            return Err(DecodeError::new(
                table.line,
                format!("expected table '{}', found '{}'", name, found),
            ));
        }
        if table.fields != fields {
            return Err(DecodeError::new(
                table.line,
                format!("unexpected fields for '{}': {}", name, table.fields.join(",")),
            ));
        }
        Ok(table)
    };

    let history = next_table(HISTORY_TABLE, HISTORY_FIELDS)?;
    let disks = next_table(DISK_TABLE, DISK_FIELDS)?;
    let temperatures = next_table(TEMPERATURE_TABLE, TEMPERATURE_FIELDS)?;
    let processes = next_table(PROCESS_TABLE, PROCESS_FIELDS)?;
    if let Some((name, table)) = tables.next() {
        return Err(DecodeError::new(table.line, format!("unexpected table '{}'", name)));
    }

    let mut snapshots = history
        .rows
        .iter()
        .map(|(line, cells)| decode_history_row(*line, cells))
        .collect::<Result<Vec<_>, _>>()?;

    for (line, cells) in &disks.rows {
        let snapshot = owner(&mut snapshots, *line, &cells[0])?;
        let path = required_text(*line, &cells[1], "path")?;
        let status = if cells[6].is_absent() {
            DiskStatus::Mounted(DiskStats {
                total: parse_number(*line, &cells[2], "total")?,
                used: parse_number(*line, &cells[3], "used")?,
                free: parse_number(*line, &cells[4], "free")?,
                percent: parse_float(*line, &cells[5], "pct")?,
            })
        } else {
            for (cell, field) in cells[2..6].iter().zip(["total", "used", "free", "pct"]) {
                if !cell.is_absent() {
                    return Err(DecodeError::new(
                        *line,
                        format!("'{}' must be absent for an unavailable disk", field),
                    ));
                }
            }
            DiskStatus::Unavailable(required_text(*line, &cells[6], "error")?)
        };
        snapshot.disks.push(DiskUsage { path, status });
    }

    for (line, cells) in &temperatures.rows {
        let snapshot = owner(&mut snapshots, *line, &cells[0])?;
        let reading = SensorReading {
            label: required_text(*line, &cells[1], "sensor")?,
            celsius: parse_float(*line, &cells[2], "celsius")?,
        };
        match &mut snapshot.temperatures {
            Temperatures::Readings(readings) => readings.push(reading),
            _ => {
                return Err(DecodeError::new(
                    *line,
                    "temperature reading for a sample without readings",
                ))
            }
        }
    }

    for (line, cells) in &processes.rows {
        let snapshot = owner(&mut snapshots, *line, &cells[0])?;
        snapshot.processes.push(ProcessSample {
            pid: parse_number(*line, &cells[1], "pid")?,
            name: required_text(*line, &cells[2], "name")?,
            cpu_percent: parse_float(*line, &cells[3], "cpu")?,
        });
    }

    Ok(snapshots)
}

fn decode_history_row(line: usize, cells: &[Cell]) -> Result<Snapshot, DecodeError> {
    let raw_timestamp = required_text(line, &cells[0], "timestamp")?;
    let timestamp = DateTime::parse_from_rfc3339(&raw_timestamp)
        .map_err(|e| {
            DecodeError::new(line, format!("invalid timestamp '{}': {}", raw_timestamp, e))
        })?
        .with_timezone(&Utc);

    let battery = match required_text(line, &cells[7], "battery")?.as_str() {
        BATTERY_PRESENT => BatteryState::Present {
            percent: parse_float(line, &cells[8], "battery_pct")?,
            plugged: parse_bool(line, &cells[9], "battery_plugged")?,
        },
        marker @ (BATTERY_ABSENT | BATTERY_UNSUPPORTED) => {
            if !cells[8].is_absent() || !cells[9].is_absent() {
                return Err(DecodeError::new(
                    line,
                    format!("battery fields must be absent when battery is '{}'", marker),
                ));
            }
            if marker == BATTERY_ABSENT {
                BatteryState::Absent
            } else {
                BatteryState::Unsupported
            }
        }
        other => {
            return Err(DecodeError::new(line, format!("unknown battery state '{}'", other)));
        }
    };

    let temperatures = match required_text(line, &cells[10], "temps")?.as_str() {
        TEMPS_READINGS => Temperatures::Readings(Vec::new()),
        TEMPS_NONE => Temperatures::NoSensors,
        TEMPS_UNSUPPORTED => Temperatures::Unsupported,
        other => {
            return Err(DecodeError::new(line, format!("unknown temperature state '{}'", other)));
        }
    };

    Ok(Snapshot {
        timestamp,
        platform: required_text(line, &cells[1], "platform")?,
        cpu_percent: parse_float(line, &cells[2], "cpu")?,
        memory: MemoryStats {
            total: parse_number(line, &cells[3], "mem_total")?,
            used: parse_number(line, &cells[4], "mem_used")?,
            available: parse_number(line, &cells[5], "mem_available")?,
            percent: parse_float(line, &cells[6], "mem_pct")?,
        },
        disks: Vec::new(),
        temperatures,
        battery,
        processes: Vec::new(),
    })
}

fn owner<'a>(
    snapshots: &'a mut [Snapshot],
    line: usize,
    cell: &Cell,
) -> Result<&'a mut Snapshot, DecodeError> {
    let index: usize = parse_number(line, cell, "sample")?;
    let count = snapshots.len();
    snapshots.get_mut(index).ok_or_else(|| {
        DecodeError::new(
            line,
            format!("sample {} out of range for {} snapshots", index, count),
        )
    })
}

fn required_text(line: usize, cell: &Cell, field: &str) -> Result<String, DecodeError> {
    match cell {
        Cell::Quoted(value) => Ok(value.clone()),
        Cell::Raw(value) if value == ABSENT => {
            Err(DecodeError::new(line, format!("'{}' must not be absent", field)))
        }
        Cell::Raw(value) => Ok(value.clone()),
    }
}

fn raw<'a>(line: usize, cell: &'a Cell, field: &str) -> Result<&'a str, DecodeError> {
    match cell {
        Cell::Raw(value) if value == ABSENT => {
            Err(DecodeError::new(line, format!("'{}' must not be absent", field)))
        }
        Cell::Raw(value) => Ok(value),
        Cell::Quoted(_) => Err(DecodeError::new(
            line,
            format!("'{}' must not be quoted", field),
        )),
    }
}

fn parse_number<T: std::str::FromStr>(
    line: usize,
    cell: &Cell,
    field: &str,
) -> Result<T, DecodeError> {
    let value = raw(line, cell, field)?;
    value
        .parse()
        .map_err(|_| DecodeError::new(line, format!("'{}' is not an integer: '{}'", field, value)))
}

fn parse_float(line: usize, cell: &Cell, field: &str) -> Result<f32, DecodeError> {
    let value = raw(line, cell, field)?;
    let is_float_literal = value.contains(|c| matches!(c, '.' | 'e' | 'E'));
    match value.parse::<f32>() {
        Ok(parsed) if is_float_literal && parsed.is_finite() => Ok(parsed),
        _ => Err(DecodeError::new(line, format!("'{}' is not a float: '{}'", field, value))),
    }
}

fn parse_bool(line: usize, cell: &Cell, field: &str) -> Result<bool, DecodeError> {
    match raw(line, cell, field)? {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(DecodeError::new(line, format!("'{}' is not a boolean: '{}'", field, other))),
    }
}

fn parse_tables(input: &str) -> Result<Vec<(String, Table)>, DecodeError> {
    let mut tables: Vec<(String, Table)> = Vec::new();
    let mut expected_rows = 0usize;

    for (index, line) in input.lines().enumerate() {
        let number = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        if let Some(row) = line.strip_prefix("  ") {
            let Some((name, table)) = tables.last_mut() else {
                return Err(DecodeError::new(number, "row before any table header"));
            };
            let cells = split_row(number, row)?;
            if cells.len() != table.fields.len() {
                return Err(DecodeError::new(
                    number,
                    format!(
                        "'{}' row has {} cells, expected {}",
                        name,
                        cells.len(),
                        table.fields.len()
                    ),
                ));
            }
            table.rows.push((number, cells));
            continue;
        }

        if let Some((name, table)) = tables.last() {
            check_row_count(name, table, expected_rows)?;
        }
        let (name, rows, fields) = parse_header(number, line)?;
        expected_rows = rows;
        tables.push((
            name,
            Table {
                line: number,
                fields,
                rows: Vec::new(),
            },
        ));
    }

    if let Some((name, table)) = tables.last() {
        check_row_count(name, table, expected_rows)?;
    }

    Ok(tables)
}

fn check_row_count(name: &str, table: &Table, expected: usize) -> Result<(), DecodeError> {
    if table.rows.len() == expected {
        Ok(())
    } else {
        Err(DecodeError::new(
            table.line,
            format!(
                "'{}' declares {} rows but has {}",
                name,
                expected,
                table.rows.len()
            ),
        ))
    }
}

fn parse_header(line: usize, header: &str) -> Result<(String, usize, Vec<String>), DecodeError> {
    let malformed = || DecodeError::new(line, format!("malformed table header '{}'", header));

    let body = header.strip_suffix("}:").ok_or_else(malformed)?;
    let (name, rest) = body.split_once('[').ok_or_else(malformed)?;
    let (count, rest) = rest.split_once("]{").ok_or_else(malformed)?;

    if name.is_empty() {
        return Err(malformed());
    }
    let rows = count.parse::<usize>().map_err(|_| malformed())?;
    let fields = rest.split(',').map(str::to_string).collect();

    Ok((name.to_string(), rows, fields))
}

fn split_row(line: usize, row: &str) -> Result<Vec<Cell>, DecodeError> {
    let mut cells = Vec::new();
    let mut chars = row.chars().peekable();

    loop {
        if chars.peek() == Some(&'"') {
            chars.next();
            let mut value = String::new();
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some('\\') => match chars.next() {
                        Some('"') => value.push('"'),
                        Some('\\') => value.push('\\'),
                        Some('n') => value.push('\n'),
                        Some('r') => value.push('\r'),
                        Some('t') => value.push('\t'),
                        Some(other) => {
                            return Err(DecodeError::new(
                                line,
                                format!("invalid escape '\\{}'", other),
                            ))
                        }
                        None => return Err(DecodeError::new(line, "unterminated escape")),
                    },
                    Some(c) => value.push(c),
                    None => return Err(DecodeError::new(line, "unterminated quoted string")),
                }
            }
            cells.push(Cell::Quoted(value));
        } else {
            let mut value = String::new();
            while let Some(&c) = chars.peek() {
                if c == ',' {
                    break;
                }
                if c == '"' {
                    return Err(DecodeError::new(line, "unexpected quote inside unquoted cell"));
                }
                value.push(c);
                chars.next();
            }
            cells.push(Cell::Raw(value));
        }

        match chars.next() {
            Some(',') => continue,
            None => break,
            Some(c) => {
                return Err(DecodeError::new(
                    line,
                    format!("expected ',' after quoted cell, found '{}'", c),
                ))
            }
        }
    }

    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn busy_snapshot() -> Snapshot {
        Snapshot {
            timestamp: Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap()
                + chrono::Duration::milliseconds(589),
            platform: "Linux".to_string(),
            cpu_percent: 92.0,
            memory: MemoryStats {
                total: 16_777_216_000,
                used: 14_260_633_600,
                available: 2_516_582_400,
                percent: 85.0,
            },
            disks: vec![
                DiskUsage {
                    path: "/".to_string(),
                    status: DiskStatus::Mounted(DiskStats {
                        total: 500_107_862_016,
                        used: 250_053_931_008,
                        free: 250_053_931_008,
                        percent: 50.0,
                    }),
                },
                DiskUsage {
                    path: "/mnt/backup, old".to_string(),
                    status: DiskStatus::Unavailable("path not found".to_string()),
                },
            ],
            temperatures: Temperatures::Readings(vec![
                SensorReading {
                    label: "core_0".to_string(),
                    celsius: 71.5,
                },
                SensorReading {
                    label: "core_1".to_string(),
                    celsius: 70.0,
                },
            ]),
            battery: BatteryState::Present {
                percent: 64.25,
                plugged: true,
            },
            processes: vec![
                ProcessSample {
                    pid: 4821,
                    name: "stress-ng".to_string(),
                    cpu_percent: 88.125,
                },
                ProcessSample {
                    pid: 77,
                    name: "Web Content \"tab\"".to_string(),
                    cpu_percent: 0.1,
                },
            ],
        }
    }

    fn quiet_snapshot() -> Snapshot {
        Snapshot {
            timestamp: Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 51).unwrap(),
            platform: "Windows".to_string(),
            cpu_percent: 3.0,
            memory: MemoryStats {
                total: 8_000_000_000,
                used: 3_200_000_000,
                available: 4_800_000_000,
                percent: 40.0,
            },
            disks: vec![],
            temperatures: Temperatures::Unsupported,
            battery: BatteryState::Absent,
            processes: vec![],
        }
    }

    #[test]
    fn layout_is_tabular() {
        let text = serialize(&[quiet_snapshot()]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "system_history[1]{timestamp,platform,cpu,mem_total,mem_used,mem_available,mem_pct,battery,battery_pct,battery_plugged,temps}:"
        );
        assert_eq!(
            lines[1],
            "  2025-03-14T09:26:51Z,Windows,3.0,8000000000,3200000000,4800000000,40.0,absent,~,~,unsupported"
        );
        assert_eq!(lines[2], "disks[0]{sample,path,total,used,free,pct,error}:");
        assert_eq!(lines[3], "temperatures[0]{sample,sensor,celsius}:");
        assert_eq!(lines[4], "processes[0]{sample,pid,name,cpu}:");
        assert!(!text.contains("  \n"));
    }

    #[test]
    fn decodes_every_field() {
        let original = vec![quiet_snapshot(), busy_snapshot()];
        let text = serialize(&original);
        let decoded = deserialize(&text).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn floats_keep_their_class() {
        let text = serialize(&[busy_snapshot()]);
        assert!(text.contains(",92.0,"));
        assert!(text.contains("  0,4821,stress-ng,88.125"));
        assert!(text.contains("present,64.25,true,readings"));
    }

    #[test]
    fn absent_fields_are_marked_not_dropped() {
        let text = serialize(&[busy_snapshot()]);
        assert!(text.contains("  0,\"/mnt/backup, old\",~,~,~,~,path not found"));
        assert!(text.contains("  0,/,500107862016,250053931008,250053931008,50.0,~"));
    }

    #[test]
    fn ambiguous_strings_are_quoted() {
        assert_eq!(text(""), "\"\"");
        assert_eq!(text("~"), "\"~\"");
        assert_eq!(text("true"), "\"true\"");
        assert_eq!(text("1234"), "\"1234\"");
        assert_eq!(text(" padded"), "\" padded\"");
        assert_eq!(text("a\\b"), "\"a\\\\b\"");
        assert_eq!(text("kworker/0:1"), "kworker/0:1");
    }

    #[test]
    fn quoted_tilde_is_text_not_absent() {
        let mut snapshot = quiet_snapshot();
        snapshot.processes.push(ProcessSample {
            pid: 9,
            name: "~".to_string(),
            cpu_percent: 1.0,
        });
        let decoded = deserialize(&serialize(&[snapshot.clone()])).unwrap();
        assert_eq!(decoded[0].processes[0].name, "~");
    }

    #[test]
    fn empty_history_is_four_empty_tables() {
        let text = serialize(&[]);
        assert_eq!(text.lines().count(), 4);
        assert!(deserialize(&text).unwrap().is_empty());
    }

    #[test]
    fn rejects_row_count_mismatch() {
        let text = serialize(&[quiet_snapshot()]).replace("system_history[1]", "system_history[2]");
        let err = deserialize(&text).unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn rejects_integer_in_float_column() {
        let text = serialize(&[quiet_snapshot()]).replace(",3.0,", ",3,");
        let err = deserialize(&text).unwrap_err();
        assert!(err.message.contains("cpu"));
    }

    #[test]
    fn rejects_sample_out_of_range() {
        let text = serialize(&[busy_snapshot()]).replace("  0,4821", "  5,4821");
        let err = deserialize(&text).unwrap_err();
        assert!(err.message.contains("out of range"));
    }

    #[test]
    fn rejects_unterminated_quote() {
        let text = serialize(&[busy_snapshot()]).replace("\"/mnt/backup, old\"", "\"/mnt/backup");
        assert!(deserialize(&text).is_err());
    }

    #[test]
    fn rejects_missing_table() {
        let text = serialize(&[quiet_snapshot()]);
        let truncated: String = text.lines().take(3).map(|l| format!("{}\n", l)).collect();
        let err = deserialize(&truncated).unwrap_err();
        assert!(err.message.contains("missing table"));
    }
}
