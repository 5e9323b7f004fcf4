use pretty_assertions::assert_eq;
use spe_parser::parser::{BranchEvent, LoadStoreEvent};
use spe_parser::pipeline::{decode_into, DecodeStats};
use spe_parser::sink::EventSink;
use spe_parser::utils::config::{DecoderConfig, FaultPolicy, UNKNOWN_CPU};
use spe_parser::utils::error::{DecodeError, TranslateError};
use std::io::Cursor;

const HEX_DUMP: &str = ".  00000000:  b0 5c 0e 11 ab aa aa 00 80";

fn packet(payload: &str) -> String {
    format!("{:<62}{}\n", HEX_DUMP, payload)
}

fn auxtrace_header(cpu: i32) -> String {
    format!(
        "0x2d8 [0x30]: PERF_RECORD_AUXTRACE size: 0x4000  offset: 0  ref: 0x1e4f  idx: 0  tid: 811  cpu: {}\n",
        cpu
    )
}

fn session_body(records: &[&[&str]]) -> String {
    let mut out = String::from(". ... ARM SPE data: size 0x4000 bytes\n");
    for record in records {
        for payload in record.iter() {
            out.push_str(&packet(payload));
        }
    }
    out.push('\n');
    out
}

fn session(cpu: i32, records: &[&[&str]]) -> String {
    auxtrace_header(cpu) + &session_body(records)
}

fn decode(input: &str, config: &DecoderConfig) -> Result<(EventSink, DecodeStats), DecodeError> {
    let mut sink = EventSink::new();
    let stats = decode_into(Cursor::new(input), config, &mut sink)?;
    Ok((sink, stats))
}

const LOAD: &[&str] = &[
    "PC 0xaaaaab110e5c el0 ns=1",
    "LD GP-REG",
    "DATA-SOURCE 0",
    "EV RETIRED",
    "LAT 10 ISSUE",
    "LAT 20 TOT",
    "LAT 5 XLAT",
    "PA 0x1000 ns=1",
    "VA 0x2000",
    "TS 100",
];

const BRANCH: &[&str] = &[
    "PC 0xaaaaab110e60 el0 ns=1",
    "B COND",
    "EV RETIRED NOT-TAKEN",
    "LAT 2 ISSUE",
    "LAT 3 TOT",
    "TGT 0xaaaaab110e80 el0 ns=1",
    "PAD",
    "TS 101",
];

#[test]
fn test_single_load_record_end_to_end() {
    let input = session(3, &[LOAD]);
    let (sink, stats) = decode(&input, &DecoderConfig::default()).unwrap();

    assert_eq!(
        sink.load_stores(),
        &[LoadStoreEvent {
            cpu: 3,
            op: "LD".to_string(),
            pc: "0xaaaaab110e5c".to_string(),
            el: 0,
            atomic: false,
            exclusive: false,
            acquire_release: false,
            subclass: "GP-REG".to_string(),
            event: "RETIRED".to_string(),
            issue_lat: 10,
            total_lat: 20,
            vaddr: "0x2000".to_string(),
            xlat_lat: 5,
            paddr: "0x1000".to_string(),
            data_source: "L1D".to_string(),
            ts: 100,
        }]
    );
    assert!(sink.branches().is_empty());
    assert_eq!(stats.sessions, 1);
    assert_eq!(stats.records, 1);
    assert_eq!(stats.load_stores, 1);
}

#[test]
fn test_branch_record_end_to_end() {
    let input = session(0, &[BRANCH]);
    let (sink, _) = decode(&input, &DecoderConfig::default()).unwrap();

    assert_eq!(
        sink.branches(),
        &[BranchEvent {
            cpu: 0,
            op: "B".to_string(),
            pc: "0xaaaaab110e60".to_string(),
            el: 0,
            conditional: true,
            indirect: false,
            event: "RETIRED:NOT-TAKEN".to_string(),
            issue_lat: 2,
            total_lat: 3,
            target: "0xaaaaab110e80".to_string(),
            target_el: 0,
            ts: 101,
        }]
    );
}

#[test]
fn test_el2_addresses_get_top_byte_back() {
    let load: &[&str] = &[
        "PC 0xffab47fdb0 el2 ns=1",
        "ST GP-REG",
        "VA 0xab0010",
        "PA 0x8000",
        "TS 9",
    ];
    let branch: &[&str] = &[
        "PC 0xffab47fdb4 el2 ns=1",
        "B IND",
        "TGT 0xaaaa0000 el0 ns=1",
        "TS 10",
    ];
    let (sink, _) = decode(&session(1, &[load, branch]), &DecoderConfig::default()).unwrap();

    let ldst = &sink.load_stores()[0];
    assert_eq!(ldst.pc, "0xffffab47fdb0");
    assert_eq!(ldst.vaddr, "0xffab0010");
    assert_eq!(ldst.paddr, "0x8000");

    let br = &sink.branches()[0];
    assert_eq!(br.pc, "0xffffab47fdb4");
    assert!(br.indirect);
    assert_eq!(br.target, "0xaaaa0000");
}

#[test]
fn test_multiple_sessions_reset_cpu() {
    let mut input = session(5, &[LOAD]);
    // second session has no auxtrace header of its own
    input.push_str(&session_body(&[LOAD, BRANCH]));
    input.push_str(&session(7, &[BRANCH]));

    let (sink, stats) = decode(&input, &DecoderConfig::default()).unwrap();

    let ldst_cpus: Vec<i32> = sink.load_stores().iter().map(|e| e.cpu).collect();
    let br_cpus: Vec<i32> = sink.branches().iter().map(|e| e.cpu).collect();
    assert_eq!(ldst_cpus, vec![5, UNKNOWN_CPU]);
    assert_eq!(br_cpus, vec![UNKNOWN_CPU, 7]);
    assert_eq!(stats.sessions, 3);
    assert_eq!(stats.records, 4);
}

#[test]
fn test_cpu_only_taken_from_auxtrace_lines() {
    let mut input = auxtrace_header(2);
    input.push_str("0x310 [0x38]: PERF_RECORD_SAMPLE(IP, 0x2): 811/811: 0xffff cpu: 9\n");
    input.push_str(&session_body(&[LOAD]));

    let (sink, _) = decode(&input, &DecoderConfig::default()).unwrap();
    assert_eq!(sink.load_stores()[0].cpu, 2);
}

#[test]
fn test_lines_before_pc_are_discarded() {
    let mut records: Vec<&[&str]> = vec![&["EV RETIRED", "LAT 3 ISSUE"]];
    records.push(LOAD);
    let (sink, stats) = decode(&session(0, &records), &DecoderConfig::default()).unwrap();

    assert_eq!(sink.load_stores().len(), 1);
    assert_eq!(sink.load_stores()[0].issue_lat, 10);
    assert_eq!(stats.records, 1);
}

#[test]
fn test_malformed_lines_are_counted_not_fatal() {
    let mut input = session(0, &[]);
    input.pop();
    input.push_str(&packet("PC 0x1000 el0 ns=1"));
    input.push_str("short line\n");
    input.push_str(&packet("LD GP-REG"));
    input.push_str(&packet("LAT 12"));
    input.push_str(&packet("TS 4"));
    input.push('\n');

    let (sink, stats) = decode(&input, &DecoderConfig::default()).unwrap();
    assert_eq!(sink.load_stores().len(), 1);
    assert_eq!(sink.load_stores()[0].issue_lat, 0);
    assert_eq!(stats.malformed_lines, 1);
    assert_eq!(stats.malformed_latency_packets, 1);
}

#[test]
fn test_disabled_kinds_are_dropped_after_classification() {
    let input = session(0, &[LOAD, BRANCH, LOAD]);

    let config = DecoderConfig {
        parse_branch: false,
        ..Default::default()
    };
    let (sink, stats) = decode(&input, &config).unwrap();
    assert_eq!(sink.load_stores().len(), 2);
    assert!(sink.branches().is_empty());
    assert_eq!(stats.skipped_by_config, 1);

    let config = DecoderConfig {
        parse_load_store: false,
        ..Default::default()
    };
    let (sink, stats) = decode(&input, &config).unwrap();
    assert!(sink.load_stores().is_empty());
    assert_eq!(sink.branches().len(), 1);
    assert_eq!(stats.skipped_by_config, 2);
}

#[test]
fn test_disabled_kind_is_not_translated() {
    let bad_branch: &[&str] = &["PC 0x1000 el0 ns=1", "B XYZ", "TS 1"];
    let config = DecoderConfig {
        parse_branch: false,
        ..Default::default()
    };
    let (_, stats) = decode(&session(0, &[bad_branch]), &config).unwrap();
    assert_eq!(stats.skipped_by_config, 1);
    assert_eq!(stats.skipped_invalid, 0);
}

#[test]
fn test_invalid_record_aborts_by_default() {
    let bad: &[&str] = &["PC 0x1000 el0 ns=1", "LD GP-REG", "DATA-SOURCE 99", "TS 1"];
    let input = session(0, &[LOAD, bad, LOAD]);

    match decode(&input, &DecoderConfig::default()) {
        Err(DecodeError::InvalidRecord { source, packets, .. }) => {
            assert_eq!(source, TranslateError::InvalidDataSource("99".to_string()));
            assert!(packets.to_string().contains("DATA-SOURCE: [99]"));
        }
        other => panic!("expected invalid record, got {:?}", other.map(|(_, s)| s)),
    }
}

#[test]
fn test_skip_policy_continues_past_invalid_records() {
    let bad: &[&str] = &["PC 0x1000 el0 ns=1", "B XYZ", "TS 1"];
    let input = session(0, &[LOAD, bad, BRANCH]);
    let config = DecoderConfig {
        fault_policy: FaultPolicy::Skip,
        ..Default::default()
    };

    let (sink, stats) = decode(&input, &config).unwrap();
    assert_eq!(sink.load_stores().len(), 1);
    assert_eq!(sink.branches().len(), 1);
    assert_eq!(stats.skipped_invalid, 1);
    assert_eq!(stats.records, 3);
}

#[test]
fn test_unknown_record_is_fatal_even_when_skipping() {
    let unknown: &[&str] = &["PC 0x1000 el0 ns=1", "EV RETIRED", "TS 1"];
    let config = DecoderConfig {
        fault_policy: FaultPolicy::Skip,
        ..Default::default()
    };
    assert!(matches!(
        decode(&session(0, &[unknown]), &config),
        Err(DecodeError::UnknownRecord { .. })
    ));
}

#[test]
fn test_input_without_session_is_fatal() {
    let input = auxtrace_header(0) + "\n";
    assert!(matches!(
        decode(&input, &DecoderConfig::default()),
        Err(DecodeError::NoSession)
    ));
}

#[test]
fn test_custom_prefix_width() {
    let input = format!(
        "{}. ... ARM SPE data: size 0x10 bytes\n{:<10}PC 0x1 el0 ns=1\n{:<10}B\n{:<10}TS 8\n\n",
        auxtrace_header(4),
        "00:",
        "01:",
        "02:"
    );
    let config = DecoderConfig {
        prefix_width: 10,
        ..Default::default()
    };
    let (sink, _) = decode(&input, &config).unwrap();
    assert_eq!(sink.branches().len(), 1);
    assert_eq!(sink.branches()[0].cpu, 4);
    assert_eq!(sink.branches()[0].ts, 8);
}

#[test]
fn test_blank_line_inside_record_keeps_session_open() {
    let mut input = auxtrace_header(6);
    input.push_str(". ... ARM SPE data: size 0x4000 bytes\n");
    input.push_str(&packet("PC 0xaaaaab110e5c el0 ns=1"));
    input.push_str(&packet("LD GP-REG"));
    input.push('\n');
    input.push_str(&packet("LAT 10 ISSUE"));
    input.push_str(&packet("TS 100"));
    for payload in BRANCH {
        input.push_str(&packet(payload));
    }
    input.push('\n');

    let (sink, stats) = decode(&input, &DecoderConfig::default()).unwrap();

    assert_eq!(sink.load_stores().len(), 1);
    assert_eq!(sink.load_stores()[0].issue_lat, 10);
    assert_eq!(sink.load_stores()[0].ts, 100);
    // the record after it still belongs to the same session and cpu
    assert_eq!(sink.branches().len(), 1);
    assert_eq!(sink.branches()[0].cpu, 6);
    assert_eq!(stats.sessions, 1);
    assert_eq!(stats.malformed_lines, 1);
}
