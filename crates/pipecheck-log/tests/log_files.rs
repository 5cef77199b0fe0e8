//! Parsing and comparing logs written to disk.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use pipecheck_log::{REGISTER_COUNT, RegisterMismatch, compare_registers, parse_log_file};

fn write_log(dir: &Path, name: &str, cycles: u64, reg: impl Fn(u32) -> i64) -> PathBuf {
    let mut text = String::new();
    for cycle in 0..cycles {
        writeln!(text, "CYCLE {cycle}").unwrap();
        writeln!(text, "IF: 0x{:08x}", cycle * 4).unwrap();
        for index in 0..REGISTER_COUNT {
            // Registers settle to their final values in the last cycle.
            let value = if cycle + 1 == cycles { reg(index) } else { 0 };
            writeln!(text, "R[{index}]: {value}").unwrap();
        }
    }
    let path = dir.join(name);
    std::fs::write(&path, text).unwrap();
    path
}

#[test]
fn test_identical_files_match() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_log(dir.path(), "a.txt", 5, |i| i64::from(i) * 3);
    let b = write_log(dir.path(), "b.txt", 2, |i| i64::from(i) * 3);

    let a = parse_log_file(&a).unwrap();
    let b = parse_log_file(&b).unwrap();
    assert_eq!(a.registers.len(), 32);
    assert!(compare_registers(&a.registers, &b.registers).is_empty());
    assert_eq!(a.total_cycles(), 5);
    assert_eq!(b.total_cycles(), 2);
}

#[test]
fn test_single_register_difference() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = write_log(dir.path(), "p.txt", 3, |i| if i == 5 { 10 } else { 1 });
    let single = write_log(dir.path(), "s.txt", 3, |i| if i == 5 { 12 } else { 1 });

    let pipeline = parse_log_file(&pipeline).unwrap();
    let single = parse_log_file(&single).unwrap();
    let diff = compare_registers(&pipeline.registers, &single.registers);

    assert_eq!(diff.len(), 1);
    assert_eq!(
        diff[&5],
        RegisterMismatch {
            left: Some(10),
            right: Some(12)
        }
    );
}

#[test]
fn test_truncated_final_block() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.txt");
    std::fs::write(&path, "CYCLE 0\nR[0]: 0\nR[1]: 1\nCYCLE 1\nR[0]: 0\n").unwrap();

    let parsed = parse_log_file(&path).unwrap();
    assert_eq!(parsed.registers.len(), 1);
    assert_eq!(parsed.registers.get(1), None);
    assert_eq!(parsed.total_cycles(), 2);
}
