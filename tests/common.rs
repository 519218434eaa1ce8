#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{NaiveDate, NaiveDateTime};
use std::env;
use std::fs;
use std::path::PathBuf;
use zkexport::device::{DeviceSession, MemoryDevice, SharedSession};
use zkexport::config::DeviceConfig;
use zkexport::models::{RawAttendancePunch, RawUser};
use std::sync::Arc;

pub fn zk() -> Command {
    cargo_bin_cmd!("zkexport")
}

/// Unique path inside the system temp dir, removed if it already exists
pub fn temp_path(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{name}_zkexport.{ext}"));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

pub fn setup_test_db(name: &str) -> String {
    temp_path(name, "sqlite")
}

/// Fresh, empty directory inside the system temp dir
pub fn temp_dir(name: &str) -> PathBuf {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{name}_zkexport_out"));
    fs::remove_dir_all(&path).ok();
    fs::create_dir_all(&path).expect("create temp dir");
    path
}

pub fn files_in(dir: &PathBuf) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read dir")
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

pub fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

/// Two users, four punches over two days; user 99 is not enrolled.
pub fn sample_users() -> Vec<RawUser> {
    vec![RawUser::new(1, "Ann"), RawUser::new(2, "Bob")]
}

pub fn sample_punches() -> Vec<RawAttendancePunch> {
    vec![
        RawAttendancePunch::new(1, at(1, 8, 0), 0, 1),
        RawAttendancePunch::new(1, at(1, 17, 0), 1, 1),
        RawAttendancePunch::new(2, at(2, 9, 0), 0, 1),
        RawAttendancePunch::new(99, at(2, 10, 0), 7, 1),
    ]
}

pub fn sample_device() -> MemoryDevice {
    MemoryDevice::new(sample_users(), sample_punches())
}

pub fn device_config(name: &str) -> DeviceConfig {
    DeviceConfig {
        name: name.to_string(),
        ip: "192.168.1.201".to_string(),
        port: 4370,
        timeout: 5,
        password: String::new(),
        snapshot: None,
    }
}

/// Open a session on `dev` and wrap it for the export pipeline
pub fn open_shared(dev: &MemoryDevice) -> SharedSession {
    let mut session = DeviceSession::new(Arc::new(dev.clone()));
    session.open(device_config("Lobby")).expect("open session");
    SharedSession::new(session)
}

/// JSON capture of the sample device for the CLI
pub fn write_snapshot(name: &str) -> String {
    let path = temp_path(name, "json");
    let body = serde_json::json!({
        "users": sample_users(),
        "attendance": sample_punches(),
    });
    fs::write(&path, body.to_string()).expect("write snapshot");
    path
}

/// Config file with one snapshot-backed device named "Lobby"
pub fn write_config(name: &str, db: &str, out_dir: &PathBuf, snapshot: Option<&str>) -> String {
    let path = temp_path(name, "conf");
    let devices = match snapshot {
        Some(s) => format!(
            "devices:\n  - name: Lobby\n    ip: 192.168.1.201\n    port: 4370\n    timeout: 5\n    password: ''\n    snapshot: '{s}'\n"
        ),
        None => "devices: []\n".to_string(),
    };
    let body = format!(
        "database: '{db}'\nexport_path: '{}'\nfile_format: csv\nactive_device: 0\nsave_details: true\n{devices}",
        out_dir.display()
    );
    fs::write(&path, body).expect("write config");
    path
}
