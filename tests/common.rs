#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, Duration, Local, TimeZone};
use rsensorlog::utils::time::Clock;
use std::cell::Cell;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// CLI command isolated from the user's real configuration.
pub fn rsl(home: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("rsensorlog");
    cmd.env("HOME", home).env("RUST_LOG", "off");
    cmd
}

/// Fresh, empty directory inside the system temp dir.
pub fn setup_test_dir(name: &str) -> PathBuf {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rsensorlog", name));
    fs::remove_dir_all(&path).ok();
    fs::create_dir_all(&path).expect("create test dir");
    path
}

/// Create a fake raw data file.
pub fn touch_raw(dir: &Path, name: &str, bytes: usize) -> PathBuf {
    let p = dir.join(name);
    fs::write(&p, vec![b'x'; bytes]).expect("write raw file");
    p
}

/// A fixed local instant well away from DST transitions.
pub fn t0() -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2025, 5, 14, 10, 0, 0)
        .single()
        .expect("unambiguous local time")
}

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<DateTime<Local>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Local>) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn advance_secs(&self, secs: i64) {
        self.now.set(self.now.get() + Duration::seconds(secs));
    }

    pub fn advance_millis(&self, millis: i64) {
        self.now.set(self.now.get() + Duration::milliseconds(millis));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        self.now.get()
    }
}
