#![allow(dead_code)]

use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use std::path::PathBuf;
use std::sync::Once;

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// The sample template package shipped with the crate.
pub fn report_template_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates/report")
}

pub fn sample_image() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/sample.png")
}

/// Every file member of a zip archive, keyed by member name.
pub fn unzip(bytes: &[u8]) -> BTreeMap<String, Vec<u8>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip archive");
    let mut members = BTreeMap::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).unwrap();
        if entry.is_dir() {
            continue;
        }
        let mut content = Vec::new();
        entry.read_to_end(&mut content).unwrap();
        members.insert(entry.name().to_string(), content);
    }
    members
}

pub fn member_text(members: &BTreeMap<String, Vec<u8>>, name: &str) -> String {
    let bytes = members
        .get(name)
        .unwrap_or_else(|| panic!("archive has no member {name}"));
    String::from_utf8(bytes.clone()).unwrap()
}
