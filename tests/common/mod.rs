#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use spend_bench::{config::RoleConfig, data::Table, io_utils::RawTable, normalize::normalize};
use tempfile::{TempDir, tempdir};

pub const HEADERS: &str =
    "Part Family,Vehicle Model,PartNo,Vendor,PO Price,RMRatePerKg,GrossWeight,Plant";

/// Twenty purchase order lines, ten of them in the Engine family.
pub const SPEND_CSV: &str = "\
Part Family,Vehicle Model,PartNo,Vendor,PO Price,RMRatePerKg,GrossWeight,Plant
Engine,Sedan X,EN-100,Acme Forge,0,0,1.2,Pune
Engine,Sedan X,EN-100,Bharat Cast,120,82,1.2,Pune
Body,Hatch Z,BD-200,Core Press,340,95,7.5,Chennai
Engine,SUV Y,EN-101,Acme Forge,95,80,2.1,Pune
Engine,SUV Y,EN-101,Acme Forge,95,80,2.1,Pune
Body,SUV Y,BD-201,Delta Metals,410,,8.0,Hosur
Engine,Sedan X,EN-102,Bharat Cast,150,85,0,Chennai
Brakes,Hatch Z,BR-300,Echo Friction,55,60,0.4,Pune
Engine,Truck T,EN-103,Acme Forge,95,78,3.3,Hosur
Body,Hatch Z,BD-200,Core Press,330,94,7.5,Chennai
Brakes,Sedan X,BR-301,Echo Friction,60,61,0.5,Pune
Engine,Truck T,EN-103,Bharat Cast,101.5,,3.3,Hosur
Body,Sedan X,BD-202,Delta Metals,n/a,90,6.1,Hosur
Engine,SUV Y,EN-104,Core Press,210,88,4.0,Pune
Brakes,Truck T,BR-302,Echo Friction,75,62,0.7,Chennai
Body,Truck T,BD-203,Core Press,505,99,9.9,Chennai
Engine,Sedan X,EN-100,Acme Forge,95,79,1.2,Chennai
Brakes,SUV Y,BR-303,Fenix Brakes,58,,0.4,Hosur
Engine,,EN-105,Delta Metals,180,,2.2,Pune
Body,SUV Y,BD-201,Delta Metals,415,97,8.0,Hosur
";

/// Parses CSV text the way the binary does and normalizes it with default roles.
pub fn load(csv_text: &str) -> Table {
    let raw = spend_bench::io_utils::read_raw_table(csv_text.as_bytes(), b',', encoding_rs::UTF_8)
        .expect("read csv");
    normalize(&raw, &RoleConfig::default()).expect("normalize")
}

pub fn spend_table() -> Table {
    load(SPEND_CSV)
}

pub fn raw_table(headers: &[&str], rows: &[Vec<String>]) -> RawTable {
    RawTable::new(headers.iter().map(|h| h.to_string()).collect(), rows.to_vec())
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}
