// src/simulation/csv.rs

use std::error::Error;
use std::fs::{self, File};
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;

use crate::simulation::TickRecord;

/// CSV出力の設定とヘッダーの書き込み
pub fn setup_csv_output(path: &str) -> Result<Box<dyn Write>, Box<dyn Error>> {
    if let Some(dir) = Path::new(path).parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    let output_file = File::create(path)?;
    let mut writer = BufWriter::new(output_file);
    write_csv_header(&mut writer)?;
    Ok(Box::new(writer))
}

/// CSVヘッダーの書き込み
pub fn write_csv_header<W: Write>(writer: &mut W) -> Result<(), std::io::Error> {
    let mut header = String::from("tick,");

    for prefix in ["own", "target", "estimate", "steering"] {
        header.push_str(&format!("{0}_x,{0}_y,{0}_z,", prefix));
    }
    header.push_str("tracking,detonated\n");

    writer.write_all(header.as_bytes())?;
    Ok(())
}

/// CSV行の作成
pub fn create_csv_row(record: &TickRecord) -> String {
    let mut row = format!("{},", record.tick);

    for v in [
        &record.own_position,
        &record.target_position,
        &record.estimate,
        &record.steering,
    ] {
        row.push_str(&format!("{},{},{},", v[0], v[1], v[2]));
    }

    row.push_str(&format!("{},{}\n", record.tracking, record.detonated));
    row
}
