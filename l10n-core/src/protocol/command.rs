#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    FormatsList,
    StoreParse,
    StoreSerialize,
    StoreSave,
    UnitSetTarget,
    RunQa,
    DetectEncoding,
    Unknown,
}

impl From<&str> for Command {
    fn from(s: &str) -> Self {
        match s {
            "ping" => Command::Ping,
            "formats.list" => Command::FormatsList,
            "store.parse" => Command::StoreParse,
            "store.serialize" => Command::StoreSerialize,
            "store.save" => Command::StoreSave,
            "unit.set_target" => Command::UnitSetTarget,
            "run_qa" => Command::RunQa,
            "encoding.detect" | "detect_encoding" => Command::DetectEncoding,
            _ => Command::Unknown,
        }
    }
}
