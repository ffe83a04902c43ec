/// Instrument code as it appears in news text and provider payloads (e.g. "600519")
pub type InstrumentCode = String;
