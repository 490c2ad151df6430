use chrono::NaiveDate;
use simple_error::SimpleError;

pub fn init_log() -> Result<flexi_logger::LoggerHandle, SimpleError> {
    // default output is stderr, stdout carries tool responses
    flexi_logger::Logger::try_with_env_or_str("info")
        .map_err(|e| SimpleError::with("bad log spec", e))?
        .start()
        .map_err(|e| SimpleError::with("logger init failed", e))
}

#[cfg(test)]
pub fn init_test_log() {
    let _ = flexi_logger::Logger::try_with_str("debug").map(|l| l.start());
}

/// zero-padded `YYYY-MM-DD`
pub fn date_prefix(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
