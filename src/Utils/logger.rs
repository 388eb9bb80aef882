use chrono::Local;
use log::{LevelFilter, info};
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use std::fs::File;
use std::io;

/// `"auto"` becomes `log_<date>_<time>.txt`, anything else is used as given
pub fn log_file_name(file: &str) -> String {
    if file == "auto" {
        let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
        format!("log_{}.txt", date_and_time)
    } else {
        file.to_string()
    }
}

/// Terminal logger plus an optional file logger.
/// Returns false if a logger was already installed (tests, repeated calls); that is not an error.
pub fn init_logger(level: LevelFilter, file: Option<&str>) -> io::Result<bool> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    loggers.push(TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ));
    let file_name = file.map(log_file_name);
    if let Some(name) = &file_name {
        loggers.push(WriteLogger::new(level, Config::default(), File::create(name)?));
    }
    match CombinedLogger::init(loggers) {
        Ok(()) => {
            match &file_name {
                Some(name) => info!("Program started with loglevel: {}, log file {}", level, name),
                None => info!("Program started with loglevel: {}", level),
            }
            Ok(true)
        }
        Err(_) => Ok(false),
    }
}
