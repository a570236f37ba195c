use dfa_min_macros::config;

use crate::logger::LogLevel;

pub trait GeneralConfig {
    fn logger(&self) -> &LoggerConfig;
}

config! {
    pub struct LoggerConfig {
        enabled: bool = false,
        log_file: bool = false,
        log_level: LogLevel = LogLevel::Warn,
    }
}

config! {
    pub struct MinimizerConfig {
        /// Verify the partition after every refinement round and the
        /// well-definedness of every minimized transition.
        check_invariants: bool = true,
        logger: LoggerConfig (Option<PartialLoggerConfig> = LoggerConfig::default()),
    }
}

impl GeneralConfig for MinimizerConfig {
    fn logger(&self) -> &LoggerConfig {
        &self.logger
    }
}

config! {
    pub struct ReportConfig {
        show_reachable: bool = true,
        show_partition: bool = true,
        show_table: bool = true,
        graphviz: bool = false,
    }
}

config! {
    pub struct DfaMinConfig {
        minimizer: MinimizerConfig (Option<PartialMinimizerConfig> = MinimizerConfig::default()),
        report: ReportConfig (Option<PartialReportConfig> = ReportConfig::default()),
    }
}

impl GeneralConfig for DfaMinConfig {
    fn logger(&self) -> &LoggerConfig {
        self.minimizer.logger()
    }
}
