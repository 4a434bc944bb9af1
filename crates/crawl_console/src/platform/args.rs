use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use crawl_core::{FormInput, Msg};
use crawl_logging::{LogDestination, DEFAULT_LOG_FILE};
use log::LevelFilter;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "crawl-console",
    version,
    about = "Launch a reservation crawl, follow its progress and fetch the result"
)]
pub struct Args {
    /// Base URL of the crawl server
    #[arg(long, default_value = "http://localhost:5000")]
    pub server: String,

    /// RON file holding the crawl form; defaults to a daily CSV crawl of today
    #[arg(long, value_name = "FILE")]
    pub form: Option<PathBuf>,

    /// Crawl today only, ignoring any dates in the form
    #[arg(long)]
    pub quick_today: bool,

    /// Download the result file once the crawl finishes
    #[arg(long)]
    pub download: bool,

    /// Directory that receives downloaded files
    #[arg(long, default_value = "downloads")]
    pub download_dir: PathBuf,

    /// Only refresh the list of saved files, without launching a crawl
    #[arg(long, conflicts_with_all = ["form", "quick_today", "download"])]
    pub files_only: bool,

    /// Download a saved file by name; may be repeated
    #[arg(long, value_name = "NAME")]
    pub fetch: Vec<String>,

    /// Where log lines go
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,

    /// Log at debug level
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

impl Args {
    /// Messages that open the session, in dispatch order.
    pub fn opening_msgs(&self, form: FormInput, today: NaiveDate) -> Vec<Msg> {
        let mut msgs = Vec::new();
        if self.files_only {
            msgs.push(Msg::FilesRefreshClicked);
        } else {
            msgs.push(Msg::Started);
            msgs.push(Msg::FormChanged(form));
            msgs.push(if self.quick_today {
                Msg::QuickTodayClicked { today }
            } else {
                Msg::FormSubmitted
            });
        }
        msgs.extend(
            self.fetch
                .iter()
                .map(|name| Msg::FileDownloadClicked { name: name.clone() }),
        );
        msgs
    }

    pub fn log_destination(&self) -> LogDestination {
        match self.log {
            LogTarget::File => LogDestination::File(PathBuf::from(DEFAULT_LOG_FILE)),
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both(PathBuf::from(DEFAULT_LOG_FILE)),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}
