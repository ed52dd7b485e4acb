//! Jobfeed Core - Vacancy value object, error handling, configuration and
//! selection logic.

pub mod config;
pub mod error;
pub mod query;
pub mod raw;
pub mod record;
pub mod traits;
pub mod vacancy;

pub use config::{
    default_config_path, load_config, parse_config, AppConfig, HttpConfig, StorageConfig,
};
pub use error::{AppError, ValidationError};
pub use query::{
    convert_all, convert_raw, filter_by_keywords, filter_by_salary_range, sort_by_salary_desc,
    top_n, ConversionReport, Rejected,
};
pub use raw::{RawSalary, RawSnippet, RawVacancy};
pub use record::{matches_criteria, same_record, Criteria, Record};
pub use traits::{JobBoard, RecordStore};
pub use vacancy::Vacancy;
