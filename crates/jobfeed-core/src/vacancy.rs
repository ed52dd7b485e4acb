//! The validated vacancy value object.
//!
//! A [`Vacancy`] is immutable after construction. It orders by its derived
//! average salary, with an absent average sorting below every present one.
//! Ordering equality is *not* identity: two postings with different titles
//! compare equal when their averages match. Use [`Vacancy::same_posting`] or
//! compare [`Vacancy::to_record`] outputs when identity matters.

use std::cmp::Ordering;
use std::fmt;

use serde_json::Value;

use crate::error::ValidationError;
use crate::Record;

/// Maximum number of description characters shown by `Display`.
pub const DESCRIPTION_PREVIEW_LEN: usize = 100;

/// Stored-record field names, in serialization order.
pub const FIELD_TITLE: &str = "title";
pub const FIELD_URL: &str = "url";
pub const FIELD_SALARY_FROM: &str = "salary_from";
pub const FIELD_SALARY_TO: &str = "salary_to";
pub const FIELD_DESCRIPTION: &str = "description";

/// A job posting whose fields have all passed validation.
///
/// # Examples
///
/// ```
/// use jobfeed_core::Vacancy;
///
/// let v = Vacancy::new(
///     "  Rust Developer ",
///     "https://hh.ru/vacancy/1",
///     Some(100_000),
///     Some(150_000),
///     "Systems work",
/// ).unwrap();
///
/// assert_eq!(v.title(), "Rust Developer");
/// assert_eq!(v.average_salary(), Some(125_000.0));
/// ```
#[derive(Debug, Clone)]
pub struct Vacancy {
    title: String,
    url: String,
    salary_from: Option<u64>,
    salary_to: Option<u64>,
    description: String,
}

impl Vacancy {
    /// Validates every field and builds a vacancy.
    ///
    /// Text fields are stored trimmed. The URL must start with `http` after
    /// trimming. Salary bounds are independently optional but must not be
    /// negative.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] for the first field that fails; no
    /// partially-built value is ever observable.
    pub fn new(
        title: &str,
        url: &str,
        salary_from: Option<i64>,
        salary_to: Option<i64>,
        description: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            title: validate_title(title)?,
            url: validate_url(url)?,
            salary_from: validate_salary(salary_from, FIELD_SALARY_FROM)?,
            salary_to: validate_salary(salary_to, FIELD_SALARY_TO)?,
            description: validate_description(description)?,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn salary_from(&self) -> Option<u64> {
        self.salary_from
    }

    pub fn salary_to(&self) -> Option<u64> {
        self.salary_to
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Midpoint of the salary range, or the single bound when only one is
    /// known, or `None` when neither is.
    pub fn average_salary(&self) -> Option<f64> {
        match (self.salary_from, self.salary_to) {
            (Some(from), Some(to)) => Some((from as f64 + to as f64) / 2.0),
            (Some(from), None) => Some(from as f64),
            (None, Some(to)) => Some(to as f64),
            (None, None) => None,
        }
    }

    /// Field-by-field identity, unlike `==` which compares salaries only.
    pub fn same_posting(&self, other: &Vacancy) -> bool {
        self.title == other.title
            && self.url == other.url
            && self.salary_from == other.salary_from
            && self.salary_to == other.salary_to
            && self.description == other.description
    }

    /// Flattens the vacancy into its stored mapping form.
    ///
    /// Absent salary bounds are written as explicit `null`, never omitted.
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert(FIELD_TITLE.to_string(), Value::from(self.title.as_str()));
        record.insert(FIELD_URL.to_string(), Value::from(self.url.as_str()));
        record.insert(
            FIELD_SALARY_FROM.to_string(),
            self.salary_from.map_or(Value::Null, Value::from),
        );
        record.insert(
            FIELD_SALARY_TO.to_string(),
            self.salary_to.map_or(Value::Null, Value::from),
        );
        record.insert(
            FIELD_DESCRIPTION.to_string(),
            Value::from(self.description.as_str()),
        );
        record
    }

    /// Rebuilds a vacancy from a stored mapping, re-running validation.
    ///
    /// Unknown keys are ignored. A missing or `null` text field is treated
    /// as empty and rejected; a missing salary bound is treated as absent.
    pub fn from_record(record: &Record) -> Result<Self, ValidationError> {
        let title = text_field(record, FIELD_TITLE)?;
        let url = text_field(record, FIELD_URL)?;
        let salary_from = salary_field(record, FIELD_SALARY_FROM)?;
        let salary_to = salary_field(record, FIELD_SALARY_TO)?;
        let description = text_field(record, FIELD_DESCRIPTION)?;

        Self::new(title, url, salary_from, salary_to, description)
    }
}

impl PartialEq for Vacancy {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Vacancy {}

impl PartialOrd for Vacancy {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Vacancy {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.average_salary(), other.average_salary()) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            // averages come from non-negative integers, never NaN
            (Some(a), Some(b)) => a.total_cmp(&b),
        }
    }
}

impl fmt::Display for Vacancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.title, self.url)?;
        writeln!(
            f,
            "  Salary: {} - {}",
            display_bound(self.salary_from),
            display_bound(self.salary_to)
        )?;
        write!(f, "  {}", preview(&self.description, DESCRIPTION_PREVIEW_LEN))
    }
}

fn display_bound(bound: Option<u64>) -> String {
    bound.map_or_else(|| "n/a".to_string(), |v| v.to_string())
}

/// Truncates to `max_chars` characters, appending `...` when cut.
fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

fn validate_title(title: &str) -> Result<String, ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

fn validate_url(url: &str) -> Result<String, ValidationError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyUrl);
    }
    if !trimmed.starts_with("http") {
        return Err(ValidationError::InvalidUrl(trimmed.to_string()));
    }
    Ok(trimmed.to_string())
}

fn validate_salary(
    salary: Option<i64>,
    field: &'static str,
) -> Result<Option<u64>, ValidationError> {
    match salary {
        None => Ok(None),
        Some(value) => u64::try_from(value)
            .map(Some)
            .map_err(|_| ValidationError::NegativeSalary { field, value }),
    }
}

fn validate_description(description: &str) -> Result<String, ValidationError> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    Ok(trimmed.to_string())
}

fn text_field<'a>(record: &'a Record, field: &'static str) -> Result<&'a str, ValidationError> {
    match record.get(field) {
        None | Some(Value::Null) => Ok(""),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(ValidationError::NotAString(field)),
    }
}

/// Reads an optional integer salary from a JSON mapping.
pub(crate) fn salary_value(
    value: Option<&Value>,
    field: &'static str,
) -> Result<Option<i64>, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| ValidationError::NonIntegerSalary {
                field,
                value: n.to_string(),
            }),
        Some(other) => Err(ValidationError::NonIntegerSalary {
            field,
            value: other.to_string(),
        }),
    }
}

fn salary_field(record: &Record, field: &'static str) -> Result<Option<i64>, ValidationError> {
    salary_value(record.get(field), field)
}
