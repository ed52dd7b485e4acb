//! Conversion and selection logic for vacancy lists.
//!
//! This module provides pure business logic for turning raw listing records
//! into validated vacancies and for filtering, sorting and top-N selection,
//! decoupled from I/O operations and CLI orchestration.

use tracing::debug;

use crate::error::ValidationError;
use crate::raw::RawVacancy;
use crate::vacancy::Vacancy;

/// Description used when a listing carries no description or snippet.
pub const NO_DESCRIPTION: &str = "No description";

/// Converts a single raw listing into a validated vacancy.
///
/// The description falls back from `description` to `snippet.requirement`
/// to `snippet.responsibility`, then to [`NO_DESCRIPTION`]. Markup tags such
/// as `<highlighttext>` are stripped. The human-facing `alternate_url` wins
/// over the API `url` when present.
///
/// # Examples
///
/// ```
/// use jobfeed_core::query::convert_raw;
/// use jobfeed_core::raw::{RawSalary, RawVacancy};
///
/// let raw = RawVacancy {
///     name: "Python Developer".into(),
///     url: "http://example.com/1".into(),
///     salary: Some(RawSalary { from: Some(100000), to: Some(150000), currency: None }),
///     ..Default::default()
/// };
///
/// let v = convert_raw(&raw).unwrap();
/// assert_eq!(v.salary_to(), Some(150000));
/// assert_eq!(v.description(), "No description");
/// ```
pub fn convert_raw(raw: &RawVacancy) -> Result<Vacancy, ValidationError> {
    let (salary_from, salary_to) = raw
        .salary
        .as_ref()
        .map_or((None, None), |s| (s.from, s.to));

    let url = raw
        .alternate_url
        .as_deref()
        .filter(|u| !u.trim().is_empty())
        .unwrap_or(&raw.url);

    let description = pick_description(raw);

    Vacancy::new(&raw.name, url, salary_from, salary_to, &description)
}

fn pick_description(raw: &RawVacancy) -> String {
    let snippet = raw.snippet.as_ref();
    [
        raw.description.as_deref(),
        snippet.and_then(|s| s.requirement.as_deref()),
        snippet.and_then(|s| s.responsibility.as_deref()),
    ]
    .into_iter()
    .flatten()
    .map(strip_tags)
    .find(|text| !text.trim().is_empty())
    .unwrap_or_else(|| NO_DESCRIPTION.to_string())
}

/// Removes `<tag>` and `</tag>` markup, keeping the enclosed text.
///
/// A `<` that does not open a complete tag is ordinary text and is kept,
/// together with everything after it.
pub fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let candidate = &rest[open..];
        match tag_len(candidate) {
            Some(len) => rest = &candidate[len..],
            None => {
                out.push('<');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Byte length of the tag starting at `s[0] == '<'`, if `s` starts with one.
fn tag_len(s: &str) -> Option<usize> {
    let body = &s[1..];
    let name = body.strip_prefix('/').unwrap_or(body);
    if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    let end = body.find(['<', '>'])?;
    (body.as_bytes()[end] == b'>').then_some(end + 2)
}

/// A raw record that failed validation during batch conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejected {
    /// Position in the input batch.
    pub index: usize,
    /// Listing name, for reporting.
    pub name: String,
    pub error: ValidationError,
}

/// Outcome of converting a batch of raw listings.
#[derive(Debug, Default, Clone)]
pub struct ConversionReport {
    pub vacancies: Vec<Vacancy>,
    pub rejected: Vec<Rejected>,
}

impl ConversionReport {
    /// Returns the total number of processed listings.
    pub fn total(&self) -> usize {
        self.vacancies.len() + self.rejected.len()
    }

    /// Returns true if every listing converted.
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Converts a batch, skipping listings that fail validation.
///
/// A bad record never aborts the batch; it is collected in
/// [`ConversionReport::rejected`] instead.
pub fn convert_all(raws: &[RawVacancy]) -> ConversionReport {
    let mut report = ConversionReport::default();
    for (index, raw) in raws.iter().enumerate() {
        match convert_raw(raw) {
            Ok(vacancy) => report.vacancies.push(vacancy),
            Err(error) => {
                debug!("Skipping listing #{} ({:?}): {}", index, raw.name, error);
                report.rejected.push(Rejected {
                    index,
                    name: raw.name.clone(),
                    error,
                });
            }
        }
    }
    report
}

/// Keeps vacancies whose description contains any keyword, ignoring case.
///
/// An empty keyword list keeps everything.
pub fn filter_by_keywords(vacancies: &[Vacancy], keywords: &[String]) -> Vec<Vacancy> {
    let needles: Vec<String> = keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();

    if needles.is_empty() {
        return vacancies.to_vec();
    }

    vacancies
        .iter()
        .filter(|v| {
            let haystack = v.description().to_lowercase();
            needles.iter().any(|n| haystack.contains(n))
        })
        .cloned()
        .collect()
}

/// Keeps vacancies whose average salary lies in `[min, max]`.
///
/// With both bounds `None` everything is kept. With any bound set, vacancies
/// without an average salary are dropped.
pub fn filter_by_salary_range(
    vacancies: &[Vacancy],
    min: Option<u64>,
    max: Option<u64>,
) -> Vec<Vacancy> {
    if min.is_none() && max.is_none() {
        return vacancies.to_vec();
    }

    vacancies
        .iter()
        .filter(|v| match v.average_salary() {
            None => false,
            Some(avg) => {
                min.is_none_or(|lo| avg >= lo as f64) && max.is_none_or(|hi| avg <= hi as f64)
            }
        })
        .cloned()
        .collect()
}

/// Sorts highest average salary first; vacancies without salary go last.
///
/// The sort is stable, so equal averages keep their input order.
pub fn sort_by_salary_desc(vacancies: &mut [Vacancy]) {
    vacancies.sort_by(|a, b| b.cmp(a));
}

/// Returns the `n` best-paid vacancies, highest first.
pub fn top_n(vacancies: &[Vacancy], n: usize) -> Vec<Vacancy> {
    let mut sorted = vacancies.to_vec();
    sort_by_salary_desc(&mut sorted);
    sorted.truncate(n);
    sorted
}
