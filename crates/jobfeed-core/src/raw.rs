//! Raw listing records as returned by the vacancies API.
//!
//! Only the fields needed for conversion are modelled; everything else in
//! the API payload is ignored during deserialization.

use serde::{Deserialize, Serialize};

/// One item of the `items` array of a search response.
///
/// # Examples
///
/// ```
/// use jobfeed_core::RawVacancy;
///
/// let json = r#"{
///     "id": "93353083",
///     "name": "Rust Developer",
///     "url": "https://api.hh.ru/vacancies/93353083",
///     "alternate_url": "https://hh.ru/vacancy/93353083",
///     "salary": {"from": 200000, "to": null, "currency": "RUR"},
///     "snippet": {"requirement": "Experience with <highlighttext>Rust</highlighttext>"},
///     "employer": {"name": "Acme"}
/// }"#;
///
/// let raw: RawVacancy = serde_json::from_str(json).unwrap();
/// assert_eq!(raw.name, "Rust Developer");
/// assert_eq!(raw.salary.unwrap().from, Some(200000));
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct RawVacancy {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    /// API resource URL.
    #[serde(default)]
    pub url: String,
    /// Human-facing page URL, preferred over `url` when present.
    #[serde(default)]
    pub alternate_url: Option<String>,
    #[serde(default)]
    pub salary: Option<RawSalary>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub snippet: Option<RawSnippet>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct RawSalary {
    #[serde(default)]
    pub from: Option<i64>,
    #[serde(default)]
    pub to: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct RawSnippet {
    #[serde(default)]
    pub requirement: Option<String>,
    #[serde(default)]
    pub responsibility: Option<String>,
}
