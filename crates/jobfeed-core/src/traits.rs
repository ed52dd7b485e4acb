//! Capability traits for listing sources and record stores.
//!
//! These let alternate job boards or file formats be swapped in without
//! touching [`Vacancy`](crate::Vacancy) or the driver.

use async_trait::async_trait;

use crate::error::AppError;
use crate::raw::RawVacancy;
use crate::record::{Criteria, Record};

/// A remote source of job listings.
#[async_trait]
pub trait JobBoard: Send + Sync {
    /// Human-readable name of the board.
    fn name(&self) -> &str;

    /// Fetches one zero-based page of search results.
    async fn fetch_page(&self, keyword: &str, page: u32) -> Result<Vec<RawVacancy>, AppError>;

    /// Fetches `pages` pages and concatenates them in page order.
    ///
    /// The first failing page aborts the whole fetch.
    async fn fetch_vacancies(
        &self,
        keyword: &str,
        pages: u32,
    ) -> Result<Vec<RawVacancy>, AppError> {
        let mut all = Vec::new();
        for page in 0..pages {
            all.extend(self.fetch_page(keyword, page).await?);
        }
        Ok(all)
    }
}

/// A durable ordered collection of records with set-like inserts.
pub trait RecordStore {
    /// Reads every stored record in order.
    fn read_all(&self) -> Result<Vec<Record>, AppError>;

    /// Appends `record` unless a structurally equal one exists.
    ///
    /// Returns whether the record was inserted.
    fn append(&self, record: Record) -> Result<bool, AppError>;

    /// Removes every record matching all `criteria` pairs.
    ///
    /// Returns the number of removed records.
    fn remove_matching(&self, criteria: &Criteria) -> Result<usize, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct PagedBoard {
        pages: Vec<Vec<&'static str>>,
        requested: Mutex<Vec<u32>>,
    }

    #[async_trait]
    impl JobBoard for PagedBoard {
        fn name(&self) -> &str {
            "paged"
        }

        async fn fetch_page(&self, _keyword: &str, page: u32) -> Result<Vec<RawVacancy>, AppError> {
            self.requested.lock().unwrap().push(page);
            let names = self
                .pages
                .get(page as usize)
                .ok_or_else(|| AppError::ApiError {
                    status: 400,
                    reason: "Bad Request".to_string(),
                })?;
            Ok(names
                .iter()
                .map(|n| RawVacancy {
                    name: n.to_string(),
                    ..Default::default()
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn test_fetch_vacancies_concatenates_in_order() {
        let board = PagedBoard {
            pages: vec![vec!["a", "b"], vec!["c"]],
            requested: Mutex::new(Vec::new()),
        };
        let all = board.fetch_vacancies("rust", 2).await.unwrap();
        let names: Vec<_> = all.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(*board.requested.lock().unwrap(), vec![0, 1]);
    }

    #[tokio::test]
    async fn test_fetch_vacancies_stops_on_error() {
        let board = PagedBoard {
            pages: vec![vec!["a"]],
            requested: Mutex::new(Vec::new()),
        };
        let err = board.fetch_vacancies("rust", 3).await.unwrap_err();
        assert!(matches!(err, AppError::ApiError { status: 400, .. }));
        assert_eq!(*board.requested.lock().unwrap(), vec![0, 1]);
    }

    #[tokio::test]
    async fn test_zero_pages_fetches_nothing() {
        let board = PagedBoard {
            pages: vec![],
            requested: Mutex::new(Vec::new()),
        };
        assert!(board.fetch_vacancies("rust", 0).await.unwrap().is_empty());
        assert_eq!(board.name(), "paged");
    }
}
