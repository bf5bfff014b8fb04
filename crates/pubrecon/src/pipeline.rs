//! Two-provider search: arXiv first, then Symplectic, then reconcile.

use chrono::DateTime;
use serde::Serialize;

use crate::error::FetchResult;
use crate::models::{FilterOptions, Publication, ReconciliationReport};
use crate::progress::ProgressReporter;
use crate::reconcile::reconcile;
use crate::sources::PublicationSource;

/// Result of a search.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchOutcome {
    /// arXiv records reconciled against Symplectic.
    pub report: ReconciliationReport,

    /// Symplectic records fetched for the comparison, kept for ticket
    /// lookups. `None` when the Symplectic fetch never ran.
    #[serde(skip)]
    pub institutional: Option<Vec<Publication>>,
}

/// Run the search.
///
/// The Symplectic fetch only starts once arXiv has answered: its
/// created-since filter is the day of the earliest arXiv record. When arXiv
/// finds nothing, Symplectic is not contacted and the report is empty.
///
/// # Errors
///
/// Returns the first provider failure.
pub async fn search(
    preprints: &dyn PublicationSource,
    institutional: &dyn PublicationSource,
    options: &FilterOptions,
    progress: &ProgressReporter,
) -> FetchResult<SearchOutcome> {
    let primary = preprints.fetch(options, progress).await?;
    if primary.is_empty() {
        tracing::info!("No preprints found, skipping institutional fetch");
        return Ok(SearchOutcome::default());
    }

    let since = earliest_day(&primary);
    tracing::info!(count = primary.len(), created_since = ?since, "Preprints fetched");

    let institutional_options =
        FilterOptions { created_since: since.or(options.created_since), ..options.clone() };
    let records = institutional.fetch(&institutional_options, progress).await?;

    let report = reconcile(&primary, &records);
    Ok(SearchOutcome { report, institutional: Some(records) })
}

/// UTC day of the earliest dated record.
fn earliest_day(publications: &[Publication]) -> Option<chrono::NaiveDate> {
    let earliest = publications.iter().filter_map(|p| p.date).min()?;
    DateTime::from_timestamp_millis(earliest).map(|d| d.date_naive())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::NaiveDate;

    use super::*;
    use crate::models::PublicationType;
    use crate::progress::Provider;

    struct Fixed {
        provider: Provider,
        publications: Vec<Publication>,
        seen: Mutex<Vec<FilterOptions>>,
    }

    impl Fixed {
        fn new(provider: Provider, publications: Vec<Publication>) -> Self {
            Self { provider, publications, seen: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait::async_trait]
    impl PublicationSource for Fixed {
        fn provider(&self) -> Provider {
            self.provider
        }

        async fn fetch(
            &self,
            options: &FilterOptions,
            _progress: &ProgressReporter,
        ) -> FetchResult<Vec<Publication>> {
            self.seen.lock().unwrap().push(options.clone());
            Ok(self.publications.clone())
        }
    }

    fn dated(id: &str, title: &str, millis: i64) -> Publication {
        Publication {
            id: Some(id.into()),
            display_name: Some(title.into()),
            date: Some(millis),
            ..Publication::new(PublicationType::Other)
        }
    }

    #[tokio::test]
    async fn test_empty_preprints_skip_institutional() {
        let arxiv = Fixed::new(Provider::Arxiv, Vec::new());
        let symplectic = Fixed::new(Provider::Symplectic, vec![dated("1", "x", 0)]);

        let outcome =
            search(&arxiv, &symplectic, &FilterOptions::default(), &ProgressReporter::disabled())
                .await
                .unwrap();

        assert!(outcome.report.matching.is_empty());
        assert!(outcome.institutional.is_none());
        assert!(symplectic.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_created_since_from_earliest_preprint() {
        // 2014-09-18 and 2013-05-01
        let arxiv = Fixed::new(
            Provider::Arxiv,
            vec![dated("a", "Late", 1_410_998_400_000), dated("b", "Early", 1_367_366_400_000)],
        );
        let symplectic = Fixed::new(Provider::Symplectic, vec![dated("1", "Early", 0)]);

        let outcome =
            search(&arxiv, &symplectic, &FilterOptions::default(), &ProgressReporter::disabled())
                .await
                .unwrap();

        let seen = symplectic.seen.lock().unwrap();
        assert_eq!(seen[0].created_since, NaiveDate::from_ymd_opt(2013, 5, 1));
        assert_eq!(outcome.report.stats.matching_count, 1);
        assert_eq!(outcome.institutional.map(|r| r.len()), Some(1));
    }

    #[tokio::test]
    async fn test_undated_preprints_keep_caller_created_since() {
        let undated = Publication { date: None, ..dated("a", "Undated", 0) };
        let arxiv = Fixed::new(Provider::Arxiv, vec![undated]);
        let symplectic = Fixed::new(Provider::Symplectic, Vec::new());
        let options = FilterOptions {
            created_since: NaiveDate::from_ymd_opt(2014, 9, 1),
            ..FilterOptions::default()
        };

        let outcome = search(&arxiv, &symplectic, &options, &ProgressReporter::disabled())
            .await
            .unwrap();

        let seen = symplectic.seen.lock().unwrap();
        assert_eq!(seen[0].created_since, NaiveDate::from_ymd_opt(2014, 9, 1));
        // The fetch ran, even though it found nothing.
        assert_eq!(outcome.institutional, Some(Vec::new()));
    }
}
