use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::{Deserialize, Deserializer};

use super::entity::Moderated;

/// Table filter: free-text search plus an optional exact status.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(bound(deserialize = "S: DeserializeOwned"))]
pub struct EntityFilter<S> {
    #[serde(default)]
    pub search: Option<String>,
    /// `all` or an empty value means no status filter, as the dashboard dropdowns send.
    #[serde(default, deserialize_with = "status_or_all")]
    pub status: Option<S>,
}

fn status_or_all<'de, D, S>(deserializer: D) -> Result<Option<S>, D::Error>
where
    D: Deserializer<'de>,
    S: DeserializeOwned,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) if value.eq_ignore_ascii_case("all") => Ok(None),
        Some(value) => {
            S::deserialize(IntoDeserializer::<D::Error>::into_deserializer(value)).map(Some)
        }
    }
}

impl<S> Default for EntityFilter<S> {
    fn default() -> Self {
        Self {
            search: None,
            status: None,
        }
    }
}

impl<S: Copy + Eq> EntityFilter<S> {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            status: None,
        }
    }

    pub fn with_status(mut self, status: S) -> Self {
        self.status = Some(status);
        self
    }

    /// Keeps input order; an empty or blank term matches everything.
    pub fn apply<E>(&self, entities: Vec<E>) -> Vec<E>
    where
        E: Moderated<Status = S>,
    {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase);

        entities
            .into_iter()
            .filter(|entity| self.status.map_or(true, |status| entity.status() == status))
            .filter(|entity| needle.as_deref().map_or(true, |term| entity.matches(term)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::moderation::domain::{CandidateId, JobStatus, UserId, UserStatus};
    use crate::workflows::moderation::seed;

    #[test]
    fn user_search_covers_name_email_and_company() {
        let by_name = EntityFilter::<UserStatus>::search("SARAH").apply(seed::users());
        assert_eq!(by_name.iter().map(|u| u.id).collect::<Vec<_>>(), vec![UserId(1)]);

        let by_email = EntityFilter::<UserStatus>::search("student.edu").apply(seed::users());
        assert_eq!(by_email.iter().map(|u| u.id).collect::<Vec<_>>(), vec![UserId(2)]);

        let by_company = EntityFilter::<UserStatus>::search("startupco").apply(seed::users());
        assert_eq!(by_company.iter().map(|u| u.id).collect::<Vec<_>>(), vec![UserId(3)]);
    }

    #[test]
    fn blank_search_matches_everything() {
        let all = EntityFilter::<UserStatus>::search("   ").apply(seed::users());
        assert_eq!(all.len(), seed::users().len());
    }

    #[test]
    fn status_and_search_combine() {
        let filter = EntityFilter::search("techcorp").with_status(JobStatus::Active);
        let jobs = filter.apply(seed::jobs());
        assert!(!jobs.is_empty());
        assert!(jobs
            .iter()
            .all(|job| job.status == JobStatus::Active && job.company == "TechCorp Inc"));

        let closed = EntityFilter::search("techcorp")
            .with_status(JobStatus::Closed)
            .apply(seed::jobs());
        assert!(closed.is_empty());
    }

    #[test]
    fn candidate_search_covers_university_but_not_skills() {
        let stanford = EntityFilter::search("stanford").apply(seed::candidates());
        assert_eq!(stanford.iter().map(|c| c.id).collect::<Vec<_>>(), vec![CandidateId(2)]);

        let seo = EntityFilter::search("seo").apply(seed::candidates());
        assert!(seo.is_empty());
    }

    #[test]
    fn all_or_empty_status_means_no_filter() {
        for raw in [r#"{"status":"all"}"#, r#"{"status":"ALL"}"#, r#"{"status":""}"#, "{}"] {
            let filter: EntityFilter<UserStatus> = serde_json::from_str(raw).expect(raw);
            assert_eq!(filter.status, None, "{raw}");
        }

        let pending: EntityFilter<UserStatus> =
            serde_json::from_str(r#"{"status":"pending"}"#).expect("known status");
        assert_eq!(pending.status, Some(UserStatus::Pending));
        assert!(serde_json::from_str::<EntityFilter<UserStatus>>(r#"{"status":"bogus"}"#).is_err());
    }
}
