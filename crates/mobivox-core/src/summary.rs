use crate::types::{MobilityProfile, ProfileSummary, VisaDetail};
use std::collections::BTreeMap;

/// Derive summary statistics from a profile. Pure: counts and details come
/// only from the user-entered records, never from remote state.
pub fn summarize(profile: &MobilityProfile) -> ProfileSummary {
    ProfileSummary {
        total_visas: profile.visa_records.len(),
        visited_countries: profile.travel_history.len(),
        visa_details: profile
            .visa_records
            .iter()
            .map(|v| VisaDetail {
                country: v.country.clone(),
                status: v.visa_status.clone(),
            })
            .collect(),
        visited_details: profile.travel_history.clone(),
    }
}

impl ProfileSummary {
    /// Count visa records per status. Statuses are lowercased so that
    /// "Approved" and "approved" land in the same bucket; BTreeMap keeps
    /// iteration order stable.
    pub fn status_breakdown(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for detail in &self.visa_details {
            *counts.entry(detail.status.to_lowercase()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VisaRecord;

    fn profile_with(records: Vec<(&str, &str)>, visited: Vec<&str>) -> MobilityProfile {
        MobilityProfile {
            passport_number: "AB1234567".to_string(),
            country: "Portugal".to_string(),
            visa_records: records
                .into_iter()
                .map(|(country, status)| VisaRecord {
                    country: country.to_string(),
                    visa_status: status.to_string(),
                })
                .collect(),
            travel_history: visited.into_iter().map(String::from).collect(),
        }
    }

    #[test]
    fn test_summary_counts_and_details() {
        let profile = profile_with(
            vec![("Japan", "approved"), ("USA", "approved"), ("Brazil", "pending")],
            vec!["Spain", "France"],
        );
        let summary = summarize(&profile);
        assert_eq!(summary.total_visas, 3);
        assert_eq!(summary.visited_countries, 2);
        assert_eq!(summary.visa_details.len(), 3);
        assert_eq!(summary.visa_details[2].country, "Brazil");
        assert_eq!(summary.visa_details[2].status, "pending");
        assert_eq!(summary.visited_details, vec!["Spain", "France"]);
    }

    #[test]
    fn test_status_breakdown_two_approved_one_pending() {
        let profile = profile_with(
            vec![("Japan", "approved"), ("USA", "approved"), ("Brazil", "pending")],
            vec!["Spain", "France"],
        );
        let summary = summarize(&profile);
        let breakdown = summary.status_breakdown();
        assert_eq!(breakdown.get("approved"), Some(&2));
        assert_eq!(breakdown.get("pending"), Some(&1));
        assert_eq!(breakdown.len(), 2);
    }

    #[test]
    fn test_status_breakdown_case_insensitive() {
        let profile = profile_with(vec![("Japan", "Approved"), ("USA", "approved")], vec![]);
        let breakdown = summarize(&profile).status_breakdown();
        assert_eq!(breakdown.get("approved"), Some(&2));
    }

    #[test]
    fn test_summary_empty_profile() {
        let profile = profile_with(vec![], vec![]);
        let summary = summarize(&profile);
        assert_eq!(summary.total_visas, 0);
        assert_eq!(summary.visited_countries, 0);
        assert!(summary.status_breakdown().is_empty());
    }
}
