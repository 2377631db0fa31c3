use serde::{Deserialize, Serialize};

use crate::visit::record::VisitRecord;

const UNCATEGORIZED: &str = "other";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub name: String,
    pub count: usize,
    /// Share of all visits, rounded to a whole percent.
    pub pct: u32,
}

/// Totals shown next to the map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitSummary {
    pub total_visits: usize,
    pub total_xp: u64,
    pub total_spent: u64,
    pub total_duration_minutes: u64,
    /// Most visited first; ties keep first-appearance order.
    pub categories: Vec<CategoryShare>,
}

impl VisitSummary {
    pub fn from_visits(visits: &[VisitRecord]) -> Self {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for visit in visits {
            let name = if visit.category.trim().is_empty() {
                UNCATEGORIZED
            } else {
                visit.category.trim()
            };
            match counts.iter_mut().find(|(existing, _)| existing == name) {
                Some((_, count)) => *count += 1,
                None => counts.push((name.to_string(), 1)),
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1));

        let total = visits.len();
        let categories = counts
            .into_iter()
            .map(|(name, count)| CategoryShare {
                pct: ((count as f64 / total as f64) * 100.0).round() as u32,
                name,
                count,
            })
            .collect();

        Self {
            total_visits: total,
            total_xp: visits
                .iter()
                .filter_map(|v| v.xp_earned)
                .map(u64::from)
                .sum(),
            total_spent: visits.iter().filter_map(|v| v.spent_amount).sum(),
            total_duration_minutes: visits
                .iter()
                .filter_map(|v| v.duration_minutes)
                .map(u64::from)
                .sum(),
            categories,
        }
    }

    pub fn top_category(&self) -> Option<&CategoryShare> {
        self.categories.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visit(id: i64, category: &str, xp: u32, cost: u64, minutes: u32) -> VisitRecord {
        let mut record = VisitRecord::new(id, format!("place {id}"), 37.5, 127.0)
            .with_category(category);
        record.xp_earned = Some(xp);
        record.spent_amount = Some(cost);
        record.duration_minutes = Some(minutes);
        record
    }

    #[test]
    fn summary_totals_passthrough_metrics() {
        let visits = vec![
            visit(1, "cafe", 150, 8000, 85),
            visit(2, "park", 100, 0, 45),
            visit(3, "cafe", 120, 7000, 60),
        ];
        let summary = VisitSummary::from_visits(&visits);
        assert_eq!(summary.total_visits, 3);
        assert_eq!(summary.total_xp, 370);
        assert_eq!(summary.total_spent, 15000);
        assert_eq!(summary.total_duration_minutes, 190);
        let top = summary.top_category().unwrap();
        assert_eq!((top.name.as_str(), top.count, top.pct), ("cafe", 2, 67));
        assert_eq!(summary.categories[1].pct, 33);
    }

    #[test]
    fn ties_keep_first_appearance_and_blank_categories_are_grouped() {
        let visits = vec![
            visit(1, "gallery", 1, 0, 1),
            visit(2, "", 1, 0, 1),
            visit(3, "park", 1, 0, 1),
            visit(4, "  ", 1, 0, 1),
        ];
        let summary = VisitSummary::from_visits(&visits);
        let names: Vec<_> = summary.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["other", "gallery", "park"]);
    }

    #[test]
    fn empty_summary_has_no_categories() {
        let summary = VisitSummary::from_visits(&[]);
        assert_eq!(summary, VisitSummary::default());
    }
}
