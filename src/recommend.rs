//! Eligibility ranking: which branches a student can get into, scored by
//! how comfortably their rank clears the desirability-adjusted cutoff.

use serde::Serialize;

use crate::boom;
use crate::models::{BranchMetrics, College, StudentProfile};
use crate::policy;
use crate::predict::CollegeInfo;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub college: CollegeInfo,
    pub branch: String,
    pub eligibility_score: f64,
    pub adjusted_cutoff: u32,
    pub boom_percent: u8,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingBranch {
    pub name: String,
    pub avg_boom_flag: f64,
    pub college_count: usize,
}

/// 0 for ineligible ranks, otherwise 100 * (1 - rank/cutoff) rounded to
/// two decimals: a student at the cutoff scores 0, a top rank against a
/// large cutoff approaches 100.
pub fn eligibility_score(rank: u32, adjusted_cutoff: u32) -> f64 {
    if rank > adjusted_cutoff || adjusted_cutoff == 0 {
        return 0.0;
    }
    let score = 100.0 * (1.0 - f64::from(rank) / f64::from(adjusted_cutoff));
    (score * 100.0).round() / 100.0
}

/// Tightens a cutoff for branch desirability: a full boom flag takes 30%
/// off the effective cutoff before eligibility is tested.
pub fn adjust_cutoff(original: u32, boom_flag: f64) -> u32 {
    (f64::from(original) * (1.0 - boom_flag * policy::BOOM_CUTOFF_TIGHTENING)).round() as u32
}

fn expand_token(token: &str) -> &str {
    match token {
        "ai" => "artificial intelligence",
        "ml" => "machine learning",
        "cs" => "computer",
        "ec" => "electronics",
        "ee" => "electrical",
        "me" => "mechanical",
        "ie" => "information",
        other => other,
    }
}

/// Canonical lowercase form of a branch name with common abbreviations
/// expanded, so "CS" lines up with "Computer Science and Engineering".
pub fn normalize_branch_name(name: &str) -> String {
    name.to_lowercase()
        .replace('&', " and ")
        .split_whitespace()
        .map(expand_token)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Loose match between a catalog branch name and a student preference:
/// containment in either direction, or any shared significant word.
pub fn matches_preference(branch_name: &str, preference: &str) -> bool {
    let branch = normalize_branch_name(branch_name);
    let wanted = normalize_branch_name(preference);
    if branch.is_empty() || wanted.is_empty() {
        return false;
    }
    if branch.contains(&wanted) || wanted.contains(&branch) {
        return true;
    }

    let branch_words: Vec<&str> = branch.split(' ').filter(|word| word.len() > 2).collect();
    wanted
        .split(' ')
        .filter(|word| word.len() > 2)
        .any(|wanted_word| {
            branch_words
                .iter()
                .any(|word| word.contains(wanted_word) || wanted_word.contains(word))
        })
}

/// Ranks every eligible (college, branch) pair for the student. Branches
/// without a cutoff for the student's category are omitted. Ordering is
/// eligibility score descending, fees ascending on ties.
pub fn recommendations(colleges: &[College], student: &StudentProfile) -> Vec<Recommendation> {
    let mut results = Vec::new();

    for college in colleges {
        for branch in &college.branches {
            let Some(original_cutoff) = branch.cutoff.get(&student.category).copied() else {
                continue;
            };

            let (metrics, _) = BranchMetrics::from_branch(branch);
            let boom_flag = boom::eligibility_boom_flag(&metrics);
            let adjusted_cutoff = adjust_cutoff(original_cutoff, boom_flag);

            if student.rank > adjusted_cutoff {
                continue;
            }

            results.push(Recommendation {
                college: CollegeInfo::from_college(college),
                branch: branch.name.clone(),
                eligibility_score: eligibility_score(student.rank, adjusted_cutoff),
                adjusted_cutoff,
                boom_percent: (boom_flag * 100.0).round() as u8,
            });
        }
    }

    if !student.preferred_branches.is_empty() {
        let preferred: Vec<Recommendation> = results
            .iter()
            .filter(|rec| {
                student
                    .preferred_branches
                    .iter()
                    .any(|pref| matches_preference(&rec.branch, pref))
            })
            .cloned()
            .collect();
        if !preferred.is_empty() {
            results = preferred;
        }
    }

    results.sort_by(|a, b| {
        b.eligibility_score
            .partial_cmp(&a.eligibility_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.college.fees.cmp(&b.college.fees))
    });
    results
}

/// Market view across the catalog: branches grouped by name, ranked by
/// average boom flag, top six.
pub fn trending_branches(colleges: &[College]) -> Vec<TrendingBranch> {
    let mut groups: std::collections::BTreeMap<String, Vec<f64>> =
        std::collections::BTreeMap::new();

    for college in colleges {
        for branch in &college.branches {
            let (metrics, _) = BranchMetrics::from_branch(branch);
            groups
                .entry(branch.name.clone())
                .or_default()
                .push(boom::eligibility_boom_flag(&metrics));
        }
    }

    let mut trending: Vec<TrendingBranch> = groups
        .into_iter()
        .map(|(name, flags)| TrendingBranch {
            avg_boom_flag: flags.iter().sum::<f64>() / flags.len() as f64,
            college_count: flags.len(),
            name,
        })
        .collect();

    trending.sort_by(|a, b| {
        b.avg_boom_flag
            .partial_cmp(&a.avg_boom_flag)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    trending.truncate(6);
    trending
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::models::{Branch, CollegeType};
    use std::collections::BTreeMap;

    fn branch(name: &str, cutoff: u32) -> Branch {
        Branch {
            name: name.to_string(),
            cutoff: BTreeMap::from([(Category::Gm, cutoff)]),
            placement_rate: Some(0.9),
            avg_salary: Some(1_000_000.0),
            max_salary: Some(4_000_000.0),
            admission_trend: Some(0.8),
            industry_growth: Some(0.85),
            historical_data: Vec::new(),
        }
    }

    fn college(id: &str, fees: u64, branches: Vec<Branch>) -> College {
        College {
            id: id.to_string(),
            name: format!("College {id}"),
            location: "Mysuru".to_string(),
            college_type: CollegeType::Private,
            fees,
            infra_rating: None,
            branches,
        }
    }

    #[test]
    fn midpoint_rank_scores_fifty() {
        assert_eq!(eligibility_score(500, 1000), 50.0);
    }

    #[test]
    fn ineligible_rank_scores_zero() {
        assert_eq!(eligibility_score(1001, 1000), 0.0);
        assert_eq!(eligibility_score(1000, 1000), 0.0);
    }

    #[test]
    fn top_rank_approaches_hundred() {
        assert!(eligibility_score(1, 100_000) > 99.9);
    }

    #[test]
    fn adjust_cutoff_is_monotone_in_boom_flag() {
        let mut previous = u32::MAX;
        for step in 0..=8 {
            let flag = f64::from(step) * 0.1;
            let adjusted = adjust_cutoff(10_000, flag);
            assert!(adjusted <= previous, "flag {flag} raised the cutoff");
            previous = adjusted;
        }
        assert_eq!(adjust_cutoff(10_000, 0.0), 10_000);
        assert_eq!(adjust_cutoff(10_000, 0.8), 7_600);
    }

    #[test]
    fn recommendations_respect_adjusted_eligibility() {
        let colleges = vec![college("c1", 120_000, vec![branch("Computer Science", 1000)])];
        // Boom flag is capped at 0.8, so the effective cutoff is 760.
        let strong = StudentProfile::new(700, Category::Gm, Vec::new()).unwrap();
        let recs = recommendations(&colleges, &strong);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].adjusted_cutoff, 760);
        assert_eq!(recs[0].boom_percent, 80);
        assert!(recs[0].eligibility_score > 0.0);

        let borderline = StudentProfile::new(800, Category::Gm, Vec::new()).unwrap();
        assert!(recommendations(&colleges, &borderline).is_empty());
    }

    #[test]
    fn missing_category_omits_the_pair() {
        let colleges = vec![college("c1", 120_000, vec![branch("Computer Science", 1000)])];
        let student = StudentProfile::new(100, Category::Scg, Vec::new()).unwrap();
        assert!(recommendations(&colleges, &student).is_empty());
    }

    #[test]
    fn ties_break_on_cheaper_fees() {
        let colleges = vec![
            college("costly", 70_000, vec![branch("Computer Science", 1000)]),
            college("cheap", 50_000, vec![branch("Computer Science", 1000)]),
        ];
        let student = StudentProfile::new(152, Category::Gm, Vec::new()).unwrap();
        let recs = recommendations(&colleges, &student);
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].eligibility_score, recs[1].eligibility_score);
        assert_eq!(recs[0].college.id, "cheap");
    }

    #[test]
    fn ranking_is_deterministic() {
        let colleges = vec![
            college("a", 90_000, vec![branch("Computer Science", 2000), branch("Electronics", 1500)]),
            college("b", 60_000, vec![branch("Mechanical Engineering", 4000)]),
        ];
        let student = StudentProfile::new(800, Category::Gm, Vec::new()).unwrap();
        let first = recommendations(&colleges, &student);
        let second = recommendations(&colleges, &student);
        let keys: Vec<_> = first.iter().map(|r| (r.college.id.clone(), r.branch.clone())).collect();
        let again: Vec<_> = second.iter().map(|r| (r.college.id.clone(), r.branch.clone())).collect();
        assert_eq!(keys, again);
    }

    #[test]
    fn preference_matching_expands_aliases() {
        assert!(matches_preference("Computer Science and Engineering", "CS"));
        assert!(matches_preference("Artificial Intelligence & Machine Learning", "AI"));
        assert!(matches_preference("Electronics and Communication", "EC"));
        assert!(!matches_preference("Civil Engineering", "CS"));
    }

    #[test]
    fn preferences_are_advisory() {
        let colleges = vec![college(
            "c1",
            120_000,
            vec![branch("Computer Science", 1000), branch("Civil Engineering", 5000)],
        )];
        let wants_cs =
            StudentProfile::new(100, Category::Gm, vec!["CS".to_string()]).unwrap();
        let recs = recommendations(&colleges, &wants_cs);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].branch, "Computer Science");

        let wants_bio =
            StudentProfile::new(100, Category::Gm, vec!["Biotechnology".to_string()]).unwrap();
        let recs = recommendations(&colleges, &wants_bio);
        assert_eq!(recs.len(), 2);
    }

    #[test]
    fn trending_keeps_top_six_branches() {
        let branches: Vec<Branch> = (0..8)
            .map(|i| {
                let mut b = branch(&format!("Branch {i}"), 1000);
                // Keep every flag below the 0.8 ceiling so the ordering
                // is strict.
                b.placement_rate = Some(0.1 + 0.05 * f64::from(i));
                b
            })
            .collect();
        let colleges = vec![college("c1", 100_000, branches)];
        let trending = trending_branches(&colleges);
        assert_eq!(trending.len(), 6);
        assert!(trending[0].avg_boom_flag >= trending[5].avg_boom_flag);
        assert_eq!(trending[0].name, "Branch 7");
        assert_eq!(trending[0].college_count, 1);
    }
}
