use std::fmt::Write;

use crate::models::{College, StudentProfile};
use crate::predict;
use crate::recommend;
use crate::summary;

/// Renders a markdown admission outlook for one student against the
/// catalog: market summary, trending branches, ranked recommendations and
/// the cutoff outlook for the student's category.
pub fn build_report(colleges: &[College], student: &StudentProfile, current_year: i32) -> String {
    let predictions = predict::predict_colleges(colleges, current_year);
    let market = summary::trending_summary(&predictions);
    let trending = recommend::trending_branches(colleges);
    let recommendations = recommend::recommendations(colleges, student);
    let eligible = predict::filter_by_student(predictions, student);

    let mut output = String::new();

    let _ = writeln!(output, "# Admission Outlook Report");
    let _ = writeln!(
        output,
        "Generated for rank {} in category {} ({} -> {} cycle)",
        student.rank,
        student.category,
        current_year,
        current_year + 1
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Market Summary");
    if market.top_booming_branches.is_empty() {
        let _ = writeln!(output, "No branch predictions available.");
    } else {
        let _ = writeln!(
            output,
            "Average cutoff movement: {:+.1}%",
            market.average_cutoff_change
        );
        let _ = writeln!(
            output,
            "Booming: {}",
            market.top_booming_branches.join(", ")
        );
        let _ = writeln!(
            output,
            "Declining: {}",
            market.top_declining_branches.join(", ")
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Trending Branches");
    if trending.is_empty() {
        let _ = writeln!(output, "No branches in the catalog.");
    } else {
        for branch in trending.iter() {
            let _ = writeln!(
                output,
                "- {}: boom {:.0}% across {} college(s)",
                branch.name,
                branch.avg_boom_flag * 100.0,
                branch.college_count
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Top Recommendations");
    if recommendations.is_empty() {
        let _ = writeln!(
            output,
            "No eligible branches for this rank and category."
        );
    } else {
        for rec in recommendations.iter().take(10) {
            let _ = writeln!(
                output,
                "- {} ({}) {}: eligibility {:.2}, adjusted cutoff {}, boom {}%",
                rec.college.name,
                rec.college.location,
                rec.branch,
                rec.eligibility_score,
                rec.adjusted_cutoff,
                rec.boom_percent
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Cutoff Outlook");
    if eligible.is_empty() {
        let _ = writeln!(output, "No eligible branches to project.");
    } else {
        for college in eligible.iter().take(5) {
            for branch in college.branches.iter() {
                let current = branch.current_cutoff.get(&student.category);
                let predicted = branch.predicted_cutoff.get(&student.category);
                if let (Some(current), Some(predicted)) = (current, predicted) {
                    let _ = writeln!(
                        output,
                        "- {} {}: {} -> {} ({} confidence, {} data)",
                        college.college.name,
                        branch.branch_name,
                        current,
                        predicted,
                        branch.confidence,
                        match branch.metrics_confidence {
                            crate::models::Confidence::High => "rich",
                            crate::models::Confidence::Medium => "partial",
                            crate::models::Confidence::Low => "sparse",
                        }
                    );
                }
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::models::{Branch, CollegeType};
    use std::collections::BTreeMap;

    fn catalog() -> Vec<College> {
        vec![College {
            id: "E001".to_string(),
            name: "UVCE".to_string(),
            location: "Bengaluru".to_string(),
            college_type: CollegeType::Government,
            fees: 50_000,
            infra_rating: Some(4.0),
            branches: vec![Branch {
                name: "Computer Science and Engineering".to_string(),
                cutoff: BTreeMap::from([(Category::Gm, 2000)]),
                placement_rate: Some(0.9),
                avg_salary: Some(1_000_000.0),
                max_salary: Some(4_000_000.0),
                admission_trend: Some(0.8),
                industry_growth: Some(0.85),
                historical_data: Vec::new(),
            }],
        }]
    }

    #[test]
    fn report_carries_all_sections() {
        let student = StudentProfile::new(800, Category::Gm, Vec::new()).unwrap();
        let report = build_report(&catalog(), &student, 2025);
        assert!(report.contains("# Admission Outlook Report"));
        assert!(report.contains("## Market Summary"));
        assert!(report.contains("## Trending Branches"));
        assert!(report.contains("## Top Recommendations"));
        assert!(report.contains("## Cutoff Outlook"));
        assert!(report.contains("UVCE"));
        assert!(report.contains("Computer Science and Engineering"));
    }

    #[test]
    fn report_explains_empty_eligibility() {
        let student = StudentProfile::new(90_000, Category::Gm, Vec::new()).unwrap();
        let report = build_report(&catalog(), &student, 2025);
        assert!(report.contains("No eligible branches for this rank and category."));
    }
}
