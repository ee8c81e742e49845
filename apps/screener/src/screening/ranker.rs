use serde::Serialize;

use crate::screening::models::{Job, JobStatus};

/// One successful job in shortlist order. `rank` starts at 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortlistRow {
    pub rank: usize,
    pub file_name: String,
    pub score: u8,
}

/// Display order: loading jobs, then successes by descending score, then errors.
///
/// Loading and error jobs keep submission order. `sort_by` is stable, so equal
/// scores keep submission order too.
pub fn rank(jobs: &[Job]) -> Vec<Job> {
    let of_status = |status: JobStatus| {
        jobs.iter()
            .filter(move |j| j.status() == status)
            .cloned()
            .collect::<Vec<_>>()
    };

    let loading = of_status(JobStatus::Loading);
    let mut successes = of_status(JobStatus::Success);
    let errors = of_status(JobStatus::Error);

    successes.sort_by(|a, b| b.score().cmp(&a.score()));

    let mut ranked = loading;
    ranked.extend(successes);
    ranked.extend(errors);
    ranked
}

/// Successful jobs of a ranked view, numbered for export.
pub fn shortlist(ranked: &[Job]) -> Vec<ShortlistRow> {
    ranked
        .iter()
        .filter_map(|job| match job {
            Job::Success { file_name, result } => Some((file_name, result.score())),
            _ => None,
        })
        .enumerate()
        .map(|(i, (file_name, score))| ShortlistRow {
            rank: i + 1,
            file_name: file_name.clone(),
            score,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::models::{AnalysisResult, ScreeningResult};

    fn ok(name: &str, score: u8) -> Job {
        Job::Success {
            file_name: name.to_string(),
            result: AnalysisResult::Screening(ScreeningResult {
                score,
                summary: String::new(),
            }),
        }
    }

    fn failed(name: &str) -> Job {
        Job::Error {
            file_name: name.to_string(),
            error: "failed".to_string(),
        }
    }

    fn names(jobs: &[Job]) -> Vec<&str> {
        jobs.iter().map(Job::file_name).collect()
    }

    #[test]
    fn test_ties_keep_submission_order() {
        let jobs = vec![ok("X", 90), ok("Y", 95), ok("Z", 90)];
        assert_eq!(names(&rank(&jobs)), vec!["Y", "X", "Z"]);
    }

    #[test]
    fn test_loading_first_errors_last() {
        let jobs = vec![
            failed("e1"),
            ok("s1", 40),
            Job::loading("l1"),
            ok("s2", 70),
            failed("e2"),
            Job::loading("l2"),
        ];
        assert_eq!(
            names(&rank(&jobs)),
            vec!["l1", "l2", "s2", "s1", "e1", "e2"]
        );
    }

    #[test]
    fn test_rank_does_not_mutate_input() {
        let jobs = vec![ok("a", 10), ok("b", 20)];
        let _ = rank(&jobs);
        assert_eq!(names(&jobs), vec!["a", "b"]);
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank(&[]).is_empty());
        assert!(shortlist(&[]).is_empty());
    }

    #[test]
    fn test_shortlist_numbers_successes_only() {
        let ranked = rank(&[Job::loading("l"), ok("a", 60), failed("e"), ok("b", 85)]);
        assert_eq!(
            shortlist(&ranked),
            vec![
                ShortlistRow {
                    rank: 1,
                    file_name: "b".to_string(),
                    score: 85
                },
                ShortlistRow {
                    rank: 2,
                    file_name: "a".to_string(),
                    score: 60
                },
            ]
        );
    }
}
