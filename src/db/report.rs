//! Result computation for finished sessions.
//!
//! A response is correct when the submitted answer ids are exactly the
//! question's correct ids. Correct players are ranked by submission time and
//! the N-th of them earns `points / N`, rounded to one decimal place.

use std::collections::HashMap;

use super::models::{Player, PlayerScore, QuestionResult, Session, SessionResults};

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn sorted(ids: &[i32]) -> Vec<i32> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Breakdown for the question at a 1-based `position`.
pub fn question_results(session: &Session, players: &[&Player], position: u32) -> Option<QuestionResult> {
    let question = session.question_at(position)?;
    let correct_ids = sorted(&question.correct_answer_ids());
    let opened_at = session.opened_at.get(&position).copied();

    let respondents: Vec<(&Player, i64)> = players
        .iter()
        .filter_map(|p| p.responses.get(&position).map(|r| (*p, r.submitted_at)))
        .collect();

    let mut correct: Vec<(&Player, i64)> = respondents
        .iter()
        .filter(|(p, _)| {
            p.responses
                .get(&position)
                .is_some_and(|r| sorted(&r.answer_ids) == correct_ids)
        })
        .copied()
        .collect();
    correct.sort_by_key(|(p, submitted_at)| (*submitted_at, p.player_id));

    let players_correct_list = correct
        .iter()
        .enumerate()
        .map(|(rank, (p, _))| PlayerScore {
            name: p.name.clone(),
            score: round1(f64::from(question.points) / (rank as f64 + 1.0)),
        })
        .collect();

    let average_answer_time = match (opened_at, respondents.len()) {
        (Some(opened_at), n) if n > 0 => {
            let total_ms: i64 = respondents
                .iter()
                .map(|(_, submitted_at)| (submitted_at - opened_at).max(0))
                .sum();
            (total_ms as f64 / n as f64 / 1000.0).round() as i64
        }
        _ => 0,
    };

    let percent_correct = if players.is_empty() {
        0
    } else {
        (correct.len() as f64 * 100.0 / players.len() as f64).round() as u32
    };

    Some(QuestionResult {
        question_id: question.question_id,
        players_correct_list,
        average_answer_time,
        percent_correct,
    })
}

pub fn session_results(session: &Session, players: &[&Player]) -> SessionResults {
    let question_results: Vec<QuestionResult> = (1..=session.num_questions())
        .filter_map(|position| question_results(session, players, position))
        .collect();

    let mut totals: HashMap<&str, f64> = players.iter().map(|p| (p.name.as_str(), 0.0)).collect();
    for result in &question_results {
        for earned in &result.players_correct_list {
            if let Some(total) = totals.get_mut(earned.name.as_str()) {
                *total += earned.score;
            }
        }
    }

    let mut users_ranked_by_score: Vec<PlayerScore> = totals
        .into_iter()
        .map(|(name, score)| PlayerScore {
            name: name.to_string(),
            score: round1(score),
        })
        .collect();
    users_ranked_by_score.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.name.cmp(&b.name))
    });

    SessionResults {
        users_ranked_by_score,
        question_results,
    }
}
