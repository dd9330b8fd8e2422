//! Matching pasted notes to script questions.

use ink_core::{InterviewScript, Question};
use strsim::jaro_winkler;

use crate::error::{InterviewError, InterviewResult};

/// Similarity at which a note key counts as a question's label or id.
const KEY_SIMILARITY: f64 = 0.9;

/// A note line matched to a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefill {
    /// The matched question.
    pub question_id: String,
    /// The value from the note line.
    pub text: String,
}

/// Match `Key: Value` lines in `text` to questions of `script`.
///
/// Keys are compared to each question's label and id, case-insensitively,
/// falling back to Jaro-Winkler similarity. Lines that match nothing are
/// ignored. A later line for the same question wins. Fails with
/// [`InterviewError::ImportParse`] when no line matches at all.
pub fn parse_import(script: &InterviewScript, text: &str) -> InterviewResult<Vec<Prefill>> {
    let mut prefills: Vec<Prefill> = Vec::new();

    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().trim_start_matches(['-', '*', '#']).trim();
        let value = value.trim();
        if key.is_empty() || value.is_empty() {
            continue;
        }
        let Some(question) = find_question(script, key) else {
            continue;
        };

        match prefills.iter_mut().find(|p| p.question_id == question.id) {
            Some(existing) => existing.text = value.to_string(),
            None => prefills.push(Prefill {
                question_id: question.id.clone(),
                text: value.to_string(),
            }),
        }
    }

    if prefills.is_empty() {
        let preview: String = text.trim().chars().take(40).collect();
        return Err(InterviewError::ImportParse(preview));
    }
    Ok(prefills)
}

fn find_question<'a>(script: &'a InterviewScript, key: &str) -> Option<&'a Question> {
    let key = key.to_lowercase();
    let names = |q: &'a Question| {
        [Some(q.id.to_lowercase()), q.label.as_ref().map(|l| l.to_lowercase())]
            .into_iter()
            .flatten()
    };

    let questions = || script.positions().map(|(_, _, q)| q);
    if let Some(q) = questions().find(|q| names(*q).any(|n| n == key)) {
        return Some(q);
    }

    questions()
        .filter_map(|q| {
            let best = names(q)
                .map(|n| jaro_winkler(&n, &key))
                .fold(0.0_f64, f64::max);
            (best >= KEY_SIMILARITY).then_some((q, best))
        })
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(q, _)| q)
}
