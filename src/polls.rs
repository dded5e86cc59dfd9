use serde::Serialize;
use serde_json::Value;

/// Vote count and share of one poll choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceTally {
    pub id: Option<String>,
    pub text: String,
    pub votes: u64,
    pub percent: u64,
}

/// Results block of a poll detail view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollTally {
    pub question: String,
    pub total: u64,
    pub choices: Vec<ChoiceTally>,
}

/// Share of `count` in `total` as a whole percentage.
///
/// Rounds half up (`12.5` → `13`) using integer arithmetic; a zero total is 0%.
pub fn percent(count: u64, total: u64) -> u64 {
    share(u128::from(count), u128::from(total))
}

/// Percentages for a list of vote counts, in the same order
pub fn percentages(counts: &[u64]) -> Vec<u64> {
    let total: u128 = counts.iter().map(|&count| u128::from(count)).sum();
    counts
        .iter()
        .map(|&count| share(u128::from(count), total))
        .collect()
}

// Counts are widened so `count * 200` cannot overflow for any u64 input
fn share(count: u128, total: u128) -> u64 {
    if total == 0 {
        return 0;
    }
    u64::try_from((count * 200 + total) / (total * 2)).unwrap_or(u64::MAX)
}

impl PollTally {
    /// Tally a poll detail payload.
    ///
    /// Expects `choices[]` whose entries carry a `votes[]` list; a choice
    /// without one counts as zero votes.
    pub fn from_poll(poll: &Value) -> Self {
        let choices = poll
            .get("choices")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let counts: Vec<u64> = choices.iter().map(vote_count).collect();
        let shares = percentages(&counts);

        let choices = choices
            .iter()
            .zip(counts.iter().zip(shares))
            .map(|(choice, (&votes, percent))| ChoiceTally {
                id: crate::api::id_of(choice),
                text: choice_text(choice),
                votes,
                percent,
            })
            .collect();

        Self {
            question: poll
                .get("question")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            total: total_votes(&counts),
            choices,
        }
    }

    /// Choice matching a user-supplied id or (case-insensitive) text
    pub fn find_choice(&self, wanted: &str) -> Option<&ChoiceTally> {
        self.choices
            .iter()
            .find(|choice| choice.id.as_deref() == Some(wanted))
            .or_else(|| {
                self.choices
                    .iter()
                    .find(|choice| choice.text.eq_ignore_ascii_case(wanted))
            })
    }
}

fn total_votes(counts: &[u64]) -> u64 {
    counts.iter().fold(0u64, |sum, &count| sum.saturating_add(count))
}

fn vote_count(choice: &Value) -> u64 {
    match choice.get("votes") {
        Some(Value::Array(votes)) => votes.len() as u64,
        // some serializers send a bare count instead of the vote list
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        _ => 0,
    }
}

fn choice_text(choice: &Value) -> String {
    ["text", "choice_text", "label"]
        .iter()
        .find_map(|key| choice.get(*key).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn votes(n: usize) -> Value {
        Value::Array((0..n).map(|i| json!({ "id": i, "user": i })).collect())
    }

    #[test]
    fn percentages_round_half_up() {
        assert_eq!(percentages(&[10, 5, 2]), vec![59, 29, 12]);
        assert_eq!(percentages(&[1, 1]), vec![50, 50]);
        // 1/8 = 12.5% rounds up, 7/8 = 87.5% rounds up
        assert_eq!(percentages(&[1, 7]), vec![13, 88]);
        assert_eq!(percentages(&[1, 2]), vec![33, 67]);
    }

    #[test]
    fn huge_bare_counts_do_not_overflow() {
        let poll = json!({
            "choices": [
                { "id": 1, "text": "A", "votes": 100_000_000_000_000_000u64 },
                { "id": 2, "text": "B", "votes": 1 }
            ]
        });
        let tally = PollTally::from_poll(&poll);
        assert_eq!(tally.total, 100_000_000_000_000_001);
        assert_eq!(tally.choices[0].percent, 100);
        assert_eq!(tally.choices[1].percent, 0);

        assert_eq!(percentages(&[u64::MAX, u64::MAX]), vec![50, 50]);
        assert_eq!(percent(u64::MAX, u64::MAX), 100);
    }

    #[test]
    fn zero_total_is_zero_percent() {
        assert_eq!(percentages(&[0, 0, 0]), vec![0, 0, 0]);
        assert_eq!(percentages(&[]), Vec::<u64>::new());
    }

    #[test]
    fn tallies_poll_payload() {
        let poll = json!({
            "id": 1,
            "question": "Where should the retreat be?",
            "choices": [
                { "id": 1, "text": "Mountains", "votes": votes(10) },
                { "id": 2, "choice_text": "Beach", "votes": votes(5) },
                { "id": 3, "text": "City", "votes": votes(2) }
            ]
        });

        let tally = PollTally::from_poll(&poll);
        assert_eq!(tally.total, 17);
        assert_eq!(tally.question, "Where should the retreat be?");
        let shares: Vec<_> = tally.choices.iter().map(|c| c.percent).collect();
        assert_eq!(shares, vec![59, 29, 12]);
        assert_eq!(tally.choices[1].text, "Beach");

        assert_eq!(tally.find_choice("2").map(|c| c.text.as_str()), Some("Beach"));
        assert_eq!(tally.find_choice("city").and_then(|c| c.id.clone()), Some("3".into()));
        assert!(tally.find_choice("Moon").is_none());
    }

    #[test]
    fn poll_without_choices_is_empty() {
        let tally = PollTally::from_poll(&json!({ "question": "?" }));
        assert_eq!(tally.total, 0);
        assert!(tally.choices.is_empty());
    }
}
