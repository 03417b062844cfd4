//! Distractor generation for multiple-choice questions.

use crate::shuffle::shuffled;
use crate::types::Card;
use rand::Rng;

/// Total options per question, correct answer included.
pub const MAX_CHOICES: usize = 4;

/// Build the option list for one multiple-choice question.
///
/// Distractors are drawn from sibling cards in `pool`, excluding the card
/// being asked. When `use_question_side` is set the question field of each
/// sibling is used (reverse-direction drills), otherwise the answer field.
/// Values equal to the correct answer or already collected are skipped until
/// three distinct wrong values are found or the pool runs out.
///
/// If no wrong value can be collected at all, the result is just
/// `[correct_answer]` — a degenerate one-option question, not an error.
pub fn generate_choices(
    correct_answer: &str,
    pool: &[Card],
    current_card_id: &str,
    use_question_side: bool,
    rng: &mut impl Rng,
) -> Vec<String> {
    let others: Vec<&Card> = pool.iter().filter(|c| c.id != current_card_id).collect();

    let mut wrong: Vec<String> = Vec::new();
    for card in shuffled(&others, rng) {
        if wrong.len() == MAX_CHOICES - 1 {
            break;
        }
        let value = if use_question_side {
            card.question.clone()
        } else {
            card.answer.clone()
        };
        if value != correct_answer && !wrong.contains(&value) {
            wrong.push(value);
        }
    }

    if wrong.is_empty() {
        return vec![correct_answer.to_string()];
    }

    wrong.push(correct_answer.to_string());
    shuffled(&wrong, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn card(id: &str, question: &str, answer: &str) -> Card {
        Card {
            id: id.to_string(),
            question: question.to_string(),
            answer: answer.to_string(),
        }
    }

    fn pool() -> Vec<Card> {
        vec![
            card("1", "apple", "りんご"),
            card("2", "book", "本"),
            card("3", "cat", "猫"),
            card("4", "dog", "犬"),
            card("5", "water", "水"),
        ]
    }

    #[test]
    fn contains_correct_answer_exactly_once() {
        let mut rng = StdRng::seed_from_u64(3);
        let choices = generate_choices("りんご", &pool(), "1", false, &mut rng);

        assert_eq!(choices.iter().filter(|c| *c == "りんご").count(), 1);
        assert!(choices.len() <= MAX_CHOICES);
    }

    #[test]
    fn no_duplicates_and_current_card_excluded() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let choices = generate_choices("りんご", &pool(), "1", false, &mut rng);
            let mut unique = choices.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), choices.len());
        }
    }

    #[test]
    fn question_side_used_for_reverse_direction() {
        let mut rng = StdRng::seed_from_u64(5);
        let choices = generate_choices("apple", &pool(), "1", true, &mut rng);

        // Wrong options must come from the question side of siblings.
        for choice in &choices {
            assert!(["apple", "book", "cat", "dog", "water"].contains(&choice.as_str()));
        }
    }

    #[test]
    fn duplicate_pool_values_are_skipped() {
        let cards = vec![
            card("1", "one", "same"),
            card("2", "two", "same"),
            card("3", "three", "same"),
            card("4", "four", "other"),
        ];
        let mut rng = StdRng::seed_from_u64(9);
        let choices = generate_choices("correct", &cards, "1", false, &mut rng);

        // "same" can appear at most once among the distractors.
        assert_eq!(choices.iter().filter(|c| *c == "same").count(), 1);
        assert!(choices.contains(&"correct".to_string()));
        assert_eq!(choices.len(), 3);
    }

    #[test]
    fn degenerate_single_option_when_no_distractor_exists() {
        let cards = vec![card("1", "apple", "りんご"), card("2", "fruit", "りんご")];
        let mut rng = StdRng::seed_from_u64(2);
        let choices = generate_choices("りんご", &cards, "1", false, &mut rng);
        assert_eq!(choices, vec!["りんご".to_string()]);
    }

    #[test]
    fn singleton_pool_yields_only_the_correct_answer() {
        let cards = vec![card("1", "apple", "りんご")];
        let mut rng = StdRng::seed_from_u64(2);
        let choices = generate_choices("りんご", &cards, "1", false, &mut rng);
        assert_eq!(choices, vec!["りんご".to_string()]);
    }
}
