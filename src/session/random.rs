use rand::Rng;

use crate::schemas::question::Question;

/// Outcome of building a session question set.
#[derive(Debug)]
pub(crate) struct Selection {
    pub(crate) questions: Vec<Question>,
    /// True when the category held fewer questions than requested and the
    /// set was clamped to what was available.
    pub(crate) clamped: bool,
}

/// Unbiased in-place Fisher-Yates shuffle.
fn fisher_yates<T, R: Rng>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Draw `count` distinct questions from `pool` by shuffling a full copy and
/// truncating. Clamps to the pool size when `count` exceeds it; each selected
/// question gets an independent choice shuffle. Callers guarantee
/// `count >= 1`; an empty pool yields an empty, clamped selection.
pub(crate) fn select_session_questions<R: Rng>(
    pool: &[Question],
    count: usize,
    rng: &mut R,
) -> Selection {
    let mut copies: Vec<Question> = pool.to_vec();
    fisher_yates(&mut copies, rng);

    let clamped = count > copies.len();
    copies.truncate(count.min(copies.len()));

    let questions = copies.into_iter().map(|question| shuffle_choices(question, rng)).collect();

    Selection { questions, clamped }
}

/// Shuffle a question's choices, remapping `answer_index` so it keeps
/// pointing at the originally-correct choice text.
pub(crate) fn shuffle_choices<R: Rng>(question: Question, rng: &mut R) -> Question {
    let mut indexed: Vec<(usize, String)> = question.choices.into_iter().enumerate().collect();
    fisher_yates(&mut indexed, rng);

    let mut choices = Vec::with_capacity(indexed.len());
    let mut answer_index = 0;
    for (new_index, (original_index, text)) in indexed.into_iter().enumerate() {
        if original_index == question.answer_index {
            answer_index = new_index;
        }
        choices.push(text);
    }

    Question { text: question.text, choices, answer_index }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn pool(size: usize) -> Vec<Question> {
        (0..size)
            .map(|i| Question {
                text: format!("question {i}"),
                choices: vec![
                    format!("choice {i}-a"),
                    format!("choice {i}-b"),
                    format!("choice {i}-c"),
                    format!("choice {i}-d"),
                ],
                answer_index: i % 4,
            })
            .collect()
    }

    #[test]
    fn selects_exactly_count_distinct_questions() {
        let source = pool(40);
        let mut rng = StdRng::seed_from_u64(7);

        let selection = select_session_questions(&source, 25, &mut rng);

        assert_eq!(selection.questions.len(), 25);
        assert!(!selection.clamped);
        let texts: HashSet<&str> =
            selection.questions.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts.len(), 25);
        let source_texts: HashSet<&str> = source.iter().map(|q| q.text.as_str()).collect();
        assert!(texts.is_subset(&source_texts));
    }

    #[test]
    fn clamps_when_pool_is_smaller_than_count() {
        let source = pool(10);
        let mut rng = StdRng::seed_from_u64(7);

        let selection = select_session_questions(&source, 25, &mut rng);

        assert_eq!(selection.questions.len(), 10);
        assert!(selection.clamped);
    }

    #[test]
    fn shuffled_choices_are_a_permutation() {
        let source = pool(1);
        let original = source[0].clone();
        let correct_text = original.choices[original.answer_index].clone();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..200 {
            let shuffled = shuffle_choices(original.clone(), &mut rng);
            let before: HashSet<&str> = original.choices.iter().map(String::as_str).collect();
            let after: HashSet<&str> = shuffled.choices.iter().map(String::as_str).collect();
            assert_eq!(before, after);
            assert_eq!(shuffled.choices[shuffled.answer_index], correct_text);
        }
    }

    #[test]
    fn selection_does_not_mutate_the_pool() {
        let source = pool(8);
        let before = source.clone();
        let mut rng = StdRng::seed_from_u64(3);

        let mut selection = select_session_questions(&source, 5, &mut rng);
        for question in &mut selection.questions {
            question.text.push_str(" (edited)");
        }

        assert_eq!(source, before);
    }

    #[test]
    fn every_question_eventually_gets_selected() {
        // With 3-of-6 draws over many seeds, an unbiased shuffle must pick
        // each question at least once.
        let source = pool(6);
        let mut seen: HashSet<String> = HashSet::new();

        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let selection = select_session_questions(&source, 3, &mut rng);
            for question in selection.questions {
                seen.insert(question.text);
            }
        }

        assert_eq!(seen.len(), source.len());
    }
}
