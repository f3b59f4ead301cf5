//! Game descriptor generation from the template table.

use crate::domain::{Difficulty, GameDescriptor, GameType, Subject};
use crate::errors::ProcessingError;
use crate::templates::GameTemplateTable;
use crate::util::title_case;

/// One descriptor per template of a known subject, in table order.
/// Subjects without templates get a single general quiz.
pub fn generate_games(
    table: &GameTemplateTable,
    subject: Subject,
    grade: i64,
    difficulty: Difficulty,
) -> Result<Vec<GameDescriptor>, ProcessingError> {
    let Some(templates) = table.templates_for(subject) else {
        return Ok(vec![general_quiz(grade, difficulty)]);
    };

    templates
        .iter()
        .map(|t| -> Result<GameDescriptor, ProcessingError> {
            Ok(GameDescriptor {
                id: format!("{}_{}_{}", subject, t.game_type, grade),
                game_type: t.game_type,
                title: format!(
                    "{} {} Game",
                    title_case(subject.as_str()),
                    title_case(t.game_type.as_str())
                ),
                description: t.render(subject, grade, difficulty)?,
                difficulty,
                grade,
                instructions: format!("Complete this {subject} activity for grade {grade}!"),
            })
        })
        .collect()
}

fn general_quiz(grade: i64, difficulty: Difficulty) -> GameDescriptor {
    GameDescriptor {
        id: format!("general_quiz_{grade}"),
        game_type: GameType::Quiz,
        title: format!("Grade {grade} Learning Quiz"),
        description: format!("Test your knowledge with grade {grade} questions"),
        difficulty,
        grade,
        instructions: "Answer questions based on your uploaded lesson!".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(games: &[GameDescriptor]) -> Vec<&str> {
        games.iter().map(|g| g.id.as_str()).collect()
    }

    #[test]
    fn math_grade_three() {
        let table = GameTemplateTable::builtin();
        let games = generate_games(&table, Subject::Math, 3, Difficulty::Intermediate).unwrap();
        assert_eq!(ids(&games), vec!["math_quiz_3", "math_puzzle_3", "math_memory_3"]);
        assert_eq!(games[0].title, "Math Quiz Game");
        assert_eq!(games[0].description, "Create a math quiz with intermediate level questions");
        assert_eq!(games[1].description, "Generate a math puzzle for grade 3");
        assert_eq!(games[2].instructions, "Complete this math activity for grade 3!");
        assert!(games.iter().all(|g| g.difficulty == Difficulty::Intermediate && g.grade == 3));
    }

    #[test]
    fn known_subjects_get_three_games() {
        let table = GameTemplateTable::builtin();
        for subject in [Subject::Math, Subject::Reading, Subject::Science] {
            let games = generate_games(&table, subject, 5, Difficulty::Advanced).unwrap();
            assert_eq!(games.len(), 3, "{subject}");
        }
    }

    #[test]
    fn word_puzzle_title_keeps_underscore() {
        let table = GameTemplateTable::builtin();
        let games = generate_games(&table, Subject::Reading, 1, Difficulty::Beginner).unwrap();
        assert_eq!(games[2].id, "reading_word_puzzle_1");
        assert_eq!(games[2].title, "Reading Word_Puzzle Game");
    }

    #[test]
    fn general_gets_single_fallback_quiz() {
        let table = GameTemplateTable::builtin();
        let games = generate_games(&table, Subject::General, 2, Difficulty::Beginner).unwrap();
        assert_eq!(games.len(), 1);
        let g = &games[0];
        assert_eq!(g.id, "general_quiz_2");
        assert_eq!(g.game_type, GameType::Quiz);
        assert_eq!(g.title, "Grade 2 Learning Quiz");
        assert_eq!(g.description, "Test your knowledge with grade 2 questions");
    }

    #[test]
    fn serialized_descriptor_uses_wire_names() {
        let table = GameTemplateTable::builtin();
        let games = generate_games(&table, Subject::Science, 6, Difficulty::Advanced).unwrap();
        let v = serde_json::to_value(&games[1]).unwrap();
        assert_eq!(v["type"], "experiment");
        assert_eq!(v["difficulty"], "advanced");
        assert_eq!(v["description"], "Design simple experiments for grade 6");
    }
}
