//! Visibility conditions.
//!
//! A condition is a conjunction of `field=value` clauses separated by commas.
//! Every clause must match the current answers exactly for the owning
//! question to be shown.

use crate::answers::AnswerState;

/// One `field=value` test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub field: String,
    /// `None` when the clause has no `=`; it then holds only while the field
    /// is unanswered.
    pub expected: Option<String>,
}

impl Clause {
    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let mut parts = raw.split('=');
        let field = parts.next().unwrap_or_default().trim().to_string();
        let expected = parts.next().map(|value| value.trim().to_string());
        Some(Clause { field, expected })
    }

    pub fn holds(&self, answers: &AnswerState) -> bool {
        match answers.get(&self.field) {
            None => self.expected.is_none(),
            Some(value) => value.as_text().is_some() && value.as_text() == self.expected.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    clauses: Vec<Clause>,
}

impl Condition {
    /// Returns `None` for a blank expression.
    pub fn parse(raw: &str) -> Option<Self> {
        let clauses = raw.split(',').filter_map(Clause::parse).collect::<Vec<_>>();
        if clauses.is_empty() {
            None
        } else {
            Some(Condition { clauses })
        }
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn holds(&self, answers: &AnswerState) -> bool {
        self.clauses.iter().all(|clause| clause.holds(answers))
    }
}

/// Whether a question with `condition` is shown for `answers`.
pub fn visible(condition: Option<&str>, answers: &AnswerState) -> bool {
    match condition.and_then(Condition::parse) {
        None => true,
        Some(condition) => condition.holds(answers),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::AnswerValue;

    fn answers(pairs: &[(&str, &str)]) -> AnswerState {
        let mut state = AnswerState::new();
        for (field, value) in pairs {
            state.set(field, AnswerValue::Text((*value).to_string()));
        }
        state
    }

    #[test]
    fn absent_condition_is_visible() {
        assert!(visible(None, &AnswerState::new()));
        assert!(visible(Some("   "), &AnswerState::new()));
    }

    #[test]
    fn single_clause_matches_exactly() {
        let cond = Some("tipo_material=Video");
        assert!(!visible(cond, &AnswerState::new()));
        assert!(visible(cond, &answers(&[("tipo_material", "Video")])));
        assert!(!visible(cond, &answers(&[("tipo_material", "video")])));
        assert!(!visible(cond, &answers(&[("tipo_material", "Imagen")])));
    }

    #[test]
    fn clauses_are_trimmed_and_conjoined() {
        let cond = Some(" canal = Meta ,  formato=Video ");
        assert!(!visible(cond, &answers(&[("canal", "Meta")])));
        assert!(visible(cond, &answers(&[("canal", "Meta"), ("formato", "Video")])));
    }

    #[test]
    fn selections_never_equal_a_scalar() {
        let mut state = AnswerState::new();
        state.toggle("modelos", "Ranger");
        assert!(!visible(Some("modelos=Ranger"), &state));
    }

    #[test]
    fn empty_expected_value_needs_an_empty_answer() {
        assert!(!visible(Some("nota="), &AnswerState::new()));
        assert!(visible(Some("nota="), &answers(&[("nota", "")])));
    }

    #[test]
    fn bare_field_holds_while_unanswered() {
        assert!(visible(Some("borrador"), &AnswerState::new()));
        assert!(!visible(Some("borrador"), &answers(&[("borrador", "x")])));
    }

    #[test]
    fn extra_equals_segments_are_ignored() {
        let condition = Condition::parse("a=b=c").expect("condition");
        assert_eq!(condition.clauses()[0].expected.as_deref(), Some("b"));
    }
}
