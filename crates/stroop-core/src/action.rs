//! Winner-take-all action selection.
//!
//! Every option's utility is evaluated against the current evidence, then the
//! single highest wins. Ties go to the option declared first. Selection is
//! repeated every step, so the chosen response can change as evidence evolves.

use crate::error::Result;
use crate::vector::SemanticPointer;
use crate::vocabulary::Vocabulary;

#[derive(Clone, Debug)]
pub enum Utility {
    /// Dot product of the evidence with a target vector.
    Dot(SemanticPointer),
    /// Fixed utility, independent of the evidence.
    Constant(f64),
}

impl Utility {
    pub fn evaluate(&self, evidence: &SemanticPointer) -> f64 {
        match self {
            Utility::Dot(target) => evidence.dot(target),
            Utility::Constant(c) => *c,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ActionOption {
    pub name: String,
    pub utility: Utility,
    pub effect: SemanticPointer,
}

/// Outcome of one evaluation cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    pub index: usize,
    pub utilities: Vec<f64>,
}

#[derive(Clone, Debug, Default)]
pub struct ActionSelection {
    options: Vec<ActionOption>,
}

impl ActionSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn option(mut self, name: &str, utility: Utility, effect: SemanticPointer) -> Self {
        self.options.push(ActionOption {
            name: name.to_string(),
            utility,
            effect,
        });
        self
    }

    /// BLUE → INDEX, RED → MIDDLE, otherwise no response once neither
    /// color beats `baseline`.
    pub fn stroop(vocab: &Vocabulary, baseline: f64) -> Result<Self> {
        Ok(Self::new()
            .option(
                "INDEX",
                Utility::Dot(vocab.get("BLUE")?.clone()),
                vocab.get("INDEX")?.clone(),
            )
            .option(
                "MIDDLE",
                Utility::Dot(vocab.get("RED")?.clone()),
                vocab.get("MIDDLE")?.clone(),
            )
            .option("NONE", Utility::Constant(baseline), vocab.zero()))
    }

    pub fn options(&self) -> &[ActionOption] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Evaluate all utilities, then take the argmax (first on ties).
    /// `None` only when there are no options.
    pub fn evaluate(&self, evidence: &SemanticPointer) -> Option<Selection> {
        let utilities: Vec<f64> = self
            .options
            .iter()
            .map(|o| o.utility.evaluate(evidence))
            .collect();

        let mut best: Option<usize> = None;
        for (i, u) in utilities.iter().enumerate() {
            match best {
                Some(b) if *u <= utilities[b] => {}
                _ => best = Some(i),
            }
        }
        best.map(|index| Selection { index, utilities })
    }

    pub fn effect(&self, index: usize) -> &SemanticPointer {
        &self.options[index].effect
    }

    pub fn name(&self, index: usize) -> &str {
        &self.options[index].name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::BASELINE_UTILITY;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn vocab() -> Vocabulary {
        Vocabulary::stroop(16, 0.1, &mut SmallRng::seed_from_u64(42)).unwrap()
    }

    #[test]
    fn test_blue_selects_index() {
        let vocab = vocab();
        let sel = ActionSelection::stroop(&vocab, BASELINE_UTILITY).unwrap();
        let s = sel.evaluate(vocab.get("BLUE").unwrap()).unwrap();
        assert_eq!(sel.name(s.index), "INDEX");
        assert_eq!(sel.effect(s.index), vocab.get("INDEX").unwrap());
    }

    #[test]
    fn test_red_selects_middle() {
        let vocab = vocab();
        let sel = ActionSelection::stroop(&vocab, BASELINE_UTILITY).unwrap();
        let s = sel.evaluate(vocab.get("RED").unwrap()).unwrap();
        assert_eq!(sel.name(s.index), "MIDDLE");
    }

    #[test]
    fn test_zero_evidence_selects_no_response() {
        let vocab = vocab();
        let sel = ActionSelection::stroop(&vocab, BASELINE_UTILITY).unwrap();
        let s = sel.evaluate(&vocab.zero()).unwrap();
        assert_eq!(sel.name(s.index), "NONE");
        assert_eq!(sel.effect(s.index), &vocab.zero());
        assert_eq!(s.utilities, vec![0.0, 0.0, BASELINE_UTILITY]);
    }

    #[test]
    fn test_weak_evidence_below_baseline() {
        let vocab = vocab();
        let sel = ActionSelection::stroop(&vocab, BASELINE_UTILITY).unwrap();
        let weak = vocab.get("RED").unwrap() * 0.3;
        let s = sel.evaluate(&weak).unwrap();
        assert_eq!(sel.name(s.index), "NONE");
    }

    #[test]
    fn test_ties_go_to_first_declared() {
        let d = 4;
        let sel = ActionSelection::new()
            .option("A", Utility::Constant(0.5), SemanticPointer::identity(d))
            .option("B", Utility::Constant(0.5), SemanticPointer::zeros(d))
            .option("C", Utility::Constant(0.2), SemanticPointer::zeros(d));
        let s = sel.evaluate(&SemanticPointer::zeros(d)).unwrap();
        assert_eq!(s.index, 0);
    }

    #[test]
    fn test_empty_selection() {
        assert!(ActionSelection::new().evaluate(&SemanticPointer::zeros(2)).is_none());
    }
}
