use crate::types::Winner;

/// What happens to the session after an elimination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Continue,
    Finished(Winner),
}

/// Decides whether an elimination ended the game
pub struct WinEvaluator;

impl WinEvaluator {
    pub fn evaluate(eliminated_was_impostor: bool, impostor_alive: bool, alive_count: usize) -> Verdict {
        if eliminated_was_impostor {
            Verdict::Finished(Winner::Players)
        } else if impostor_alive && alive_count <= 2 {
            Verdict::Finished(Winner::Impostor)
        } else {
            Verdict::Continue
        }
    }
}
