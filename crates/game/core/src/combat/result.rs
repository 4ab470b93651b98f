//! Combat result value and its readout sentence.

use std::fmt;

use crate::entity::EntityKind;

use super::crit::CritKind;

/// Outcome of one combat resolution, handed to the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageResult {
    pub source: EntityKind,
    pub target: EntityKind,
    /// Health removed from the target after its damage hook.
    pub amount: f64,
    pub effectiveness: f64,
    pub crit: CritKind,
}

impl DamageResult {
    /// `1` when effective, `-1` when resisted, `0` otherwise.
    pub fn effectiveness_sign(&self) -> i8 {
        if self.effectiveness > 0.0 {
            1
        } else if self.effectiveness < 0.0 {
            -1
        } else {
            0
        }
    }
}

fn readout_name(kind: EntityKind) -> String {
    match kind {
        EntityKind::Warlock => "you".to_string(),
        other => format!("a {}", other.display_name()),
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Renders the combat readout, e.g.
/// "A frog hit you for 1.2. It was not effective but it was a critical success!".
impl fmt::Display for DamageResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut clauses = Vec::with_capacity(2);
        let mut and = false;
        match self.effectiveness_sign() {
            1 => {
                clauses.push("was effective");
                and = true;
            }
            -1 => clauses.push("was not effective"),
            _ => {}
        }
        match self.crit {
            CritKind::Fail => {
                clauses.push("was a critical failure!");
                and = !and;
            }
            CritKind::Success => clauses.push("was a critical success!"),
            CritKind::None => {}
        }

        write!(
            f,
            "{} hit {} for {:.1}.",
            capitalize(&readout_name(self.source)),
            readout_name(self.target),
            self.amount
        )?;
        match clauses.as_slice() {
            [] => Ok(()),
            [only] => {
                let stop = if only.ends_with('!') { "" } else { "." };
                write!(f, " It {only}{stop}")
            }
            [first, second, ..] => {
                let joiner = if and { "and" } else { "but" };
                write!(f, " It {first} {joiner} it {second}")
            }
        }
    }
}
